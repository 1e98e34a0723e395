// rainbow.rs
use gifquant::encode_animated;
use pix::el::Pixel;
use pix::hsv::Hsv8;
use pix::rgb::SRgb8;
use pix::Raster;
use std::error::Error;
use std::fs::File;
use std::io::Write;

/// Frame dimensions
const SIZE: u16 = 60;

/// Make one frame with every hue, rotated by a step
fn rainbow_frame(step: u16) -> Raster<SRgb8> {
    let n = u32::from(SIZE) * u32::from(SIZE);
    let mut pixels = Vec::with_capacity(n as usize);
    for i in 0..n {
        let hue = ((i * 256 / n + u32::from(step) * 256 / 36) % 256) as u8;
        let hsv = Hsv8::new(hue, 255, 255);
        pixels.push(hsv.convert());
    }
    Raster::with_pixels(u32::from(SIZE), u32::from(SIZE), pixels)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::builder().format_timestamp(None).init();
    let frames: Vec<_> = (0..36).map(rainbow_frame).collect();
    let bytes = encode_animated(&frames, true)?;
    let mut file = File::create("rainbow.gif")?;
    file.write_all(&bytes)?;
    println!("rainbow.gif: {} bytes", bytes.len());
    Ok(())
}
