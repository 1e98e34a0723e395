use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gifquant::Encoder;
use pix::rgb::SRgb8;
use pix::Raster;

/// Make a 128x128 gradient raster
fn gradient_raster() -> Raster<SRgb8> {
    let mut pixels = Vec::with_capacity(128 * 128);
    for y in 0..128u32 {
        for x in 0..128u32 {
            pixels.push(SRgb8::new(
                (x * 2) as u8,
                (y * 2) as u8,
                ((x + y) % 256) as u8,
            ));
        }
    }
    Raster::with_pixels(128, 128, pixels)
}

fn encode_raster(crit: &mut Criterion) {
    let raster = gradient_raster();
    crit.bench_function("encode_raster", |b| {
        b.iter(|| {
            let mut bytes = Vec::with_capacity(32768);
            let mut enc =
                Encoder::new_unbuffered(&mut bytes).into_raster_enc();
            enc.encode_raster(black_box(&raster)).unwrap();
            drop(enc);
            black_box(bytes);
        })
    });
}

criterion_group!(benches, encode_raster);
criterion_main!(benches);
