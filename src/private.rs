// private.rs
//
// Copyright (c) 2025  Douglas Lau
//
//! Private module for top-level items
use crate::encode::{BlockEnc, FrameEnc, RasterEnc};
use crate::{Error, Result};
use pix::rgb::SRgb8;
use pix::Raster;
use std::io::{BufWriter, Write};

/// GIF file encoder
///
/// Can be converted to one of three encoders:
/// * [into_raster_enc] for high-level true color `Raster`s
/// * [into_frame_enc] for mid-level [Frame]s
/// * [into_block_enc] for low-level [Block]s
///
/// ## Encoding Example
/// ```
/// use gifquant::Encoder;
/// use pix::rgb::SRgb8;
/// use pix::Raster;
/// use std::error::Error;
/// use std::io::Write;
///
/// fn encode<W: Write>(mut w: W) -> Result<(), Box<dyn Error>> {
///     let mut enc = Encoder::new(&mut w).into_raster_enc();
///     let mut raster = Raster::with_clear(4, 4);
///     *raster.pixel_mut(1, 1) = SRgb8::new(0xFF, 0, 0);
///     *raster.pixel_mut(2, 2) = SRgb8::new(0xFF, 0xFF, 0);
///     enc.encode_raster(&raster)?;
///     Ok(())
/// }
/// ```
///
/// [Block]: block/enum.Block.html
/// [Frame]: block/struct.Frame.html
/// [into_block_enc]: struct.Encoder.html#method.into_block_enc
/// [into_frame_enc]: struct.Encoder.html#method.into_frame_enc
/// [into_raster_enc]: struct.Encoder.html#method.into_raster_enc
pub struct Encoder<W: Write> {
    /// Writer for output data
    writer: W,
}

impl<W: Write> Encoder<BufWriter<W>> {
    /// Create a new buffered GIF encoder.
    pub fn new(writer: W) -> Self {
        Self::new_unbuffered(BufWriter::new(writer))
    }
}

impl<W: Write> Encoder<W> {
    /// Create a new unbuffered GIF encoder.
    pub fn new_unbuffered(writer: W) -> Self {
        Encoder { writer }
    }

    /// Convert into a block encoder.
    pub fn into_block_enc(self) -> BlockEnc<W> {
        BlockEnc::new(self.writer)
    }

    /// Convert into a frame encoder.
    pub fn into_frame_enc(self) -> FrameEnc<W> {
        FrameEnc::new(self.into_block_enc())
    }

    /// Convert into a raster encoder.
    pub fn into_raster_enc(self) -> RasterEnc<W> {
        RasterEnc::new(self.into_frame_enc())
    }
}

/// Encode one still image to an in-memory GIF.
///
/// The global color table is built from the raster by median-cut
/// quantization.
///
/// ## Example
/// ```
/// use pix::rgb::SRgb8;
/// use pix::Raster;
///
/// # fn main() -> Result<(), gifquant::Error> {
/// let raster = Raster::with_pixels(1, 1, vec![SRgb8::new(0xFF, 0, 0)]);
/// let bytes = gifquant::encode_single(&raster)?;
/// assert_eq!(&bytes[..6], b"GIF89a");
/// # Ok(())
/// # }
/// ```
pub fn encode_single(raster: &Raster<SRgb8>) -> Result<Vec<u8>> {
    let mut bytes = vec![];
    let mut enc = Encoder::new_unbuffered(&mut bytes).into_raster_enc();
    enc.encode_raster(raster)?;
    drop(enc);
    Ok(bytes)
}

/// Encode an animation to an in-memory GIF.
///
/// All rasters must have the same dimensions.  The global color table is
/// built from the first raster, and every raster is indexed against it.
///
/// * `rasters`: Animation frames, in order.
/// * `looping`: Loop the animation forever.
pub fn encode_animated(
    rasters: &[Raster<SRgb8>],
    looping: bool,
) -> Result<Vec<u8>> {
    if rasters.is_empty() {
        return Err(Error::EmptyFrameList);
    }
    let mut bytes = vec![];
    let mut enc = Encoder::new_unbuffered(&mut bytes).into_raster_enc();
    if looping {
        enc = enc.with_loop_count(0);
    }
    for raster in rasters {
        enc.encode_raster(raster)?;
    }
    drop(enc);
    Ok(bytes)
}
