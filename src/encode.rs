// encode.rs
//
// Copyright (c) 2025  Douglas Lau
//
//! GIF file encoding
use crate::block::*;
use crate::lzw::Compressor;
use crate::palette::Palette;
use crate::{Error, Result};
use pix::rgb::SRgb8;
use pix::Raster;
use std::convert::TryInto;
use std::io::{self, Write};

/// Number of colors in a global color table built from a raster
const GLOBAL_COLORS: usize = 256;

/// Encoder for writing [Block]s into a GIF file.
///
/// Build with Encoder.[into_block_enc].
///
/// [Block]: ../block/enum.Block.html
/// [into_block_enc]: ../struct.Encoder.html#method.into_block_enc
pub struct BlockEnc<W: Write> {
    /// Writer for output data
    writer: W,
}

impl<W: Write> BlockEnc<W> {
    /// Create a new GIF block encoder.
    pub(crate) fn new(writer: W) -> Self {
        BlockEnc { writer }
    }

    /// Encode one [Block](block/enum.Block.html).
    pub fn encode<B>(&mut self, block: B) -> Result<()>
    where
        B: Into<Block>,
    {
        use crate::block::Block::*;
        let mut w = &mut self.writer;
        match block.into() {
            Header(b) => b.format(&mut w),
            LogicalScreenDesc(b) => b.format(&mut w),
            GlobalColorTable(b) => b.format(&mut w),
            Comment(b) => b.format(&mut w),
            Application(b) => b.format(&mut w),
            ImageDesc(b) => b.format(&mut w),
            LocalColorTable(b) => b.format(&mut w),
            ImageData(b) => b.format(&mut w),
            Trailer(b) => b.format(&mut w),
        }?;
        Ok(())
    }
}

impl Header {
    /// Format a header block
    fn format<W: Write>(self, w: &mut W) -> io::Result<()> {
        w.write_all(b"GIF")?;
        w.write_all(&self.version())
    }
}

impl LogicalScreenDesc {
    /// Format a logical screen desc block
    fn format<W: Write>(self, w: &mut W) -> io::Result<()> {
        let width = self.screen_width();
        let height = self.screen_height();
        w.write_all(&[
            width as u8,
            (width >> 8) as u8,
            height as u8,
            (height >> 8) as u8,
            self.flags(),
            self.background_color_idx(),
            self.pixel_aspect_ratio(),
        ])
    }
}

impl GlobalColorTable {
    /// Format a global color table block
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(self.colors())
    }
}

impl Comment {
    /// Format a comment extension block
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(BlockCode::Extension_.signature())?;
        w.write_all(&[ExtensionCode::Comment_.into()])?;
        for c in self.comments() {
            debug_assert!(!c.is_empty() && c.len() < 256);
            let len = c.len() as u8;
            w.write_all(&[len])?; // sub-block size
            w.write_all(c)?;
        }
        w.write_all(&[0]) // final sub-block size
    }
}

impl Application {
    /// Format an application extension block
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(BlockCode::Extension_.signature())?;
        w.write_all(&[ExtensionCode::Application_.into()])?;
        for c in self.app_data() {
            debug_assert!(!c.is_empty() && c.len() < 256);
            let len = c.len() as u8;
            w.write_all(&[len])?; // sub-block size
            w.write_all(c)?;
        }
        w.write_all(&[0]) // final sub-block size
    }
}

impl ImageDesc {
    /// Format an image desc block
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(BlockCode::ImageDesc_.signature())?;
        let left = self.left();
        let top = self.top();
        let width = self.width();
        let height = self.height();
        w.write_all(&[
            left as u8,
            (left >> 8) as u8,
            top as u8,
            (top >> 8) as u8,
            width as u8,
            (width >> 8) as u8,
            height as u8,
            (height >> 8) as u8,
            self.flags(),
        ])
    }
}

impl LocalColorTable {
    /// Format a local color table block
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(self.colors())
    }
}

impl ImageData {
    /// Format an image data block
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let min_code_bits = self.min_code_size();
        w.write_all(&[min_code_bits])?;
        let mut buffer = Vec::with_capacity(self.data().len());
        let mut compressor = Compressor::new(min_code_bits);
        compressor.compress(self.data(), &mut buffer);
        // split buffer into sub-blocks
        for chunk in buffer.chunks(255) {
            let len = chunk.len() as u8;
            w.write_all(&[len])?; // sub-block size
            w.write_all(chunk)?;
        }
        w.write_all(&[0]) // final sub-block size
    }
}

impl Trailer {
    /// Format a trailer block
    fn format<W: Write>(self, w: &mut W) -> io::Result<()> {
        w.write_all(BlockCode::Trailer_.signature())
    }
}

/// Encoder for writing [Frame]s into a GIF file.
///
/// Build with Encoder.[into_frame_enc].
///
/// [Frame]: ../block/struct.Frame.html
/// [into_frame_enc]: ../struct.Encoder.html#method.into_frame_enc
pub struct FrameEnc<W: Write> {
    /// Block encoder
    block_enc: BlockEnc<W>,
    /// Has preamble been encoded?
    has_preamble: bool,
    /// Has trailer been encoded?
    has_trailer: bool,
}

impl<W: Write> FrameEnc<W> {
    /// Create a new GIF frame encoder.
    pub(crate) fn new(block_enc: BlockEnc<W>) -> Self {
        FrameEnc {
            block_enc,
            has_preamble: false,
            has_trailer: false,
        }
    }

    /// Encode the GIF preamble blocks.
    ///
    /// Must be called only once, before [encode_frame].
    ///
    /// [encode_frame]: struct.FrameEnc.html#method.encode_frame
    pub fn encode_preamble(&mut self, preamble: &Preamble) -> Result<()> {
        if self.has_preamble {
            return Err(Error::InvalidBlockSequence);
        }
        self.block_enc.encode(preamble.header)?;
        self.block_enc.encode(preamble.logical_screen_desc)?;
        if let Some(tbl) = &preamble.global_color_table {
            self.block_enc.encode(tbl.clone())?;
        }
        if let Some(cnt) = &preamble.loop_count_ext {
            self.block_enc.encode(cnt.clone())?;
        }
        for comment in &preamble.comments {
            self.block_enc.encode(comment.clone())?;
        }
        self.has_preamble = true;
        Ok(())
    }

    /// Encode one `Frame` of a GIF file.
    ///
    /// Must be called after [encode_preamble].
    ///
    /// [encode_preamble]: struct.FrameEnc.html#method.encode_preamble
    pub fn encode_frame(&mut self, frame: &Frame) -> Result<()> {
        if self.has_trailer || !self.has_preamble {
            return Err(Error::InvalidBlockSequence);
        }
        self.block_enc.encode(frame.image_desc)?;
        if let Some(tbl) = &frame.local_color_table {
            self.block_enc.encode(tbl.clone())?;
        }
        self.block_enc.encode(frame.image_data.clone())?;
        Ok(())
    }

    /// Encode the [Trailer] of a GIF file.
    ///
    /// Must be called last, after all `Frame`s have been encoded with
    /// [encode_frame].
    ///
    /// [encode_frame]: struct.FrameEnc.html#method.encode_frame
    /// [Trailer]: block/struct.Trailer.html
    pub fn encode_trailer(&mut self) -> Result<()> {
        if self.has_trailer || !self.has_preamble {
            return Err(Error::InvalidBlockSequence);
        }
        self.block_enc.encode(Trailer::default())?;
        self.has_trailer = true;
        Ok(())
    }
}

/// Encoder for writing true color `Raster`s into a GIF file.
///
/// All `Raster`s must have the same dimensions.  The global color table
/// is built from the first raster by median-cut quantization, and every
/// raster is indexed against it.
///
/// Build with Encoder.[into_raster_enc].
///
/// [into_raster_enc]: ../struct.Encoder.html#method.into_raster_enc
pub struct RasterEnc<W: Write> {
    /// Frame encoder
    frame_enc: FrameEnc<W>,
    /// Animation loop count
    loop_count: Option<Application>,
    /// Global color table palette, built from the first raster
    palette: Option<Palette>,
    /// Screen dimensions, from the first raster
    screen: Option<(u16, u16)>,
}

impl<W: Write> Drop for RasterEnc<W> {
    fn drop(&mut self) {
        let _ = self.frame_enc.encode_trailer();
    }
}

impl<W: Write> RasterEnc<W> {
    /// Create a new GIF raster encoder.
    pub(crate) fn new(frame_enc: FrameEnc<W>) -> Self {
        RasterEnc {
            frame_enc,
            loop_count: None,
            palette: None,
            screen: None,
        }
    }

    /// Set loop count for an animation.
    ///
    /// * `loop_count`: Number of times to loop animation; zero means
    ///   forever.
    pub fn with_loop_count(mut self, loop_count: u16) -> Self {
        self.loop_count = Some(Application::with_loop_count(loop_count));
        self
    }

    /// Encode one true color `Raster` to a GIF file.
    ///
    /// The first raster fixes the screen dimensions and the global color
    /// table; later rasters must have the same dimensions.
    pub fn encode_raster(&mut self, raster: &Raster<SRgb8>) -> Result<()> {
        let image_desc = make_image_desc(raster)?;
        if image_desc.image_sz() == 0 {
            return Err(Error::InvalidRasterDimensions);
        }
        let (indices, min_code_size) = {
            let palette = self.global_palette(raster, &image_desc)?;
            (palette.index_pixels(raster.pixels()), palette.bits_needed())
        };
        let mut image_data =
            ImageData::new(image_desc.image_sz(), min_code_size);
        image_data.add_data(&indices);
        let frame = Frame::new(image_desc, None, image_data);
        self.frame_enc.encode_frame(&frame)
    }

    /// Get the global palette, building it (and encoding the preamble)
    /// from the first raster.
    fn global_palette(
        &mut self,
        raster: &Raster<SRgb8>,
        image_desc: &ImageDesc,
    ) -> Result<&Palette> {
        match self.screen {
            Some(screen) => {
                if screen != (image_desc.width(), image_desc.height()) {
                    return Err(Error::InvalidRasterDimensions);
                }
            }
            None => {
                let palette =
                    Palette::quantize(raster.pixels(), GLOBAL_COLORS);
                debug!("global color table: {} colors", palette.len());
                self.encode_preamble(&palette, image_desc)?;
                self.screen =
                    Some((image_desc.width(), image_desc.height()));
                self.palette = Some(palette);
            }
        }
        match &self.palette {
            Some(palette) => Ok(palette),
            None => Err(Error::InvalidBlockSequence),
        }
    }

    /// Encode the preamble blocks for the first raster
    fn encode_preamble(
        &mut self,
        palette: &Palette,
        image_desc: &ImageDesc,
    ) -> Result<()> {
        let (tbl_cfg, colors) = make_color_table(palette);
        let logical_screen_desc = LogicalScreenDesc::default()
            .with_screen_width(image_desc.width())
            .with_screen_height(image_desc.height())
            .with_color_table_config(&tbl_cfg);
        let preamble = Preamble {
            header: Header::default(),
            logical_screen_desc,
            global_color_table: Some(GlobalColorTable::with_colors(&colors)),
            loop_count_ext: self.loop_count.clone(),
            comments: vec![],
        };
        self.frame_enc.encode_preamble(&preamble)
    }
}

/// Make an image description block
fn make_image_desc(raster: &Raster<SRgb8>) -> Result<ImageDesc> {
    let width = raster.width().try_into()?;
    let height = raster.height().try_into()?;
    Ok(ImageDesc::default().with_width(width).with_height(height))
}

/// Make a color table from a palette
fn make_color_table(palette: &Palette) -> (ColorTableConfig, Vec<u8>) {
    let tbl_cfg = ColorTableConfig::new(
        ColorTableExistence::Present,
        ColorTableOrdering::NotSorted,
        palette.len() as u16,
    );
    let mut colors = palette.color_bytes();
    while colors.len() < tbl_cfg.size_bytes() {
        colors.push(0);
    }
    (tbl_cfg, colors)
}
