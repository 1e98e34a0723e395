// lib.rs      gifquant crate.
//
// Copyright (c) 2025  Douglas Lau
//
//! A library for encoding GIF images and animations from true color
//! pixels.
//!
//! Rasters are quantized down to a 256-color global color table by
//! median cut, indexed by nearest color, and compressed with the GIF
//! flavor of LZW.
//!
//! ## Example: write an animation
//! ```no_run
//! use pix::rgb::SRgb8;
//! use pix::Raster;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut frames = vec![];
//! for i in 0..4u8 {
//!     let clr = SRgb8::new(i * 60, 0, 255 - i * 60);
//!     frames.push(Raster::with_color(16, 16, clr));
//! }
//! let bytes = gifquant::encode_animated(&frames, true)?;
//! std::fs::write("fade.gif", &bytes)?;
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

#[macro_use]
extern crate log;

pub mod block;
mod encode;
mod error;
mod lzw;
mod palette;
mod private;

pub use crate::encode::{BlockEnc, FrameEnc, RasterEnc};
pub use crate::error::{Error, Result};
pub use crate::palette::Palette;
pub use crate::private::{encode_animated, encode_single, Encoder};
