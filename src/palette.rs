// palette.rs
//
// Copyright (c) 2025  Douglas Lau
//
//! Color palettes built by median-cut quantization
use pix::rgb::{Rgb, SRgb8};

/// Channel of an RGB color
#[derive(Clone, Copy, Debug, PartialEq)]
enum Channel {
    Red,
    Green,
    Blue,
}

/// Color palette for one GIF
///
/// An ordered table of colors, immutable once built.  Build with
/// [quantize](struct.Palette.html#method.quantize), then assign an index
/// to every source pixel with
/// [index_pixels](struct.Palette.html#method.index_pixels).
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    /// Table colors, in index order
    colors: Vec<SRgb8>,
}

impl Channel {
    /// Get the channel value of a color
    fn value(self, clr: SRgb8) -> u8 {
        match self {
            Channel::Red => u8::from(Rgb::red(clr)),
            Channel::Green => u8::from(Rgb::green(clr)),
            Channel::Blue => u8::from(Rgb::blue(clr)),
        }
    }

    /// Get the value range of a channel within a bucket
    fn range(self, bucket: &[SRgb8]) -> u8 {
        let mut min = u8::MAX;
        let mut max = u8::MIN;
        for clr in bucket {
            let v = self.value(*clr);
            min = min.min(v);
            max = max.max(v);
        }
        max.saturating_sub(min)
    }

    /// Select the channel with the widest range within a bucket.
    ///
    /// Ties go to red, then green, then blue.
    fn widest(bucket: &[SRgb8]) -> Self {
        let red = Channel::Red.range(bucket);
        let green = Channel::Green.range(bucket);
        let blue = Channel::Blue.range(bucket);
        if red >= green && red >= blue {
            Channel::Red
        } else if green >= blue {
            Channel::Green
        } else {
            Channel::Blue
        }
    }
}

/// Average the colors of a bucket (channel means in 32-bit accumulators)
fn average(bucket: &[SRgb8]) -> SRgb8 {
    if bucket.is_empty() {
        return SRgb8::default();
    }
    let mut red = 0u32;
    let mut green = 0u32;
    let mut blue = 0u32;
    for clr in bucket {
        red += u32::from(u8::from(Rgb::red(*clr)));
        green += u32::from(u8::from(Rgb::green(*clr)));
        blue += u32::from(u8::from(Rgb::blue(*clr)));
    }
    let n = bucket.len() as u32;
    SRgb8::new((red / n) as u8, (green / n) as u8, (blue / n) as u8)
}

/// Quantize one bucket down to `n` colors by recursive median cut
fn median_cut(mut bucket: Vec<SRgb8>, n: usize) -> Vec<SRgb8> {
    if n == 1 {
        return vec![average(&bucket)];
    }
    let channel = Channel::widest(&bucket);
    bucket.sort_unstable_by_key(|clr| channel.value(*clr));
    let upper = bucket.split_off(bucket.len() / 2);
    let mut colors = median_cut(bucket, n / 2);
    colors.extend(median_cut(upper, n / 2));
    colors
}

impl Palette {
    /// Build a palette of exactly `n` colors from source pixels.
    ///
    /// * `pixels`: Source colors, in any order.
    /// * `n`: Palette size; a power of two no greater than 256.
    ///
    /// Buckets left empty by the median cut come out as black entries.
    pub fn quantize(pixels: &[SRgb8], n: usize) -> Self {
        assert!(n >= 1 && n <= 256 && n.is_power_of_two());
        let colors = median_cut(pixels.to_vec(), n);
        Palette { colors }
    }

    /// Get the number of colors in the palette
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Check if the palette is empty
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Get one palette entry
    pub fn entry(&self, i: usize) -> Option<SRgb8> {
        self.colors.get(i).copied()
    }

    /// Get the table colors, in index order
    pub fn colors(&self) -> &[SRgb8] {
        &self.colors
    }

    /// Get the number of bits needed to index the palette (2 to 8)
    pub fn bits_needed(&self) -> u8 {
        let mut bits = 2;
        while (1 << bits) < self.colors.len() {
            bits += 1;
        }
        bits
    }

    /// Find the index of the palette entry nearest to a color.
    ///
    /// Nearest means the smallest squared Euclidean distance in RGB
    /// space; ties go to the lowest index.
    pub fn nearest(&self, clr: SRgb8) -> usize {
        let mut best = 0;
        let mut best_dist = i32::MAX;
        for (i, entry) in self.colors.iter().enumerate() {
            let dist = dist_sq(*entry, clr);
            if dist < best_dist {
                best = i;
                best_dist = dist;
            }
        }
        best
    }

    /// Map source pixels to palette indices, one byte per pixel
    pub fn index_pixels(&self, pixels: &[SRgb8]) -> Vec<u8> {
        pixels.iter().map(|clr| self.nearest(*clr) as u8).collect()
    }

    /// Get the palette as bytes, three per entry in R, G, B order
    pub fn color_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.colors.len() * 3);
        for clr in &self.colors {
            bytes.push(u8::from(Rgb::red(*clr)));
            bytes.push(u8::from(Rgb::green(*clr)));
            bytes.push(u8::from(Rgb::blue(*clr)));
        }
        bytes
    }
}

/// Squared Euclidean distance between two colors
fn dist_sq(a: SRgb8, b: SRgb8) -> i32 {
    let dr = i32::from(u8::from(Rgb::red(a))) - i32::from(u8::from(Rgb::red(b)));
    let dg = i32::from(u8::from(Rgb::green(a)))
        - i32::from(u8::from(Rgb::green(b)));
    let db =
        i32::from(u8::from(Rgb::blue(a))) - i32::from(u8::from(Rgb::blue(b)));
    dr * dr + dg * dg + db * db
}

#[cfg(test)]
mod test {
    use super::*;

    fn gray_steps() -> Vec<SRgb8> {
        vec![
            SRgb8::new(10, 20, 30),
            SRgb8::new(40, 50, 60),
            SRgb8::new(70, 80, 90),
            SRgb8::new(100, 110, 120),
            SRgb8::new(130, 140, 150),
            SRgb8::new(160, 170, 180),
            SRgb8::new(190, 200, 210),
            SRgb8::new(220, 230, 240),
        ]
    }

    #[test]
    fn quantize_exact_fit() {
        let pixels = gray_steps();
        let palette = Palette::quantize(&pixels, 8);
        assert_eq!(palette.colors(), &pixels[..]);
    }

    #[test]
    fn quantize_oversized() {
        let pixels = gray_steps();
        let palette = Palette::quantize(&pixels, 256);
        assert_eq!(palette.len(), 256);
        assert_ne!(palette.colors()[..8], pixels[..]);
        for clr in &pixels {
            assert!(palette.colors().contains(clr));
        }
        assert!(palette.colors().contains(&SRgb8::default()));
    }

    #[test]
    fn quantize_single_entry() {
        let pixels = [SRgb8::new(10, 20, 30), SRgb8::new(20, 30, 40)];
        let palette = Palette::quantize(&pixels, 1);
        assert_eq!(palette.colors(), &[SRgb8::new(15, 25, 35)]);
    }

    #[test]
    fn quantize_no_pixels() {
        let palette = Palette::quantize(&[], 4);
        assert_eq!(palette.colors(), &[SRgb8::default(); 4]);
    }

    #[test]
    fn quantize_empty_buckets() {
        let pixels = [
            SRgb8::new(255, 0, 0),
            SRgb8::new(0, 255, 0),
            SRgb8::new(0, 0, 255),
        ];
        let palette = Palette::quantize(&pixels, 16);
        assert_eq!(palette.len(), 16);
        for clr in &pixels {
            assert!(palette.colors().contains(clr));
        }
        assert!(palette.colors().contains(&SRgb8::default()));
    }

    #[test]
    fn widest_channel_ties() {
        let bucket = [SRgb8::new(0, 0, 0), SRgb8::new(10, 10, 10)];
        assert_eq!(Channel::widest(&bucket), Channel::Red);
        let bucket = [SRgb8::new(0, 0, 0), SRgb8::new(5, 10, 10)];
        assert_eq!(Channel::widest(&bucket), Channel::Green);
        let bucket = [SRgb8::new(0, 0, 0), SRgb8::new(5, 5, 10)];
        assert_eq!(Channel::widest(&bucket), Channel::Blue);
    }

    #[test]
    fn bits_needed() {
        assert_eq!(Palette::quantize(&[], 1).bits_needed(), 2);
        assert_eq!(Palette::quantize(&[], 4).bits_needed(), 2);
        assert_eq!(Palette::quantize(&[], 8).bits_needed(), 3);
        assert_eq!(Palette::quantize(&[], 16).bits_needed(), 4);
        assert_eq!(Palette::quantize(&[], 128).bits_needed(), 7);
        assert_eq!(Palette::quantize(&[], 256).bits_needed(), 8);
    }

    #[test]
    fn nearest_argmin() {
        let palette = Palette::quantize(&gray_steps(), 8);
        assert_eq!(palette.nearest(SRgb8::new(12, 22, 28)), 0);
        assert_eq!(palette.nearest(SRgb8::new(255, 255, 255)), 7);
        assert_eq!(palette.nearest(SRgb8::new(95, 105, 115)), 3);
    }

    #[test]
    fn nearest_tie_lowest_index() {
        let pixels = [SRgb8::new(50, 50, 50); 4];
        let palette = Palette::quantize(&pixels, 4);
        assert_eq!(palette.nearest(SRgb8::new(50, 50, 50)), 0);
    }

    #[test]
    fn index_round_trip() {
        let palette = Palette::quantize(&gray_steps(), 8);
        let pixels = [
            palette.entry(5).unwrap(),
            palette.entry(0).unwrap(),
            palette.entry(7).unwrap(),
            palette.entry(0).unwrap(),
        ];
        let indices = palette.index_pixels(&pixels);
        assert_eq!(indices, vec![5, 0, 7, 0]);
        for (i, clr) in indices.iter().zip(pixels.iter()) {
            assert_eq!(palette.entry(*i as usize).unwrap(), *clr);
        }
    }

    #[test]
    fn color_bytes_order() {
        let palette = Palette::quantize(&[SRgb8::new(0x55, 0xFF, 0x00)], 1);
        assert_eq!(palette.color_bytes(), vec![0x55, 0xFF, 0x00]);
    }
}
