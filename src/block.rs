// block.rs
//
// Copyright (c) 2025  Douglas Lau
//
//! GIF block types
use crate::palette::Palette;

/// Channels per color table entry
const CHANNELS: usize = 3;

/// Existence of a color table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTableExistence {
    /// Table is absent
    Absent,
    /// Table is present
    Present,
}

/// Ordering of a color table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTableOrdering {
    /// Not sorted
    NotSorted,
    /// Sorted by decreasing importance
    Sorted,
}

/// Color table configuration for a screen or image descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorTableConfig {
    existence: ColorTableExistence,
    ordering: ColorTableOrdering,
    table_len: usize, // power of two between 4 and 256
}

impl Default for ColorTableConfig {
    fn default() -> Self {
        let existence = ColorTableExistence::Absent;
        let ordering = ColorTableOrdering::NotSorted;
        let table_len = 4;
        ColorTableConfig {
            existence,
            ordering,
            table_len,
        }
    }
}

impl ColorTableConfig {
    /// Create a new color table configuration
    pub fn new(
        existence: ColorTableExistence,
        ordering: ColorTableOrdering,
        table_len: u16,
    ) -> Self {
        let table_len =
            (table_len as usize).max(4).next_power_of_two().min(256);
        ColorTableConfig {
            existence,
            ordering,
            table_len,
        }
    }

    /// Get the existence of the color table
    pub fn existence(&self) -> ColorTableExistence {
        self.existence
    }

    /// Get the ordering of the color table
    pub fn ordering(&self) -> ColorTableOrdering {
        self.ordering
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        match self.existence {
            ColorTableExistence::Absent => 0,
            ColorTableExistence::Present => self.table_len,
        }
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the stored size field (real length is `2 << len_bits`)
    pub(crate) fn len_bits(&self) -> u8 {
        let sz = self.table_len;
        for b in 0..7 {
            if (sz >> (b + 1)) == 1 {
                return b;
            }
        }
        7
    }

    /// Get the size of the table in bytes
    pub fn size_bytes(&self) -> usize {
        self.len() * CHANNELS
    }
}

/// Block codes for delimiting sections
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum BlockCode {
    ImageDesc_,
    Extension_,
    Trailer_,
}

impl BlockCode {
    /// Get the block signature
    pub fn signature(self) -> &'static [u8] {
        use self::BlockCode::*;
        match self {
            ImageDesc_ => b",", // (0x2C) Image separator
            Extension_ => b"!", // (0x21) Extension introducer
            Trailer_ => b";",   // (0x3B) GIF trailer
        }
    }
}

/// Extension labels
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum ExtensionCode {
    Comment_,
    Application_,
}

impl From<ExtensionCode> for u8 {
    fn from(t: ExtensionCode) -> Self {
        use self::ExtensionCode::*;
        match t {
            Comment_ => 0xFE,
            Application_ => 0xFF,
        }
    }
}

/// Header block at the start of a GIF file
#[derive(Debug, Clone, Copy)]
pub struct Header {
    version: [u8; 3],
}

impl Default for Header {
    fn default() -> Self {
        Header { version: *b"89a" }
    }
}

impl Header {
    /// Create a header with a specific version
    pub fn with_version(version: [u8; 3]) -> Self {
        Header { version }
    }

    /// Get the GIF version
    pub fn version(&self) -> [u8; 3] {
        self.version
    }
}

/// Logical screen descriptor block
#[derive(Debug, Default, Clone, Copy)]
pub struct LogicalScreenDesc {
    screen_width: u16,
    screen_height: u16,
    flags: u8,
    background_color_idx: u8, // index into global color table
    pixel_aspect_ratio: u8,
}

impl LogicalScreenDesc {
    const COLOR_TABLE_PRESENT: u8 = 0b1000_0000;
    const COLOR_RESOLUTION: u8 = 0b0111_0000;
    const COLOR_TABLE_ORDERING: u8 = 0b0000_1000;
    const COLOR_TABLE_SIZE: u8 = 0b0000_0111;

    /// Set the screen width
    pub fn with_screen_width(mut self, screen_width: u16) -> Self {
        self.screen_width = screen_width;
        self
    }

    /// Get the screen width
    pub fn screen_width(&self) -> u16 {
        self.screen_width
    }

    /// Set the screen height
    pub fn with_screen_height(mut self, screen_height: u16) -> Self {
        self.screen_height = screen_height;
        self
    }

    /// Get the screen height
    pub fn screen_height(&self) -> u16 {
        self.screen_height
    }

    /// Get the flags (packed byte)
    pub fn flags(&self) -> u8 {
        self.flags
    }

    /// Set the global color table configuration.
    ///
    /// The color resolution field is always 8 bits per channel.
    pub fn with_color_table_config(mut self, tbl: &ColorTableConfig) -> Self {
        let mut flags = tbl.len_bits() & Self::COLOR_TABLE_SIZE;
        flags |= Self::COLOR_RESOLUTION;
        if tbl.existence() == ColorTableExistence::Present {
            flags |= Self::COLOR_TABLE_PRESENT;
        }
        if tbl.ordering() == ColorTableOrdering::Sorted {
            flags |= Self::COLOR_TABLE_ORDERING;
        }
        self.flags = flags;
        self
    }

    /// Set the background color index
    pub fn with_background_color_idx(
        mut self,
        background_color_idx: u8,
    ) -> Self {
        self.background_color_idx = background_color_idx;
        self
    }

    /// Get the background color index
    pub fn background_color_idx(&self) -> u8 {
        self.background_color_idx
    }

    /// Get the pixel aspect ratio
    pub fn pixel_aspect_ratio(&self) -> u8 {
        self.pixel_aspect_ratio
    }
}

/// Global color table block
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalColorTable {
    colors: Vec<u8>,
}

impl GlobalColorTable {
    /// Create a global color table with raw colors (3 bytes per entry)
    pub fn with_colors(colors: &[u8]) -> Self {
        assert_eq!(colors.len() / CHANNELS * CHANNELS, colors.len());
        let colors = colors.to_vec();
        GlobalColorTable { colors }
    }

    /// Get the length in bytes
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Get the table colors
    pub fn colors(&self) -> &[u8] {
        &self.colors
    }
}

/// Comment extension block
#[derive(Debug, Default, Clone)]
pub struct Comment {
    comments: Vec<Vec<u8>>, // ascii only comments recommended
}

impl Comment {
    /// Add a comment
    pub fn add_comment(&mut self, c: &[u8]) {
        assert!(c.len() < 256);
        self.comments.push(c.to_vec());
    }

    /// Get the comments
    pub fn comments(&self) -> &[Vec<u8>] {
        &self.comments
    }
}

/// Application extension block
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Application {
    app_data: Vec<Vec<u8>>, // sequence of sub-blocks
}

impl Application {
    /// Check if an application ID is an animation loop
    fn is_looping(app_id: &[u8]) -> bool {
        app_id == b"NETSCAPE2.0" || app_id == b"ANIMEXTS1.0"
    }

    /// Create an application extension with an animation loop count.
    ///
    /// * `loop_count`: Number of times to loop animation; zero means
    ///   forever.
    pub fn with_loop_count(loop_count: u16) -> Self {
        let mut app_data = vec![];
        app_data.push(b"NETSCAPE2.0".to_vec());
        let mut v = vec![1];
        v.push(loop_count as u8);
        v.push((loop_count >> 8) as u8);
        app_data.push(v);
        Application { app_data }
    }

    /// Add an application data sub-block
    pub fn add_app_data(&mut self, b: &[u8]) {
        assert!(b.len() < 256);
        self.app_data.push(b.to_vec());
    }

    /// Get the application data
    pub fn app_data(&self) -> &[Vec<u8>] {
        &self.app_data
    }

    /// Get the animation loop count, if the block is a loop record
    pub fn loop_count(&self) -> Option<u16> {
        // NOTE: this block must follow immediately after GlobalColorTable
        //       (or LogicalScreenDesc if there is no GlobalColorTable).
        let d = &self.app_data;
        let exists = d.len() == 2 &&            // 2 sub-blocks
                     Self::is_looping(&d[0]) && // app ID / auth code
                     d[1].len() == 3 &&         // app data sub-block length
                     d[1][0] == 1; // sub-block ID
        if exists {
            // loop count is stored little-endian
            let c = u16::from(d[1][1]) | u16::from(d[1][2]) << 8;
            Some(c)
        } else {
            None
        }
    }
}

/// Image descriptor block
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageDesc {
    left: u16,
    top: u16,
    width: u16,
    height: u16,
    flags: u8,
}

impl ImageDesc {
    const COLOR_TABLE_PRESENT: u8 = 0b1000_0000;
    const INTERLACED: u8 = 0b0100_0000;
    const COLOR_TABLE_ORDERING: u8 = 0b0010_0000;
    const RESERVED: u8 = 0b0001_1000;
    const COLOR_TABLE_SIZE: u8 = 0b0000_0111;

    /// Set the left position
    pub fn with_left(mut self, left: u16) -> Self {
        self.left = left;
        self
    }

    /// Get the left position
    pub fn left(&self) -> u16 {
        self.left
    }

    /// Set the top position
    pub fn with_top(mut self, top: u16) -> Self {
        self.top = top;
        self
    }

    /// Get the top position
    pub fn top(&self) -> u16 {
        self.top
    }

    /// Set the width
    pub fn with_width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }

    /// Get the width
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Set the height
    pub fn with_height(mut self, height: u16) -> Self {
        self.height = height;
        self
    }

    /// Get the height
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Get the flags (packed byte)
    pub fn flags(&self) -> u8 {
        self.flags
    }

    /// Set the local color table configuration
    pub fn with_color_table_config(mut self, tbl: &ColorTableConfig) -> Self {
        let mut flags = self.flags & (Self::INTERLACED | Self::RESERVED);
        flags |= tbl.len_bits() & Self::COLOR_TABLE_SIZE;
        if tbl.existence() == ColorTableExistence::Present {
            flags |= Self::COLOR_TABLE_PRESENT;
        }
        if tbl.ordering() == ColorTableOrdering::Sorted {
            flags |= Self::COLOR_TABLE_ORDERING;
        }
        self.flags = flags;
        self
    }

    /// Get the image size in pixels
    pub fn image_sz(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

/// Local color table block
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LocalColorTable {
    colors: Vec<u8>,
}

impl LocalColorTable {
    /// Create a local color table with raw colors (3 bytes per entry)
    pub fn with_colors(colors: &[u8]) -> Self {
        assert_eq!(colors.len() / CHANNELS * CHANNELS, colors.len());
        let colors = colors.to_vec();
        LocalColorTable { colors }
    }

    /// Get the length in bytes
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Get the table colors
    pub fn colors(&self) -> &[u8] {
        &self.colors
    }
}

/// Image data block
///
/// Holds indexed pixels for one frame, along with the LZW minimum code
/// size derived from the frame's [Palette](struct.Palette.html).
#[derive(Debug, Clone)]
pub struct ImageData {
    data: Vec<u8>, // first byte of data is LZW minimum code size
}

impl ImageData {
    /// Create image data for one frame.
    ///
    /// * `image_sz`: Number of pixels in the frame.
    /// * `min_code_size`: LZW minimum code size, between 2 and 8.
    pub fn new(image_sz: usize, min_code_size: u8) -> Self {
        // Reserve an extra byte for min_code_size (first)
        let mut data = Vec::with_capacity(image_sz + 1);
        data.push(min_code_size.max(2));
        ImageData { data }
    }

    /// Create image data from a palette and indexed pixels
    pub fn with_indices(palette: &Palette, indices: &[u8]) -> Self {
        let mut image_data = ImageData::new(indices.len(), palette.bits_needed());
        image_data.add_data(indices);
        image_data
    }

    /// Check if all pixels have been added
    pub fn is_complete(&self) -> bool {
        self.data.len() == self.data.capacity()
    }

    /// Add indexed pixel data
    pub fn add_data(&mut self, data: &[u8]) {
        let rem = self.data.capacity() - self.data.len();
        if data.len() <= rem {
            self.data.extend_from_slice(data);
        } else {
            self.data.extend_from_slice(&data[..rem]);
            warn!("Extra image data: {:?}", &data[rem..]);
        }
    }

    /// Get the LZW minimum code size
    pub fn min_code_size(&self) -> u8 {
        self.data[0]
    }

    /// Get the indexed pixel data
    pub fn data(&self) -> &[u8] {
        // Remove the LZW minimum code size
        &self.data[1..]
    }
}

/// Trailer block at the end of a GIF file
#[derive(Debug, Default, Clone, Copy)]
pub struct Trailer {}

/// A block of a GIF file
#[derive(Debug)]
pub enum Block {
    Header(Header),
    LogicalScreenDesc(LogicalScreenDesc),
    GlobalColorTable(GlobalColorTable),
    Comment(Comment),
    Application(Application),
    ImageDesc(ImageDesc),
    LocalColorTable(LocalColorTable),
    ImageData(ImageData),
    Trailer(Trailer),
}

impl From<Header> for Block {
    fn from(b: Header) -> Self {
        Block::Header(b)
    }
}

impl From<LogicalScreenDesc> for Block {
    fn from(b: LogicalScreenDesc) -> Self {
        Block::LogicalScreenDesc(b)
    }
}

impl From<GlobalColorTable> for Block {
    fn from(b: GlobalColorTable) -> Self {
        Block::GlobalColorTable(b)
    }
}

impl From<Comment> for Block {
    fn from(b: Comment) -> Self {
        Block::Comment(b)
    }
}

impl From<Application> for Block {
    fn from(b: Application) -> Self {
        Block::Application(b)
    }
}

impl From<ImageDesc> for Block {
    fn from(b: ImageDesc) -> Self {
        Block::ImageDesc(b)
    }
}

impl From<LocalColorTable> for Block {
    fn from(b: LocalColorTable) -> Self {
        Block::LocalColorTable(b)
    }
}

impl From<ImageData> for Block {
    fn from(b: ImageData) -> Self {
        Block::ImageData(b)
    }
}

impl From<Trailer> for Block {
    fn from(b: Trailer) -> Self {
        Block::Trailer(b)
    }
}

/// Preamble blocks of a GIF file
#[derive(Debug, Default)]
pub struct Preamble {
    /// Header block
    pub header: Header,
    /// Logical screen descriptor block
    pub logical_screen_desc: LogicalScreenDesc,
    /// Global color table block
    pub global_color_table: Option<GlobalColorTable>,
    /// Loop count application extension block
    pub loop_count_ext: Option<Application>,
    /// Comment blocks
    pub comments: Vec<Comment>,
}

/// One frame of a GIF file
#[derive(Debug)]
pub struct Frame {
    /// Image descriptor block
    pub image_desc: ImageDesc,
    /// Local color table block
    pub local_color_table: Option<LocalColorTable>,
    /// Image data block
    pub image_data: ImageData,
}

impl Frame {
    /// Create a new frame
    pub fn new(
        image_desc: ImageDesc,
        local_color_table: Option<LocalColorTable>,
        image_data: ImageData,
    ) -> Self {
        Frame {
            image_desc,
            local_color_table,
            image_data,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn block_size() {
        assert!(std::mem::size_of::<Block>() <= 32);
    }

    #[test]
    fn color_table_len() {
        let t = ColorTableConfig::new(
            ColorTableExistence::Present,
            ColorTableOrdering::NotSorted,
            0,
        ); // 0-4
        assert_eq!(t.len_bits(), 1);
        let t = ColorTableConfig::new(
            ColorTableExistence::Present,
            ColorTableOrdering::NotSorted,
            7,
        ); // 5-8
        assert_eq!(t.len_bits(), 2);
        let t = ColorTableConfig::new(
            ColorTableExistence::Present,
            ColorTableOrdering::NotSorted,
            16,
        ); // 9-16
        assert_eq!(t.len_bits(), 3);
        let t = ColorTableConfig::new(
            ColorTableExistence::Present,
            ColorTableOrdering::NotSorted,
            17,
        ); // 17-32
        assert_eq!(t.len_bits(), 4);
        let t = ColorTableConfig::new(
            ColorTableExistence::Present,
            ColorTableOrdering::NotSorted,
            64,
        ); // 33-64
        assert_eq!(t.len_bits(), 5);
        let t = ColorTableConfig::new(
            ColorTableExistence::Present,
            ColorTableOrdering::NotSorted,
            65,
        ); // 65-128
        assert_eq!(t.len_bits(), 6);
        let t = ColorTableConfig::new(
            ColorTableExistence::Present,
            ColorTableOrdering::NotSorted,
            130,
        ); // 129-256
        assert_eq!(t.len_bits(), 7);
        let t = ColorTableConfig::default();
        assert_eq!(t.len_bits(), 1);
        assert_eq!(t.len(), 0);
    }

    #[test]
    fn screen_desc_flags() {
        let t = ColorTableConfig::new(
            ColorTableExistence::Present,
            ColorTableOrdering::NotSorted,
            256,
        );
        let desc = LogicalScreenDesc::default().with_color_table_config(&t);
        assert_eq!(desc.flags(), 0xF7);
    }

    #[test]
    fn loop_count() {
        let b = Application::default();
        assert_eq!(b.loop_count(), None);
        let b = Application::with_loop_count(0);
        assert_eq!(b.loop_count(), Some(0));
        let b = Application::with_loop_count(4);
        assert_eq!(b.loop_count(), Some(4));
        // stored little-endian
        assert_eq!(b.app_data()[1], vec![1, 4, 0]);
        let b = Application::with_loop_count(0x0102);
        assert_eq!(b.app_data()[1], vec![1, 2, 1]);
    }

    #[test]
    fn image_data_capacity() {
        let mut d = ImageData::new(4, 2);
        assert_eq!(d.min_code_size(), 2);
        d.add_data(&[0, 1, 2]);
        assert!(!d.is_complete());
        d.add_data(&[3]);
        assert!(d.is_complete());
        assert_eq!(d.data(), &[0, 1, 2, 3]);
    }
}
