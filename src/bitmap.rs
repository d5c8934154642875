//! Uncompressed 24-bit BMP writer.
//!
//! # Layout
//!
//! ```text
//! offset  size  field
//! ------  ----  ------------------------------------------
//!      0     2  "BM"
//!      2     4  file size (headers + pixel data)
//!      6     4  reserved = 0
//!     10     4  pixel data offset = 54
//!     14     4  info header size = 40
//!     18     4  width
//!     22     4  height
//!     26     2  planes = 1
//!     28     2  bits per pixel = 24
//!     30    24  compression = 0, remaining fields = 0
//!     54     -  pixel rows
//! ```
//!
//! All fields are little-endian. Rows are stored bottom row first, each pixel
//! as `B, G, R` (alpha is dropped), and every row is zero-padded to a multiple
//! of four bytes.
//!
//! Writes are not atomic: if saving fails part-way the file is left
//! incomplete and the error says which stage failed.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::render::framebuffer::PixelBuffer;

pub const FILE_HEADER_SIZE: u32 = 14;
pub const INFO_HEADER_SIZE: u32 = 40;
pub const PIXEL_DATA_OFFSET: u32 = FILE_HEADER_SIZE + INFO_HEADER_SIZE;

const SIGNATURE: [u8; 2] = *b"BM";
const PLANES: u16 = 1;
const BITS_PER_PIXEL: u16 = 24;
const BYTES_PER_PIXEL: u32 = 3;

/// Part of the file being written when an I/O error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStage {
    Header,
    Pixels,
    Padding,
    Flush,
}

impl fmt::Display for WriteStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteStage::Header => write!(f, "header"),
            WriteStage::Pixels => write!(f, "pixel data"),
            WriteStage::Padding => write!(f, "row padding"),
            WriteStage::Flush => write!(f, "flush"),
        }
    }
}

#[derive(Debug, Error)]
pub enum BitmapError {
    #[error("{width}x{height} image does not fit in a bitmap file")]
    TooLarge { width: u32, height: u32 },

    #[error("failed to create {}: {source}", path.display())]
    Create { path: PathBuf, source: io::Error },

    #[error("failed to write bitmap {stage}: {source}")]
    Write { stage: WriteStage, source: io::Error },
}

/// Sizes derived from the image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapLayout {
    pub width: u32,
    pub height: u32,
    /// Pixel bytes per row, without padding.
    pub row_size: u32,
    /// Zero bytes appended to each row.
    pub row_padding: u32,
    /// Headers plus padded rows.
    pub file_size: u32,
}

impl BitmapLayout {
    /// Compute the layout, failing if any size overflows the header fields.
    pub fn new(width: u32, height: u32) -> Result<Self, BitmapError> {
        let too_large = || BitmapError::TooLarge { width, height };
        if width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(too_large());
        }

        let row_size = width.checked_mul(BYTES_PER_PIXEL).ok_or_else(too_large)?;
        let padded = row_size.checked_add(3).ok_or_else(too_large)? & !3;
        let file_size = padded
            .checked_mul(height)
            .and_then(|data| data.checked_add(PIXEL_DATA_OFFSET))
            .ok_or_else(too_large)?;

        Ok(Self {
            width,
            height,
            row_size,
            row_padding: padded - row_size,
            file_size,
        })
    }

    /// The 54 header bytes.
    pub fn header(&self) -> [u8; PIXEL_DATA_OFFSET as usize] {
        let mut header = [0u8; PIXEL_DATA_OFFSET as usize];
        let mut put = |offset: usize, bytes: &[u8]| {
            header[offset..offset + bytes.len()].copy_from_slice(bytes);
        };

        // File header
        put(0, &SIGNATURE);
        put(2, &self.file_size.to_le_bytes());
        put(6, &0u32.to_le_bytes());
        put(10, &PIXEL_DATA_OFFSET.to_le_bytes());

        // Info header; compression and everything after it stay zero
        put(14, &INFO_HEADER_SIZE.to_le_bytes());
        put(18, &self.width.to_le_bytes());
        put(22, &self.height.to_le_bytes());
        put(26, &PLANES.to_le_bytes());
        put(28, &BITS_PER_PIXEL.to_le_bytes());

        header
    }
}

/// Encode the buffer into an in-memory bitmap file.
pub fn encode(buffer: &PixelBuffer) -> Result<Vec<u8>, BitmapError> {
    let layout = BitmapLayout::new(buffer.width(), buffer.height())?;
    let mut out = Vec::with_capacity(layout.file_size as usize);
    write_layout(buffer, &layout, &mut out)?;
    Ok(out)
}

/// Write the buffer as a bitmap to any writer.
pub fn write_to<W: Write>(buffer: &PixelBuffer, writer: W) -> Result<(), BitmapError> {
    let layout = BitmapLayout::new(buffer.width(), buffer.height())?;
    write_layout(buffer, &layout, writer)
}

/// Write the buffer as a bitmap file, replacing any existing file.
pub fn save<P: AsRef<Path>>(buffer: &PixelBuffer, path: P) -> Result<(), BitmapError> {
    let path = path.as_ref();
    let layout = BitmapLayout::new(buffer.width(), buffer.height())?;

    let file = File::create(path).map_err(|source| BitmapError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    write_layout(buffer, &layout, &mut writer)?;
    writer.flush().map_err(|source| BitmapError::Write {
        stage: WriteStage::Flush,
        source,
    })?;

    log::info!("Saved {}x{} bitmap to {}", layout.width, layout.height, path.display());
    Ok(())
}

fn write_layout<W: Write>(
    buffer: &PixelBuffer,
    layout: &BitmapLayout,
    mut writer: W,
) -> Result<(), BitmapError> {
    writer
        .write_all(&layout.header())
        .map_err(write_error(WriteStage::Header))?;

    let padding = [0u8; 3];
    let padding = &padding[..layout.row_padding as usize];
    let mut row_bytes = Vec::with_capacity(layout.row_size as usize);

    for y in (0..layout.height).rev() {
        row_bytes.clear();
        row_bytes.extend(buffer.row(y).iter().flat_map(|c| [c.b, c.g, c.r]));

        writer
            .write_all(&row_bytes)
            .map_err(write_error(WriteStage::Pixels))?;
        writer
            .write_all(padding)
            .map_err(write_error(WriteStage::Padding))?;
    }

    Ok(())
}

fn write_error(stage: WriteStage) -> impl FnOnce(io::Error) -> BitmapError {
    move |source| BitmapError::Write { stage, source }
}
