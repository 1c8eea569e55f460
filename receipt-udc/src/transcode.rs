//! Unifont bitmap → ESC/POS font B user-defined character
//!
//! Unifont glyphs are row-major, 16 rows of 8 (or 16) dots, MSB first.
//! A font B UDC is column-major: each column is 3 bytes (24 vertical dots),
//! MSB at the top. Transcoding rotates the bitmap so that source row `y`
//! becomes vertical dot `y` of column `x`.

use crate::error::TranscodeError;

/// Largest define-command payload a font B slot accepts (9 columns × 3 bytes)
pub const MAX_UDC_BLOCK: usize = 27;

/// Bytes per UDC column
pub const COLUMN_BYTES: usize = 3;

/// Rows in a unifont glyph
const GLYPH_ROWS: usize = 16;

/// Columns in one unifont cell
const CELL_COLUMNS: usize = 8;

/// Convert an 8x16 (16 bytes) or 16x16 (32 bytes) bitmap into one or two
/// UDC blocks
///
/// Double-width bitmaps interleave their halves byte by byte: even bytes are
/// the left cell, odd bytes the right one. The right cell gets a blank
/// leading column so the two halves print without a gap.
pub fn transcode(bitmap: &[u8]) -> Result<Vec<Vec<u8>>, TranscodeError> {
    let blocks = match bitmap.len() {
        16 => vec![rotate_cell(bitmap)],
        32 => {
            let left: Vec<u8> = bitmap.iter().step_by(2).copied().collect();
            let right: Vec<u8> = bitmap.iter().skip(1).step_by(2).copied().collect();

            let mut padded = vec![0u8; COLUMN_BYTES];
            padded.extend_from_slice(&rotate_cell(&right));

            vec![rotate_cell(&left), padded]
        }
        len => return Err(TranscodeError::InvalidLength(len)),
    };

    for block in &blocks {
        check_block(block)?;
    }
    Ok(blocks)
}

/// Reject blocks that do not fit in one slot
pub fn check_block(block: &[u8]) -> Result<(), TranscodeError> {
    if block.len() > MAX_UDC_BLOCK {
        return Err(TranscodeError::Oversize {
            len: block.len(),
            max: MAX_UDC_BLOCK,
        });
    }
    Ok(())
}

/// Rotate a single 8x16 cell (16 bytes) into 8 columns of 3 bytes
fn rotate_cell(src: &[u8]) -> Vec<u8> {
    let mut dst = vec![0u8; CELL_COLUMNS * COLUMN_BYTES];

    for (y, row) in src.iter().take(GLYPH_ROWS).enumerate() {
        for x in 0..CELL_COLUMNS {
            if row & (0x80 >> x) != 0 {
                dst[x * COLUMN_BYTES + y / 8] |= 0x80 >> (y % 8);
            }
        }
    }

    dst
}
