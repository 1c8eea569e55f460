//! ESC/POS command builder
//!
//! Provides a fluent API for the user-defined character commands.

use crate::error::PrintResult;
use crate::transcode::{COLUMN_BYTES, check_block};

const ESC: u8 = 0x1B;

/// ESC/POS command builder
///
/// Builds the byte sequences that switch the user-defined character set,
/// (re)define slots and transmit character codes.
#[derive(Debug, Default)]
pub struct EscPosBuilder {
    buf: Vec<u8>,
}

impl EscPosBuilder {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
        }
    }

    // === User-Defined Characters ===

    /// Select the user-defined character set
    pub fn select_udc(&mut self) -> &mut Self {
        // ESC % 1
        self.buf.extend_from_slice(&[ESC, b'%', 0x01]);
        self
    }

    /// Cancel the user-defined character set
    pub fn cancel_udc(&mut self) -> &mut Self {
        // ESC % 0
        self.buf.extend_from_slice(&[ESC, b'%', 0x00]);
        self
    }

    /// Define a single slot from a transcoded block
    ///
    /// Fails if the block exceeds the font B slot size.
    pub fn define_udc(&mut self, code: u8, block: &[u8]) -> PrintResult<&mut Self> {
        check_block(block)?;

        // ESC & y c1 c2 x d1...d(y*x), with c1 = c2 for one character
        let columns = (block.len() / COLUMN_BYTES) as u8;
        self.buf
            .extend_from_slice(&[ESC, b'&', COLUMN_BYTES as u8, code, code, columns]);
        self.buf.extend_from_slice(block);
        Ok(self)
    }

    // === Raw Commands ===

    /// Write raw bytes directly (character codes, control characters)
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    // === Build ===

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}
