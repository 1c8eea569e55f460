//! Glyph table loaded from GNU Unifont `.hex` files
//!
//! Each line of a `.hex` file is `CODEPOINT:BITMAP`, e.g.
//! `0041:0000000018242442427E424242420000`. Single-width glyphs carry 32 hex
//! digits (16 bytes), double-width glyphs 64 (32 bytes).
//!
//! The table is immutable once built; share it by reference between
//! sessions.

use crate::error::{PrintError, PrintResult, TranscodeError};
use crate::transcode::transcode;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, instrument};

/// Character printed when the table has no glyph for a code point
pub const FALLBACK_CHAR: char = '?';

/// Source bitmap of one character, transcoded once on construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    bitmap: Vec<u8>,
    blocks: Result<Vec<Vec<u8>>, TranscodeError>,
}

impl Glyph {
    pub fn new(bitmap: impl Into<Vec<u8>>) -> Self {
        let bitmap = bitmap.into();
        let blocks = transcode(&bitmap);
        Self { bitmap, blocks }
    }

    pub fn bitmap(&self) -> &[u8] {
        &self.bitmap
    }

    /// UDC blocks for each cell, or why the bitmap cannot be printed
    pub fn blocks(&self) -> Result<&[Vec<u8>], TranscodeError> {
        self.blocks.as_deref().map_err(|e| e.clone())
    }

    /// Number of character cells the glyph occupies
    pub fn cells(&self) -> usize {
        if self.bitmap.len() == 32 { 2 } else { 1 }
    }
}

/// Code point → glyph lookup with a `?` fallback
#[derive(Debug, Clone)]
pub struct FontTable {
    glyphs: HashMap<char, Glyph>,
}

impl FontTable {
    /// Build a table from glyphs already in memory
    ///
    /// The glyphs must include a printable [`FALLBACK_CHAR`]. Other
    /// malformed glyphs are kept and fail when printed.
    pub fn from_glyphs(glyphs: impl IntoIterator<Item = (char, Glyph)>) -> PrintResult<Self> {
        let glyphs: HashMap<char, Glyph> = glyphs.into_iter().collect();
        let fallback = glyphs.get(&FALLBACK_CHAR).ok_or_else(|| PrintError::Font {
            line: 0,
            reason: format!("missing fallback glyph {:?}", FALLBACK_CHAR),
        })?;
        if let Err(e) = fallback.blocks() {
            return Err(PrintError::Font {
                line: 0,
                reason: format!("fallback glyph {:?} unusable: {}", FALLBACK_CHAR, e),
            });
        }
        Ok(Self { glyphs })
    }

    /// Load a unifont `.hex` file
    #[instrument]
    pub fn load(path: &Path) -> PrintResult<Self> {
        let file = File::open(path)?;
        let table = Self::from_reader(BufReader::new(file))?;
        info!(glyphs = table.len(), "Unifont loaded");
        Ok(table)
    }

    /// Parse unifont `.hex` lines from any reader
    pub fn from_reader(reader: impl BufRead) -> PrintResult<Self> {
        let mut glyphs = HashMap::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (ch, glyph) = parse_line(line).map_err(|reason| PrintError::Font {
                line: index + 1,
                reason,
            })?;
            glyphs.insert(ch, glyph);
        }

        Self::from_glyphs(glyphs)
    }

    /// Glyph for `ch`, or the fallback glyph
    pub fn glyph(&self, ch: char) -> &Glyph {
        match self.glyphs.get(&ch) {
            Some(glyph) => glyph,
            None => &self.glyphs[&FALLBACK_CHAR],
        }
    }

    pub fn get(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch)
    }

    pub fn contains(&self, ch: char) -> bool {
        self.glyphs.contains_key(&ch)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

fn parse_line(line: &str) -> Result<(char, Glyph), String> {
    let (code, bitmap) = line
        .split_once(':')
        .ok_or_else(|| "expected CODEPOINT:BITMAP".to_string())?;

    let code = u32::from_str_radix(code, 16).map_err(|e| format!("bad code point: {}", e))?;
    let ch = char::from_u32(code).ok_or_else(|| format!("not a character: U+{:04X}", code))?;

    let bitmap = hex::decode(bitmap).map_err(|e| format!("bad bitmap: {}", e))?;
    if bitmap.len() != 16 && bitmap.len() != 32 {
        return Err(format!("bitmap not 8x16 or 16x16: {} bytes", bitmap.len()));
    }

    Ok((ch, Glyph::new(bitmap)))
}
