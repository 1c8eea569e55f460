//! Unicode text printing through user-defined characters
//!
//! A session owns the slot cache for one printer. Each printable character
//! is looked up in the cache; a miss redefines the slot the cache handed
//! out, a hit reuses it. Character codes are buffered and sent in runs.
//!
//! Redefining a slot changes every not-yet-printed reference to it, so the
//! buffered run is always sent before a define command.

use crate::allocator::SlotAllocator;
use crate::cache::{CacheSnapshot, SlruCache};
use crate::config::UdcConfig;
use crate::error::{PrintError, PrintResult};
use crate::escpos::EscPosBuilder;
use crate::font::FontTable;
use crate::sink::CommandSink;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// Cache key for one character cell
///
/// Double-width glyphs occupy two slots; the right cell is keyed with
/// `second_half` set so it can never collide with a real character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SlotKey {
    pub ch: char,
    pub second_half: bool,
}

impl SlotKey {
    pub fn new(ch: char, second_half: bool) -> Self {
        Self { ch, second_half }
    }

    /// Left (or only) cell of `ch`
    pub fn first(ch: char) -> Self {
        Self::new(ch, false)
    }

    /// Right cell of a double-width `ch`
    pub fn second(ch: char) -> Self {
        Self::new(ch, true)
    }
}

/// Slot cache mapping character cells to device codes
pub type UdcCache = SlruCache<SlotKey, u8, SlotAllocator>;

impl UdcCache {
    /// Cache covering every code of `allocator`'s range
    pub fn for_range(allocator: SlotAllocator, prob_capacity: usize) -> PrintResult<Self> {
        SlruCache::new(allocator, allocator.size(), prob_capacity)
    }
}

/// Printing session for a single printer
///
/// Not safe for concurrent use: slot contents are printer state, so all
/// text for one printer must go through one session, one job at a time.
pub struct UdcSession {
    cache: UdcCache,
    online: bool,
}

impl UdcSession {
    pub fn new(config: &UdcConfig) -> PrintResult<Self> {
        config.validate()?;
        let allocator = SlotAllocator::new(config.first_code, config.last_code)?;
        Ok(Self::with_cache(UdcCache::for_range(
            allocator,
            config.probationary_capacity,
        )?))
    }

    pub fn with_cache(cache: UdcCache) -> Self {
        Self {
            cache,
            online: false,
        }
    }

    /// Print `text`, defining slots as needed
    ///
    /// The user-defined character set is always cancelled before returning,
    /// also when a character fails. A glyph that cannot be transcoded stops
    /// the text at that character without allocating a slot for it.
    #[instrument(skip(self, font, sink, text), fields(chars = text.chars().count()))]
    pub fn print_text<S>(&mut self, font: &FontTable, sink: &mut S, text: &str) -> PrintResult<()>
    where
        S: CommandSink + ?Sized,
    {
        let mut select = EscPosBuilder::new();
        select.select_udc();
        let result = self
            .send(sink, &select.build())
            .and_then(|()| self.write_text(font, sink, text));

        let mut cancel = EscPosBuilder::new();
        cancel.cancel_udc();
        let cancelled = self.send(sink, &cancel.build());

        result.and(cancelled)
    }

    fn write_text<S>(&mut self, font: &FontTable, sink: &mut S, text: &str) -> PrintResult<()>
    where
        S: CommandSink + ?Sized,
    {
        let mut pending = Vec::new();
        let written = text
            .chars()
            .try_for_each(|ch| self.write_char(font, sink, &mut pending, ch));

        match written {
            Ok(()) => self.flush(sink, &mut pending),
            // Codes buffered before the rejected glyph are still valid
            Err(e @ PrintError::Glyph { .. }) => {
                self.flush(sink, &mut pending)?;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    fn write_char<S>(
        &mut self,
        font: &FontTable,
        sink: &mut S,
        pending: &mut Vec<u8>,
        ch: char,
    ) -> PrintResult<()>
    where
        S: CommandSink + ?Sized,
    {
        if ch.is_control() {
            // Every Cc code point is below 0xA0
            pending.push(ch as u8);
            return Ok(());
        }

        let blocks = font.glyph(ch).blocks().map_err(|source| {
            warn!(ch = ?ch, error = %source, "Glyph rejected");
            PrintError::Glyph { ch, source }
        })?;

        for (cell, block) in blocks.iter().enumerate() {
            let (code, hit) = self.cache.lookup(SlotKey::new(ch, cell > 0));
            if !hit {
                self.flush(sink, pending)?;

                let mut define = EscPosBuilder::new();
                define.define_udc(code, block)?;
                debug!(ch = ?ch, cell, code, "Defining slot");
                self.send(sink, &define.build())?;
            }
            pending.push(code);
        }

        Ok(())
    }

    fn flush<S>(&mut self, sink: &mut S, pending: &mut Vec<u8>) -> PrintResult<()>
    where
        S: CommandSink + ?Sized,
    {
        if pending.is_empty() {
            return Ok(());
        }
        let result = self.send(sink, pending);
        pending.clear();
        result
    }

    fn send<S>(&mut self, sink: &mut S, data: &[u8]) -> PrintResult<()>
    where
        S: CommandSink + ?Sized,
    {
        if let Err(e) = sink.send(data) {
            // A define may not have reached the printer
            warn!(error = %e, "Sink failed, clearing UDC cache");
            self.cache.clear();
            return Err(e);
        }
        Ok(())
    }

    /// Forget every slot definition
    ///
    /// Call whenever the printer may have lost its user-defined characters,
    /// e.g. after a reconnect.
    pub fn clear(&mut self) {
        info!(slots = self.cache.len(), "Clearing UDC cache");
        self.cache.clear();
    }

    /// Record printer presence; going offline clears the cache
    pub fn set_online(&mut self, online: bool) {
        if online == self.online {
            return;
        }
        self.online = online;

        if online {
            info!("Printer is up");
        } else {
            info!("Printer is down");
            self.clear();
        }
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    pub fn cache(&self) -> &UdcCache {
        &self.cache
    }

    pub fn snapshot(&self) -> CacheSnapshot<SlotKey, u8> {
        self.cache.snapshot()
    }
}
