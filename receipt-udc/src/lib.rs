//! # receipt-udc
//!
//! Unicode text on ESC/POS receipt printers through user-defined characters.
//!
//! ## Scope
//!
//! This crate handles HOW arbitrary characters reach the paper:
//! - Unifont glyph loading
//! - Bitmap transcoding to font B user-defined characters
//! - Segmented LRU slot cache over the printer's redefinable code range
//! - Command sequencing (select, define, transmit, cancel)
//!
//! Connections, job queues and printer status polling stay in application
//! code. Applications pass a [`CommandSink`] and report presence changes
//! with [`UdcSession::set_online`].
//!
//! ## Example
//!
//! ```ignore
//! use receipt_udc::{FontTable, UdcConfig, UdcSession, WriteSink};
//!
//! let config = UdcConfig::from_env();
//! let font = FontTable::load(&config.font_path)?;
//! let mut session = UdcSession::new(&config)?;
//!
//! let stream = std::net::TcpStream::connect("192.168.0.3:9100")?;
//! let mut sink = WriteSink::new(stream);
//! session.print_text(&font, &mut sink, "Grüße, 世界\n")?;
//! ```

mod allocator;
mod cache;
mod config;
mod error;
mod escpos;
mod font;
mod segment;
mod session;
mod sink;
mod transcode;

// Re-exports
pub use allocator::{SlotAllocator, ValueFactory};
pub use cache::{CacheSnapshot, SlruCache};
pub use config::UdcConfig;
pub use error::{PrintError, PrintResult, TranscodeError};
pub use escpos::EscPosBuilder;
pub use font::{FALLBACK_CHAR, FontTable, Glyph};
pub use segment::Segment;
pub use session::{SlotKey, UdcCache, UdcSession};
pub use sink::{CommandSink, FnSink, WriteSink};
pub use transcode::{COLUMN_BYTES, MAX_UDC_BLOCK, check_block, transcode};
