//! Command sinks for sending ESC/POS data
//!
//! The session never opens connections itself. Callers hand it whatever
//! already talks to the printer:
//! - Any `std::io::Write` (a connected `TcpStream`, a USB device file)
//! - A closure
//! - A `Vec<u8>` for buffering a whole job before sending it elsewhere

use crate::error::PrintResult;
use std::io::Write;
use tracing::warn;

/// Destination for raw command bytes
pub trait CommandSink {
    /// Send raw ESC/POS data to the printer
    fn send(&mut self, data: &[u8]) -> PrintResult<()>;
}

impl CommandSink for Vec<u8> {
    fn send(&mut self, data: &[u8]) -> PrintResult<()> {
        self.extend_from_slice(data);
        Ok(())
    }
}

impl<S: CommandSink + ?Sized> CommandSink for &mut S {
    fn send(&mut self, data: &[u8]) -> PrintResult<()> {
        (**self).send(data)
    }
}

/// Sink over any writer; every send is flushed
#[derive(Debug)]
pub struct WriteSink<W> {
    writer: W,
}

impl<W: Write> WriteSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> CommandSink for WriteSink<W> {
    fn send(&mut self, data: &[u8]) -> PrintResult<()> {
        if let Err(e) = self.writer.write_all(data) {
            warn!(error = %e, data_len = data.len(), "Write failed");
            return Err(e.into());
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Sink over a closure
pub struct FnSink<F> {
    send: F,
}

impl<F> FnSink<F>
where
    F: FnMut(&[u8]) -> PrintResult<()>,
{
    pub fn new(send: F) -> Self {
        Self { send }
    }
}

impl<F> CommandSink for FnSink<F>
where
    F: FnMut(&[u8]) -> PrintResult<()>,
{
    fn send(&mut self, data: &[u8]) -> PrintResult<()> {
        (self.send)(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PrintError;
    use std::io;

    #[test]
    fn test_vec_sink() {
        let mut sink: Vec<u8> = Vec::new();
        sink.send(&[1, 2]).unwrap();
        sink.send(&[3]).unwrap();
        assert_eq!(sink, vec![1, 2, 3]);
    }

    #[test]
    fn test_write_sink() {
        let mut sink = WriteSink::new(io::Cursor::new(Vec::new()));
        sink.send(b"\x1b%\x01").unwrap();
        assert_eq!(sink.into_inner().into_inner(), b"\x1b%\x01".to_vec());
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "printer gone"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_sink_error() {
        let mut sink = WriteSink::new(BrokenPipe);
        assert!(matches!(sink.send(b"x"), Err(PrintError::Io(_))));
    }

    #[test]
    fn test_fn_sink() {
        let mut chunks: Vec<Vec<u8>> = Vec::new();
        {
            let mut sink = FnSink::new(|data: &[u8]| {
                chunks.push(data.to_vec());
                Ok(())
            });
            sink.send(b"ab").unwrap();
            sink.send(b"c").unwrap();
        }
        assert_eq!(chunks, vec![b"ab".to_vec(), b"c".to_vec()]);
    }
}
