//! Handler output: a buffered, bidirectional byte stream.
//!
//! An [`Output`] pairs a buffered reader with a buffered writer so a handler
//! can both consume bytes from and produce bytes for whatever sits on the other
//! side: stdin/stdout, a socket, or an in-memory buffer in tests.

use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::sync::{Arc, Mutex, PoisonError};

use bytes::{Buf, Bytes, BytesMut};

// ── Output ───────────────────────────────────────────────────────────────────

/// The byte stream handed to a [`Handler`](crate::Handler).
///
/// Implements [`Read`], [`BufRead`] and [`Write`]. Writes are buffered; call
/// [`flush`](Write::flush) (or drop the `Output`) to push them through.
///
/// ```rust
/// use chord::Output;
/// use std::io::{BufRead, Write};
///
/// let (mut out, capture) = Output::memory("request line\n");
///
/// let mut line = String::new();
/// out.read_line(&mut line).unwrap();
/// write!(out, "got {}", line.trim()).unwrap();
/// out.flush().unwrap();
///
/// assert_eq!(capture.to_string_lossy(), "got request line");
/// ```
pub struct Output {
    reader: BufReader<Box<dyn Read + Send>>,
    writer: BufWriter<Box<dyn Write + Send>>,
}

impl Output {
    /// Buffers `reader` and `writer` into one stream.
    pub fn new<R, W>(reader: R, writer: W) -> Self
    where
        R: Read + Send + 'static,
        W: Write + Send + 'static,
    {
        Self {
            reader: BufReader::new(Box::new(reader)),
            writer: BufWriter::new(Box::new(writer)),
        }
    }

    /// An output that reads nothing and discards every write.
    pub fn sink() -> Self {
        Self::new(io::empty(), io::sink())
    }

    /// An in-memory output. Reads drain `input`; writes land in the returned
    /// [`Capture`] once flushed.
    pub fn memory(input: impl Into<Bytes>) -> (Self, Capture) {
        let capture = Capture::default();
        let output = Self::new(input.into().reader(), CaptureWriter(capture.clone()));
        (output, capture)
    }
}

impl Read for Output {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl BufRead for Output {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.reader.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.reader.consume(amt)
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

// ── Capture ──────────────────────────────────────────────────────────────────

/// Shared view of the bytes written to an in-memory [`Output`].
#[derive(Clone, Debug, Default)]
pub struct Capture(Arc<Mutex<BytesMut>>);

impl Capture {
    /// A copy of everything flushed so far.
    pub fn bytes(&self) -> Bytes {
        Bytes::copy_from_slice(&self.lock())
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BytesMut> {
        // Poison is ignored: output from a panicking handler stays readable.
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct CaptureWriter(Capture);

impl Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_reads_input_and_captures_writes() {
        let (mut out, capture) = Output::memory("abc");

        let mut read = String::new();
        out.read_to_string(&mut read).unwrap();
        out.write_all(read.to_uppercase().as_bytes()).unwrap();

        // Buffered until flushed.
        assert!(capture.is_empty());
        out.flush().unwrap();
        assert_eq!(capture.bytes(), Bytes::from_static(b"ABC"));
    }

    #[test]
    fn test_drop_flushes_pending_writes() {
        let (mut out, capture) = Output::memory(Bytes::new());
        out.write_all(b"late").unwrap();
        drop(out);

        assert_eq!(capture.to_string_lossy(), "late");
    }

    #[test]
    fn test_sink_is_empty_and_accepts_writes() {
        let mut out = Output::sink();
        let mut buf = Vec::new();

        assert_eq!(out.read_to_end(&mut buf).unwrap(), 0);
        out.write_all(b"ignored").unwrap();
        out.flush().unwrap();
    }
}
