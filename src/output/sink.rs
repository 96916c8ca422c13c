// src/output/sink.rs

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::output::prefix::write_prefixed;
use crate::sync::lock;

/// Shared destination for every command's output.
///
/// Cloning is cheap; all clones write into the same underlying stream. Each
/// [`OutputSink::write_chunk`] call holds the lock for its whole payload, so
/// the bytes of one chunk are never interleaved with another command's.
#[derive(Clone)]
pub struct OutputSink {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl OutputSink {
    pub fn new<W>(writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Sink writing to the process's stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Sink writing into an in-memory buffer, plus a handle to read it back.
    pub fn buffer() -> (Self, SharedBuffer) {
        let buf = SharedBuffer::default();
        (Self::new(buf.clone()), buf)
    }

    /// Write one chunk of a command's output.
    ///
    /// With a label, every line is prefixed (see [`write_prefixed`]).
    /// Without one the chunk is written through unchanged. Either way the
    /// command's bytes reach the writer as-is, UTF-8 or not.
    pub fn write_chunk(&self, label: Option<&str>, chunk: &[u8]) -> io::Result<()> {
        let mut out = lock(&self.inner);
        match label {
            Some(label) => write_prefixed(&mut *out, chunk, label)?,
            None => out.write_all(chunk)?,
        }
        out.flush()
    }
}

impl fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputSink").finish_non_exhaustive()
    }
}

/// Clonable in-memory writer. Useful for capturing a group's output.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&lock(&self.bytes)).into_owned()
    }

    /// Raw captured bytes.
    pub fn bytes(&self) -> Vec<u8> {
        lock(&self.bytes).clone()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.bytes).is_empty()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        lock(&self.bytes).extend_from_slice(buf);
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
    fn labelled_chunk_is_prefixed() {
        let (sink, buf) = OutputSink::buffer();
        sink.write_chunk(Some("web"), b"listening\n").unwrap();
        assert_eq!(buf.contents(), "web | listening\n");
    }

    #[test]
    fn non_utf8_bytes_are_forwarded_untouched() {
        let (sink, buf) = OutputSink::buffer();
        sink.write_chunk(Some("x"), b"caf\xe9\n").unwrap();
        sink.write_chunk(Some("x"), b"\xe2\x82").unwrap();
        sink.write_chunk(None, b"\xac\xff").unwrap();
        assert_eq!(buf.bytes(), b"x | caf\xe9\nx | \xe2\x82\n\xac\xff");
    }

    #[test]
    fn unlabelled_chunk_passes_through() {
        let (sink, buf) = OutputSink::buffer();
        sink.write_chunk(None, b"50%").unwrap();
        sink.write_chunk(None, b"...100%\n").unwrap();
        assert_eq!(buf.contents(), "50%...100%\n");
    }

    #[test]
    fn concurrent_chunks_stay_contiguous() {
        let (sink, buf) = OutputSink::buffer();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let sink = sink.clone();
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        sink.write_chunk(Some(&format!("t{i}")), b"a\nb\nc")
                            .unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let out = buf.contents();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 8 * 50 * 3);
        for block in lines.chunks(3) {
            let label = block[0].split(" | ").next().unwrap();
            assert_eq!(block[0], format!("{label} | a"));
            assert_eq!(block[1], format!("{label} | b"));
            assert_eq!(block[2], format!("{label} | c"));
        }
    }
}
