//! # Overview
//!
//! Negotiation exchanges a small number of integers with the peer before any
//! multiplexed traffic starts. The [`VersionChannel`] trait abstracts that
//! duplex exchange so the handshake logic stays independent of the transport:
//! live sessions wrap socket or pipe halves, tests wrap in-memory buffers,
//! and a replay source presents a recorded byte stream.
//!
//! # Design
//!
//! [`IntChannel`] is the standard adapter over split [`Read`]/[`Write`]
//! halves. Values travel as 4-byte little-endian `i32`, the wire integer
//! format used throughout the rest of the session, and the channel imposes no
//! framing of its own. Timeouts, if any, belong to the underlying transport.

use std::io::{self, Read, Write};

/// Duplex integer exchange used during negotiation.
pub trait VersionChannel {
    /// Writes one wire integer to the peer.
    fn write_int(&mut self, value: i32) -> io::Result<()>;

    /// Reads one wire integer from the peer, blocking until it arrives.
    fn read_int(&mut self) -> io::Result<i32>;
}

impl<C: VersionChannel + ?Sized> VersionChannel for &mut C {
    fn write_int(&mut self, value: i32) -> io::Result<()> {
        (**self).write_int(value)
    }

    fn read_int(&mut self) -> io::Result<i32> {
        (**self).read_int()
    }
}

/// [`VersionChannel`] adapter over independent reader and writer halves.
///
/// Each integer is encoded as 4 little-endian bytes. Writes are flushed
/// immediately: the peer blocks on every value during the handshake, so
/// buffering a write would deadlock a live session.
#[derive(Debug)]
pub struct IntChannel<R, W> {
    reader: R,
    writer: W,
}

impl<R: Read, W: Write> IntChannel<R, W> {
    /// Creates a channel from the two transport halves.
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Consumes the channel and returns the transport halves.
    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl<R: Read, W: Write> VersionChannel for IntChannel<R, W> {
    fn write_int(&mut self, value: i32) -> io::Result<()> {
        self.writer.write_all(&value.to_le_bytes())?;
        self.writer.flush()
    }

    fn read_int(&mut self) -> io::Result<i32> {
        let mut buf = [0u8; 4];
        self.reader.read_exact(&mut buf)?;
        Ok(i32::from_le_bytes(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn integers_round_trip_as_little_endian() {
        let mut channel = IntChannel::new(Cursor::new(Vec::new()), Vec::new());
        channel.write_int(31).expect("write succeeds");
        channel.write_int(-1).expect("write succeeds");

        let (_, written) = channel.into_parts();
        assert_eq!(written, [31, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF]);

        let mut reading = IntChannel::new(Cursor::new(written), Vec::new());
        assert_eq!(reading.read_int().expect("read succeeds"), 31);
        assert_eq!(reading.read_int().expect("read succeeds"), -1);
    }

    #[test]
    fn short_reads_surface_as_errors() {
        let mut channel = IntChannel::new(Cursor::new(vec![1, 2]), Vec::new());
        let err = channel.read_int().expect_err("two bytes are not enough");
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
