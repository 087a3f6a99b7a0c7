//! JPEG frame boundary recovery
//!
//! Cameras send JPEG images back-to-back over TCP with no framing of their
//! own. Frame boundaries are recovered purely from the marker bytes: a frame
//! starts at a start-of-image marker (`FF D8 FF`) and ends at the next
//! end-of-image marker (`FF D9`) after it.
//!
//! The assembler owns an accumulation buffer so markers split across read
//! boundaries are still detected. The buffer is consumed only when a full
//! start/end pair has been matched, and bytes before a start marker are
//! discarded, so an end marker can never be paired with a start marker from
//! an earlier frame.

use bytes::{Buf, Bytes, BytesMut};

/// JPEG start-of-image marker, including the first byte of the following segment
pub const SOI: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// JPEG end-of-image marker
pub const EOI: [u8; 2] = [0xFF, 0xD9];

/// Incremental extractor of complete JPEG frames from a raw byte stream
///
/// Feed arbitrary chunks with [`push`](Self::push); each call returns the
/// frames completed by that chunk, byte-identical to the source images.
pub struct FrameAssembler {
    buf: BytesMut,
    max_buffered: usize,
}

impl FrameAssembler {
    /// Create an assembler whose accumulation buffer is capped at `max_buffered` bytes
    ///
    /// On overflow without an end marker the assembler resynchronizes by
    /// discarding to the most recent start marker, guarding against an
    /// upstream that never terminates a frame.
    pub fn new(max_buffered: usize) -> Self {
        Self {
            buf: BytesMut::new(),
            max_buffered,
        }
    }

    /// Number of bytes currently buffered
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Append a chunk and return every frame it completed
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Bytes> {
        self.buf.extend_from_slice(chunk);

        let mut frames = Vec::new();
        loop {
            let Some(start) = find(&self.buf, &SOI) else {
                // Nothing before a start marker can become a frame. Keep a
                // short tail in case a marker straddles the chunk boundary.
                let keep = SOI.len() - 1;
                if self.buf.len() > keep {
                    self.buf.advance(self.buf.len() - keep);
                }
                break;
            };
            if start > 0 {
                self.buf.advance(start);
            }

            match find(&self.buf[SOI.len()..], &EOI) {
                Some(rel) => {
                    let end = SOI.len() + rel + EOI.len();
                    frames.push(self.buf.split_to(end).freeze());
                }
                None => {
                    if self.buf.len() > self.max_buffered {
                        self.resync();
                    }
                    break;
                }
            }
        }
        frames
    }

    /// Drop buffered bytes up to the most recent start marker
    fn resync(&mut self) {
        match rfind(&self.buf[1..], &SOI) {
            Some(idx) => {
                let discarded = idx + 1;
                self.buf.advance(discarded);
                tracing::warn!(
                    discarded,
                    buffered = self.buf.len(),
                    "Frame buffer overflow, resynchronized to last start marker"
                );
                if self.buf.len() > self.max_buffered {
                    // A single frame larger than the cap is unrecoverable
                    self.buf.clear();
                }
            }
            None => {
                tracing::warn!(
                    discarded = self.buf.len(),
                    "Frame buffer overflow with no later start marker, cleared"
                );
                self.buf.clear();
            }
        }
    }
}

/// First occurrence of `pattern` in `data`
fn find(data: &[u8], pattern: &[u8]) -> Option<usize> {
    data.windows(pattern.len()).position(|w| w == pattern)
}

/// Last occurrence of `pattern` in `data`
fn rfind(data: &[u8], pattern: &[u8]) -> Option<usize> {
    data.windows(pattern.len()).rposition(|w| w == pattern)
}
