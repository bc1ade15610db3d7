//! Reassembly of text frames delivered in chunks
//!
//! The device websocket client hands over at most one receive buffer of
//! data at a time, so a frame longer than the buffer arrives as several
//! chunks. A chunk shorter than the buffer ends a frame. A full chunk
//! ends a frame only if the text gathered so far already decodes as a
//! whole packet.

use alloc::string::String;
use serde::de::IgnoredAny;

use crate::event::skip_header;
use crate::packet::{Packet, PacketKind};

/// Largest reassembled frame accepted
pub const MAX_MESSAGE_LEN: usize = 16 * 1024;

/// Reassembly errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AssemblyError {
    /// Frame grew past [`MAX_MESSAGE_LEN`]; its remaining chunks are skipped
    TooLarge,
}

/// Joins chunks back into whole frames
#[derive(Debug)]
pub struct FrameAssembler {
    chunk_len: usize,
    buffer: String,
    discarding: bool,
}

impl FrameAssembler {
    /// Assembler for a receive buffer of `chunk_len` bytes
    pub const fn new(chunk_len: usize) -> Self {
        Self {
            chunk_len,
            buffer: String::new(),
            discarding: false,
        }
    }

    /// Feed one chunk
    ///
    /// Returns the whole frame once its last chunk arrived, `None` while
    /// more chunks are expected.
    pub fn push(&mut self, chunk: &str) -> Result<Option<String>, AssemblyError> {
        let last = chunk.len() < self.chunk_len;

        if self.discarding {
            if last {
                self.discarding = false;
            }
            return Ok(None);
        }

        if self.buffer.len() + chunk.len() > MAX_MESSAGE_LEN {
            self.buffer = String::new();
            self.discarding = !last;
            return Err(AssemblyError::TooLarge);
        }

        self.buffer.push_str(chunk);
        if last || is_whole(&self.buffer) {
            Ok(Some(core::mem::take(&mut self.buffer)))
        } else {
            Ok(None)
        }
    }

    /// Whether a frame is partially gathered
    pub fn is_pending(&self) -> bool {
        !self.buffer.is_empty() || self.discarding
    }

    /// Drop any partial frame (connection replaced or lost)
    pub fn reset(&mut self) {
        self.buffer = String::new();
        self.discarding = false;
    }
}

fn is_whole(raw: &str) -> bool {
    let Ok(packet) = Packet::decode(raw) else {
        return false;
    };
    let body = match packet.kind {
        PacketKind::Message(_) => skip_header(packet.payload),
        _ => packet.payload,
    };
    body.is_empty() || serde_json::from_str::<IgnoredAny>(body).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::format;
    use std::string::ToString;

    fn event_frame(len: usize) -> String {
        // 42["x","aaaa..."] padded to exactly `len` bytes
        let overhead = r#"42["x",""]"#.len();
        format!(r#"42["x","{}"]"#, "a".repeat(len - overhead))
    }

    fn chunks(frame: &str, size: usize) -> std::vec::Vec<&str> {
        frame
            .as_bytes()
            .chunks(size)
            .map(|c| core::str::from_utf8(c).unwrap())
            .collect()
    }

    #[test]
    fn test_short_frame_passes_through() {
        let mut asm = FrameAssembler::new(16);
        assert_eq!(asm.push("2").unwrap(), Some("2".to_string()));
        assert!(!asm.is_pending());
    }

    #[test]
    fn test_fragments_joined() {
        let frame = event_frame(40);
        let mut asm = FrameAssembler::new(16);
        let parts = chunks(&frame, 16);
        assert_eq!(parts.len(), 3);

        assert_eq!(asm.push(parts[0]).unwrap(), None);
        assert_eq!(asm.push(parts[1]).unwrap(), None);
        assert!(asm.is_pending());
        assert_eq!(asm.push(parts[2]).unwrap(), Some(frame));
        assert!(!asm.is_pending());
    }

    #[test]
    fn test_exact_buffer_length_frame_completes() {
        let frame = event_frame(32);
        let mut asm = FrameAssembler::new(16);
        let parts = chunks(&frame, 16);

        assert_eq!(asm.push(parts[0]).unwrap(), None);
        assert_eq!(asm.push(parts[1]).unwrap(), Some(frame));

        // The next frame is not glued to the previous one
        assert_eq!(asm.push("3").unwrap(), Some("3".to_string()));
    }

    #[test]
    fn test_oversized_frame_skipped() {
        let mut asm = FrameAssembler::new(MAX_MESSAGE_LEN / 2);
        let full = "a".repeat(MAX_MESSAGE_LEN / 2);

        assert_eq!(asm.push(&full).unwrap(), None);
        assert_eq!(asm.push(&full).unwrap(), None);
        assert_eq!(asm.push(&full), Err(AssemblyError::TooLarge));
        assert!(asm.is_pending());

        // Tail of the oversized frame is eaten, then frames flow again
        assert_eq!(asm.push("tail").unwrap(), None);
        assert_eq!(asm.push("2").unwrap(), Some("2".to_string()));
    }

    #[test]
    fn test_reset_drops_partial_frame() {
        let frame = event_frame(40);
        let mut asm = FrameAssembler::new(16);
        asm.push(&frame[..16]).unwrap();
        asm.reset();
        assert!(!asm.is_pending());
        assert_eq!(asm.push("40").unwrap(), Some("40".to_string()));
    }
}
