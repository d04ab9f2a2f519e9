//! Line Framing
//!
//! Reassembles the arbitrary byte chunks read from one worker stream into
//! complete newline-terminated lines. Each stream gets its own framer, so
//! framing state is never shared between stdout and stderr.
//!
//! Framing happens on bytes and each complete line is decoded on its own,
//! so a multi-byte character split across two reads is never mangled.

use std::borrow::Cow;

/// Stateful per-stream line reassembly
#[derive(Debug, Default)]
pub struct LineFramer {
    /// Trailing bytes not yet terminated by a newline; never contains `\n`
    fragment: Vec<u8>,
    /// Complete lines produced so far
    lines_emitted: u64,
}

impl LineFramer {
    /// Create a framer with an empty fragment
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and return the lines it completed, in stream order.
    ///
    /// The carried fragment is prepended to the chunk, the result is split
    /// on `\n`, every piece but the last is returned, and the last piece
    /// (possibly empty) becomes the new fragment. An empty chunk is a no-op.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        if chunk.is_empty() {
            return Vec::new();
        }

        self.fragment.extend_from_slice(chunk);

        let Some(last_newline) = self.fragment.iter().rposition(|b| *b == b'\n') else {
            return Vec::new();
        };

        let rest = self.fragment.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.fragment, rest);

        let lines: Vec<String> = complete[..complete.len() - 1]
            .split(|b| *b == b'\n')
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect();

        self.lines_emitted += lines.len() as u64;
        lines
    }

    /// Bytes waiting for their terminating newline
    pub fn pending(&self) -> &[u8] {
        &self.fragment
    }

    /// Pending fragment decoded as text
    pub fn pending_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.fragment)
    }

    /// Number of complete lines produced so far
    pub fn lines_emitted(&self) -> u64 {
        self.lines_emitted
    }

    /// Drop the carried fragment, as at the start of a new process
    pub fn reset(&mut self) {
        self.fragment.clear();
        self.lines_emitted = 0;
    }

    /// Close the stream. The residual fragment is discarded, never emitted
    /// as a final line; returns how many bytes were dropped.
    pub fn finish(self) -> usize {
        self.fragment.len()
    }
}

/// Whether a line is empty or whitespace-only and should not be broadcast
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
