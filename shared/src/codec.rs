//! Newline-delimited framing for serial byte streams
//!
//! Bytes arrive from the transport in arbitrary chunks. Lines are framed as:
//! ```text
//! [ N bytes: UTF-8 text ][ optional '\r' ][ '\n' ]
//! ```

use bytes::{Buf, BytesMut};
use thiserror::Error;

use crate::defaults::MAX_LINE_LEN;

/// Errors that can occur while framing lines
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LineError {
    #[error("line too long: {0} bytes (max: {1})")]
    LineTooLong(usize, usize),

    #[error("line is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// Streaming line decoder
#[derive(Debug)]
pub struct LineDecoder {
    /// Partial line data being accumulated
    buffer: BytesMut,
    max_line_len: usize,
    /// Set after an overflow until the end of the offending line is seen
    discarding: bool,
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new(MAX_LINE_LEN)
    }
}

impl LineDecoder {
    /// Create a decoder that rejects lines longer than `max_line_len` bytes
    pub fn new(max_line_len: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(max_line_len + 2),
            max_line_len,
            discarding: false,
        }
    }

    /// Add data to the decoder buffer
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Try to decode the next line from the buffer
    ///
    /// Returns:
    /// - `Ok(Some(line))` without the line terminator
    /// - `Ok(None)` if no complete line is buffered
    /// - `Err(...)` if a line was dropped; the decoder stays usable
    ///
    /// Call this repeatedly until it returns `Ok(None)` to drain all complete lines
    pub fn decode_next(&mut self) -> Result<Option<String>, LineError> {
        loop {
            let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') else {
                // One spare byte for a '\r' still waiting on its '\n'
                if self.buffer.len() > self.max_line_len + 1 {
                    let len = self.buffer.len();
                    self.buffer.clear();
                    if !self.discarding {
                        self.discarding = true;
                        return Err(LineError::LineTooLong(len, self.max_line_len));
                    }
                }
                return Ok(None);
            };

            let mut line = self.buffer.split_to(pos);
            self.buffer.advance(1);

            if self.discarding {
                // Tail of a line already reported as too long
                self.discarding = false;
                continue;
            }

            if line.last() == Some(&b'\r') {
                line.truncate(line.len() - 1);
            }
            if line.len() > self.max_line_len {
                return Err(LineError::LineTooLong(line.len(), self.max_line_len));
            }

            let text = std::str::from_utf8(&line)?;
            return Ok(Some(text.to_owned()));
        }
    }

    /// Get the current buffer length (for debugging)
    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(decoder: &mut LineDecoder) -> Vec<Result<String, LineError>> {
        let mut out = Vec::new();
        loop {
            match decoder.decode_next() {
                Ok(Some(line)) => out.push(Ok(line)),
                Ok(None) => break,
                Err(e) => out.push(Err(e)),
            }
        }
        out
    }

    #[test]
    fn test_split_across_chunks() {
        let mut decoder = LineDecoder::default();

        decoder.extend(b"piscar");
        assert_eq!(decoder.decode_next(), Ok(None));
        assert_eq!(decoder.buffer_len(), 6);

        decoder.extend(b"Led 3\r\nsta");
        assert_eq!(decoder.decode_next(), Ok(Some("piscarLed 3".into())));
        assert_eq!(decoder.decode_next(), Ok(None));

        decoder.extend(b"tus\n");
        assert_eq!(decoder.decode_next(), Ok(Some("status".into())));
        assert_eq!(decoder.buffer_len(), 0);
    }

    #[test]
    fn test_multiple_lines_and_blank_line() {
        let mut decoder = LineDecoder::default();
        decoder.extend(b"ligarLed\n\ndesligarLed\n");

        let lines = drain(&mut decoder);
        assert_eq!(
            lines,
            vec![Ok("ligarLed".into()), Ok(String::new()), Ok("desligarLed".into())]
        );
    }

    #[test]
    fn test_overlong_line_reported_once_and_skipped() {
        let mut decoder = LineDecoder::new(8);

        decoder.extend(b"0123456789");
        assert_eq!(decoder.decode_next(), Err(LineError::LineTooLong(10, 8)));
        decoder.extend(b"abcdefghijkl");
        assert_eq!(decoder.decode_next(), Ok(None));

        decoder.extend(b"xyz\nstatus\n");
        assert_eq!(drain(&mut decoder), vec![Ok("status".into())]);
    }

    #[test]
    fn test_overlong_complete_line() {
        let mut decoder = LineDecoder::new(4);
        decoder.extend(b"toolong\nok\n");

        let lines = drain(&mut decoder);
        assert_eq!(lines, vec![Err(LineError::LineTooLong(7, 4)), Ok("ok".into())]);
    }

    #[test]
    fn test_invalid_utf8_is_consumed() {
        let mut decoder = LineDecoder::default();
        decoder.extend(&[0xff, 0xfe, b'\n']);
        decoder.extend(b"status\n");

        assert!(matches!(decoder.decode_next(), Err(LineError::InvalidUtf8(_))));
        assert_eq!(decoder.decode_next(), Ok(Some("status".into())));
    }
}
