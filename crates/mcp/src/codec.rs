// Newline-delimited request framing for the stdio transport

use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;

/// Longest request line accepted, excluding the newline
pub const MAX_LINE_LENGTH: usize = 1024 * 1024;

/// One inbound line
///
/// Bad content is reported as a frame, not a decode error, so one bad
/// line never ends the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestFrame {
    Line(String),
    /// Line was not valid UTF-8
    Malformed,
    /// Line exceeded the length limit and was discarded
    Oversized,
}

/// Splits input on `\n`, stripping a trailing `\r`
#[derive(Debug, Clone)]
pub struct RequestLineCodec {
    max_length: usize,
    next_index: usize,
    discarding: bool,
}

impl RequestLineCodec {
    pub fn new() -> Self {
        Self::with_max_length(MAX_LINE_LENGTH)
    }

    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            max_length,
            next_index: 0,
            discarding: false,
        }
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

impl Default for RequestLineCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn to_frame(line: &[u8]) -> RequestFrame {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    match std::str::from_utf8(line) {
        Ok(text) => RequestFrame::Line(text.to_string()),
        Err(_) => RequestFrame::Malformed,
    }
}

impl Decoder for RequestLineCodec {
    type Item = RequestFrame;
    type Error = std::io::Error;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<RequestFrame>, std::io::Error> {
        loop {
            // A line of max_length bytes plus its newline must still fit
            let read_to = std::cmp::min(self.max_length.saturating_add(1), buf.len());
            let newline = buf[self.next_index..read_to]
                .iter()
                .position(|b| *b == b'\n')
                .map(|offset| offset + self.next_index);

            match (self.discarding, newline) {
                (true, Some(index)) => {
                    buf.advance(index + 1);
                    self.discarding = false;
                    self.next_index = 0;
                    return Ok(Some(RequestFrame::Oversized));
                }
                (true, None) => {
                    buf.advance(read_to);
                    self.next_index = 0;
                    if buf.is_empty() {
                        return Ok(None);
                    }
                }
                (false, Some(index)) => {
                    self.next_index = 0;
                    let line = buf.split_to(index + 1);
                    return Ok(Some(to_frame(&line[..index])));
                }
                (false, None) if buf.len() > self.max_length => {
                    self.discarding = true;
                    self.next_index = 0;
                }
                (false, None) => {
                    self.next_index = read_to;
                    return Ok(None);
                }
            }
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<RequestFrame>, std::io::Error> {
        if let Some(frame) = self.decode(buf)? {
            return Ok(Some(frame));
        }

        self.next_index = 0;
        if self.discarding {
            buf.clear();
            self.discarding = false;
            return Ok(Some(RequestFrame::Oversized));
        }
        if buf.is_empty() {
            return Ok(None);
        }

        let line = buf.split_to(buf.len());
        Ok(Some(to_frame(&line)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str) -> Option<RequestFrame> {
        Some(RequestFrame::Line(text.to_string()))
    }

    #[test]
    fn test_splits_lines_and_strips_carriage_return() {
        let mut codec = RequestLineCodec::new();
        let mut buf = BytesMut::from(&b"first\r\nsecond\npartial"[..]);

        assert_eq!(codec.decode(&mut buf).unwrap(), line("first"));
        assert_eq!(codec.decode(&mut buf).unwrap(), line("second"));
        assert_eq!(codec.decode(&mut buf).unwrap(), None);

        buf.extend_from_slice(b" line\n");
        assert_eq!(codec.decode(&mut buf).unwrap(), line("partial line"));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_malformed_not_error() {
        let mut codec = RequestLineCodec::new();
        let mut buf = BytesMut::from(&[0xff, 0xfe, b'\n', b'o', b'k', b'\n'][..]);

        assert_eq!(codec.decode(&mut buf).unwrap(), Some(RequestFrame::Malformed));
        assert_eq!(codec.decode(&mut buf).unwrap(), line("ok"));
    }

    #[test]
    fn test_oversized_line_is_discarded() {
        let mut codec = RequestLineCodec::with_max_length(8);
        let mut buf = BytesMut::from(&b"0123456789abcdef"[..]);

        // Nothing reported until the oversized line ends
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        assert!(buf.len() <= codec.max_length() + 1);

        buf.extend_from_slice(b"ghij\nshort\n");
        assert_eq!(codec.decode(&mut buf).unwrap(), Some(RequestFrame::Oversized));
        assert_eq!(codec.decode(&mut buf).unwrap(), line("short"));
    }

    #[test]
    fn test_line_at_limit_is_accepted() {
        let mut codec = RequestLineCodec::with_max_length(4);
        let mut buf = BytesMut::from(&b"abcd\nabcde\n"[..]);

        assert_eq!(codec.decode(&mut buf).unwrap(), line("abcd"));
        assert_eq!(codec.decode(&mut buf).unwrap(), Some(RequestFrame::Oversized));
    }

    #[test]
    fn test_eof_flushes_unterminated_line() {
        let mut codec = RequestLineCodec::new();
        let mut buf = BytesMut::from(&b"tail"[..]);

        assert_eq!(codec.decode_eof(&mut buf).unwrap(), line("tail"));
        assert_eq!(codec.decode_eof(&mut buf).unwrap(), None);
    }

    #[test]
    fn test_eof_while_discarding() {
        let mut codec = RequestLineCodec::with_max_length(2);
        let mut buf = BytesMut::from(&b"too long"[..]);

        assert_eq!(codec.decode_eof(&mut buf).unwrap(), Some(RequestFrame::Oversized));
        assert_eq!(codec.decode_eof(&mut buf).unwrap(), None);
    }
}
