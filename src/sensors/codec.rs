use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;
use tracing::warn;

use super::error::SerialError;

/// Longest line accepted before the buffered bytes are thrown away.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 4096;

/// Splits the incoming byte stream on `\n` and yields each line as a `String`.
///
/// Invalid UTF-8 is replaced lossily; serial noise should not stop ingestion.
/// The delimiter is not included in the yielded frames.
#[derive(Debug, Clone)]
pub struct LineCodec {
    /// How far we have looked for a newline into the buffer.
    cursor: usize,
    max_length: usize,
}

impl LineCodec {
    pub fn new(max_length: usize) -> Self {
        Self {
            cursor: 0,
            max_length,
        }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINE_LENGTH)
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = SerialError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let read_to = src.len();

        if let Some(position) = src[self.cursor..read_to].iter().position(|&b| b == b'\n') {
            // We may have started late in the buffer.
            let actual_position = self.cursor + position;
            self.cursor = 0;

            let line = src.split_to(actual_position);
            src.advance(1);

            return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
        }

        if read_to > self.max_length {
            warn!(
                bytes = read_to,
                max = self.max_length,
                "Discarding oversized serial line without delimiter"
            );
            src.clear();
            self.cursor = 0;
            return Ok(None);
        }

        // Don't re-scan bytes we have already looked at.
        self.cursor = read_to;
        Ok(None)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }

        self.cursor = 0;
        if src.is_empty() {
            return Ok(None);
        }

        let rest = src.split_to(src.len());
        Ok(Some(String::from_utf8_lossy(&rest).into_owned()))
    }
}
