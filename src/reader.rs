//! Byte-oriented line reading for locality and bad-coordinate files
//!
//! Lines are returned as raw bytes so that payload fields in any encoding
//! pass through untouched. `\n`, `\r\n` and a lone `\r` all end a line, which
//! covers files saved by spreadsheet tools on every platform.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Reads lines with universal line endings, terminators removed
#[derive(Debug)]
pub struct LineReader<R> {
    inner: R,
    skip_line_feed: bool,
}

impl<R: AsyncBufRead + Unpin> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            skip_line_feed: false,
        }
    }

    /// Next line without its terminator, or `None` at end of input
    pub async fn next_line(&mut self) -> std::io::Result<Option<Vec<u8>>> {
        let mut line = Vec::new();

        loop {
            let available = self.inner.fill_buf().await?;
            if available.is_empty() {
                return Ok((!line.is_empty()).then_some(line));
            }

            // The '\n' of a "\r\n" pair may arrive in the next buffer
            let start = if self.skip_line_feed && available[0] == b'\n' {
                1
            } else {
                0
            };
            self.skip_line_feed = false;

            match available[start..]
                .iter()
                .position(|&byte| byte == b'\n' || byte == b'\r')
            {
                Some(offset) => {
                    let end = start + offset;
                    line.extend_from_slice(&available[start..end]);
                    self.skip_line_feed = available[end] == b'\r';
                    self.inner.consume(end + 1);
                    return Ok(Some(line));
                }
                None => {
                    line.extend_from_slice(&available[start..]);
                    let consumed = available.len();
                    self.inner.consume(consumed);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    async fn read_all(input: &[u8], capacity: usize) -> Vec<Vec<u8>> {
        let mut reader = LineReader::new(BufReader::with_capacity(capacity, input));
        let mut lines = Vec::new();
        while let Some(line) = reader.next_line().await.unwrap() {
            lines.push(line);
        }
        lines
    }

    #[tokio::test]
    async fn test_all_line_endings() {
        let input = b"unix\nwindows\r\nclassic mac\rlast";
        assert_eq!(
            read_all(input, 8192).await,
            vec![
                b"unix".to_vec(),
                b"windows".to_vec(),
                b"classic mac".to_vec(),
                b"last".to_vec(),
            ]
        );
    }

    #[tokio::test]
    async fn test_crlf_split_across_buffers() {
        // A capacity of 4 puts the '\r' and '\n' of "abc\r\n" in separate reads
        let lines = read_all(b"abc\r\ndef\r\n", 4).await;
        assert_eq!(lines, vec![b"abc".to_vec(), b"def".to_vec()]);
    }

    #[tokio::test]
    async fn test_blank_lines_are_returned() {
        let lines = read_all(b"a\n\n\r\rb", 8192).await;
        assert_eq!(
            lines,
            vec![b"a".to_vec(), Vec::new(), Vec::new(), Vec::new(), b"b".to_vec()]
        );
    }

    #[tokio::test]
    async fn test_non_utf8_bytes_pass_through() {
        let lines = read_all(b"Espa\xf1a sp,40.4168,-3.7038\n", 8192).await;
        assert_eq!(lines, vec![b"Espa\xf1a sp,40.4168,-3.7038".to_vec()]);
    }
}
