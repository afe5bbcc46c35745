//! Bounded read phase for a single connection.

use std::io::{self, BufRead, BufReader, Read};

use thiserror::Error;

use super::{RawRequest, RequestLimits};

/// Reasons a connection's request could not be captured.
#[derive(Debug, Error)]
pub enum ReadError {
    /// Reading from the socket failed, including read timeouts.
    #[error("failed to read request: {source}")]
    Io {
        /// Underlying socket error.
        #[from]
        source: io::Error,
    },
    /// The client sent more bytes than allowed before the blank line.
    #[error("request exceeds {limit} bytes")]
    TooLarge {
        /// Configured byte budget.
        limit: usize,
    },
    /// The client sent more non-empty lines than allowed.
    #[error("request exceeds {limit} lines")]
    TooManyLines {
        /// Configured line budget.
        limit: usize,
    },
}

/// Reads lines until a blank line or end of stream.
///
/// Non-empty lines are concatenated without separators. Line endings (`\n`
/// or `\r\n`) are not part of the captured text. Invalid UTF-8 is replaced
/// rather than rejected.
pub(crate) fn read_request<R: Read>(
    reader: R,
    limits: &RequestLimits,
) -> Result<RawRequest, ReadError> {
    let budget = u64::try_from(limits.max_bytes)
        .unwrap_or(u64::MAX)
        .saturating_add(1);
    let mut reader = BufReader::new(reader.take(budget));
    let mut captured = String::new();
    let mut consumed = 0_usize;
    let mut lines = 0_usize;
    let mut line = Vec::new();

    loop {
        line.clear();
        let read = read_line_with_retry(&mut reader, &mut line)?;
        if read == 0 {
            break;
        }
        consumed = consumed.saturating_add(read);
        if consumed > limits.max_bytes {
            return Err(ReadError::TooLarge {
                limit: limits.max_bytes,
            });
        }

        let text = String::from_utf8_lossy(&line);
        let content = text.trim_end_matches(['\r', '\n']);
        if content.is_empty() {
            break;
        }
        lines += 1;
        if lines > limits.max_lines {
            return Err(ReadError::TooManyLines {
                limit: limits.max_lines,
            });
        }
        captured.push_str(content);
    }

    Ok(RawRequest::new(captured))
}

fn read_line_with_retry<R: BufRead>(reader: &mut R, line: &mut Vec<u8>) -> io::Result<usize> {
    loop {
        match reader.read_until(b'\n', line) {
            Ok(read) => return Ok(read),
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(error),
        }
    }
}
