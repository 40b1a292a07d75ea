use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::http::request::{ParseState, Request, RequestLine};

/// Starting read-buffer size. Deliberately tiny so the doubling path is
/// exercised on every realistic request.
const INITIAL_BUFFER_SIZE: usize = 8;

const CRLF: &[u8] = b"\r\n";

/// Everything that can go wrong while assembling a request from the stream.
///
/// All variants are fatal to the current request; none is retried. I/O errors
/// other than a clean end-of-stream propagate unchanged.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Carries the byte count through the terminating CRLF so a caller can
    /// skip the bad line deterministically.
    #[error("malformed start line")]
    MalformedStartLine { consumed: usize },
    #[error("invalid field line: missing ':' separator")]
    InvalidFieldLine,
    #[error("invalid field name")]
    InvalidFieldName,
    #[error("Content-Length is not a non-negative integer")]
    InvalidContentLength,
    #[error("body exceeds declared Content-Length")]
    BodyExceedsContentLength,
    #[error("incomplete request: stream ended before the request was complete")]
    IncompleteRequest,
    #[error("parse attempted on a complete request")]
    ParseAfterComplete,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Extracts the start line from the front of `data`.
///
/// Returns `Ok(None)` (zero bytes consumed) when no CRLF has arrived yet.
/// On success the consumed count includes the terminating CRLF.
pub fn parse_request_line(data: &[u8]) -> Result<Option<(RequestLine, usize)>, ParseError> {
    let Some(idx) = data.windows(CRLF.len()).position(|w| w == CRLF) else {
        return Ok(None);
    };
    let consumed = idx + CRLF.len();

    let line = std::str::from_utf8(&data[..idx])
        .map_err(|_| ParseError::MalformedStartLine { consumed })?;

    // Exactly three fields separated by single spaces.
    let parts: Vec<&str> = line.split(' ').collect();
    let &[method, target, version] = parts.as_slice() else {
        return Err(ParseError::MalformedStartLine { consumed });
    };

    if method.is_empty() || !method.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(ParseError::MalformedStartLine { consumed });
    }

    let Some(version) = version.strip_prefix("HTTP/") else {
        return Err(ParseError::MalformedStartLine { consumed });
    };
    if version != "1.1" {
        return Err(ParseError::MalformedStartLine { consumed });
    }

    Ok(Some((
        RequestLine {
            method: method.to_string(),
            target: target.to_string(),
            version: version.to_string(),
        },
        consumed,
    )))
}

impl Request {
    /// Consumes as much of `data` as the current state allows.
    ///
    /// Drives the state machine across as many transitions as the buffered
    /// bytes support in one call, returning the total bytes consumed. A
    /// return of 0 with no state change means more data is needed.
    pub(crate) fn parse(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        if self.state == ParseState::Complete {
            return Err(ParseError::ParseAfterComplete);
        }
        let mut total = 0;
        loop {
            let before = self.state;
            let consumed = self.parse_single(&data[total..])?;
            total += consumed;
            if self.state == ParseState::Complete {
                return Ok(total);
            }
            if consumed == 0 && self.state == before {
                return Ok(total);
            }
        }
    }

    /// One state-machine step against the unconsumed region.
    fn parse_single(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        match self.state {
            ParseState::AwaitingStartLine => match parse_request_line(data)? {
                None => Ok(0),
                Some((line, consumed)) => {
                    self.method = line.method;
                    self.target = line.target;
                    self.version = line.version;
                    self.state = ParseState::AwaitingHeaders;
                    Ok(consumed)
                }
            },
            ParseState::AwaitingHeaders => {
                let (consumed, done) = self.headers.parse(data)?;
                if done {
                    self.state = ParseState::AwaitingBody;
                }
                Ok(consumed)
            }
            ParseState::AwaitingBody => {
                let Some(declared) = self.content_length()? else {
                    self.state = ParseState::Complete;
                    return Ok(0);
                };
                self.body.extend_from_slice(data);
                if self.body.len() > declared {
                    return Err(ParseError::BodyExceedsContentLength);
                }
                if self.body.len() == declared {
                    self.state = ParseState::Complete;
                }
                Ok(data.len())
            }
            ParseState::Complete => Err(ParseError::ParseAfterComplete),
        }
    }
}

/// Reads one full request from `reader`, however the stream chops it up.
///
/// Owns a growable buffer with a fill offset: the buffer doubles whenever it
/// is full, reads land in the unfilled tail, and after every parse pass the
/// unconsumed remainder is shifted to the front so consumed bytes are never
/// re-examined. A clean end-of-stream triggers one final parse pass; if that
/// still leaves the request short of `Complete`, the parse fails with
/// [`ParseError::IncompleteRequest`].
pub async fn request_from_reader<R>(reader: &mut R) -> Result<Request, ParseError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; INITIAL_BUFFER_SIZE];
    let mut filled = 0;
    let mut request = Request::new();

    loop {
        if filled == buf.len() {
            buf.resize(buf.len() * 2, 0);
        }

        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            // End of stream: give buffered bytes one last chance.
            if filled > 0 {
                let consumed = request.parse(&buf[..filled])?;
                buf.copy_within(consumed..filled, 0);
                filled -= consumed;
            }
            if request.state() != ParseState::Complete {
                return Err(ParseError::IncompleteRequest);
            }
            break;
        }
        filled += n;

        let consumed = request.parse(&buf[..filled])?;
        buf.copy_within(consumed..filled, 0);
        filled -= consumed;

        if request.state() == ParseState::Complete {
            break;
        }
    }

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_line_needs_more_data_without_crlf() {
        assert!(parse_request_line(b"GET / HTTP/1.1").unwrap().is_none());
    }

    #[test]
    fn request_line_consumed_includes_crlf() {
        let data = b"GET /coffee HTTP/1.1\r\nHost: x\r\n";
        let (line, consumed) = parse_request_line(data).unwrap().unwrap();

        assert_eq!(line.method, "GET");
        assert_eq!(line.target, "/coffee");
        assert_eq!(line.version, "1.1");
        assert_eq!(consumed, b"GET /coffee HTTP/1.1\r\n".len());
    }

    #[test]
    fn request_line_rejects_lowercase_method() {
        let result = parse_request_line(b"get / HTTP/1.1\r\n");
        assert!(matches!(result, Err(ParseError::MalformedStartLine { .. })));
    }

    #[test]
    fn malformed_start_line_reports_bytes_through_crlf() {
        let data = b"/coffee HTTP/1.1\r\nHost: localhost\r\n";

        match parse_request_line(data) {
            Err(ParseError::MalformedStartLine { consumed }) => {
                assert_eq!(consumed, b"/coffee HTTP/1.1\r\n".len());
            }
            other => panic!("expected malformed start line, got {other:?}"),
        }
    }

    #[test]
    fn parse_in_complete_state_is_an_error() {
        let mut request = Request::new();
        let msg = b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n";

        let consumed = request.parse(msg).unwrap();
        assert_eq!(consumed, msg.len());
        assert_eq!(request.state(), ParseState::Complete);

        let result = request.parse(b"GET / HTTP/1.1\r\n");
        assert!(matches!(result, Err(ParseError::ParseAfterComplete)));
    }
}
