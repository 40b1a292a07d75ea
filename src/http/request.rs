use bytes::BytesMut;

use crate::http::headers::HeaderMap;
use crate::http::parser::ParseError;

/// Parsing progress of a request being assembled from the stream.
///
/// Fields of [`Request`] populate strictly in this order; a request is only
/// valid for handoff to a handler once it reaches `Complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    AwaitingStartLine,
    AwaitingHeaders,
    AwaitingBody,
    Complete,
}

/// The three fields of an HTTP start line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: String,
    pub target: String,
    pub version: String,
}

/// A parsed HTTP/1.1 request.
#[derive(Debug, Clone)]
pub struct Request {
    /// Request method, an uppercase ASCII token (e.g. "GET").
    pub method: String,
    /// Raw request-target (path plus optional query), opaque to this layer.
    pub target: String,
    /// HTTP version without the "HTTP/" prefix; only "1.1" is accepted.
    pub version: String,
    /// Header fields, lower-cased names, duplicates comma-joined.
    pub headers: HeaderMap,
    /// Body bytes, exactly `Content-Length` of them; empty when the header
    /// is absent.
    pub body: BytesMut,
    pub(crate) state: ParseState,
}

impl Request {
    pub(crate) fn new() -> Self {
        Self {
            method: String::new(),
            target: String::new(),
            version: String::new(),
            headers: HeaderMap::new(),
            body: BytesMut::new(),
            state: ParseState::AwaitingStartLine,
        }
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Retrieves a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// The declared body length, if any.
    ///
    /// `None` means the header is absent (empty body). A value that is not a
    /// non-negative base-10 integer is a fatal parse error.
    pub fn content_length(&self) -> Result<Option<usize>, ParseError> {
        let Some(value) = self.headers.get("content-length") else {
            return Ok(None);
        };
        value
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|_| ParseError::InvalidContentLength)
    }
}
