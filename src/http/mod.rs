//! HTTP/1.1 wire protocol, implemented directly on a byte stream.
//!
//! # Architecture
//!
//! - **`headers`**: case-insensitive header map with an incremental,
//!   one-field-line-at-a-time parse step
//! - **`request`**: request representation and its parse-state tracking
//! - **`parser`**: the request-line parser, the state machine driving
//!   start line → headers → body → complete, and the buffered read loop
//! - **`response`**: status codes and default response headers
//! - **`writer`**: serializes status line, header block, and body onto an
//!   async sink
//!
//! # Parsing State Machine
//!
//! Each request parse walks a fixed sequence of states, consuming bytes as
//! they arrive, however small the chunks:
//!
//! ```text
//!   AwaitingStartLine ──full line──▶ AwaitingHeaders
//!   AwaitingHeaders ──blank line──▶ AwaitingBody
//!   AwaitingBody ──Content-Length satisfied (or absent)──▶ Complete
//! ```
//!
//! A state that cannot make progress consumes zero bytes and waits for the
//! read loop to deliver more; consumed bytes are shifted out of the buffer
//! and never revisited.

pub mod headers;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
