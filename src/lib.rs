//! minihttp - HTTP/1.1 straight off a TCP stream
//!
//! Core library for incremental request parsing and response writing.

pub mod config;
pub mod http;
pub mod server;
