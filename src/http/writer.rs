use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::headers::HeaderMap;
use crate::http::response::{StatusCode, default_headers, reason_phrase_for};

/// Writes the status line `HTTP/1.1 <code> <reason>\r\n`.
pub async fn write_status_line<W>(sink: &mut W, status: StatusCode) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    write_status_line_raw(sink, status.as_u16()).await
}

/// Status line for a raw numeric code; unknown codes get a generic reason
/// phrase rather than an invalid line.
pub async fn write_status_line_raw<W>(sink: &mut W, code: u16) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let line = format!("HTTP/1.1 {} {}\r\n", code, reason_phrase_for(code));
    sink.write_all(line.as_bytes()).await
}

/// Serializes the header block, one `name:value\r\n` per field, followed by
/// the terminating blank line.
pub async fn write_headers<W>(sink: &mut W, headers: &HeaderMap) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut block = Vec::new();
    for (name, value) in headers.iter() {
        block.extend_from_slice(name.as_bytes());
        block.push(b':');
        block.extend_from_slice(value.as_bytes());
        block.extend_from_slice(b"\r\n");
    }
    block.extend_from_slice(b"\r\n");
    sink.write_all(&block).await
}

/// Writes a complete response: status line, default headers sized for the
/// body, and the body itself.
pub async fn write_response<W>(
    sink: &mut W,
    status: StatusCode,
    body: &[u8],
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    write_status_line(sink, status).await?;
    write_headers(sink, &default_headers(body.len())).await?;
    sink.write_all(body).await?;
    sink.flush().await
}

/// Minimal error response used when parsing fails or a handler reports an
/// error: status line plus default headers plus the message as the body.
pub async fn write_error_response<W>(
    sink: &mut W,
    code: u16,
    message: &str,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    write_status_line_raw(sink, code).await?;
    write_headers(sink, &default_headers(message.len())).await?;
    sink.write_all(message.as_bytes()).await?;
    sink.flush().await
}
