//! Minimal HTTP/1.1 framing: one request in, one response out.
//!
//! Only what the calculator endpoint needs is supported. Requests must
//! carry their body with `Content-Length`; chunked transfer encoding is
//! rejected.

use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Upper bound on the request line plus headers.
pub const MAX_HEAD_BYTES: usize = 8 * 1024;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("connection closed before a request was received")]
    ConnectionClosed,
    #[error("no complete request within {0:?}")]
    TimedOut(Duration),
    #[error("malformed request: {0}")]
    Malformed(String),
    #[error("request head exceeds {} bytes", MAX_HEAD_BYTES)]
    HeadTooLarge,
    #[error("request body of {length} bytes exceeds the {limit} byte limit")]
    BodyTooLarge { length: usize, limit: usize },
    #[error("unsupported transfer encoding: {0}")]
    UnsupportedEncoding(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl HttpError {
    /// Response to send back when reading the request failed, if the
    /// connection is still worth answering.
    pub fn response(&self) -> Option<Response> {
        match self {
            HttpError::ConnectionClosed | HttpError::TimedOut(_) | HttpError::Io(_) => None,
            HttpError::BodyTooLarge { .. } => Some(Response::text(StatusCode::PayloadTooLarge)),
            HttpError::HeadTooLarge => {
                Some(Response::text(StatusCode::RequestHeaderFieldsTooLarge))
            }
            HttpError::UnsupportedEncoding(_) => Some(Response::text(StatusCode::NotImplemented)),
            HttpError::Malformed(_) => Some(Response::text(StatusCode::BadRequest)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    BadRequest,
    NotFound,
    MethodNotAllowed,
    PayloadTooLarge,
    UnprocessableEntity,
    RequestHeaderFieldsTooLarge,
    InternalServerError,
    NotImplemented,
}

impl StatusCode {
    pub fn as_u16(self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::PayloadTooLarge => 413,
            StatusCode::UnprocessableEntity => 422,
            StatusCode::RequestHeaderFieldsTooLarge => 431,
            StatusCode::InternalServerError => 500,
            StatusCode::NotImplemented => 501,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::PayloadTooLarge => "Payload Too Large",
            StatusCode::UnprocessableEntity => "Unprocessable Entity",
            StatusCode::RequestHeaderFieldsTooLarge => "Request Header Fields Too Large",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::NotImplemented => "Not Implemented",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Request {
    /// Case-insensitive header lookup; returns the first match.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Response {
    pub fn json(status: StatusCode, body: Vec<u8>) -> Self {
        Response {
            status,
            content_type: "application/json",
            body,
        }
    }

    /// Plain-text response whose body is the reason phrase.
    pub fn text(status: StatusCode) -> Self {
        Response {
            status,
            content_type: "text/plain; charset=utf-8",
            body: format!("{}\n", status.reason()).into_bytes(),
        }
    }

    pub async fn write_to<W>(&self, writer: &mut W) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let head = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            self.status.as_u16(),
            self.status.reason(),
            self.content_type,
            self.body.len()
        );
        writer.write_all(head.as_bytes()).await?;
        writer.write_all(&self.body).await?;
        writer.flush().await
    }
}

/// Read a single request from `reader`.
///
/// `max_body_bytes` bounds the declared `Content-Length`; the body is
/// not read at all when the limit is exceeded.
pub async fn read_request<R>(reader: &mut R, max_body_bytes: usize) -> Result<Request, HttpError>
where
    R: AsyncBufRead + Unpin,
{
    let mut head_bytes = 0;

    let request_line = match read_head_line(reader, &mut head_bytes).await? {
        Some(line) => line,
        None => return Err(HttpError::ConnectionClosed),
    };
    let (method, path) = parse_request_line(&request_line)?;

    let mut headers = Vec::new();
    loop {
        let line = read_head_line(reader, &mut head_bytes)
            .await?
            .ok_or_else(|| HttpError::Malformed("unterminated header block".to_string()))?;
        if line.is_empty() {
            break;
        }
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| HttpError::Malformed(format!("invalid header line {line:?}")))?;
        headers.push((name.trim().to_string(), value.trim().to_string()));
    }

    let mut request = Request {
        method,
        path,
        headers,
        body: Vec::new(),
    };

    if let Some(encoding) = request.header("transfer-encoding") {
        return Err(HttpError::UnsupportedEncoding(encoding.to_string()));
    }

    let length = match request.header("content-length") {
        Some(value) => value
            .parse::<usize>()
            .map_err(|_| HttpError::Malformed(format!("invalid content-length {value:?}")))?,
        None => 0,
    };
    if length > max_body_bytes {
        return Err(HttpError::BodyTooLarge {
            length,
            limit: max_body_bytes,
        });
    }

    request.body.resize(length, 0);
    reader.read_exact(&mut request.body).await?;
    Ok(request)
}

/// Read one CRLF (or LF) terminated line of the request head.
/// Returns `None` on EOF before any byte of the line.
async fn read_head_line<R>(reader: &mut R, head_bytes: &mut usize) -> Result<Option<String>, HttpError>
where
    R: AsyncBufRead + Unpin,
{
    let mut raw = Vec::new();
    let remaining = (MAX_HEAD_BYTES - *head_bytes) as u64;
    let read = (&mut *reader).take(remaining + 1).read_until(b'\n', &mut raw).await?;
    if read == 0 {
        return Ok(None);
    }
    *head_bytes += read;
    if *head_bytes > MAX_HEAD_BYTES {
        return Err(HttpError::HeadTooLarge);
    }
    if raw.last() != Some(&b'\n') {
        return Err(HttpError::Malformed("truncated request head".to_string()));
    }
    raw.pop();
    if raw.last() == Some(&b'\r') {
        raw.pop();
    }
    String::from_utf8(raw)
        .map(Some)
        .map_err(|_| HttpError::Malformed("request head is not utf-8".to_string()))
}

fn parse_request_line(line: &str) -> Result<(String, String), HttpError> {
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(method), Some(target), Some(version), None) if version.starts_with("HTTP/1.") => {
            // Query strings play no part in routing.
            let path = target.split('?').next().unwrap_or(target);
            Ok((method.to_string(), path.to_string()))
        }
        _ => Err(HttpError::Malformed(format!("invalid request line {line:?}"))),
    }
}
