//! Inbound request parsing
//!
//! Connections speak just enough HTTP for a camera relay: the request line is
//! parsed into a path and query parameters, the header block is consumed and
//! otherwise ignored.

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{Error, Result};

/// Upper bound on the size of an inbound request head
pub const MAX_REQUEST_BYTES: usize = 8 * 1024;

/// A parsed inbound request: path plus query parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Request path, e.g. `/stream`
    pub path: String,
    /// Query parameters in order of appearance
    pub query: Vec<(String, String)>,
}

impl Request {
    /// Parse an HTTP request line of the form `GET /path?query HTTP/1.1`
    ///
    /// Only GET is accepted; anything else routes to the error response.
    pub fn parse(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let method = parts
            .next()
            .ok_or_else(|| Error::MalformedRequest(line.into()))?;
        if method != "GET" {
            return Err(Error::MalformedRequest(line.into()));
        }
        let target = parts
            .next()
            .ok_or_else(|| Error::MalformedRequest(line.into()))?;

        let (path, query_str) = match target.split_once('?') {
            Some((path, query)) => (path, query),
            None => (target, ""),
        };

        let query = query_str
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((key, value)) => (key.to_string(), value.to_string()),
                None => (pair.to_string(), String::new()),
            })
            .collect();

        Ok(Self {
            path: path.to_string(),
            query,
        })
    }

    /// Value of the first query parameter with the given key
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The camera selected by the `cam=<name>` query convention
    pub fn camera(&self) -> Option<&str> {
        self.query_param("cam")
    }
}

/// Read the request head from a connection and return its request line
///
/// Consumes bytes up to and including the blank line terminating the header
/// block, so a response can be written without racing unread request data.
pub async fn read_request_line<S>(stream: &mut S) -> Result<String>
where
    S: AsyncRead + Unpin,
{
    let mut head = Vec::with_capacity(512);
    let mut chunk = [0u8; 512];

    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        head.extend_from_slice(&chunk[..n]);
        if head.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
        if head.len() > MAX_REQUEST_BYTES {
            return Err(Error::MalformedRequest("request head too large".into()));
        }
    }

    let line_end = head
        .windows(2)
        .position(|w| w == b"\r\n")
        .unwrap_or(head.len());
    Ok(String::from_utf8_lossy(&head[..line_end]).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_path() {
        let req = Request::parse("GET /status HTTP/1.1").unwrap();
        assert_eq!(req.path, "/status");
        assert!(req.query.is_empty());
    }

    #[test]
    fn test_parse_camera_query() {
        let req = Request::parse("GET /stream?cam=porch HTTP/1.1").unwrap();
        assert_eq!(req.path, "/stream");
        assert_eq!(req.camera(), Some("porch"));
    }

    #[test]
    fn test_parse_multiple_params_first_wins() {
        let req = Request::parse("GET /stream?cam=a&cam=b&x=1 HTTP/1.1").unwrap();
        assert_eq!(req.camera(), Some("a"));
        assert_eq!(req.query_param("x"), Some("1"));
    }

    #[test]
    fn test_parse_empty_query() {
        let req = Request::parse("GET /stream? HTTP/1.1").unwrap();
        assert_eq!(req.path, "/stream");
        assert_eq!(req.camera(), None);
    }

    #[test]
    fn test_parse_param_without_value() {
        let req = Request::parse("GET /stream?cam HTTP/1.1").unwrap();
        assert_eq!(req.camera(), Some(""));
    }

    #[test]
    fn test_camera_match_is_case_sensitive() {
        let req = Request::parse("GET /stream?CAM=porch HTTP/1.1").unwrap();
        assert_eq!(req.camera(), None);
    }

    #[test]
    fn test_rejects_non_get() {
        assert!(Request::parse("POST /stream HTTP/1.1").is_err());
        assert!(Request::parse("").is_err());
        assert!(Request::parse("GET").is_err());
    }

    #[tokio::test]
    async fn test_read_request_line_from_stream() {
        let (mut client, mut server) = tokio::io::duplex(1024);
        tokio::io::AsyncWriteExt::write_all(
            &mut client,
            b"GET /capture?cam=door HTTP/1.1\r\nHost: relay\r\n\r\n",
        )
        .await
        .unwrap();

        let line = read_request_line(&mut server).await.unwrap();
        assert_eq!(line, "GET /capture?cam=door HTTP/1.1");
    }

    #[tokio::test]
    async fn test_read_request_line_handles_split_writes() {
        let (mut client, mut server) = tokio::io::duplex(1024);
        let writer = tokio::spawn(async move {
            use tokio::io::AsyncWriteExt;
            client.write_all(b"GET /st").await.unwrap();
            client.write_all(b"atus HTTP/1.1\r\n").await.unwrap();
            client.write_all(b"\r\n").await.unwrap();
        });

        let line = read_request_line(&mut server).await.unwrap();
        assert_eq!(line, "GET /status HTTP/1.1");
        writer.await.unwrap();
    }
}
