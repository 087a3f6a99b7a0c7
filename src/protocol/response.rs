//! Outbound response formatting
//!
//! All downstream responses are HTTP/1.1. The multipart stream uses the
//! `NEWIMAGEFROMTHESERVER` boundary; each part carries an exact
//! `Content-Length` so browsers can delimit the raw JPEG bytes.

use bytes::Bytes;

/// Boundary separating frames in the multipart stream
pub const BOUNDARY: &str = "NEWIMAGEFROMTHESERVER";

/// Response header announcing the multipart JPEG stream
pub fn stream_header() -> &'static [u8] {
    concat!(
        "HTTP/1.1 200 OK\r\n",
        "Content-Type: multipart/x-mixed-replace;boundary=NEWIMAGEFROMTHESERVER\r\n",
        "\r\n"
    )
    .as_bytes()
}

/// One multipart chunk: boundary line, part headers, blank line, frame bytes
pub fn stream_part(frame: &[u8]) -> Bytes {
    let head = format!(
        "--{}\r\nContent-Type: image/jpeg\r\nContent-Length: {}\r\n\r\n",
        BOUNDARY,
        frame.len()
    );
    let mut out = Vec::with_capacity(head.len() + frame.len());
    out.extend_from_slice(head.as_bytes());
    out.extend_from_slice(frame);
    Bytes::from(out)
}

/// A complete single-image response; the connection closes afterwards
pub fn jpeg_image(frame: &[u8]) -> Bytes {
    let head = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: image/jpeg\r\nContent-Length: {}\r\n\r\n",
        frame.len()
    );
    let mut out = Vec::with_capacity(head.len() + frame.len());
    out.extend_from_slice(head.as_bytes());
    out.extend_from_slice(frame);
    Bytes::from(out)
}

/// An HTML page response
pub fn html_page(body: &[u8]) -> Bytes {
    let head = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\n\r\n",
        body.len()
    );
    let mut out = Vec::with_capacity(head.len() + body.len());
    out.extend_from_slice(head.as_bytes());
    out.extend_from_slice(body);
    Bytes::from(out)
}

/// A JSON response, CORS-open so status dashboards can poll it cross-origin
pub fn json_body(body: &[u8]) -> Bytes {
    let head = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nAccess-Control-Allow-Origin: *\r\nContent-Length: {}\r\n\r\n",
        body.len()
    );
    let mut out = Vec::with_capacity(head.len() + body.len());
    out.extend_from_slice(head.as_bytes());
    out.extend_from_slice(body);
    Bytes::from(out)
}

/// The empty acknowledgement sent for a shutdown request
pub fn no_content() -> &'static [u8] {
    b"HTTP/1.1 204 No Content\r\n\r\n"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_header_announces_boundary() {
        let header = std::str::from_utf8(stream_header()).unwrap();
        assert!(header.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(header.contains("multipart/x-mixed-replace;boundary=NEWIMAGEFROMTHESERVER"));
        assert!(header.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_stream_part_exact_bytes() {
        let part = stream_part(&[0xFF, 0xD8, 0xFF, 0xD9]);
        let expected =
            b"--NEWIMAGEFROMTHESERVER\r\nContent-Type: image/jpeg\r\nContent-Length: 4\r\n\r\n\xFF\xD8\xFF\xD9";
        assert_eq!(&part[..], &expected[..]);
    }

    #[test]
    fn test_jpeg_image_content_length_matches_frame() {
        let frame = [0xFF, 0xD8, 0xFF, 0x00, 0xFF, 0xD9];
        let response = jpeg_image(&frame);
        let text = String::from_utf8_lossy(&response);
        assert!(text.contains("Content-Length: 6\r\n"));
        assert!(response.ends_with(&frame));
    }

    #[test]
    fn test_json_body_allows_cross_origin() {
        let response = json_body(b"{}");
        let text = String::from_utf8_lossy(&response);
        assert!(text.contains("Access-Control-Allow-Origin: *\r\n"));
        assert!(text.contains("Content-Type: application/json\r\n"));
    }

    #[test]
    fn test_no_content_is_header_only() {
        assert_eq!(no_content(), b"HTTP/1.1 204 No Content\r\n\r\n");
    }
}
