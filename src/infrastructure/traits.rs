//! I/O boundary traits for testability
//!
//! The HTTP round trip is the only external I/O of the client. It sits behind
//! `HttpTransport` so services can be tested with a recording mock.

use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use thiserror::Error;
use tracing::trace;

/// HTTP methods used by the shortener API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

/// A fully built request, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    /// When false the transport must hand back 3xx responses untouched.
    pub follow_redirects: bool,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
            follow_redirects: true,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn without_redirects(mut self) -> Self {
        self.follow_redirects = false;
        self
    }

    /// Case-insensitive header lookup.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        lookup(&self.headers, name)
    }
}

/// Status, headers and body of a completed round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        lookup(&self.headers, name)
    }
}

fn lookup<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Network-level failure: DNS, refused connection, timeout, broken body.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        let kind = if e.is_timeout() {
            "request timed out"
        } else if e.is_connect() {
            "connection failed"
        } else if e.is_builder() {
            "invalid request"
        } else if e.is_body() || e.is_decode() {
            "failed to read response body"
        } else {
            "request failed"
        };
        Self {
            message: format!("{kind}: {e}"),
            source: Some(Box::new(e)),
        }
    }
}

/// HTTP transport abstraction.
pub trait HttpTransport: Send + Sync {
    /// Perform exactly one request/response cycle.
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Blocking reqwest transport.
///
/// The redirect policy is fixed at client build time, so there is one client
/// per policy. Each is built on first use.
#[derive(Debug, Default)]
pub struct ReqwestTransport {
    timeout: Option<Duration>,
    following: OnceLock<Client>,
    non_following: OnceLock<Client>,
}

impl ReqwestTransport {
    /// `None` keeps reqwest's default timeout.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    fn client(&self, follow_redirects: bool) -> Result<&Client, reqwest::Error> {
        let cell = if follow_redirects {
            &self.following
        } else {
            &self.non_following
        };
        if let Some(client) = cell.get() {
            return Ok(client);
        }

        let mut builder =
            Client::builder().user_agent(concat!("brig/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if !follow_redirects {
            builder = builder.redirect(Policy::none());
        }
        let client = builder.build()?;
        trace!("built HTTP client, follow_redirects={}", follow_redirects);
        Ok(cell.get_or_init(|| client))
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let client = self.client(request.follow_redirects)?;
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        // consumes the response; the connection goes back to the pool or closes here
        let body = response.text()?;
        trace!("response: status={} body_len={}", status, body.len());

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread;
    use std::thread::JoinHandle;

    #[test]
    fn given_mixed_case_header_when_looking_up_then_ignores_case() {
        let response = HttpResponse::new(302, "").with_header("location", "http://example.com");
        assert_eq!(response.header("Location"), Some("http://example.com"));
        assert_eq!(response.header("LOCATION"), Some("http://example.com"));
        assert_eq!(response.header("Content-Type"), None);
    }

    #[test]
    fn given_request_builder_when_disabling_redirects_then_flag_is_cleared() {
        let request = HttpRequest::new(Method::Get, "http://brig.gs/a")
            .header("Authorization", "t0k3n")
            .without_redirects();
        assert!(!request.follow_redirects);
        assert_eq!(request.header_value("authorization"), Some("t0k3n"));
        assert_eq!(request.body, None);
    }

    /// Accept one connection, capture the raw request and answer with `response`.
    fn serve_once(response: &'static str) -> (String, JoinHandle<(String, TcpListener)>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            (request, listener)
        });
        (base, handle)
    }

    fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).unwrap();
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length || n == 0 {
                    return text;
                }
            }
            if n == 0 {
                return text;
            }
        }
    }

    fn assert_no_second_connection(listener: TcpListener) {
        listener.set_nonblocking(true).unwrap();
        let err = listener.accept().unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::WouldBlock);
    }

    #[test]
    fn given_redirect_when_not_following_then_returns_302_with_location() {
        let (base, server) = serve_once(
            "HTTP/1.1 302 Found\r\nLocation: /elsewhere\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        let transport = ReqwestTransport::new(Some(Duration::from_secs(5)));
        let request = HttpRequest::new(Method::Get, format!("{base}/yt/video"))
            .header("Authorization", "tok")
            .without_redirects();

        let response = transport.send(&request).unwrap();

        assert_eq!(response.status, 302);
        assert_eq!(response.header("location"), Some("/elsewhere"));
        let (raw, listener) = server.join().unwrap();
        assert!(raw.starts_with("GET /yt/video HTTP/1.1\r\n"), "{raw}");
        assert!(raw.to_lowercase().contains("\r\nauthorization: tok\r\n"), "{raw}");
        assert_no_second_connection(listener);
        assert!(transport.following.get().is_none(), "only the non-following client is built");
        assert!(transport.non_following.get().is_some());
    }

    #[test]
    fn given_post_with_body_when_sending_then_body_and_content_type_arrive() {
        let (base, server) = serve_once(
            "HTTP/1.1 201 Created\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        let transport = ReqwestTransport::new(Some(Duration::from_secs(5)));
        let body = r#"{"short_id":"a","target_url":"http://x"}"#;
        let request = HttpRequest::new(Method::Post, format!("{base}/api/create"))
            .header("Authorization", "tok")
            .header("Content-Type", "application/json")
            .body(body);

        let response = transport.send(&request).unwrap();

        assert_eq!(response.status, 201);
        let (raw, _) = server.join().unwrap();
        let lower = raw.to_lowercase();
        assert!(raw.starts_with("POST /api/create HTTP/1.1\r\n"), "{raw}");
        assert!(lower.contains("\r\ncontent-type: application/json\r\n"), "{raw}");
        assert!(lower.contains("\r\nauthorization: tok\r\n"), "{raw}");
        assert!(raw.ends_with(body), "{raw}");
    }

    #[test]
    fn given_unreachable_host_when_sending_then_reports_transport_error() {
        // bind then drop to get a local port with nothing listening
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let transport = ReqwestTransport::new(Some(Duration::from_secs(2)));
        let request = HttpRequest::new(Method::Get, format!("http://127.0.0.1:{port}/api/list"));

        let err = transport.send(&request).unwrap_err();

        assert!(!err.to_string().is_empty());
    }
}
