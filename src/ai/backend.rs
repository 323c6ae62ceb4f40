//! Transport to the text-generation backend.
//!
//! The backend contract is `GET /health` and `POST /chat` with JSON
//! bodies; everything else about the process serving it is out of scope.
//! [`TextBackend`] is the seam: the shipped [`HttpBackend`] speaks the
//! contract over a plain TCP connection, tests substitute scripted
//! implementations.

use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};

use super::{ChatRequest, ChatResponse};

/// A reachable (or not) text generator. Implementations are called from
/// the client's worker thread only, never from the frame pipeline.
pub trait TextBackend: Send {
    /// Probe readiness. Bounded by the implementation's own timeout.
    fn health(&mut self) -> Result<()>;
    /// One prompt round-trip. Any failure — connect, timeout, non-2xx
    /// status, malformed body — is an error; callers map every error to
    /// the same "no result" path.
    fn chat(&mut self, request: &ChatRequest) -> Result<String>;
}

/// HTTP/1.1-over-TCP implementation of the backend contract.
///
/// One connection per request with `Connection: close`, so a response is
/// simply "read until EOF". Read/write timeouts bound every call; an
/// expired timeout surfaces as an ordinary I/O error.
pub struct HttpBackend {
    addr: String,
    health_timeout: Duration,
    request_timeout: Duration,
}

impl HttpBackend {
    pub fn new(addr: impl Into<String>, health_timeout: Duration, request_timeout: Duration) -> Self {
        HttpBackend {
            addr: addr.into(),
            health_timeout,
            request_timeout,
        }
    }

    fn connect(&self, timeout: Duration) -> Result<TcpStream> {
        let sockaddr = self
            .addr
            .to_socket_addrs()
            .with_context(|| format!("resolving {}", self.addr))?
            .next()
            .ok_or_else(|| anyhow!("no address for {}", self.addr))?;
        let stream = TcpStream::connect_timeout(&sockaddr, timeout)
            .with_context(|| format!("connecting to {}", self.addr))?;
        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;
        Ok(stream)
    }

    fn roundtrip(&self, timeout: Duration, request: String) -> Result<(u16, String)> {
        let mut stream = self.connect(timeout)?;
        stream.write_all(request.as_bytes())?;

        let mut raw = String::new();
        stream.read_to_string(&mut raw)?;

        let (head, body) = raw
            .split_once("\r\n\r\n")
            .ok_or_else(|| anyhow!("truncated HTTP response"))?;
        let status: u16 = head
            .lines()
            .next()
            .and_then(|line| line.split_whitespace().nth(1))
            .and_then(|code| code.parse().ok())
            .ok_or_else(|| anyhow!("unparseable status line"))?;
        Ok((status, body.to_string()))
    }
}

impl TextBackend for HttpBackend {
    fn health(&mut self) -> Result<()> {
        let request = format!(
            "GET /health HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
            self.addr
        );
        let (status, _) = self.roundtrip(self.health_timeout, request)?;
        if !(200..300).contains(&status) {
            bail!("health probe returned status {status}");
        }
        Ok(())
    }

    fn chat(&mut self, request: &ChatRequest) -> Result<String> {
        let body = serde_json::to_string(request)?;
        let raw = format!(
            "POST /chat HTTP/1.1\r\nHost: {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.addr,
            body.len(),
            body
        );
        let (status, response_body) = self.roundtrip(self.request_timeout, raw)?;
        if !(200..300).contains(&status) {
            bail!("chat returned status {status}");
        }
        let parsed: ChatResponse =
            serde_json::from_str(response_body.trim()).context("decoding chat response")?;
        Ok(parsed.content)
    }
}
