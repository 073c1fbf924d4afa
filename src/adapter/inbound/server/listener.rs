//! TCP listener: one task per connection, one JSON object per line.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

use super::router::dispatch_line;
use super::wire::Response;
use crate::application::service::Service;
use crate::error::Result;

/// Longest request line accepted, newline excluded.
pub const MAX_REQUEST_BYTES: usize = 64 * 1024;

const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

fn server_clock() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Whether an `accept` failure leaves the listening socket unusable.
///
/// Aborted handshakes and descriptor exhaustion (EMFILE, ENFILE) pass once
/// connections close, so only errors about the socket itself are fatal.
fn is_fatal_accept_error(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::InvalidInput
            | io::ErrorKind::NotFound
            | io::ErrorKind::PermissionDenied
            | io::ErrorKind::Unsupported
    )
}

/// Accepts connections and hands each to its own task.
pub struct Server {
    listener: TcpListener,
    service: Arc<Service>,
}

impl Server {
    /// Bind to `addr`.
    ///
    /// # Errors
    /// Returns an error if the address cannot be bound.
    pub async fn bind(addr: SocketAddr, service: Arc<Service>) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener, service })
    }

    /// Address actually bound, useful with port 0.
    ///
    /// # Errors
    /// Returns an error if the socket has no local address.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until the surrounding task is dropped.
    ///
    /// A failed `accept` is logged and retried after a short pause.
    ///
    /// # Errors
    /// Returns an error if the listening socket itself is broken.
    pub async fn run(self) -> Result<()> {
        info!(addr = %self.local_addr()?, "Listening");
        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) if is_fatal_accept_error(&e) => {
                    error!(error = %e, "Listener failed");
                    return Err(e.into());
                }
                Err(e) => {
                    warn!(error = %e, "Accept failed, retrying");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                    continue;
                }
            };
            let service = Arc::clone(&self.service);
            tokio::spawn(async move {
                debug!(peer = %peer, "Connection opened");
                if let Err(e) = serve_connection(stream, service).await {
                    warn!(peer = %peer, error = %e, "Connection closed with error");
                } else {
                    debug!(peer = %peer, "Connection closed");
                }
            });
        }
    }
}

/// Answer requests on one connection, in order, until the peer hangs up.
///
/// Lines longer than [`MAX_REQUEST_BYTES`] are skipped and answered with
/// `invalid_argument`.
///
/// # Errors
/// Returns an error on socket failure.
pub async fn serve_connection(stream: TcpStream, service: Arc<Service>) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);

    loop {
        let response = match read_frame(&mut reader, MAX_REQUEST_BYTES).await? {
            Frame::Eof => break,
            Frame::TooLong => {
                warn!(limit = MAX_REQUEST_BYTES, "Request line too long");
                Response::invalid(format!("request exceeds {MAX_REQUEST_BYTES} bytes"))
            }
            Frame::Line(line) if line.trim().is_empty() => continue,
            Frame::Line(line) => {
                let service = Arc::clone(&service);
                tokio::task::spawn_blocking(move || dispatch_line(&service, &line, server_clock()))
                    .await
                    .unwrap_or_else(|e| Response::internal(format!("request task failed: {e}")))
            }
        };

        let mut out = serde_json::to_string(&response)?;
        out.push('\n');
        writer.write_all(out.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Frame {
    Line(String),
    TooLong,
    Eof,
}

/// Read one newline-terminated frame, buffering at most `limit` bytes.
///
/// An oversized line is drained up to its newline so the next frame starts
/// clean. A trailing `\r` is dropped and invalid UTF-8 is replaced, leaving
/// the JSON parser to reject it.
async fn read_frame<R>(reader: &mut R, limit: usize) -> io::Result<Frame>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let mut oversized = false;
    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            if oversized {
                return Ok(Frame::TooLong);
            }
            if buf.is_empty() {
                return Ok(Frame::Eof);
            }
            break;
        }

        let newline = available.iter().position(|b| *b == b'\n');
        let data = &available[..newline.unwrap_or(available.len())];
        if !oversized {
            if buf.len() + data.len() > limit {
                oversized = true;
                buf = Vec::new();
            } else {
                buf.extend_from_slice(data);
            }
        }
        let used = newline.map_or(available.len(), |i| i + 1);
        reader.consume(used);
        if newline.is_some() {
            break;
        }
    }

    if oversized {
        return Ok(Frame::TooLong);
    }
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
    Ok(Frame::Line(String::from_utf8_lossy(&buf).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn frames_split_on_newlines() {
        let mut input: &[u8] = b"{\"a\":1}\r\n\nlast";
        assert_eq!(read_frame(&mut input, 64).await.unwrap(), Frame::Line("{\"a\":1}".into()));
        assert_eq!(read_frame(&mut input, 64).await.unwrap(), Frame::Line(String::new()));
        assert_eq!(read_frame(&mut input, 64).await.unwrap(), Frame::Line("last".into()));
        assert_eq!(read_frame(&mut input, 64).await.unwrap(), Frame::Eof);
    }

    #[tokio::test]
    async fn oversized_line_is_drained() {
        let long = "x".repeat(100);
        let text = format!("{long}\nok\n");
        let mut input = text.as_bytes();
        assert_eq!(read_frame(&mut input, 10).await.unwrap(), Frame::TooLong);
        assert_eq!(read_frame(&mut input, 10).await.unwrap(), Frame::Line("ok".into()));
        assert_eq!(read_frame(&mut input, 10).await.unwrap(), Frame::Eof);
    }

    #[tokio::test]
    async fn line_at_limit_is_accepted() {
        let mut input: &[u8] = b"0123456789\n";
        assert_eq!(read_frame(&mut input, 10).await.unwrap(), Frame::Line("0123456789".into()));
    }

    #[test]
    fn transient_accept_errors_are_retried() {
        assert!(!is_fatal_accept_error(&io::Error::from(io::ErrorKind::ConnectionAborted)));
        assert!(!is_fatal_accept_error(&io::Error::from(io::ErrorKind::ConnectionReset)));
        assert!(!is_fatal_accept_error(&io::Error::from(io::ErrorKind::Interrupted)));
        // EMFILE
        #[cfg(unix)]
        assert!(!is_fatal_accept_error(&io::Error::from_raw_os_error(24)));
        assert!(is_fatal_accept_error(&io::Error::from(io::ErrorKind::InvalidInput)));
    }
}
