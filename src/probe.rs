//! TCP reachability probing with a bounded deadline.

use crate::error::{Error, Result};
use std::io;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::Instant;

/// Wait for a TCP service to start accepting connections.
///
/// With a deadline, the absolute end time is computed once from a monotonic
/// clock and each connect attempt runs under the remaining time. The
/// connection is closed as soon as it is established; only reachability is
/// reported.
///
/// Returns `Ok(true)` once a connection is accepted and `Ok(false)` when
/// the deadline passes first. A deadline of `None` (or zero) retries until
/// the service accepts; only callers that tolerate unbounded blocking may
/// use that mode.
///
/// # Errors
///
/// Connect failures outside the timed-out class (refused, unreachable,
/// name resolution) are returned to the caller rather than swallowed.
pub async fn wait_for_service(
    host: &str,
    port: u16,
    timeout: Option<Duration>,
) -> Result<bool> {
    let deadline = timeout
        .filter(|t| !t.is_zero())
        .map(|t| Instant::now() + t);

    loop {
        let Some(end) = deadline else {
            match TcpStream::connect((host, port)).await {
                Ok(stream) => {
                    drop(stream);
                    return Ok(true);
                }
                Err(err) if is_retryable(&err) => continue,
                Err(err) => return Err(Error::Io(err)),
            }
        };

        let Some(remaining) = end.checked_duration_since(Instant::now()).filter(|r| !r.is_zero())
        else {
            return Ok(false);
        };

        match tokio::time::timeout(remaining, TcpStream::connect((host, port))).await {
            // Deadline hit while the connect was still in flight
            Err(_) => return Ok(false),
            Ok(Ok(stream)) => {
                drop(stream);
                return Ok(true);
            }
            // The service is not accepting connections yet; the loop
            // recomputes the remaining time before trying again.
            Ok(Err(err)) if is_retryable(&err) => continue,
            Ok(Err(err)) => return Err(Error::Io(err)),
        }
    }
}

/// A timed-out connect means the host has not started listening yet.
/// Everything else (refused, unreachable, resolution failure) is a genuine
/// fault and is not retried.
fn is_retryable(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::TimedOut
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn accepting_listener_reports_reachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let online = wait_for_service("127.0.0.1", port, Some(Duration::from_secs(5)))
            .await
            .unwrap();
        assert!(online);

        // The probe socket is closed immediately; a repeat probe is
        // unaffected by the first.
        let again = wait_for_service("127.0.0.1", port, Some(Duration::from_secs(5)))
            .await
            .unwrap();
        assert!(again);
    }

    #[tokio::test]
    async fn expired_deadline_reports_unreachable_without_connecting() {
        // The target would accept, but no time remains by the first check.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let online = wait_for_service("127.0.0.1", port, Some(Duration::from_nanos(1)))
            .await
            .unwrap();
        assert!(!online);
    }

    #[tokio::test]
    async fn refused_connection_is_a_fatal_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let result = wait_for_service("127.0.0.1", port, Some(Duration::from_secs(5))).await;
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[tokio::test]
    async fn zero_timeout_means_no_deadline() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let online = wait_for_service("127.0.0.1", port, Some(Duration::ZERO))
            .await
            .unwrap();
        assert!(online);
    }

    #[tokio::test]
    async fn unbounded_probe_succeeds_against_live_service() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let online = wait_for_service("127.0.0.1", port, None).await.unwrap();
        assert!(online);
    }
}
