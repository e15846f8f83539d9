use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use juice_platform::PowerSource;
use juice_protocol::{codes, MethodResponse};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, error, info, warn};

use crate::channel::MethodHandler;

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Socket already in use: {0}")]
    SocketInUse(PathBuf),
}

const SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(250);

pub type Result<T> = std::result::Result<T, ServeError>;

pub fn run<S: PowerSource + 'static>(
    handler: MethodHandler<S>,
    socket: Option<PathBuf>,
) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let handler = Arc::new(handler);
    info!(
        channel = handler.channel(),
        source = handler.service().source().name(),
        policy = %handler.service().policy(),
        "method channel starting"
    );

    let result = runtime.block_on(async move {
        match socket {
            Some(path) => serve_socket(handler, &path).await,
            None => serve_stdio(handler).await,
        }
    });

    // A pending stdin read never finishes on its own after Ctrl-C.
    runtime.shutdown_timeout(SHUTDOWN_TIMEOUT);
    result
}

async fn serve_stdio<S: PowerSource + 'static>(handler: Arc<MethodHandler<S>>) -> Result<()> {
    tokio::select! {
        result = serve_lines(handler, tokio::io::stdin(), tokio::io::stdout()) => {
            let handled = result?;
            info!(handled, "stdin closed");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted");
        }
    }
    Ok(())
}

async fn serve_socket<S: PowerSource + 'static>(
    handler: Arc<MethodHandler<S>>,
    socket: &Path,
) -> Result<()> {
    if socket.exists() {
        if UnixStream::connect(socket).await.is_ok() {
            return Err(ServeError::SocketInUse(socket.to_path_buf()));
        }
        fs::remove_file(socket)?;
    }
    if let Some(parent) = socket.parent() {
        fs::create_dir_all(parent)?;
    }

    let listener = UnixListener::bind(socket)?;
    info!(socket = %socket.display(), "listening");

    let result = accept_loop(handler, listener).await;
    fs::remove_file(socket).ok();
    result
}

async fn accept_loop<S: PowerSource + 'static>(
    handler: Arc<MethodHandler<S>>,
    listener: UnixListener,
) -> Result<()> {
    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, _)) => {
                        let handler = Arc::clone(&handler);
                        tokio::spawn(async move {
                            let (reader, writer) = stream.into_split();
                            match serve_lines(handler, reader, writer).await {
                                Ok(handled) => debug!(handled, "client disconnected"),
                                Err(e) => debug!(error = %e, "client connection error"),
                            }
                        });
                    }
                    Err(e) => {
                        error!(error = %e, "socket accept error");
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                return Ok(());
            }
        }
    }
}

/// Answers one JSON request per line until the reader reaches EOF.
///
/// Returns the number of requests handled.
pub async fn serve_lines<S, R, W>(
    handler: Arc<MethodHandler<S>>,
    reader: R,
    mut writer: W,
) -> io::Result<u64>
where
    S: PowerSource + 'static,
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    let mut handled = 0u64;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = respond(&handler, line.to_string()).await;
        let json = match response.to_json() {
            Ok(j) => j,
            Err(e) => {
                warn!(error = %e, "failed to encode response");
                continue;
            }
        };

        writer.write_all(format!("{}\n", json).as_bytes()).await?;
        writer.flush().await?;
        handled += 1;
    }

    Ok(handled)
}

// Platform reads may block; keep them off the async workers.
async fn respond<S: PowerSource + 'static>(
    handler: &Arc<MethodHandler<S>>,
    line: String,
) -> MethodResponse {
    let handler = Arc::clone(handler);
    match tokio::task::spawn_blocking(move || handler.handle_line(&line)).await {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "handler task failed");
            MethodResponse::error(codes::INTERNAL, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use juice_platform::{BatteryQueryService, PlatformStatus, SimulatedSource};
    use juice_protocol::{MethodOutcome, DEFAULT_CHANNEL};
    use serde_json::json;
    use tempfile::TempDir;

    fn handler(level: i64, status: PlatformStatus) -> Arc<MethodHandler<SimulatedSource>> {
        Arc::new(MethodHandler::new(
            BatteryQueryService::new(SimulatedSource::new(level, status)),
            DEFAULT_CHANNEL,
        ))
    }

    fn responses(output: &[u8]) -> Vec<MethodResponse> {
        String::from_utf8_lossy(output)
            .lines()
            .map(|l| MethodResponse::from_json(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_serve_lines_answers_in_order() {
        let input = concat!(
            r#"{"id":1,"method":"getBatteryLevel"}"#,
            "\n\n",
            r#"{"id":2,"method":"getBatteryInfo"}"#,
            "\n",
            r#"{"id":3,"method":"doSomethingElse"}"#,
            "\n",
        );
        let mut output = Vec::new();

        let handled = serve_lines(handler(87, PlatformStatus::Full), input.as_bytes(), &mut output)
            .await
            .unwrap();
        assert_eq!(handled, 3);

        let responses = responses(&output);
        assert_eq!(responses[0].id, Some(1));
        assert_eq!(responses[0].result(), Some(&json!(87)));
        assert_eq!(
            responses[1].result(),
            Some(&json!({"level": 87, "isCharging": true, "isPluggedIn": true}))
        );
        assert_eq!(responses[2].outcome, MethodOutcome::NotImplemented);
    }

    #[tokio::test]
    async fn test_serve_lines_reports_bad_requests() {
        let mut output = Vec::new();
        serve_lines(handler(10, PlatformStatus::Discharging), &b"[1, 2]\n"[..], &mut output)
            .await
            .unwrap();

        let responses = responses(&output);
        assert!(matches!(
            responses[0].outcome,
            MethodOutcome::Error { ref code, .. } if code == codes::BAD_REQUEST
        ));
    }

    #[tokio::test]
    async fn test_socket_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("juice.sock");
        let listener = UnixListener::bind(&path).unwrap();
        let server = tokio::spawn(accept_loop(handler(42, PlatformStatus::Discharging), listener));

        let stream = UnixStream::connect(&path).await.unwrap();
        let (reader, mut writer) = stream.into_split();
        writer
            .write_all(b"{\"id\":9,\"method\":\"getBatteryInfo\"}\n")
            .await
            .unwrap();

        let mut lines = BufReader::new(reader).lines();
        let line = lines.next_line().await.unwrap().unwrap();
        let response = MethodResponse::from_json(&line).unwrap();

        assert_eq!(response.id, Some(9));
        assert_eq!(
            response.result(),
            Some(&json!({"level": 42, "isCharging": false, "isPluggedIn": false}))
        );

        server.abort();
    }
}
