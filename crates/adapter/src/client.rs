//! Move client - asks a remote service where to place the current piece
//!
//! Each request opens a fresh TCP connection, writes one [`PureGame`] line
//! and reads one [`OpMove`] line back.

use derive_more::{Display, Error, From};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, warn};

use crate::protocol::{decode_line, encode_line, OpMove, ProtocolError, PureGame};
use crate::types::{DEFAULT_EXTERNAL_HOST, DEFAULT_EXTERNAL_PORT};

/// Where the move service lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_EXTERNAL_HOST.to_string(),
            port: DEFAULT_EXTERNAL_PORT,
        }
    }
}

impl ClientConfig {
    /// Create from `TETRIS_EXTERNAL_HOST` / `TETRIS_EXTERNAL_PORT`
    pub fn from_env() -> Self {
        use std::env;

        let host = env::var("TETRIS_EXTERNAL_HOST")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_EXTERNAL_HOST.to_string());
        let port = env::var("TETRIS_EXTERNAL_PORT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_EXTERNAL_PORT);

        Self { host, port }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Display, Error, From)]
pub enum ClientError {
    #[display("could not connect to {addr}: {source}")]
    Connect { addr: String, source: std::io::Error },
    #[display("i/o error: {_0}")]
    #[from]
    Io(std::io::Error),
    #[display("connection closed before a reply")]
    Closed,
    #[display("bad reply: {_0}")]
    #[from]
    Protocol(ProtocolError),
    #[display("service declined to move")]
    NoMove,
}

impl ClientError {
    pub fn code(&self) -> &'static str {
        match self {
            ClientError::Connect { .. } => "connect_failed",
            ClientError::Io(_) | ClientError::Closed => "io",
            ClientError::Protocol(_) => "protocol",
            ClientError::NoMove => "no_move",
        }
    }
}

/// Send one request over an open stream and wait for the reply
pub async fn exchange<S>(stream: S, game: &PureGame) -> Result<(i32, u8), ClientError>
where
    S: AsyncRead + AsyncWrite,
{
    let (reader, mut writer) = tokio::io::split(stream);

    let line = encode_line(game)?;
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await?;

    let mut reader = BufReader::new(reader);
    let mut reply = String::new();
    if reader.read_line(&mut reply).await? == 0 {
        return Err(ClientError::Closed);
    }

    let op: OpMove = decode_line(&reply)?;
    op.target().ok_or(ClientError::NoMove)
}

#[derive(Debug, Clone, Default)]
pub struct MoveClient {
    config: ClientConfig,
}

impl MoveClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Request a placement, keeping the failure reason
    pub async fn try_request_move(&self, game: &PureGame) -> Result<(i32, u8), ClientError> {
        let addr = self.config.addr();
        let stream = TcpStream::connect(&addr)
            .await
            .map_err(|source| ClientError::Connect { addr, source })?;
        stream.set_nodelay(true)?;
        exchange(stream, game).await
    }

    /// Request a placement; any failure is logged and becomes `None`
    pub async fn request_move(&self, game: &PureGame) -> Option<(i32, u8)> {
        match self.try_request_move(game).await {
            Ok(target) => {
                debug!(column = target.0, rotation = target.1, "move service replied");
                Some(target)
            }
            Err(err) => {
                warn!(code = err.code(), error = %err, "move service unavailable");
                None
            }
        }
    }
}
