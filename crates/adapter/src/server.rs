//! Move server - answers placement requests with the heuristic search
//!
//! Serves the same line protocol the move client speaks, so a session can
//! point its external seats at it. Each request line gets exactly one reply
//! line; malformed requests get the "no move" sentinel.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use lockstep_tetris_engine::{best_placement, max_rotations_of};

use crate::protocol::{decode_line, encode_line, OpMove, ProtocolError, PureGame};
use crate::types::DEFAULT_EXTERNAL_PORT;

/// Decision function shared by every connection
pub type Decider = Arc<dyn Fn(&PureGame) -> OpMove + Send + Sync>;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for MoveServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_EXTERNAL_PORT,
        }
    }
}

impl MoveServerConfig {
    /// Create from `TETRIS_MOVE_SERVER_HOST` / `TETRIS_MOVE_SERVER_PORT`
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();
        let host = env::var("TETRIS_MOVE_SERVER_HOST")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);
        let port = env::var("TETRIS_MOVE_SERVER_PORT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);

        Self { host, port }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Best placement for the request's current shape on its board
pub fn heuristic_move(game: &PureGame) -> Result<OpMove, ProtocolError> {
    let grid = game.occupancy()?;
    let shape = game.current()?;
    Ok(best_placement(&grid, &shape, max_rotations_of(&shape))
        .map_or(OpMove::NONE, |p| OpMove::new(p.column, p.rotation as i32)))
}

pub fn heuristic_decider() -> Decider {
    Arc::new(|game| {
        heuristic_move(game).unwrap_or_else(|err| {
            warn!(code = err.code(), error = %err, "unusable request");
            OpMove::NONE
        })
    })
}

/// Start the TCP server
pub async fn run_move_server(
    config: MoveServerConfig,
    decider: Decider,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.addr()).await?;
    let bound = listener.local_addr()?;
    info!(%bound, "move server listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let mut client_id_counter = 0usize;
    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;
        debug!(client_id, %addr, "client connected");

        let decider = Arc::clone(&decider);
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, decider).await {
                warn!(client_id, error = %e, "client error");
            }
            debug!(client_id, "client disconnected");
        });
    }
}

async fn handle_client(socket: TcpStream, decider: Decider) -> anyhow::Result<()> {
    let (reader, mut writer) = socket.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let reply = match decode_line::<PureGame>(&line) {
            Ok(game) => decider(&game),
            Err(err) => {
                warn!(code = err.code(), error = %err, "malformed request");
                OpMove::NONE
            }
        };
        writer.write_all(encode_line(&reply)?.as_bytes()).await?;
        writer.flush().await?;
    }

    Ok(())
}
