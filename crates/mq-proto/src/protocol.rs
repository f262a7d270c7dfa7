//! Connection gateway for MPD's line protocol.
//!
//! One TCP connection per command: connect, check the greeting banner, send
//! `<command>\n`, then collect `key: value` lines until the `OK` or `ACK`
//! terminator.  No pooling and no retry; callers decide what is fatal.
//! Long-poll commands (`idle`) use the same per-call model because the
//! blocking happens server-side, not in connection lifetime.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::TcpStream;
use tracing::trace;

use crate::error::MpdError;
use crate::state::{parse_playlist, parse_status, Snapshot};

/// Expected prefix of the greeting line sent on connect.
const GREETING_PREFIX: &str = "OK MPD ";

#[derive(Debug, Clone)]
pub struct MpdClient {
    addr: String,
}

impl MpdClient {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    /// Execute one command and return the response body (the `key: value`
    /// lines before the terminator, newline-joined).  Responses are
    /// all-or-nothing: an `ACK` discards everything read so far.
    pub async fn execute(&self, command: &str) -> Result<String, MpdError> {
        trace!(command, "mpd command");
        let stream = TcpStream::connect(&self.addr).await?;
        let (read_half, mut write_half) = stream.into_split();
        let mut lines = BufReader::new(read_half).lines();

        let greeting = next_line(&mut lines).await?;
        if !greeting.starts_with(GREETING_PREFIX) {
            return Err(MpdError::NoGreeting);
        }

        write_half.write_all(command.as_bytes()).await?;
        write_half.write_all(b"\n").await?;

        let mut body = String::new();
        loop {
            let line = next_line(&mut lines).await?;
            if line == "OK" {
                return Ok(body);
            }
            if line.starts_with("ACK ") {
                return Err(MpdError::Server(line.trim().to_string()));
            }
            body.push_str(&line);
            body.push('\n');
        }
    }

    /// Block until the server reports a queue or player change.  Each call
    /// is one long-poll round trip on a fresh connection.
    pub async fn idle(&self) -> Result<(), MpdError> {
        self.execute("idle playlist player").await?;
        Ok(())
    }

    /// Fetch `status` and `playlistinfo` back to back and build a fresh
    /// snapshot.  The two responses are not atomic at the server; the
    /// queue view may be marginally stale relative to the status.
    pub async fn snapshot(&self) -> Result<Snapshot, MpdError> {
        let status = parse_status(&self.execute("status").await?)?;
        let queue = parse_playlist(&self.execute("playlistinfo").await?)?;
        Ok(Snapshot {
            mode: status.mode,
            elapsed: status.elapsed,
            song_id: status.song_id,
            highlighted: 0,
            queue,
        })
    }
}

async fn next_line(lines: &mut Lines<BufReader<OwnedReadHalf>>) -> Result<String, MpdError> {
    match lines.next_line().await? {
        Some(line) => Ok(line),
        None => Err(MpdError::Transport(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "connection closed before response terminator",
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;

    /// Serve `exchanges` on successive connections: greet, read one command
    /// line, answer with the canned response, close.
    async fn spawn_server(greeting: &'static str, exchanges: Vec<&'static str>) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            for response in exchanges {
                let (stream, _) = listener.accept().await.unwrap();
                let (read_half, mut write_half) = stream.into_split();
                write_half.write_all(greeting.as_bytes()).await.unwrap();
                let mut command = String::new();
                let mut reader = BufReader::new(read_half);
                reader.read_line(&mut command).await.unwrap();
                write_half.write_all(response.as_bytes()).await.unwrap();
            }
        });
        addr
    }

    #[tokio::test]
    async fn execute_returns_body_on_ok() {
        let addr = spawn_server("OK MPD 0.23.5\n", vec!["state: play\nelapsed: 1.5\nOK\n"]).await;
        let client = MpdClient::new(addr.to_string());
        let body = client.execute("status").await.unwrap();
        assert_eq!(body, "state: play\nelapsed: 1.5\n");
    }

    #[tokio::test]
    async fn execute_classifies_ack_as_server_error() {
        let addr = spawn_server(
            "OK MPD 0.23.5\n",
            vec!["ACK [50@0] {playid} No such song\n"],
        )
        .await;
        let client = MpdClient::new(addr.to_string());
        let err = client.execute("playid 99").await.unwrap_err();
        match err {
            MpdError::Server(msg) => assert_eq!(msg, "ACK [50@0] {playid} No such song"),
            other => panic!("expected server error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn execute_rejects_bad_greeting() {
        let addr = spawn_server("220 smtp.example.com\n", vec!["OK\n"]).await;
        let client = MpdClient::new(addr.to_string());
        assert!(matches!(
            client.execute("status").await.unwrap_err(),
            MpdError::NoGreeting
        ));
    }

    #[tokio::test]
    async fn execute_reports_eof_before_terminator() {
        // Response body with no OK/ACK line before the server closes.
        let addr = spawn_server("OK MPD 0.23.5\n", vec!["state: play\n"]).await;
        let client = MpdClient::new(addr.to_string());
        assert!(matches!(
            client.execute("status").await.unwrap_err(),
            MpdError::Transport(_)
        ));
    }

    #[tokio::test]
    async fn snapshot_combines_status_and_playlist() {
        let addr = spawn_server(
            "OK MPD 0.23.5\n",
            vec![
                "state: play\nelapsed: 10.0\nsongid: 2\nOK\n",
                "file: a.flac\nId: 1\nduration: 60.0\nfile: b.flac\nId: 2\nduration: 90.0\nOK\n",
            ],
        )
        .await;
        let client = MpdClient::new(addr.to_string());
        let snap = client.snapshot().await.unwrap();
        assert_eq!(snap.mode, crate::state::PlayState::Playing);
        assert_eq!(snap.queue.len(), 2);
        assert_eq!(snap.active_song().unwrap().uri, "b.flac");
        assert_eq!(snap.highlighted, 0);
    }
}
