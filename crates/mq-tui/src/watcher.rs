//! Long-poll task turning server pushes into events.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use mq_proto::MpdClient;

use crate::action::Action;

/// Loop `idle playlist player` and emit `StateChanged` on every return.
/// Stops quietly on any error: the client keeps working from user input
/// and the ticker, just without push updates.
pub fn spawn(client: MpdClient, tx: mpsc::Sender<Action>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Err(err) = client.idle().await {
                debug!("idle watcher stopping: {err}");
                break;
            }
            if tx.send(Action::StateChanged).await.is_err() {
                break;
            }
        }
    })
}
