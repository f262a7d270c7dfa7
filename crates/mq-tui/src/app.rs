//! The single consumer loop that owns the authoritative snapshot.
//!
//! Three producers feed one `tokio::mpsc` channel: the blocking terminal
//! reader, the idle watcher, and the 1 s elapsed ticker (a select arm).
//! Only this loop mutates the snapshot or triggers a redraw; dispatchers
//! get the snapshot by reference for the duration of one call.

use std::io;
use std::time::Duration;

use anyhow::Context;
use ratatui::crossterm::{
    event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

use mq_proto::{commands, MpdClient, PlayState, Snapshot};

use crate::action::Action;
use crate::keys;
use crate::ui;

pub struct App {
    client: MpdClient,
    snapshot: Snapshot,
    seek_step: u32,
    show_help: bool,
    should_quit: bool,
}

impl App {
    pub fn new(client: MpdClient, snapshot: Snapshot, seek_step: u32) -> Self {
        Self {
            client,
            snapshot,
            seek_step,
            show_help: false,
            should_quit: false,
        }
    }

    pub async fn run(
        mut self,
        tx: mpsc::Sender<Action>,
        mut rx: mpsc::Receiver<Action>,
    ) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // ── Background task: keyboard/resize events ───────────────────────────
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if let Some(action) = keys::action_for(&ev) {
                        if tx.blocking_send(action).is_err() {
                            break;
                        }
                    }
                }
                Err(_) => break,
            }
        });

        let res = self.event_loop(&mut terminal, &mut rx).await;

        // Tear the screen down before any fatal error reaches the operator.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        res
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        rx: &mut mpsc::Receiver<Action>,
    ) -> anyhow::Result<()> {
        let period = Duration::from_secs(1);
        let mut elapsed_tick = tokio::time::interval_at(Instant::now() + period, period);
        elapsed_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| ui::draw(f, &self.snapshot, self.show_help))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                action = rx.recv() => {
                    let Some(action) = action else { break };
                    debug!(?action, "event");
                    needs_redraw = self.handle_action(action).await?;
                }
                _ = elapsed_tick.tick() => {
                    needs_redraw = self.advance_elapsed();
                }
            }
        }
        Ok(())
    }

    /// Apply one action.  Returns whether a redraw is needed.  Errors not
    /// suppressed by the dispatcher are fatal for the whole run.
    async fn handle_action(&mut self, action: Action) -> anyhow::Result<bool> {
        match action {
            Action::StateChanged => {
                let old = self.snapshot.highlighted;
                let mut fresh = self
                    .client
                    .snapshot()
                    .await
                    .context("could not reload mpd state")?;
                fresh.keep_selection(old);
                self.snapshot = fresh;
                Ok(true)
            }
            Action::PlayHighlighted => {
                commands::play_highlighted(&self.client, &self.snapshot).await?;
                Ok(false)
            }
            Action::TogglePause => {
                commands::toggle_pause(&self.client, &self.snapshot).await?;
                Ok(false)
            }
            Action::DeleteHighlighted => {
                commands::delete_highlighted(&self.client, &self.snapshot).await?;
                Ok(false)
            }
            Action::ClearQueue => {
                commands::clear_queue(&self.client).await?;
                Ok(false)
            }
            Action::HighlightPrev => {
                if self.snapshot.highlighted > 0 {
                    self.snapshot.highlighted -= 1;
                    return Ok(true);
                }
                Ok(false)
            }
            Action::HighlightNext => {
                if self.snapshot.highlighted + 1 < self.snapshot.queue.len() {
                    self.snapshot.highlighted += 1;
                    return Ok(true);
                }
                Ok(false)
            }
            Action::MovePrev => {
                commands::move_highlighted_up(&self.client, &mut self.snapshot).await?;
                Ok(false)
            }
            Action::MoveNext => {
                commands::move_highlighted_down(&self.client, &mut self.snapshot).await?;
                Ok(false)
            }
            Action::SeekBackward => {
                commands::seek_backward(&self.client, &self.snapshot, self.seek_step).await?;
                Ok(false)
            }
            Action::SeekForward => {
                commands::seek_forward(&self.client, &self.snapshot, self.seek_step).await?;
                Ok(false)
            }
            Action::ToggleHelp => {
                self.show_help = !self.show_help;
                Ok(true)
            }
            Action::Redraw => Ok(true),
            Action::Quit => {
                self.should_quit = true;
                Ok(false)
            }
        }
    }

    /// Local best-effort clock: advance elapsed by one second while
    /// playing, without asking the server.
    fn advance_elapsed(&mut self) -> bool {
        if self.snapshot.mode != PlayState::Playing {
            return false;
        }
        match self.snapshot.elapsed.as_mut() {
            Some(elapsed) => {
                *elapsed += 1.0;
                true
            }
            None => false,
        }
    }
}
