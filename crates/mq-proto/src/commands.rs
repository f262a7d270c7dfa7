//! Command dispatcher: abstract playback commands to protocol strings.
//!
//! Each function enforces its precondition against the snapshot it is
//! handed and suppresses the known-benign server errors; every other
//! error propagates to the caller.

use tracing::debug;

use crate::error::MpdError;
use crate::protocol::MpdClient;
use crate::state::{PlayState, Snapshot};

/// Margin kept from the track end when seeking forward.  Seeking across
/// the end of a song makes the server misbehave.
const SEEK_END_GUARD: f64 = 0.4;
const SEEK_END_LANDING: f64 = 0.3;

pub async fn play_highlighted(client: &MpdClient, snap: &Snapshot) -> Result<(), MpdError> {
    let Some(song) = snap.highlighted_song() else {
        return Ok(());
    };
    client.execute(&format!("playid {}", song.song_id)).await?;
    Ok(())
}

pub async fn toggle_pause(client: &MpdClient, snap: &Snapshot) -> Result<(), MpdError> {
    let command = match snap.mode {
        PlayState::Playing => "pause 1",
        PlayState::Paused => "pause 0",
        PlayState::Stopped => return Ok(()),
    };
    client.execute(command).await?;
    Ok(())
}

pub async fn delete_highlighted(client: &MpdClient, snap: &Snapshot) -> Result<(), MpdError> {
    let Some(song) = snap.highlighted_song() else {
        return Ok(());
    };
    match client.execute(&format!("deleteid {}", song.song_id)).await {
        Err(err) if err.is_no_such_song() => {
            // Delete pressed faster than reloads arrive; already gone.
            debug!("deleteid raced a queue change: {err}");
            Ok(())
        }
        other => other.map(|_| ()),
    }
}

pub async fn clear_queue(client: &MpdClient) -> Result<(), MpdError> {
    client.execute("clear").await?;
    Ok(())
}

/// Move the highlighted song one row up.  The protocol string uses the
/// pre-move index; the local cursor follows the song.
pub async fn move_highlighted_up(client: &MpdClient, snap: &mut Snapshot) -> Result<(), MpdError> {
    if snap.queue.is_empty() || snap.highlighted == 0 {
        return Ok(());
    }
    let command = format!("move {} {}", snap.highlighted, snap.highlighted - 1);
    snap.highlighted -= 1;
    client.execute(&command).await?;
    Ok(())
}

pub async fn move_highlighted_down(
    client: &MpdClient,
    snap: &mut Snapshot,
) -> Result<(), MpdError> {
    if snap.queue.is_empty() || snap.highlighted >= snap.queue.len() - 1 {
        return Ok(());
    }
    let command = format!("move {} {}", snap.highlighted, snap.highlighted + 1);
    snap.highlighted += 1;
    client.execute(&command).await?;
    Ok(())
}

pub async fn seek_backward(
    client: &MpdClient,
    snap: &Snapshot,
    seconds: u32,
) -> Result<(), MpdError> {
    if snap.mode == PlayState::Stopped {
        return Ok(());
    }
    client.execute(&format!("seekcur -{seconds}")).await?;
    Ok(())
}

pub async fn seek_forward(
    client: &MpdClient,
    snap: &Snapshot,
    seconds: u32,
) -> Result<(), MpdError> {
    if snap.mode == PlayState::Stopped {
        return Ok(());
    }
    // The active song can be missing from a marginally stale queue view,
    // and elapsed can be unset mid-transition; skip the seek rather than
    // guess where the track end is.
    let (Some(song), Some(elapsed)) = (snap.active_song(), snap.elapsed) else {
        debug!("seek forward skipped: active song or elapsed unknown");
        return Ok(());
    };
    let Some(target) = forward_seek_target(song.duration, elapsed, f64::from(seconds)) else {
        return Ok(());
    };
    match client.execute(&format!("seekcur +{target}")).await {
        Err(err) if err.is_decoder_seek_failure() => {
            // Happens when seeking right after the song changed.
            debug!("seek raced a track change: {err}");
            Ok(())
        }
        other => other.map(|_| ()),
    }
}

/// How far to actually seek forward.  `None` means the end is close enough
/// that seeking would overshoot; a clamped value lands just before the end
/// instead of crossing it.
fn forward_seek_target(duration: f64, elapsed: f64, step: f64) -> Option<f64> {
    let remaining = duration - elapsed;
    if remaining <= SEEK_END_GUARD {
        None
    } else if remaining - SEEK_END_GUARD < step {
        Some(remaining - SEEK_END_LANDING)
    } else {
        Some(step)
    }
}
