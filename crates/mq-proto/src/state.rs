//! Playback snapshot: data model and response-body parsing.
//!
//! A `Snapshot` is built wholesale from the bodies of `status` and
//! `playlistinfo` and replaces the previous one as a unit.  `highlighted`
//! is a client-local cursor that survives reloads by index, not by song
//! identity; `keep_selection` re-applies it after a fetch.

use crate::error::ParseError;

/// Server playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    Playing,
    Paused,
    #[default]
    Stopped,
}

/// One queue entry.  `display` is derived from the tag fields at parse
/// time and never recomputed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    /// Server-side path; last-resort label when tags are missing.
    pub uri: String,
    /// Unique for the lifetime of this entry in the queue.
    pub song_id: i64,
    pub duration: f64,
    pub artist: Option<String>,
    pub title: Option<String>,
    pub album: Option<String>,
    /// Track number within `album`; only meaningful when the album is known.
    pub track: Option<u32>,
    pub display: String,
}

/// Point-in-time view of the server: mode, position, and the full queue.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub mode: PlayState,
    /// Seconds into the active song; `None` when stopped.
    pub elapsed: Option<f64>,
    /// Id of the currently sounding song; `None` when stopped.
    pub song_id: Option<i64>,
    /// Cursor into `queue`.  Undefined (kept at 0) while the queue is empty.
    pub highlighted: usize,
    pub queue: Vec<Song>,
}

impl Snapshot {
    /// The currently sounding song, if it is present in this queue view.
    /// It can legitimately be absent: `status` and `playlistinfo` are
    /// fetched back to back, not atomically.
    pub fn active_song(&self) -> Option<&Song> {
        let id = self.song_id?;
        self.queue.iter().find(|s| s.song_id == id)
    }

    pub fn highlighted_song(&self) -> Option<&Song> {
        self.queue.get(self.highlighted)
    }

    /// Carry the user's selection over from the snapshot this one replaces,
    /// clamped to the new queue bounds.
    pub fn keep_selection(&mut self, old_highlighted: usize) {
        self.highlighted = if self.queue.is_empty() {
            0
        } else {
            old_highlighted.min(self.queue.len() - 1)
        };
    }
}

// ── status parsing ────────────────────────────────────────────────────────────

/// Parsed fields of a `status` response.
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub mode: PlayState,
    pub elapsed: Option<f64>,
    pub song_id: Option<i64>,
}

/// Parse a `status` body.  `elapsed` and `songid` are optional (unset when
/// stopped); a missing or unrecognised `state:` line is an error.
pub fn parse_status(body: &str) -> Result<Status, ParseError> {
    let mut mode = None;
    let mut elapsed = None;
    let mut song_id = None;

    for line in body.lines() {
        let Some((key, value)) = line.split_once(": ") else {
            continue;
        };
        match key {
            "state" => {
                mode = match value {
                    "play" => Some(PlayState::Playing),
                    "pause" => Some(PlayState::Paused),
                    "stop" => Some(PlayState::Stopped),
                    _ => mode,
                };
            }
            "elapsed" => elapsed = Some(parse_f64("elapsed", value)?),
            "songid" => song_id = Some(parse_i64("songid", value)?),
            _ => {}
        }
    }

    let mode = mode.ok_or(ParseError::MissingState)?;
    Ok(Status {
        mode,
        elapsed,
        song_id,
    })
}

// ── playlist parsing ──────────────────────────────────────────────────────────

/// Field accumulator for one playlist record.  A record starts at a
/// `file:` line; the accumulator is flushed into a `Song` when the next
/// `file:` arrives, and once more at end of input.
#[derive(Default)]
struct SongFields {
    uri: String,
    song_id: i64,
    duration: f64,
    artist: Option<String>,
    title: Option<String>,
    album: Option<String>,
    track: Option<u32>,
}

impl SongFields {
    fn finish(self) -> Song {
        let display = compose_display_name(
            &self.uri,
            self.title.as_deref(),
            self.artist.as_deref(),
            self.album.as_deref(),
            self.track,
        );
        Song {
            uri: self.uri,
            song_id: self.song_id,
            duration: self.duration,
            artist: self.artist,
            title: self.title,
            album: self.album,
            track: self.track,
            display,
        }
    }
}

/// Parse a `playlistinfo` body into the ordered queue.  Unrecognised keys
/// are ignored for forward compatibility.
pub fn parse_playlist(body: &str) -> Result<Vec<Song>, ParseError> {
    let mut queue = Vec::new();
    let mut current: Option<SongFields> = None;

    for line in body.lines() {
        let Some((key, value)) = line.split_once(": ") else {
            continue;
        };
        if key == "file" {
            if let Some(fields) = current.take() {
                queue.push(fields.finish());
            }
            if value.is_empty() {
                return Err(ParseError::EmptyUri);
            }
            current = Some(SongFields {
                uri: value.to_string(),
                ..SongFields::default()
            });
            continue;
        }
        // Fields before the first `file:` line belong to no record.
        let Some(fields) = current.as_mut() else {
            continue;
        };
        match key {
            "Id" => fields.song_id = parse_i64("Id", value)?,
            "duration" => fields.duration = parse_f64("duration", value)?,
            "Title" => fields.title = Some(value.to_string()),
            "Artist" => fields.artist = Some(value.to_string()),
            "Album" => fields.album = Some(value.to_string()),
            "Track" => fields.track = Some(parse_u32("Track", value)?),
            _ => {}
        }
    }

    // The last record has no trailing `file:` to close it.
    if let Some(fields) = current.take() {
        queue.push(fields.finish());
    }
    Ok(queue)
}

/// Display-name precedence: uri when untitled, bare title when the artist
/// is unknown, `artist - title`, or the full `[#NN of album]` form.
fn compose_display_name(
    uri: &str,
    title: Option<&str>,
    artist: Option<&str>,
    album: Option<&str>,
    track: Option<u32>,
) -> String {
    let title = title.unwrap_or("");
    let artist = artist.unwrap_or("");
    let album = album.unwrap_or("");
    if title.is_empty() {
        uri.to_string()
    } else if artist.is_empty() {
        title.to_string()
    } else {
        match track {
            Some(track) if !album.is_empty() => {
                format!("[#{track:02} of {album}] {artist} - {title}")
            }
            _ => format!("{artist} - {title}"),
        }
    }
}

fn parse_f64(field: &'static str, value: &str) -> Result<f64, ParseError> {
    value.parse().map_err(|_| ParseError::BadNumber {
        field,
        value: value.to_string(),
    })
}

fn parse_i64(field: &'static str, value: &str) -> Result<i64, ParseError> {
    value.parse().map_err(|_| ParseError::BadNumber {
        field,
        value: value.to_string(),
    })
}

fn parse_u32(field: &'static str, value: &str) -> Result<u32, ParseError> {
    value.parse().map_err(|_| ParseError::BadNumber {
        field,
        value: value.to_string(),
    })
}
