//! Rendering: top bar, queue list, help overlay.
//!
//! The queue is cropped to a window centred on the highlighted row so the
//! selection never scrolls out of view on short terminals.

use std::ops::Range;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Clear, Paragraph},
    Frame,
};

use mq_proto::{PlayState, Snapshot};

use crate::keys::BINDING_HELP;

pub fn draw(frame: &mut Frame, snap: &Snapshot, show_help: bool) {
    let area = frame.area();
    let mut lines: Vec<Line> = Vec::with_capacity(area.height as usize);
    lines.push(Line::raw(top_bar(snap)));

    let (window, highlighted) =
        visible_window(snap.queue.len(), snap.highlighted, area.height as usize);
    for (row, song) in snap.queue[window].iter().enumerate() {
        let marker = if snap.song_id == Some(song.song_id) {
            "> "
        } else {
            "  "
        };
        let body = format!("{} {}", fmt_clock(song.duration), song.display);
        let style = if row == highlighted {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(body, style),
        ]));
    }
    frame.render_widget(Paragraph::new(Text::from(lines)), area);

    if show_help {
        draw_help(frame, area);
    }
}

/// `playing at MM:SS / MM:SS`, `paused at …`, or `stopped`.  Falls back to
/// the bare state word when the active song is not in the queue view.
fn top_bar(snap: &Snapshot) -> String {
    let word = match snap.mode {
        PlayState::Playing => "playing",
        PlayState::Paused => "paused",
        PlayState::Stopped => return "stopped".to_string(),
    };
    match (snap.active_song(), snap.elapsed) {
        (Some(song), Some(elapsed)) => {
            format!(
                "{word} at {} / {}",
                fmt_clock(elapsed),
                fmt_clock(song.duration)
            )
        }
        _ => word.to_string(),
    }
}

/// Slice of the queue that fits a viewport of `viewport_rows` total rows
/// (one of which is the top bar), plus the re-based highlighted index.
/// When everything fits, the queue is returned unmodified; otherwise the
/// window is centred on the highlighted row and clamped to the queue.
pub(crate) fn visible_window(
    len: usize,
    highlighted: usize,
    viewport_rows: usize,
) -> (Range<usize>, usize) {
    if viewport_rows > len {
        return (0..len, highlighted);
    }
    let window = viewport_rows.saturating_sub(1);
    if window == 0 {
        return (0..0, 0);
    }
    let half = (window - 1) / 2;
    let start = highlighted.saturating_sub(half);
    let start = if start + window > len {
        len - window
    } else {
        start
    };
    (start..start + window, highlighted - start)
}

fn draw_help(frame: &mut Frame, area: Rect) {
    let lines: Vec<&str> = BINDING_HELP.lines().collect();
    let width = (lines.iter().map(|l| l.len()).max().unwrap_or(0) as u16 + 4).min(area.width);
    let height = (lines.len() as u16 + 2).min(area.height);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(BINDING_HELP).block(Block::bordered().title(" key bindings ")),
        popup,
    );
}

fn fmt_clock(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mq_proto::Song;

    fn song(id: i64) -> Song {
        Song {
            uri: format!("{id}.flac"),
            song_id: id,
            duration: 135.0,
            artist: None,
            title: None,
            album: None,
            track: None,
            display: format!("{id}.flac"),
        }
    }

    #[test]
    fn window_returns_everything_when_it_fits() {
        assert_eq!(visible_window(5, 3, 10), (0..5, 3));
    }

    #[test]
    fn window_is_centred_on_the_highlight() {
        // 20 songs, 8 rows: 7 queue rows centred on index 10.
        let (range, highlighted) = visible_window(20, 10, 8);
        assert_eq!(range, 7..14);
        assert_eq!(highlighted, 3);
    }

    #[test]
    fn window_clamps_at_the_top() {
        let (range, highlighted) = visible_window(20, 1, 8);
        assert_eq!(range, 0..7);
        assert_eq!(highlighted, 1);
    }

    #[test]
    fn window_clamps_at_the_bottom() {
        let (range, highlighted) = visible_window(20, 19, 8);
        assert_eq!(range, 13..20);
        assert_eq!(highlighted, 6);
    }

    #[test]
    fn window_always_contains_the_highlight() {
        for len in 1..30usize {
            for rows in 2..12usize {
                for highlighted in 0..len {
                    let (range, rebased) = visible_window(len, highlighted, rows);
                    assert!(range.contains(&highlighted), "len={len} rows={rows}");
                    assert_eq!(range.start + rebased, highlighted);
                }
            }
        }
    }

    #[test]
    fn top_bar_shows_position_while_playing() {
        let snap = Snapshot {
            mode: PlayState::Playing,
            elapsed: Some(78.0),
            song_id: Some(1),
            highlighted: 0,
            queue: vec![song(1)],
        };
        assert_eq!(top_bar(&snap), "playing at 01:18 / 02:15");
    }

    #[test]
    fn top_bar_degrades_when_active_song_is_missing() {
        let snap = Snapshot {
            mode: PlayState::Paused,
            elapsed: Some(10.0),
            song_id: Some(9),
            highlighted: 0,
            queue: vec![song(1)],
        };
        assert_eq!(top_bar(&snap), "paused");
    }

    #[test]
    fn top_bar_when_stopped() {
        assert_eq!(top_bar(&Snapshot::default()), "stopped");
    }
}
