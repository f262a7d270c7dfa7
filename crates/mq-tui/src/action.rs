//! All events flowing through the single consumer loop.

/// One ordered stream carries these from three producers: the blocking
/// terminal reader, the idle watcher, and (as a select arm) the ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // ── Playback ─────────────────────────────────────────────────────────────
    PlayHighlighted,
    TogglePause,
    DeleteHighlighted,
    ClearQueue,
    SeekBackward,
    SeekForward,

    // ── Selection ────────────────────────────────────────────────────────────
    HighlightPrev,
    HighlightNext,
    MovePrev,
    MoveNext,

    // ── System ───────────────────────────────────────────────────────────────
    /// The server reported a queue/player change; reload the snapshot.
    StateChanged,
    ToggleHelp,
    Redraw,
    Quit,
}
