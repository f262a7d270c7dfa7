//! Error types for the MPD client layer.

use thiserror::Error;

/// Main error type for MPD operations.
#[derive(Debug, Error)]
pub enum MpdError {
    /// Socket-level failure (connect, read, write, or EOF mid-response).
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// The server answered with an `ACK` line.  Carries the trimmed line.
    #[error("server error: {0}")]
    Server(String),

    /// The first line after connect did not start with the MPD banner.
    #[error("no MPD greeting from server")]
    NoGreeting,

    /// A response body could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl MpdError {
    /// `deleteid` racing another client; the entry is already gone.
    pub fn is_no_such_song(&self) -> bool {
        matches!(self, Self::Server(msg) if msg.contains("No such song"))
    }

    /// Seeking right after a track change sometimes fails inside the
    /// decoder; the server reports it as an error but nothing is wrong.
    pub fn is_decoder_seek_failure(&self) -> bool {
        matches!(self, Self::Server(msg) if msg.contains("Decoder failed to seek"))
    }
}

/// Malformed or unexpected response body.  Always fatal: it means the
/// server speaks a dialect this client does not understand.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// `status` response without a usable `state:` line.
    #[error("status response has no state line")]
    MissingState,

    /// A `file:` line with an empty value.
    #[error("playlist entry with empty URI")]
    EmptyUri,

    /// A numeric field that did not parse.
    #[error("could not parse {field}: {value:?}")]
    BadNumber { field: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_such_song_is_whitelisted() {
        let err = MpdError::Server("ACK [50@0] {deleteid} No such song".to_string());
        assert!(err.is_no_such_song());
        assert!(!err.is_decoder_seek_failure());
    }

    #[test]
    fn decoder_seek_is_whitelisted() {
        let err = MpdError::Server("ACK [52@0] {seekcur} Decoder failed to seek".to_string());
        assert!(err.is_decoder_seek_failure());
        assert!(!err.is_no_such_song());
    }

    #[test]
    fn other_server_errors_are_not_whitelisted() {
        let err = MpdError::Server("ACK [5@0] {playid} unknown command".to_string());
        assert!(!err.is_no_such_song());
        assert!(!err.is_decoder_seek_failure());
    }
}
