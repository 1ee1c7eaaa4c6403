use std::io;

use derive_more::Display;

use crate::version::EmojiVersion;

#[derive(Debug, Display)]
pub enum Error {
    /// The host handed over no corpus text at all.
    #[display(fmt = "no corpus data")]
    NoCorpus,
    #[display(fmt = "corpus unavailable: {}", _0)]
    CorpusUnavailable(io::Error),
    #[display(fmt = "no version markers")]
    NoMarkers,
    #[display(fmt = "version {} listed more than once", _0)]
    DuplicateVersion(EmojiVersion),
    #[display(fmt = "invalid codepoint '{}'", _0)]
    InvalidCodepoint(String),
    #[display(fmt = "invalid emoji version '{}'", _0)]
    InvalidVersion(String),
    #[display(fmt = "malformed marker at line {}: {}", line, reason)]
    MalformedMarker { line: usize, reason: String },
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::CorpusUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::CorpusUnavailable(err)
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
