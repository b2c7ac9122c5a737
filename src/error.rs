use std::fmt::Display;
use std::path::Path;

#[derive(Debug)]
pub enum Error {
    SourceUnavailable(String, std::io::Error),
    SinkUnavailable(String, std::io::Error),
    InvalidCodeUnit { byte: u8, position: usize },
    EmptyAlphabet,
    CodeUnitsForSingleSymbol { position: usize },
    WorkerFailed { missing: usize, expected: usize },
    OutputCollision(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceUnavailable(source, error) => {
                write!(f, "Unable to read from '{}': {}", source, error)
            }
            Self::SinkUnavailable(sink, error) => {
                write!(f, "Unable to write to '{}': {}", sink, error)
            }
            Self::InvalidCodeUnit { byte, position } => {
                if byte.is_ascii_graphic() {
                    write!(f, "Invalid code unit '{}'", char::from(*byte))?;
                } else {
                    write!(f, "Invalid code unit byte {:#04x}", byte)?;
                }
                write!(
                    f,
                    " at position {}. Only '0' and '1' are allowed.",
                    position
                )
            }
            Self::EmptyAlphabet => {
                write!(f, "No symbols were counted, the code table is empty")
            }
            Self::CodeUnitsForSingleSymbol { position } => {
                write!(
                    f,
                    "Code unit at position {} can not be decoded, the tree holds a single symbol with an empty code",
                    position
                )
            }
            Self::WorkerFailed { missing, expected } => {
                write!(
                    f,
                    "{} of {} worker jobs stopped without reporting a result",
                    missing, expected
                )
            }
            Self::OutputCollision(path) => {
                write!(
                    f,
                    "Output file '{}' would overwrite an input file or another output file",
                    path
                )
            }
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    pub fn source_unavailable(source: &str, error: std::io::Error) -> Self {
        Self::SourceUnavailable(source.to_owned(), error)
    }

    pub fn sink_unavailable(sink: &str, error: std::io::Error) -> Self {
        Self::SinkUnavailable(sink.to_owned(), error)
    }

    /// Replaces the generic stream labels with the files behind them.
    pub(crate) fn with_stream_names(self, source: &Path, sink: &Path) -> Self {
        match self {
            Self::SourceUnavailable(_, e) => Self::SourceUnavailable(source.display().to_string(), e),
            Self::SinkUnavailable(_, e) => Self::SinkUnavailable(sink.display().to_string(), e),
            other => other,
        }
    }
}
