use std::io;

/// A specialized `Result` for logger operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while configuring a logger or writing to its sink.
///
/// Markup problems never show up here: unknown color names and malformed
/// tags are rendered as best as possible instead of failing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The underlying sink failed to accept a write, color change or reset.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A timestamp pattern contained an unknown strftime specifier.
    #[error("invalid timestamp format '{format}'")]
    InvalidTimestampFormat { format: String },
}
