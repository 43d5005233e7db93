// Error kinds and the owned error value reported across the pipeline boundary.
use std::error::Error as StdError;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    InvalidArgument,
    TokenizerCreationFailed,
    NoSentenceFound,
    TaggingFailed,
    ParsingFailed,
    OutOfMemory,
    UnknownFailure,
}

impl ErrorKind {
    /// Stable numeric code; used as the CLI exit status.
    pub fn code(self) -> i32 {
        match self {
            ErrorKind::InvalidArgument => 1,
            ErrorKind::TokenizerCreationFailed => 2,
            ErrorKind::NoSentenceFound => 3,
            ErrorKind::TaggingFailed => 4,
            ErrorKind::ParsingFailed => 5,
            ErrorKind::OutOfMemory => 6,
            ErrorKind::UnknownFailure => 7,
        }
    }

    fn default_message(self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "invalid parameters",
            ErrorKind::TokenizerCreationFailed => "failed to create tokenizer",
            ErrorKind::NoSentenceFound => "no sentence found",
            ErrorKind::TaggingFailed => "part-of-speech tagging failed",
            ErrorKind::ParsingFailed => "dependency parsing failed",
            ErrorKind::OutOfMemory => "memory allocation failed",
            ErrorKind::UnknownFailure => "unknown error occurred",
        }
    }
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attaches `detail` unless it is empty, in which case the kind's default text is kept.
    pub fn with_detail(self, detail: &str) -> Self {
        if detail.is_empty() {
            self
        } else {
            self.with_message(detail)
        }
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self
            .message
            .as_deref()
            .unwrap_or_else(|| self.kind.default_message());
        write!(f, "{:?}: {message}", self.kind)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(err: std::collections::TryReserveError) -> Self {
        Error::new(ErrorKind::OutOfMemory).with_source(err)
    }
}
