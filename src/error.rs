//! Central error type for the POM filter pipeline.
//!
//! Ein einziger Fehler-Enum fuer alle Stufen: Parser, Filter, Sink.

use core::fmt;

/// All error kinds the pipeline can surface.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The downstream sink rejected a notification (typically a write fault).
    ///
    /// Propagates unchanged through the filter to the caller of the
    /// triggering inbound event; buffered-but-unreplayed events are
    /// abandoned. The one exception is the document-locator notification,
    /// whose delivery is advisory (SAX `setDocumentLocator` runs outside
    /// exception-checked flow) and whose sink fault is therefore swallowed
    /// by the filter.
    Sink(String),
    /// The XML input is not well-formed or could not be decoded.
    XmlParse(String),
    /// A file-level fault outside the event pipeline (resolver, CLI).
    Io(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sink(msg) => write!(f, "sink rejected event: {msg}"),
            Self::XmlParse(msg) => write!(f, "XML parse error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Erstellt einen `Sink` Fehler aus einem IO-Fault des Writers.
    pub fn sink(e: impl fmt::Display) -> Self {
        Self::Sink(e.to_string())
    }
}

/// A convenience `Result` type alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
