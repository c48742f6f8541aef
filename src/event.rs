//! SAX event model.
//!
//! One variant per ContentHandler notification, each owning its payload.
//! Construction is pure; the side effect happens in [`SaxEvent::execute`],
//! which performs the single corresponding call on a sink. This lets a
//! filter treat "forward now" and "forward later" symmetrically: the same
//! value is either executed immediately or buffered and replayed.

use std::rc::Rc;

use crate::qname::QName;
use crate::sink::SaxSink;
use crate::Result;

/// An attribute of a start-element event: qualified name plus value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The qualified name of the attribute.
    pub name: QName,
    /// The attribute value, already unescaped.
    pub value: Rc<str>,
}

impl Attribute {
    /// Creates an attribute without namespace.
    pub fn new(local_name: impl Into<Rc<str>>, value: impl Into<Rc<str>>) -> Self {
        Self {
            name: QName::new("", local_name),
            value: value.into(),
        }
    }
}

/// Document position information (SAX `Locator`).
///
/// Delivery is advisory: a sink fault while executing this event must not
/// abort the surrounding parse (see the filter's dispatch policy).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Locator {
    /// The public identifier of the document, if known.
    pub public_id: Option<Rc<str>>,
    /// The system identifier of the document, if known.
    pub system_id: Option<Rc<str>>,
    /// 1-basierte Zeile, 0 wenn unbekannt.
    pub line: u64,
    /// 1-basierte Spalte, 0 wenn unbekannt.
    pub column: u64,
}

/// A single XML parse notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaxEvent {
    /// Marks the beginning of the document.
    StartDocument,
    /// Marks the end of the document.
    EndDocument,
    /// Begins an element with the given name and attribute set.
    StartElement {
        name: QName,
        attributes: Vec<Attribute>,
    },
    /// Closes the element with the given name.
    EndElement { name: QName },
    /// Character data content.
    Characters(Rc<str>),
    /// Whitespace a validating parser reported as ignorable.
    IgnorableWhitespace(Rc<str>),
    /// A processing instruction with target and data.
    ProcessingInstruction { target: Rc<str>, data: Rc<str> },
    /// Binds a prefix to a URI for the following element span.
    StartPrefixMapping { prefix: Rc<str>, uri: Rc<str> },
    /// Rescinds a prefix binding.
    EndPrefixMapping { prefix: Rc<str> },
    /// Document position information, delivered before other events.
    DocumentLocator(Locator),
    /// An entity the parser skipped rather than resolved.
    SkippedEntity(Rc<str>),
}

impl SaxEvent {
    /// Performs the single corresponding notification on `sink`.
    ///
    /// Exactly one sink method runs per call; a correct filter never
    /// executes the same logical occurrence twice. Sink errors propagate
    /// unchanged.
    pub fn execute<S: SaxSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        match self {
            Self::StartDocument => sink.start_document(),
            Self::EndDocument => sink.end_document(),
            Self::StartElement { name, attributes } => sink.start_element(name, attributes),
            Self::EndElement { name } => sink.end_element(name),
            Self::Characters(text) => sink.characters(text),
            Self::IgnorableWhitespace(text) => sink.ignorable_whitespace(text),
            Self::ProcessingInstruction { target, data } => {
                sink.processing_instruction(target, data)
            }
            Self::StartPrefixMapping { prefix, uri } => sink.start_prefix_mapping(prefix, uri),
            Self::EndPrefixMapping { prefix } => sink.end_prefix_mapping(prefix),
            Self::DocumentLocator(locator) => sink.document_locator(locator),
            Self::SkippedEntity(name) => sink.skipped_entity(name),
        }
    }
}
