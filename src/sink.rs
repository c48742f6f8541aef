//! The downstream contract of the event pipeline.
//!
//! [`SaxSink`] mirrors the SAX ContentHandler callbacks, one method per
//! notification kind. Every stage of the pipeline speaks this trait: the
//! parser drives a sink, the filter is a sink wrapping another sink, and
//! the XML writer is the terminal sink. Default bodies are no-ops so a
//! consumer only implements the notifications it cares about.

use crate::event::{Attribute, Locator, SaxEvent};
use crate::qname::QName;
use crate::Result;

/// Receiver of a forward-only XML event stream, in document order.
pub trait SaxSink {
    /// The document begins. First notification after the locator, if any.
    fn start_document(&mut self) -> Result<()> {
        Ok(())
    }

    /// The document ends. Always the last notification.
    fn end_document(&mut self) -> Result<()> {
        Ok(())
    }

    /// An element starts. `attributes` excludes namespace declarations,
    /// which arrive as [`start_prefix_mapping`](Self::start_prefix_mapping).
    fn start_element(&mut self, name: &QName, attributes: &[Attribute]) -> Result<()> {
        let _ = (name, attributes);
        Ok(())
    }

    /// The element with the given name ends.
    fn end_element(&mut self, name: &QName) -> Result<()> {
        let _ = name;
        Ok(())
    }

    /// Character data, already unescaped.
    fn characters(&mut self, text: &str) -> Result<()> {
        let _ = text;
        Ok(())
    }

    /// Whitespace reported as ignorable by the producer.
    fn ignorable_whitespace(&mut self, text: &str) -> Result<()> {
        let _ = text;
        Ok(())
    }

    /// A processing instruction.
    fn processing_instruction(&mut self, target: &str, data: &str) -> Result<()> {
        let _ = (target, data);
        Ok(())
    }

    /// A prefix is bound to a URI just before the owning start-element.
    fn start_prefix_mapping(&mut self, prefix: &str, uri: &str) -> Result<()> {
        let _ = (prefix, uri);
        Ok(())
    }

    /// A prefix binding ends just after the owning end-element.
    fn end_prefix_mapping(&mut self, prefix: &str) -> Result<()> {
        let _ = prefix;
        Ok(())
    }

    /// Document position information. Advisory; see the filter's
    /// error-swallowing policy for this notification.
    fn document_locator(&mut self, locator: &Locator) -> Result<()> {
        let _ = locator;
        Ok(())
    }

    /// An entity the producer skipped rather than resolved.
    fn skipped_entity(&mut self, name: &str) -> Result<()> {
        let _ = name;
        Ok(())
    }
}

/// Collector sink: records every notification as a [`SaxEvent`] value.
///
/// Das Rueckgrat der Tests; auch der Ausgangspunkt fuer eigene Sinks, die
/// Events erst einsammeln und dann weiterverarbeiten.
impl SaxSink for Vec<SaxEvent> {
    fn start_document(&mut self) -> Result<()> {
        self.push(SaxEvent::StartDocument);
        Ok(())
    }

    fn end_document(&mut self) -> Result<()> {
        self.push(SaxEvent::EndDocument);
        Ok(())
    }

    fn start_element(&mut self, name: &QName, attributes: &[Attribute]) -> Result<()> {
        self.push(SaxEvent::StartElement {
            name: name.clone(),
            attributes: attributes.to_vec(),
        });
        Ok(())
    }

    fn end_element(&mut self, name: &QName) -> Result<()> {
        self.push(SaxEvent::EndElement { name: name.clone() });
        Ok(())
    }

    fn characters(&mut self, text: &str) -> Result<()> {
        self.push(SaxEvent::Characters(text.into()));
        Ok(())
    }

    fn ignorable_whitespace(&mut self, text: &str) -> Result<()> {
        self.push(SaxEvent::IgnorableWhitespace(text.into()));
        Ok(())
    }

    fn processing_instruction(&mut self, target: &str, data: &str) -> Result<()> {
        self.push(SaxEvent::ProcessingInstruction {
            target: target.into(),
            data: data.into(),
        });
        Ok(())
    }

    fn start_prefix_mapping(&mut self, prefix: &str, uri: &str) -> Result<()> {
        self.push(SaxEvent::StartPrefixMapping {
            prefix: prefix.into(),
            uri: uri.into(),
        });
        Ok(())
    }

    fn end_prefix_mapping(&mut self, prefix: &str) -> Result<()> {
        self.push(SaxEvent::EndPrefixMapping { prefix: prefix.into() });
        Ok(())
    }

    fn document_locator(&mut self, locator: &Locator) -> Result<()> {
        self.push(SaxEvent::DocumentLocator(locator.clone()));
        Ok(())
    }

    fn skipped_entity(&mut self, name: &str) -> Result<()> {
        self.push(SaxEvent::SkippedEntity(name.into()));
        Ok(())
    }
}
