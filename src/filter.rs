//! Parent-declaration rewriting filter.
//!
//! Rewrites the `<relativePath>` child of a `<parent>` element into a
//! `<version>` element, but only when the block declares no version of its
//! own; when it does, the relativePath element is elided entirely. Whether
//! a `<parent>` block carries a `<version>` is only known once the whole
//! subtree has been seen, so every event inside the subtree is buffered and
//! replayed at the closing tag, where the final block state decides each
//! entry's shape.
//!
//! # Beispiel
//!
//! ```
//! use pomfilter::{ParentFilter, SaxSink, QName, SaxEvent};
//!
//! let mapper = |path: &str| (path == "../pom.xml").then(|| "1.2.3".to_string());
//! let mut filter = ParentFilter::new(Vec::new(), mapper);
//!
//! filter.start_element(&QName::new("", "parent"), &[]).unwrap();
//! filter.start_element(&QName::new("", "relativePath"), &[]).unwrap();
//! filter.characters("../pom.xml").unwrap();
//! filter.end_element(&QName::new("", "relativePath")).unwrap();
//! filter.end_element(&QName::new("", "parent")).unwrap();
//!
//! let events = filter.into_inner();
//! assert!(matches!(
//!     &events[1],
//!     SaxEvent::StartElement { name, .. } if &*name.local_name == "version"
//! ));
//! ```

use std::rc::Rc;

use log::debug;

use crate::event::{Attribute, Locator, SaxEvent};
use crate::qname::QName;
use crate::sink::SaxSink;
use crate::Result;

const PARENT: &str = "parent";
const RELATIVE_PATH: &str = "relativePath";
const VERSION: &str = "version";

/// Which child element, if any, is currently open inside the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Other,
    RelativePath,
}

/// One buffered entry, waiting for the block to close.
///
/// The entry captures only "what element-state was I in"; what happens to
/// it is decided by [`ParentScope::disposition`] once the block state is
/// final. Kein Closure-Capture: Daten rein, Entscheidung beim Drain.
#[derive(Debug)]
enum Pending {
    /// Replays unchanged, unless captured inside the relativePath element
    /// of a version-bearing block (then dropped with the element).
    Verbatim { role: Role, event: SaxEvent },
    /// The relativePath start tag, its text, or its end tag. Replays
    /// renamed/substituted, unchanged, or not at all.
    Substitute(SaxEvent),
}

/// Scan context of one `<parent>` subtree.
///
/// Created on entry, consumed on exit; a second block therefore starts from
/// a fresh context and cannot inherit stale state.
#[derive(Debug)]
struct ParentScope {
    role: Role,
    has_version: bool,
    resolved_version: Option<Rc<str>>,
    pending: Vec<Pending>,
}

impl ParentScope {
    fn new() -> Self {
        Self {
            role: Role::Other,
            has_version: false,
            resolved_version: None,
            pending: Vec::new(),
        }
    }

    fn buffer(&mut self, event: SaxEvent) {
        self.pending.push(Pending::Verbatim {
            role: self.role,
            event,
        });
    }

    /// Drain-time dispatch for one entry: `Some(event)` to replay,
    /// `None` to drop. Pure in the final block state.
    fn disposition(&self, entry: Pending) -> Option<SaxEvent> {
        match entry {
            Pending::Verbatim { role, event } => {
                if role == Role::RelativePath && self.has_version {
                    None
                } else {
                    Some(event)
                }
            }
            Pending::Substitute(event) => {
                if self.has_version {
                    return None;
                }
                match &self.resolved_version {
                    Some(version) => Some(substituted(event, version)),
                    None => Some(event),
                }
            }
        }
    }
}

/// The substituted shape of a relativePath event once a version resolved.
///
/// The start tag is renamed and loses its attributes, the text is replaced
/// by the resolved version, the end tag is renamed. Start and end derive
/// their name from the same original, so the pair stays consistent.
fn substituted(event: SaxEvent, version: &Rc<str>) -> SaxEvent {
    match event {
        SaxEvent::StartElement { name, .. } => SaxEvent::StartElement {
            name: name.with_local_name(VERSION),
            attributes: Vec::new(),
        },
        SaxEvent::Characters(_) => SaxEvent::Characters(Rc::clone(version)),
        SaxEvent::EndElement { name } => SaxEvent::EndElement {
            name: name.with_local_name(VERSION),
        },
        // Nur die drei Formen oben werden als Substitute gepuffert.
        other => other,
    }
}

/// Streaming filter: a [`SaxSink`] in front of another [`SaxSink`].
///
/// Outside a `<parent>` block it is a pure pass-through. Inside, events are
/// buffered and replayed in capture order at the closing tag. One instance
/// processes one document at a time.
pub struct ParentFilter<S, F> {
    sink: S,
    mapper: F,
    scope: Option<ParentScope>,
}

impl<S, F> ParentFilter<S, F>
where
    S: SaxSink,
    F: Fn(&str) -> Option<String>,
{
    /// Creates a filter forwarding to `sink`.
    ///
    /// `mapper` turns the text of a relativePath element into a resolved
    /// version, or `None` when the path does not resolve to a known
    /// project. It must not fail; "no mapping" is a value, not an error.
    pub fn new(sink: S, mapper: F) -> Self {
        Self {
            sink,
            mapper,
            scope: None,
        }
    }

    /// Consumes the filter and returns the downstream sink.
    pub fn into_inner(self) -> S {
        self.sink
    }

    /// Executes one event against the sink, applying the locator policy:
    /// locator delivery is advisory and runs outside exception-checked flow
    /// in the contract this filter mirrors, so its sink fault is swallowed.
    fn emit(sink: &mut S, event: &SaxEvent) -> Result<()> {
        match event.execute(sink) {
            Err(_) if matches!(event, SaxEvent::DocumentLocator(_)) => Ok(()),
            result => result,
        }
    }

    /// Buffer-or-immediate: inside a block the event is buffered with the
    /// current role, outside it executes right away.
    fn process(&mut self, event: SaxEvent) -> Result<()> {
        match self.scope.as_mut() {
            Some(scope) => {
                scope.buffer(event);
                Ok(())
            }
            None => Self::emit(&mut self.sink, &event),
        }
    }

    /// Replays the buffered subtree in capture order against the final
    /// block state. A sink error stops the replay; the remaining entries
    /// are abandoned with the scope.
    fn drain(&mut self, mut scope: ParentScope) -> Result<()> {
        debug!(
            "draining <parent> block: {} buffered events, has_version={}, resolved={:?}",
            scope.pending.len(),
            scope.has_version,
            scope.resolved_version,
        );
        for entry in std::mem::take(&mut scope.pending) {
            if let Some(event) = scope.disposition(entry) {
                Self::emit(&mut self.sink, &event)?;
            }
        }
        Ok(())
    }
}

impl<S, F> SaxSink for ParentFilter<S, F>
where
    S: SaxSink,
    F: Fn(&str) -> Option<String>,
{
    fn start_element(&mut self, name: &QName, attributes: &[Attribute]) -> Result<()> {
        if self.scope.is_none() && &*name.local_name == PARENT {
            debug!("entering <parent> block");
            self.scope = Some(ParentScope::new());
        }

        let event = SaxEvent::StartElement {
            name: name.clone(),
            attributes: attributes.to_vec(),
        };
        let Some(scope) = self.scope.as_mut() else {
            return Self::emit(&mut self.sink, &event);
        };

        if &*name.local_name == RELATIVE_PATH {
            scope.role = Role::RelativePath;
            scope.pending.push(Pending::Substitute(event));
            return Ok(());
        }

        scope.role = Role::Other;
        if &*name.local_name == VERSION {
            scope.has_version = true;
        }
        scope.buffer(event);
        Ok(())
    }

    fn end_element(&mut self, name: &QName) -> Result<()> {
        let event = SaxEvent::EndElement { name: name.clone() };
        match self.scope.as_mut() {
            None => return Self::emit(&mut self.sink, &event),
            Some(scope) if &*name.local_name == RELATIVE_PATH => {
                scope.pending.push(Pending::Substitute(event));
                // The element is closed; following siblings are ordinary
                // block content again.
                scope.role = Role::Other;
                return Ok(());
            }
            Some(_) => {}
        }

        if &*name.local_name == PARENT {
            if let Some(scope) = self.scope.take() {
                self.drain(scope)?;
            }
        }
        // The </parent> tag itself follows the drained buffer; with the
        // scope gone it is forwarded immediately. Any other end tag is
        // still buffered.
        self.process(event)
    }

    fn characters(&mut self, text: &str) -> Result<()> {
        if let Some(scope) = self.scope.as_mut() {
            if scope.role == Role::RelativePath {
                scope.resolved_version = (self.mapper)(text).map(Rc::from);
                debug!(
                    "relativePath {:?} resolved to {:?}",
                    text, scope.resolved_version,
                );
                // The original span is captured here; when the mapper
                // declined it is replayed as-is, never re-read.
                scope
                    .pending
                    .push(Pending::Substitute(SaxEvent::Characters(text.into())));
                return Ok(());
            }
        }
        self.process(SaxEvent::Characters(text.into()))
    }

    fn start_document(&mut self) -> Result<()> {
        self.process(SaxEvent::StartDocument)
    }

    fn end_document(&mut self) -> Result<()> {
        self.process(SaxEvent::EndDocument)
    }

    fn ignorable_whitespace(&mut self, text: &str) -> Result<()> {
        self.process(SaxEvent::IgnorableWhitespace(text.into()))
    }

    fn processing_instruction(&mut self, target: &str, data: &str) -> Result<()> {
        self.process(SaxEvent::ProcessingInstruction {
            target: target.into(),
            data: data.into(),
        })
    }

    fn start_prefix_mapping(&mut self, prefix: &str, uri: &str) -> Result<()> {
        self.process(SaxEvent::StartPrefixMapping {
            prefix: prefix.into(),
            uri: uri.into(),
        })
    }

    fn end_prefix_mapping(&mut self, prefix: &str) -> Result<()> {
        self.process(SaxEvent::EndPrefixMapping { prefix: prefix.into() })
    }

    fn document_locator(&mut self, locator: &Locator) -> Result<()> {
        self.process(SaxEvent::DocumentLocator(locator.clone()))
    }

    fn skipped_entity(&mut self, name: &str) -> Result<()> {
        self.process(SaxEvent::SkippedEntity(name.into()))
    }
}
