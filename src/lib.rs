//! pomfilter – streaming rewrite of Maven parent declarations.
//!
//! Rewrites the `<relativePath>` child of a `<parent>` block into a
//! `<version>` element when the block declares no version of its own, and
//! removes it entirely when it does. The document flows through as a SAX
//! event stream; only the `<parent>` subtree is buffered, because the
//! decision depends on content that may follow the relativePath element.
//!
//! # Beispiel
//!
//! ```
//! let xml = "<project><parent>\
//!            <groupId>org.example</groupId>\
//!            <relativePath>../pom.xml</relativePath>\
//!            </parent></project>";
//!
//! let mapper = |path: &str| (path == "../pom.xml").then(|| "1.2.3".to_string());
//! let out = pomfilter::rewrite_str(xml, mapper).unwrap();
//!
//! assert_eq!(
//!     out,
//!     "<project><parent>\
//!      <groupId>org.example</groupId>\
//!      <version>1.2.3</version>\
//!      </parent></project>"
//! );
//! ```

pub mod error;
pub mod event;
pub mod filter;
pub mod qname;
pub mod reader;
pub mod resolver;
pub mod rewrite;
pub mod sink;
pub mod writer;

pub use error::{Error, Result};

// Public API: Event Model
pub use event::{Attribute, Locator, SaxEvent};
pub use qname::QName;
pub use sink::SaxSink;

// Public API: Filter
pub use filter::ParentFilter;

// Public API: Pipeline
pub use reader::{parse, parse_str};
pub use resolver::{resolve_version, version_of};
pub use rewrite::{rewrite, rewrite_file, rewrite_str};
pub use writer::XmlWriter;
