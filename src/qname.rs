//! Qualified names (URI + local name + optional prefix).
//!
//! Namespaces in XML 1.0, Sec. 6.2: two expanded names are equal when URI
//! and local name match; the prefix is presentation only. `PartialEq`, `Eq`
//! and `Hash` therefore ignore the prefix.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// A qualified name with URI, local name, and optional prefix.
#[derive(Clone)]
pub struct QName {
    /// The namespace URI. Empty string means no namespace.
    pub uri: Rc<str>,
    /// The local name.
    pub local_name: Rc<str>,
    /// The optional prefix as written in the document.
    pub prefix: Option<Rc<str>>,
}

impl fmt::Debug for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QName")
            .field("uri", &self.uri)
            .field("local_name", &self.local_name)
            .field("prefix", &self.prefix)
            .finish()
    }
}

impl PartialEq for QName {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri && self.local_name == other.local_name
    }
}

impl Eq for QName {}

impl Hash for QName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uri.hash(state);
        self.local_name.hash(state);
    }
}

/// Display: `prefix:local_name` wenn Prefix vorhanden, sonst nur `local_name`.
impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(pfx) if !pfx.is_empty() => write!(f, "{pfx}:{}", self.local_name),
            _ => f.write_str(&self.local_name),
        }
    }
}

impl QName {
    /// Creates a new QName with the given URI and local name, without prefix.
    pub fn new(uri: impl Into<Rc<str>>, local_name: impl Into<Rc<str>>) -> Self {
        Self {
            uri: uri.into(),
            local_name: local_name.into(),
            prefix: None,
        }
    }

    /// Creates a new QName with URI, local name, and prefix.
    pub fn with_prefix(
        uri: impl Into<Rc<str>>,
        local_name: impl Into<Rc<str>>,
        prefix: impl Into<Rc<str>>,
    ) -> Self {
        Self {
            uri: uri.into(),
            local_name: local_name.into(),
            prefix: Some(prefix.into()),
        }
    }

    /// Erstellt einen QName mit optionalem Prefix (Parser-Pfad).
    pub(crate) fn with_optional_prefix(
        uri: Rc<str>,
        local_name: Rc<str>,
        prefix: Option<Rc<str>>,
    ) -> Self {
        Self { uri, local_name, prefix }
    }

    /// Returns a copy of this name with the local part replaced.
    ///
    /// URI and prefix carry over unchanged, so the qualified form keeps the
    /// original prefix (`mvn:relativePath` becomes `mvn:version`).
    pub fn with_local_name(&self, local_name: impl Into<Rc<str>>) -> Self {
        Self {
            uri: Rc::clone(&self.uri),
            local_name: local_name.into(),
            prefix: self.prefix.clone(),
        }
    }

    /// The qualified form as written in a document (`prefix:local` or `local`).
    pub fn qualified(&self) -> String {
        self.to_string()
    }
}

/// Renames the local part of a raw qualified name, preserving any prefix.
///
/// `rename("mvn:relativePath", "version")` is `"mvn:version"`;
/// `rename("relativePath", "version")` is `"version"`. Pure and total for
/// well-formed qualified names.
pub fn rename(qname: &str, new_local_name: &str) -> String {
    match qname.find(':') {
        Some(pos) => format!("{}:{new_local_name}", &qname[..pos]),
        None => new_local_name.to_string(),
    }
}
