//! SAX events → XML serialization.
//!
//! Terminal sink of the pipeline: writes the event stream back out as XML
//! text on an `io::Write`. Start tags close lazily, so childless elements
//! collapse to `<empty/>`. Prefix mappings become `xmlns` attributes on
//! the next start tag. No XML declaration is written; the event stream
//! carries none.
//!
//! IO faults surface as [`Error::Sink`], the upstream filter's sink-error
//! kind.

use std::io::Write;
use std::rc::Rc;

use memchr::memchr3;

use crate::error::Error;
use crate::event::Attribute;
use crate::qname::QName;
use crate::sink::SaxSink;
use crate::Result;

/// io::Error → Error Konvertierung.
fn io_err(e: std::io::Error) -> Error {
    Error::sink(e)
}

/// Schreibt einen String als Bytes in den Writer.
#[inline]
fn w(writer: &mut impl Write, s: &str) -> Result<()> {
    writer.write_all(s.as_bytes()).map_err(io_err)
}

/// QName als String schreiben (prefix:local oder nur local).
fn write_qname(writer: &mut impl Write, q: &QName) -> Result<()> {
    match &q.prefix {
        Some(pfx) if !pfx.is_empty() => {
            w(writer, pfx)?;
            w(writer, ":")?;
            w(writer, &q.local_name)
        }
        _ => w(writer, &q.local_name),
    }
}

/// Schreibt Text mit `&`, `<`, `>` escaped (memchr-Scan, Borrow-Fast-Path).
fn write_escaped_text(writer: &mut impl Write, text: &str) -> Result<()> {
    let bytes = text.as_bytes();
    let mut pos = 0;
    while let Some(rel) = memchr3(b'&', b'<', b'>', &bytes[pos..]) {
        let idx = pos + rel;
        w(writer, &text[pos..idx])?;
        w(
            writer,
            match bytes[idx] {
                b'&' => "&amp;",
                b'<' => "&lt;",
                _ => "&gt;",
            },
        )?;
        pos = idx + 1;
    }
    w(writer, &text[pos..])
}

/// Schreibt einen Attributwert mit `&`, `<`, `"` escaped.
fn write_escaped_attr(writer: &mut impl Write, value: &str) -> Result<()> {
    let bytes = value.as_bytes();
    let mut pos = 0;
    while let Some(rel) = memchr3(b'&', b'<', b'"', &bytes[pos..]) {
        let idx = pos + rel;
        w(writer, &value[pos..idx])?;
        w(
            writer,
            match bytes[idx] {
                b'&' => "&amp;",
                b'<' => "&lt;",
                _ => "&quot;",
            },
        )?;
        pos = idx + 1;
    }
    w(writer, &value[pos..])
}

/// Serializer sink: SAX events in, XML text out.
pub struct XmlWriter<W: Write> {
    writer: W,
    /// Offener Start-Tag, dessen `>` noch aussteht.
    open_tag: bool,
    /// Prefix-Mappings, die auf den naechsten Start-Tag warten.
    pending_ns: Vec<(Rc<str>, Rc<str>)>,
}

impl<W: Write> XmlWriter<W> {
    /// Creates a serializer writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            open_tag: false,
            pending_ns: Vec::new(),
        }
    }

    /// Consumes the serializer and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn close_open_tag(&mut self) -> Result<()> {
        if self.open_tag {
            w(&mut self.writer, ">")?;
            self.open_tag = false;
        }
        Ok(())
    }
}

impl<W: Write> SaxSink for XmlWriter<W> {
    fn start_element(&mut self, name: &QName, attributes: &[Attribute]) -> Result<()> {
        self.close_open_tag()?;
        w(&mut self.writer, "<")?;
        write_qname(&mut self.writer, name)?;

        for (prefix, uri) in std::mem::take(&mut self.pending_ns) {
            if prefix.is_empty() {
                w(&mut self.writer, " xmlns=\"")?;
            } else {
                w(&mut self.writer, " xmlns:")?;
                w(&mut self.writer, &prefix)?;
                w(&mut self.writer, "=\"")?;
            }
            write_escaped_attr(&mut self.writer, &uri)?;
            w(&mut self.writer, "\"")?;
        }

        for attr in attributes {
            w(&mut self.writer, " ")?;
            write_qname(&mut self.writer, &attr.name)?;
            w(&mut self.writer, "=\"")?;
            write_escaped_attr(&mut self.writer, &attr.value)?;
            w(&mut self.writer, "\"")?;
        }

        self.open_tag = true;
        Ok(())
    }

    fn end_element(&mut self, name: &QName) -> Result<()> {
        if self.open_tag {
            self.open_tag = false;
            return w(&mut self.writer, "/>");
        }
        w(&mut self.writer, "</")?;
        write_qname(&mut self.writer, name)?;
        w(&mut self.writer, ">")
    }

    fn characters(&mut self, text: &str) -> Result<()> {
        self.close_open_tag()?;
        write_escaped_text(&mut self.writer, text)
    }

    fn ignorable_whitespace(&mut self, text: &str) -> Result<()> {
        self.close_open_tag()?;
        w(&mut self.writer, text)
    }

    fn processing_instruction(&mut self, target: &str, data: &str) -> Result<()> {
        self.close_open_tag()?;
        w(&mut self.writer, "<?")?;
        w(&mut self.writer, target)?;
        if !data.is_empty() {
            w(&mut self.writer, " ")?;
            w(&mut self.writer, data)?;
        }
        w(&mut self.writer, "?>")
    }

    fn start_prefix_mapping(&mut self, prefix: &str, uri: &str) -> Result<()> {
        self.pending_ns.push((prefix.into(), uri.into()));
        Ok(())
    }

    fn skipped_entity(&mut self, name: &str) -> Result<()> {
        // Unaufgeloest heisst: als Referenz wieder hinausschreiben.
        self.close_open_tag()?;
        w(&mut self.writer, "&")?;
        w(&mut self.writer, name)?;
        w(&mut self.writer, ";")
    }

    fn end_document(&mut self) -> Result<()> {
        self.close_open_tag()?;
        self.writer.flush().map_err(io_err)
    }
}
