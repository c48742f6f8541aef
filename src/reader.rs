//! XML parsing into SAX events.
//!
//! quick-xml based push driver: parses a document and feeds a [`SaxSink`]
//! with the event stream, in document order. Namespace declarations are
//! surfaced as prefix-mapping notifications immediately before the owning
//! start-element (and unwound after its end-element). Text, CDATA and
//! character references coalesce into one characters notification.
//!
//! Comments and DOCTYPE have no ContentHandler counterpart and are
//! skipped; unknown entity references are reported as skipped entities.

use std::io::{BufRead, Read};
use std::rc::Rc;

use memchr::memchr;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesCData, BytesStart, BytesText, Event};
use quick_xml::name::{QName as RawName, ResolveResult};
use quick_xml::reader::NsReader;

use crate::error::Error;
use crate::event::Attribute;
use crate::qname::QName;
use crate::sink::SaxSink;
use crate::Result;

/// Parses a document from a byte stream into `sink`.
pub fn parse(input: impl Read, sink: &mut impl SaxSink) -> Result<()> {
    let mut reader = NsReader::from_reader(std::io::BufReader::new(input));
    run(&mut reader, sink)
}

/// Parses a document from a string into `sink`.
///
/// XML 1.0 Sec. 2.11: Zeilenumbrueche werden vorab normalisiert.
pub fn parse_str(xml: &str, sink: &mut impl SaxSink) -> Result<()> {
    let normalized = normalize_line_endings(xml);
    let mut reader = NsReader::from_reader(std::io::Cursor::new(normalized.as_bytes()));
    run(&mut reader, sink)
}

fn run<R: BufRead>(reader: &mut NsReader<R>, sink: &mut impl SaxSink) -> Result<()> {
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    // Offene Elemente: Name + die auf ihnen deklarierten Prefixes.
    let mut open_elements: Vec<(QName, Vec<Rc<str>>)> = Vec::new();
    // Text-Coalescing: gepufferte Zeichen werden vor jedem Markup geflusht.
    let mut pending_text: Option<String> = None;

    sink.start_document()?;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                flush_text(&mut pending_text, sink)?;
                handle_start(reader, e, false, sink, &mut open_elements)?;
            }
            Ok(Event::Empty(e)) => {
                flush_text(&mut pending_text, sink)?;
                handle_start(reader, e, true, sink, &mut open_elements)?;
            }
            Ok(Event::End(_)) => {
                flush_text(&mut pending_text, sink)?;
                let Some((name, prefixes)) = open_elements.pop() else {
                    return Err(Error::XmlParse("unexpected end tag at depth 0".to_string()));
                };
                sink.end_element(&name)?;
                for prefix in prefixes.iter().rev() {
                    sink.end_prefix_mapping(prefix)?;
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(text) = decode_text(e)? {
                    collect_text(&mut pending_text, open_elements.len(), text, sink)?;
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(text) = decode_cdata(e)? {
                    collect_text(&mut pending_text, open_elements.len(), text, sink)?;
                }
            }
            Ok(Event::GeneralRef(e)) => {
                let name = decode_bytes(e.as_ref())?;
                if let Some(ch) = resolve_char_reference(&name) {
                    collect_text(
                        &mut pending_text,
                        open_elements.len(),
                        ch.to_string(),
                        sink,
                    )?;
                } else if let Some(predef) = resolve_predefined_entity(&name) {
                    collect_text(
                        &mut pending_text,
                        open_elements.len(),
                        predef.to_string(),
                        sink,
                    )?;
                } else {
                    // Ohne DTD-Verarbeitung bleibt die Entity unaufgeloest.
                    flush_text(&mut pending_text, sink)?;
                    sink.skipped_entity(&name)?;
                }
            }
            Ok(Event::PI(e)) => {
                flush_text(&mut pending_text, sink)?;
                let target = decode_bytes(e.target())?;
                let data = decode_bytes(e.content())?;
                // XML 1.0 Sec. 2.6: S zwischen Target und Daten ist
                // Separator, nicht Teil der Daten.
                sink.processing_instruction(&target, data.trim_start())?;
            }
            Ok(Event::Comment(_)) => {
                // Kein ContentHandler-Gegenstueck; Coalescing bleibt aktiv.
            }
            Ok(Event::DocType(_)) => {
                // DTD-Verarbeitung ist kein Ziel dieses Parsers.
            }
            Ok(Event::Decl(_)) => {
                // StartDocument already delivered.
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlParse(format!(
                    "parse error at byte {}: {e}",
                    reader.buffer_position()
                )));
            }
        }

        buf.clear();
    }

    if let Some((name, _)) = open_elements.last() {
        return Err(Error::XmlParse(format!(
            "unexpected end of input, <{name}> is still open"
        )));
    }
    flush_text(&mut pending_text, sink)?;
    sink.end_document()
}

/// Flusht gepufferte Zeichen als eine characters-Notification.
fn flush_text(pending: &mut Option<String>, sink: &mut impl SaxSink) -> Result<()> {
    if let Some(text) = pending.take() {
        sink.characters(&text)?;
    }
    Ok(())
}

/// Haengt Text an den Puffer an. Auf Dokumentebene ist nur Whitespace
/// erlaubt und wird sofort als ignorable gemeldet.
fn collect_text(
    pending: &mut Option<String>,
    depth: usize,
    text: String,
    sink: &mut impl SaxSink,
) -> Result<()> {
    if depth == 0 {
        if text.trim().is_empty() {
            return sink.ignorable_whitespace(&text);
        }
        return Err(Error::XmlParse(
            "character data outside root element".to_string(),
        ));
    }
    match pending {
        Some(existing) => existing.push_str(&text),
        None => *pending = Some(text),
    }
    Ok(())
}

fn handle_start<R: BufRead>(
    reader: &NsReader<R>,
    e: BytesStart<'_>,
    is_empty: bool,
    sink: &mut impl SaxSink,
    open_elements: &mut Vec<(QName, Vec<Rc<str>>)>,
) -> Result<()> {
    let name = resolve_element_name(reader, e.name())?;

    let mut declared: Vec<(Rc<str>, Rc<str>)> = Vec::new();
    let mut attributes: Vec<Attribute> = Vec::new();

    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(|er| Error::XmlParse(er.to_string()))?;
        let key = attr.key.as_ref();

        if key == b"xmlns" || key.starts_with(b"xmlns:") {
            let prefix = if key == b"xmlns" {
                ""
            } else {
                std::str::from_utf8(&key[6..]).map_err(|er| Error::XmlParse(er.to_string()))?
            };
            let uri = attr
                .unescape_value()
                .map_err(|er| Error::XmlParse(er.to_string()))?;
            declared.push((prefix.into(), uri.as_ref().into()));
            continue;
        }

        let attr_name = resolve_attribute_name(reader, attr.key)?;
        let value = attr
            .unescape_value()
            .map_err(|er| Error::XmlParse(er.to_string()))?;
        let value = normalize_line_endings(value.as_ref());
        attributes.push(Attribute {
            name: attr_name,
            value: value.as_ref().into(),
        });
    }

    // SAX-Reihenfolge: erst die Mappings, dann das Element.
    for (prefix, uri) in &declared {
        sink.start_prefix_mapping(prefix, uri)?;
    }
    sink.start_element(&name, &attributes)?;

    let prefixes: Vec<Rc<str>> = declared.into_iter().map(|(prefix, _)| prefix).collect();
    if is_empty {
        sink.end_element(&name)?;
        for prefix in prefixes.iter().rev() {
            sink.end_prefix_mapping(prefix)?;
        }
    } else {
        open_elements.push((name, prefixes));
    }
    Ok(())
}

fn resolve_element_name<R: BufRead>(reader: &NsReader<R>, raw: RawName<'_>) -> Result<QName> {
    let (ns, local) = reader.resolver().resolve_element(raw);
    let uri = resolve_to_uri(ns)?;
    let local_name = decode_bytes(local.as_ref())?;
    let prefix = match split_prefix(raw.as_ref()) {
        Some(p) => Some(decode_bytes(p)?),
        None => None,
    };
    Ok(QName::with_optional_prefix(
        uri.into(),
        local_name.into(),
        prefix.map(Into::into),
    ))
}

fn resolve_attribute_name<R: BufRead>(reader: &NsReader<R>, raw: RawName<'_>) -> Result<QName> {
    let (ns, local) = reader.resolver().resolve_attribute(raw);
    let uri = resolve_to_uri(ns)?;
    let local_name = decode_bytes(local.as_ref())?;
    let prefix = match split_prefix(raw.as_ref()) {
        Some(p) => Some(decode_bytes(p)?),
        None => None,
    };
    Ok(QName::with_optional_prefix(
        uri.into(),
        local_name.into(),
        prefix.map(Into::into),
    ))
}

fn resolve_to_uri(ns: ResolveResult<'_>) -> Result<String> {
    match ns {
        ResolveResult::Bound(ns) => decode_bytes(ns.as_ref()),
        ResolveResult::Unbound => Ok(String::new()),
        ResolveResult::Unknown(prefix) => Err(Error::XmlParse(format!(
            "unknown namespace prefix '{}'",
            String::from_utf8_lossy(&prefix)
        ))),
    }
}

fn split_prefix(name: &[u8]) -> Option<&[u8]> {
    let pos = name.iter().position(|b| *b == b':')?;
    Some(&name[..pos])
}

fn decode_bytes(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|er| Error::XmlParse(er.to_string()))
}

fn decode_text(e: BytesText<'_>) -> Result<Option<String>> {
    let raw = std::str::from_utf8(&e).map_err(|er| Error::XmlParse(er.to_string()))?;
    let text = quick_xml::escape::unescape(raw)
        .map_err(|er| Error::XmlParse(er.to_string()))?;
    if text.is_empty() {
        Ok(None)
    } else {
        Ok(Some(normalize_line_endings(text.as_ref()).into_owned()))
    }
}

fn decode_cdata(e: BytesCData<'_>) -> Result<Option<String>> {
    let text = decode_bytes(e.into_inner().as_ref())?;
    if text.is_empty() {
        Ok(None)
    } else {
        Ok(Some(normalize_line_endings(&text).into_owned()))
    }
}

/// XML 1.0 Sec. 2.11: \r\n -> \n, alleinstehende \r -> \n
fn normalize_line_endings(s: &str) -> std::borrow::Cow<'_, str> {
    if memchr(b'\r', s.as_bytes()).is_none() {
        return std::borrow::Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\r' {
            if matches!(chars.peek(), Some('\n')) {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(ch);
        }
    }
    std::borrow::Cow::Owned(out)
}

/// Loest eine Zeichenreferenz (`#65`, `#x41`) zu einem char auf.
fn resolve_char_reference(name: &str) -> Option<char> {
    let digits = name.strip_prefix('#')?;
    let code = match digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<u32>().ok()?,
    };
    char::from_u32(code)
}
