//! Integrationstests fuer den XML-Writer (SAX Events → XML).

use pomfilter::{Attribute, QName, SaxEvent, XmlWriter};

// ============================================================================
// Hilfsfunktionen
// ============================================================================

fn render(events: &[SaxEvent]) -> String {
    let mut writer = XmlWriter::new(Vec::new());
    for event in events {
        event.execute(&mut writer).unwrap();
    }
    String::from_utf8(writer.into_inner()).unwrap()
}

fn se(local: &str) -> SaxEvent {
    SaxEvent::StartElement {
        name: QName::new("", local),
        attributes: Vec::new(),
    }
}

fn se_at(local: &str, attrs: &[(&str, &str)]) -> SaxEvent {
    SaxEvent::StartElement {
        name: QName::new("", local),
        attributes: attrs
            .iter()
            .map(|(name, value)| Attribute::new(*name, *value))
            .collect(),
    }
}

fn se_ns(uri: &str, local: &str, prefix: &str) -> SaxEvent {
    SaxEvent::StartElement {
        name: QName::with_prefix(uri, local, prefix),
        attributes: Vec::new(),
    }
}

fn ee(local: &str) -> SaxEvent {
    SaxEvent::EndElement {
        name: QName::new("", local),
    }
}

fn ee_ns(uri: &str, local: &str, prefix: &str) -> SaxEvent {
    SaxEvent::EndElement {
        name: QName::with_prefix(uri, local, prefix),
    }
}

fn ch(text: &str) -> SaxEvent {
    SaxEvent::Characters(text.into())
}

fn pm(prefix: &str, uri: &str) -> SaxEvent {
    SaxEvent::StartPrefixMapping {
        prefix: prefix.into(),
        uri: uri.into(),
    }
}

// ============================================================================
// Grundformen
// ============================================================================

#[test]
fn element_mit_text() {
    let xml = render(&[se("version"), ch("1.2.3"), ee("version")]);
    assert_eq!(xml, "<version>1.2.3</version>");
}

/// Kinderlose Elemente kollabieren zum Empty-Element-Tag.
#[test]
fn leeres_element_kollabiert() {
    let xml = render(&[se("relativePath"), ee("relativePath")]);
    assert_eq!(xml, "<relativePath/>");
}

#[test]
fn verschachtelte_elemente() {
    let xml = render(&[
        se("parent"),
        se("groupId"),
        ch("org.example"),
        ee("groupId"),
        se("version"),
        ee("version"),
        ee("parent"),
    ]);
    assert_eq!(
        xml,
        "<parent><groupId>org.example</groupId><version/></parent>"
    );
}

#[test]
fn attribute_werden_geschrieben() {
    let xml = render(&[
        se_at("relativePath", &[("combine.self", "override")]),
        ch("../pom.xml"),
        ee("relativePath"),
    ]);
    assert_eq!(
        xml,
        "<relativePath combine.self=\"override\">../pom.xml</relativePath>"
    );
}

// ============================================================================
// Escaping
// ============================================================================

#[test]
fn text_wird_escaped() {
    let xml = render(&[se("v"), ch("a < b & c > d"), ee("v")]);
    assert_eq!(xml, "<v>a &lt; b &amp; c &gt; d</v>");
}

#[test]
fn attributwert_wird_escaped() {
    let xml = render(&[se_at("v", &[("note", "say \"hi\" & <go>")]), ee("v")]);
    assert_eq!(xml, "<v note=\"say &quot;hi&quot; &amp; &lt;go>\"/>");
}

// ============================================================================
// Namespaces
// ============================================================================

/// Prefix-Mappings werden als xmlns-Attribute am naechsten Start-Tag
/// ausgegeben.
#[test]
fn prefix_mapping_wird_xmlns_attribut() {
    let uri = "http://maven.apache.org/POM/4.0.0";
    let xml = render(&[
        pm("mvn", uri),
        se_ns(uri, "project", "mvn"),
        ee_ns(uri, "project", "mvn"),
    ]);
    assert_eq!(
        xml,
        "<mvn:project xmlns:mvn=\"http://maven.apache.org/POM/4.0.0\"/>"
    );
}

#[test]
fn default_namespace_wird_xmlns() {
    let uri = "http://maven.apache.org/POM/4.0.0";
    let xml = render(&[
        pm("", uri),
        SaxEvent::StartElement {
            name: QName::new(uri, "project"),
            attributes: Vec::new(),
        },
        SaxEvent::EndElement {
            name: QName::new(uri, "project"),
        },
    ]);
    assert_eq!(
        xml,
        "<project xmlns=\"http://maven.apache.org/POM/4.0.0\"/>"
    );
}

// ============================================================================
// Sonstige Notifications
// ============================================================================

#[test]
fn processing_instruction_formen() {
    let mit_daten = render(&[
        se("p"),
        SaxEvent::ProcessingInstruction {
            target: "m2e".into(),
            data: "ignore".into(),
        },
        ee("p"),
    ]);
    assert_eq!(mit_daten, "<p><?m2e ignore?></p>");

    let ohne_daten = render(&[
        se("p"),
        SaxEvent::ProcessingInstruction {
            target: "marker".into(),
            data: "".into(),
        },
        ee("p"),
    ]);
    assert_eq!(ohne_daten, "<p><?marker?></p>");
}

#[test]
fn skipped_entity_wird_referenz() {
    let xml = render(&[se("v"), SaxEvent::SkippedEntity("nbsp".into()), ee("v")]);
    assert_eq!(xml, "<v>&nbsp;</v>");
}

#[test]
fn ignorable_whitespace_wird_roh_geschrieben() {
    let xml = render(&[
        se("a"),
        SaxEvent::IgnorableWhitespace("\n  ".into()),
        ee("a"),
    ]);
    assert_eq!(xml, "<a>\n  </a>");
}

/// Locator- und Dokumentgrenzen erzeugen keine Ausgabe.
#[test]
fn dokumentgrenzen_sind_stumm() {
    let xml = render(&[
        SaxEvent::DocumentLocator(pomfilter::Locator::default()),
        SaxEvent::StartDocument,
        se("p"),
        ee("p"),
        SaxEvent::EndDocument,
    ]);
    assert_eq!(xml, "<p/>");
}
