//! One-call composition of parser, filter, and serializer.
//!
//! Streaming: the input is never materialized as an event list; each
//! parse event runs through the filter into the writer before the next
//! one is read. Only a `<parent>` subtree is ever buffered.

use std::io::{Read, Write};
use std::path::Path;

use crate::filter::ParentFilter;
use crate::resolver;
use crate::writer::XmlWriter;
use crate::{reader, Error, Result};

/// Rewrites one document from `input` to `output` using `mapper`.
pub fn rewrite(
    input: impl Read,
    output: impl Write,
    mapper: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    let mut filter = ParentFilter::new(XmlWriter::new(output), mapper);
    reader::parse(input, &mut filter)
}

/// Rewrites an XML string and returns the transformed document.
pub fn rewrite_str(xml: &str, mapper: impl Fn(&str) -> Option<String>) -> Result<String> {
    let mut filter = ParentFilter::new(XmlWriter::new(Vec::new()), mapper);
    reader::parse_str(xml, &mut filter)?;
    let buf = filter.into_inner().into_inner();
    String::from_utf8(buf).map_err(|_| Error::Sink("output is not valid UTF-8".into()))
}

/// Rewrites a POM file, resolving relativePath targets against the
/// file's own directory.
pub fn rewrite_file(pom: &Path, out: &Path) -> Result<()> {
    let base_dir = pom.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
    let input = std::fs::File::open(pom)
        .map_err(|e| Error::Io(format!("POM oeffnen {}: {e}", pom.display())))?;
    let output = std::fs::File::create(out)
        .map_err(|e| Error::Io(format!("Ausgabe erstellen {}: {e}", out.display())))?;
    rewrite(input, std::io::BufWriter::new(output), move |path| {
        resolver::resolve_version(&base_dir, path)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn test_temp_dir(tag: &str) -> PathBuf {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock before epoch")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "pomfilter-rewrite-{tag}-{}-{ts}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    fn static_mapper(path: &str) -> Option<String> {
        (path == "../pom.xml").then(|| "1.2.3".to_string())
    }

    #[test]
    fn rewrite_str_substituiert() {
        let out = rewrite_str(
            "<project><parent><relativePath>../pom.xml</relativePath></parent></project>",
            static_mapper,
        )
        .unwrap();
        assert_eq!(
            out,
            "<project><parent><version>1.2.3</version></parent></project>"
        );
    }

    #[test]
    fn rewrite_str_laesst_fremde_dokumente_unveraendert() {
        let xml = "<project><artifactId>lib</artifactId></project>";
        assert_eq!(rewrite_str(xml, static_mapper).unwrap(), xml);
    }

    #[test]
    fn rewrite_str_meldet_parse_fehler() {
        let err = rewrite_str("<project>", static_mapper).unwrap_err();
        assert!(matches!(err, Error::XmlParse(_)));
    }

    /// Komplettpfad: Kind-POM + Parent-POM auf der Platte, Aufloesung
    /// ueber das Dateisystem.
    #[test]
    fn rewrite_file_loest_ueber_dateisystem_auf() {
        let dir = test_temp_dir("fs");
        let parent_dir = dir.join("parent");
        let child_dir = dir.join("parent").join("child");
        fs::create_dir_all(&child_dir).unwrap();
        fs::write(
            parent_dir.join("pom.xml"),
            "<project><groupId>g</groupId><artifactId>parent</artifactId>\
             <version>5.0.1</version></project>",
        )
        .unwrap();
        let child = child_dir.join("pom.xml");
        fs::write(
            &child,
            "<project><parent><groupId>g</groupId><artifactId>parent</artifactId>\
             <relativePath>..</relativePath></parent><artifactId>child</artifactId></project>",
        )
        .unwrap();

        let out = child_dir.join("pom.rewritten.xml");
        rewrite_file(&child, &out).unwrap();
        let result = fs::read_to_string(&out).unwrap();
        assert!(result.contains("<version>5.0.1</version>"), "{result}");
        assert!(!result.contains("relativePath"), "{result}");
    }

    #[test]
    fn rewrite_file_fehlende_eingabe() {
        let dir = test_temp_dir("missing-input");
        let err = rewrite_file(&dir.join("nope.xml"), &dir.join("out.xml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
