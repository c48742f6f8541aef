//! Filesystem version lookup for relativePath targets.
//!
//! The production mapper behind the rewrite: a relativePath points at
//! another project descriptor, and the version substituted into the
//! `<parent>` block is whatever that descriptor declares. Declining is
//! normal operation (missing file, unparsable file, no version), reported
//! as `None` and never as an error.

use std::path::{Path, PathBuf};

use log::debug;

use crate::event::Attribute;
use crate::qname::QName;
use crate::sink::SaxSink;
use crate::reader;
use crate::Result;

/// Resolves the version of the project a relativePath points at.
///
/// The path is taken relative to `base_dir` (the directory of the
/// document being rewritten). A directory target is completed with
/// `pom.xml`, mirroring how the surrounding build tool treats
/// relativePath. An empty or whitespace-only path disables the lookup.
pub fn resolve_version(base_dir: &Path, relative_path: &str) -> Option<String> {
    let trimmed = relative_path.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut target: PathBuf = base_dir.join(trimmed);
    if target.is_dir() {
        target.push("pom.xml");
    }
    let version = version_of(&target);
    debug!(
        "relativePath {trimmed:?} -> {}: version {version:?}",
        target.display()
    );
    version
}

/// Reads the version one project descriptor declares: its own
/// `<version>`, or failing that the inherited `<parent><version>`.
pub fn version_of(pom: &Path) -> Option<String> {
    let file = std::fs::File::open(pom).ok()?;
    let mut probe = VersionProbe::default();
    if let Err(e) = reader::parse(file, &mut probe) {
        debug!("unparsable descriptor {}: {e}", pom.display());
        return None;
    }
    probe.into_version()
}

/// Sink that captures `/project/version` and `/project/parent/version`
/// text while everything else passes by.
#[derive(Default)]
struct VersionProbe {
    open: Vec<String>,
    project_version: Option<String>,
    parent_version: Option<String>,
}

impl VersionProbe {
    fn into_version(self) -> Option<String> {
        self.project_version
            .or(self.parent_version)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn capture_slot(&mut self) -> Option<&mut Option<String>> {
        match self.open.as_slice() {
            [_, second] if second.as_str() == "version" => Some(&mut self.project_version),
            [_, second, third]
                if second.as_str() == "parent" && third.as_str() == "version" =>
            {
                Some(&mut self.parent_version)
            }
            _ => None,
        }
    }
}

impl SaxSink for VersionProbe {
    fn start_element(&mut self, name: &QName, _attributes: &[Attribute]) -> Result<()> {
        self.open.push(name.local_name.to_string());
        Ok(())
    }

    fn end_element(&mut self, _name: &QName) -> Result<()> {
        self.open.pop();
        Ok(())
    }

    fn characters(&mut self, text: &str) -> Result<()> {
        if let Some(slot) = self.capture_slot() {
            slot.get_or_insert_with(String::new).push_str(text);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn test_temp_dir(tag: &str) -> PathBuf {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock before epoch")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "pomfilter-resolver-{tag}-{}-{ts}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn liest_projekt_version() {
        let dir = test_temp_dir("own-version");
        let pom = dir.join("pom.xml");
        fs::write(
            &pom,
            "<project><groupId>g</groupId><version>2.5.0</version></project>",
        )
        .unwrap();
        assert_eq!(version_of(&pom).as_deref(), Some("2.5.0"));
    }

    /// Ohne eigene Version erbt das Projekt die des Parent-Blocks.
    #[test]
    fn faellt_auf_parent_version_zurueck() {
        let dir = test_temp_dir("inherited");
        let pom = dir.join("pom.xml");
        fs::write(
            &pom,
            "<project><parent><groupId>g</groupId><version>3.0.1</version></parent>\
             <artifactId>child</artifactId></project>",
        )
        .unwrap();
        assert_eq!(version_of(&pom).as_deref(), Some("3.0.1"));
    }

    /// Eigene Version gewinnt gegen die geerbte.
    #[test]
    fn eigene_version_gewinnt() {
        let dir = test_temp_dir("precedence");
        let pom = dir.join("pom.xml");
        fs::write(
            &pom,
            "<project><parent><version>1.0</version></parent><version>2.0</version></project>",
        )
        .unwrap();
        assert_eq!(version_of(&pom).as_deref(), Some("2.0"));
    }

    #[test]
    fn version_wird_getrimmt() {
        let dir = test_temp_dir("trim");
        let pom = dir.join("pom.xml");
        fs::write(&pom, "<project><version>\n  4.1  \n</version></project>").unwrap();
        assert_eq!(version_of(&pom).as_deref(), Some("4.1"));
    }

    #[test]
    fn fehlende_datei_lehnt_ab() {
        let dir = test_temp_dir("missing");
        assert_eq!(version_of(&dir.join("nope.xml")), None);
    }

    #[test]
    fn unparsbare_datei_lehnt_ab() {
        let dir = test_temp_dir("garbage");
        let pom = dir.join("pom.xml");
        fs::write(&pom, "this is no xml <").unwrap();
        assert_eq!(version_of(&pom), None);
    }

    #[test]
    fn versionslose_datei_lehnt_ab() {
        let dir = test_temp_dir("versionless");
        let pom = dir.join("pom.xml");
        fs::write(&pom, "<project><artifactId>a</artifactId></project>").unwrap();
        assert_eq!(version_of(&pom), None);
    }

    /// Ein Verzeichnis-Ziel wird mit pom.xml vervollstaendigt.
    #[test]
    fn verzeichnis_ziel_wird_vervollstaendigt() {
        let dir = test_temp_dir("dir-target");
        let parent_dir = dir.join("parent");
        fs::create_dir_all(&parent_dir).unwrap();
        fs::write(
            parent_dir.join("pom.xml"),
            "<project><version>7.7</version></project>",
        )
        .unwrap();
        let child_dir = dir.join("child");
        fs::create_dir_all(&child_dir).unwrap();
        assert_eq!(
            resolve_version(&child_dir, "../parent").as_deref(),
            Some("7.7")
        );
    }

    #[test]
    fn leerer_relative_path_lehnt_ab() {
        let dir = test_temp_dir("empty-path");
        assert_eq!(resolve_version(&dir, ""), None);
        assert_eq!(resolve_version(&dir, "  \n "), None);
    }
}
