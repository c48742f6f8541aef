//! Minimal-Demo: ein POM umschreiben und das Ergebnis ausgeben.
//!
//!     cargo run --example rewrite_pom -- path/to/pom.xml

use std::path::PathBuf;

fn main() {
    let Some(path) = std::env::args().nth(1).map(PathBuf::from) else {
        eprintln!("usage: rewrite_pom <pom.xml>");
        std::process::exit(2);
    };

    let base_dir = path
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let input = std::fs::File::open(&path).expect("open POM");
    let stdout = std::io::stdout();

    pomfilter::rewrite(input, stdout.lock(), |rel| {
        pomfilter::resolve_version(&base_dir, rel)
    })
    .expect("rewrite POM");
    println!();
}
