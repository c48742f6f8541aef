//! pomfilter CLI — rewrite `<parent><relativePath>` declarations to versions.

use clap::Parser;
use pomfilter::{resolve_version, rewrite};
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(
    name = "pomfilter",
    about = "Rewrite <parent><relativePath> to <version> in POM files"
)]
struct Cli {
    /// Input POM (- for stdin)
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Base directory for resolving relativePath targets
    /// (default: the input file's directory)
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Explicit PATH=VERSION mapping, takes precedence over the
    /// filesystem lookup (repeatable)
    #[arg(long = "map", value_name = "PATH=VERSION")]
    map: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Fehler: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let overrides = parse_overrides(&cli.map)?;

    let base_dir = match (&cli.base_dir, cli.input.as_str()) {
        (Some(dir), _) => Some(dir.clone()),
        (None, "-") => None,
        (None, input) => PathBuf::from(input)
            .parent()
            .map(|p| if p.as_os_str().is_empty() { PathBuf::from(".") } else { p.to_path_buf() }),
    };

    let mapper = move |path: &str| {
        if let Some((_, version)) = overrides.iter().find(|(p, _)| p.as_str() == path.trim()) {
            return Some(version.clone());
        }
        base_dir
            .as_deref()
            .and_then(|dir| resolve_version(dir, path))
    };

    let result = match (cli.input.as_str(), &cli.output) {
        ("-", None) => rewrite(std::io::stdin().lock(), stdout_writer(), mapper),
        ("-", Some(out)) => rewrite(std::io::stdin().lock(), create(out)?, mapper),
        (input, None) => rewrite(open(input)?, stdout_writer(), mapper),
        (input, Some(out)) => rewrite(open(input)?, create(out)?, mapper),
    };
    result.map_err(|e| e.to_string())
}

/// `PATH=VERSION` Paare aus `--map` Argumenten.
fn parse_overrides(maps: &[String]) -> Result<Vec<(String, String)>, String> {
    maps.iter()
        .map(|entry| {
            entry
                .split_once('=')
                .map(|(path, version)| (path.trim().to_string(), version.to_string()))
                .ok_or_else(|| format!("ungueltiges --map Argument '{entry}', erwartet PATH=VERSION"))
        })
        .collect()
}

fn open(path: &str) -> Result<impl Read, String> {
    std::fs::File::open(path).map_err(|e| format!("{path}: {e}"))
}

fn create(path: &PathBuf) -> Result<Box<dyn Write>, String> {
    let file = std::fs::File::create(path).map_err(|e| format!("{}: {e}", path.display()))?;
    Ok(Box::new(std::io::BufWriter::new(file)))
}

fn stdout_writer() -> Box<dyn Write> {
    Box::new(std::io::BufWriter::new(std::io::stdout()))
}
