//! CLI tool for extracting metadata from Office documents.

use anyhow::{Context, Result};
use clap::Parser;
use office_meta_core::{Extraction, FileSource};
use office_meta_ooxml::MetadataExtractor;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Extract custom and core metadata from .docx, .xlsx and .pptx files.
#[derive(Parser, Debug)]
#[command(name = "office-meta")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// A folder to scan, or one or more document paths
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Write the JSON report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit single-line JSON
    #[arg(short, long)]
    compact: bool,

    /// Exit with an error if any file could not be fully read
    #[arg(short, long)]
    strict: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let source = source_from_inputs(&args.input);
    let extractor = MetadataExtractor::new(source).context("Failed to resolve input documents")?;

    if args.verbose {
        eprintln!("Processing {} documents", extractor.files().len());
    }

    let extraction = extractor.extract();
    match &args.output {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
            write_report(BufWriter::new(file), &extraction, args.compact)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
            if args.verbose {
                eprintln!("Written to: {}", path.display());
            }
        }
        None => write_report(io::stdout().lock(), &extraction, args.compact)
            .context("Failed to write to stdout")?,
    }

    for diagnostic in &extraction.diagnostics {
        eprintln!("warning: {}", diagnostic);
    }

    if args.strict && !extraction.diagnostics.is_empty() {
        anyhow::bail!(
            "{} problem(s) while reading {} documents",
            extraction.diagnostics.len(),
            extraction.results.len()
        );
    }

    Ok(())
}

/// A single directory argument is scanned; anything else is a file list.
fn source_from_inputs(inputs: &[PathBuf]) -> FileSource {
    match inputs {
        [single] if single.is_dir() => FileSource::Directory(single.clone()),
        paths => FileSource::Paths(paths.to_vec()),
    }
}

fn write_report<W: Write>(mut writer: W, extraction: &Extraction, compact: bool) -> Result<()> {
    if compact {
        serde_json::to_writer(&mut writer, &extraction.results)?;
    } else {
        serde_json::to_writer_pretty(&mut writer, &extraction.results)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_directory_is_scanned() {
        let dir = std::env::temp_dir();
        assert_eq!(
            source_from_inputs(&[dir.clone()]),
            FileSource::Directory(dir)
        );
    }

    #[test]
    fn test_files_become_path_list() {
        let inputs = vec![PathBuf::from("a.docx"), PathBuf::from("b.pptx")];
        assert_eq!(source_from_inputs(&inputs), FileSource::Paths(inputs.clone()));
    }

    #[test]
    fn test_compact_report() {
        let mut out = Vec::new();
        write_report(&mut out, &Extraction::default(), true).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{}\n");
    }
}
