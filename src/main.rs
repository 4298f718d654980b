//! CLI entry point.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "wrapgen",
    about = "Generate language bindings from native header files"
)]
struct Cli {
    /// Path to the generator settings file (JSON).
    #[arg(short, long)]
    config: PathBuf,

    /// Header files to parse (glob patterns supported).
    headers: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let cli = Cli::parse();
    let config = wrapgen::Config::from_file(&cli.config).context("loading configuration")?;

    let headers = expand_globs(&cli.headers)?;
    if headers.is_empty() {
        bail!("no header files matched");
    }

    wrapgen::run(&config, &headers).context("generation failed")
}

fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let entries =
            glob::glob(pattern).with_context(|| format!("bad glob pattern: {pattern}"))?;
        for entry in entries {
            files.push(entry.with_context(|| format!("reading glob match for {pattern}"))?);
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}
