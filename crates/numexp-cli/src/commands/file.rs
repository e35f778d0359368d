//! File command - normalize a text file line by line

use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use console::{style, Term};
use numexp_core::NormalizeNumexp;

pub fn run(
    normalizer: &NormalizeNumexp,
    path: &str,
    pretty: bool,
    skip_empty: bool,
) -> Result<()> {
    let term = Term::stdout();
    let file_path = Path::new(path);

    if !file_path.exists() {
        anyhow::bail!("File not found: {}", path);
    }

    let file = std::fs::File::open(file_path)
        .with_context(|| format!("Failed to open file: {}", path))?;
    let reader = BufReader::new(file);

    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", index + 1))?;
        let expressions = normalizer.normalize(&line);

        if skip_empty && expressions.is_empty() {
            continue;
        }

        term.write_line(&format!(
            "{} {}",
            style(format!("[{}]", index + 1)).dim(),
            line
        ))?;

        let json = if pretty {
            serde_json::to_string_pretty(&expressions)?
        } else {
            serde_json::to_string(&expressions)?
        };
        term.write_line(&json)?;
    }

    Ok(())
}
