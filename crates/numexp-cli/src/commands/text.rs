//! Text command - normalize a single input

use std::io::Read;

use anyhow::{Context, Result};
use numexp_core::NormalizeNumexp;

pub fn run(normalizer: &NormalizeNumexp, text: Option<&str>, pretty: bool) -> Result<()> {
    let input = match text {
        Some(t) => t.to_string(),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let expressions = normalizer.normalize(input.trim_end_matches('\n'));

    let json = if pretty {
        serde_json::to_string_pretty(&expressions)?
    } else {
        serde_json::to_string(&expressions)?
    };
    println!("{}", json);

    Ok(())
}
