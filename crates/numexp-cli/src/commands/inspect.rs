//! Inspect command - dump one extraction stage before filtering

use anyhow::Result;
use console::{style, Term};
use numexp_core::NormalizeNumexp;

pub fn run(normalizer: &NormalizeNumexp, text: &str, stage: &str) -> Result<()> {
    let term = Term::stdout();

    term.write_line(&format!(
        "{} stage on {:?}",
        style(stage).cyan().bold(),
        text
    ))?;

    match stage {
        "numerical" => {
            for expr in normalizer.process_numerical(text) {
                term.write_line(&format!("{:#?}", expr))?;
            }
        }
        "abstime" => {
            for expr in normalizer.process_abstime(text) {
                term.write_line(&format!("{:#?}", expr))?;
            }
        }
        "reltime" => {
            for expr in normalizer.process_reltime(text) {
                term.write_line(&format!("{:#?}", expr))?;
            }
        }
        "duration" => {
            for expr in normalizer.process_duration(text) {
                term.write_line(&format!("{:#?}", expr))?;
            }
        }
        other => {
            anyhow::bail!(
                "Unknown stage: {} (expected numerical, abstime, reltime or duration)",
                other
            );
        }
    }

    Ok(())
}
