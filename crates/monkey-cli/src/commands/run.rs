//! Run command - execute Monkey source files

use super::print_diagnostics;
use anyhow::{Context, Result};
use monkey_config::Config;
use monkey_runtime::{Monkey, Object};
use std::fs;
use tracing::debug;

/// Run a Monkey source file
///
/// Evaluates the file in a fresh environment and prints the result to
/// stdout unless it is null.
pub fn run(file_path: &str, json: bool, config: &Config) -> Result<()> {
    let source = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read source file: {}", file_path))?;

    let runtime = Monkey::with_config(&config.interpreter);
    match runtime.eval(&source) {
        Ok(Object::Error(err)) => {
            if json {
                let report = serde_json::json!({
                    "kind": "runtime_error",
                    "file": file_path,
                    "message": err.to_string(),
                });
                eprintln!("{}", report);
            } else {
                eprintln!("{}", Object::Error(err));
            }
            Err(anyhow::anyhow!("Evaluation of {} failed", file_path))
        }
        Ok(value) => {
            debug!(result = %value.type_name(), "program finished");
            if !value.is_null() {
                println!("{}", value);
            }
            Ok(())
        }
        Err(diagnostics) => {
            let diagnostics: Vec<_> = diagnostics
                .into_iter()
                .map(|d| d.with_file(file_path))
                .collect();
            print_diagnostics(&diagnostics, json);
            Err(anyhow::anyhow!(
                "Failed to parse {} ({} error(s))",
                file_path,
                diagnostics.len()
            ))
        }
    }
}
