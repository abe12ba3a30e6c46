//! Parse command - show how a file parses

use super::print_diagnostics;
use anyhow::{Context, Result};
use monkey_runtime::{parse_source, VersionedProgram};
use std::fs;

/// Print the parsed program
///
/// The default output is the fully parenthesized rendering, one statement
/// per line. With `json`, the versioned AST is printed instead.
pub fn run(file_path: &str, json: bool) -> Result<()> {
    let source = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read source file: {}", file_path))?;

    let (program, diagnostics) = parse_source(&source);

    if !diagnostics.is_empty() {
        let diagnostics: Vec<_> = diagnostics
            .into_iter()
            .map(|d| d.with_file(file_path))
            .collect();
        print_diagnostics(&diagnostics, json);
        return Err(anyhow::anyhow!("Parse errors in {}", file_path));
    }

    if json {
        let versioned = VersionedProgram::new(program);
        println!("{}", versioned.to_json()?);
    } else if !program.statements.is_empty() {
        println!("{}", program);
    }

    Ok(())
}
