pub mod parse;
pub mod repl;
pub mod run;

use monkey_runtime::Diagnostic;

/// Print diagnostics to stderr, as JSON lines or human-readable reports
pub(crate) fn print_diagnostics(diagnostics: &[Diagnostic], json: bool) {
    for diag in diagnostics {
        if json {
            match diag.to_json_compact() {
                Ok(line) => eprintln!("{}", line),
                Err(_) => eprintln!("{}", diag.to_human_string()),
            }
        } else {
            eprintln!("{}", diag.to_human_string());
        }
    }
}
