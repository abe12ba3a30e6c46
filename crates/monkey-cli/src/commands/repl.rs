//! REPL command implementation

use anyhow::Result;
use monkey_config::Config;
use monkey_runtime::{Object, ReplCore};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::warn;

/// Run the interactive REPL
///
/// If `no_history` is true, history is neither loaded nor saved, whatever
/// the configuration says.
pub fn run(no_history: bool, config: &Config) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let mut repl = ReplCore::with_config(&config.interpreter);

    let history_path = if no_history || !config.repl.history {
        None
    } else {
        config.repl.history_file.clone()
    };

    if let Some(ref path) = history_path {
        let _ = rl.load_history(path); // Missing file on first run
    }

    println!("Monkey v{} REPL", monkey_runtime::VERSION);
    println!("Type expressions or statements, or :quit to exit");
    println!("Commands: :quit (or :q), :reset, :help, :vars");
    println!();

    loop {
        match rl.readline(&config.repl.prompt) {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                match trimmed {
                    ":quit" | ":q" => {
                        println!("Goodbye!");
                        break;
                    }
                    ":reset" => {
                        repl.reset();
                        println!("REPL state reset");
                        continue;
                    }
                    ":help" | ":h" => {
                        print_help();
                        continue;
                    }
                    ":vars" | ":v" => {
                        print_vars(&repl.bindings());
                        continue;
                    }
                    _ => {}
                }

                let result = repl.eval_line(&line);

                for diag in &result.diagnostics {
                    println!("{}", diag.to_human_string());
                }

                if let Some(value) = result.value {
                    if !value.is_null() {
                        println!("{}", value);
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                println!("Use :quit or :q to exit");
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    if let Some(path) = history_path {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(err) = rl.save_history(&path) {
            warn!(path = %path.display(), %err, "could not save REPL history");
        }
    }

    Ok(())
}

fn print_help() {
    println!("Monkey REPL Commands:");
    println!("  :quit, :q         Exit the REPL");
    println!("  :reset            Clear all bindings");
    println!("  :help, :h         Show this help message");
    println!("  :vars, :v         List bindings and their values");
    println!();
    println!("Examples:");
    println!("  >> let x = 42;");
    println!("  >> let double = fn(n) {{ n * 2 }};");
    println!("  >> double(x)");
}

fn print_vars(bindings: &[(String, Object)]) {
    if bindings.is_empty() {
        println!("No bindings defined.");
        return;
    }

    println!("{:<16} {:<10} value", "name", "type");
    println!("{}", "-".repeat(40));
    for (name, value) in bindings {
        println!("{:<16} {:<10} {}", name, value.type_name(), value);
    }
}
