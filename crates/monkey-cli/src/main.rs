use anyhow::Result;
use clap::builder::NonEmptyStringValueParser;
use clap::{Parser, Subcommand};
use monkey_config::Config;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

/// Monkey language interpreter.
///
/// Monkey is a small expression language with first-class functions and
/// closures. This CLI runs source files, starts an interactive REPL, and
/// dumps parsed programs.
///
/// EXAMPLES:
///     monkey run main.mk            Run a program
///     monkey parse main.mk --json   Dump the AST as JSON
///     monkey repl                   Start interactive REPL
///     monkey                        Same as 'monkey repl'
///
/// ENVIRONMENT VARIABLES:
///     MONKEY_JSON            Set to '1' for JSON diagnostics by default
///     MONKEY_NO_HISTORY      Set to '1' to disable REPL history
///     MONKEY_PROMPT          Override the REPL prompt
///     MONKEY_MAX_CALL_DEPTH  Limit nested calls (0 disables the limit)
///     MONKEY_LOG             Log filter, e.g. 'monkey_runtime=debug'
#[derive(Parser)]
#[command(name = "monkey")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Log at debug level (overridden by MONKEY_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Limit nested function calls (0 disables the limit)
    #[arg(long, global = true, value_name = "N")]
    max_call_depth: Option<usize>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a Monkey source file
    ///
    /// Parses and evaluates the file in a fresh environment, then prints
    /// the final value unless it is null. Exits with a failure status if
    /// the file does not parse or evaluation ends in an error.
    ///
    /// EXAMPLES:
    ///     monkey run main.mk              Run a program
    ///     monkey run main.mk --json       Output diagnostics as JSON
    #[command(visible_alias = "r")]
    Run {
        /// Path to the Monkey source file
        file: String,
        /// Output diagnostics in JSON format
        #[arg(long, env = "MONKEY_JSON")]
        json: bool,
    },

    /// Start an interactive REPL
    ///
    /// Bindings persist between lines. Type :help inside the REPL for
    /// the list of commands.
    ///
    /// EXAMPLES:
    ///     monkey repl                 Start REPL
    ///     monkey repl --no-history    Don't save history
    ///     monkey repl --prompt "> "   Use a different prompt
    #[command(visible_alias = "i")]
    Repl {
        /// Disable history persistence
        #[arg(long, env = "MONKEY_NO_HISTORY")]
        no_history: bool,
        /// Prompt shown before each line
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        prompt: Option<String>,
    },

    /// Print the parsed form of a Monkey source file
    ///
    /// Without flags, prints each statement fully parenthesized so operator
    /// precedence is visible. With --json, prints the versioned AST.
    ///
    /// EXAMPLES:
    ///     monkey parse main.mk          Show precedence
    ///     monkey parse main.mk --json   Output AST as JSON
    #[command(visible_alias = "p")]
    Parse {
        /// Path to the Monkey source file
        file: String,
        /// Output the AST (and diagnostics) in JSON format
        #[arg(long, env = "MONKEY_JSON")]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = config::load()?;
    apply_flags(&cli, &mut config);

    match cli.command {
        Some(Commands::Run { file, json }) => commands::run::run(&file, json, &config),
        Some(Commands::Parse { file, json }) => commands::parse::run(&file, json),
        Some(Commands::Repl { no_history, .. }) => commands::repl::run(no_history, &config),
        None => commands::repl::run(false, &config),
    }
}

/// Fold command-line flags over the loaded configuration
///
/// Flags take precedence over every configuration file and variable.
fn apply_flags(cli: &Cli, config: &mut Config) {
    if let Some(depth) = cli.max_call_depth {
        config.interpreter.max_call_depth = depth;
    }
    if let Some(Commands::Repl {
        prompt: Some(prompt),
        ..
    }) = &cli.command
    {
        config.repl.prompt = prompt.clone();
    }
}

/// Install the fmt subscriber on stderr
///
/// MONKEY_LOG wins when set; otherwise `--verbose` selects debug and the
/// default is warn.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("MONKEY_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
