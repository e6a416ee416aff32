use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod arith;
mod parse;

/// Small integer calculator.
///
/// Built with the `unittest` feature, `calc --unittest` runs the inline tests
/// declared next to the arithmetic and parsing code and exits with their result.
///
/// EXAMPLES:
///     calc add 2 0x10        Add two operands
///     calc mul -3 1_000      Multiply two operands
///     calc mode              Show whether inline tests are compiled in
///
/// ENVIRONMENT VARIABLES:
///     RUST_LOG          Log filter (default: warn)
///     SELFTEST_ORDER    Test report order: reverse or declaration
///     SELFTEST_COLOR    auto, always or never
#[derive(Parser)]
#[command(name = "calc")]
#[command(version)]
struct Cli {
    /// Run the inline tests instead of a command
    #[arg(long, global = true, hide = true)]
    unittest: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add two operands
    Add {
        #[arg(allow_hyphen_values = true)]
        a: String,
        #[arg(allow_hyphen_values = true)]
        b: String,
    },

    /// Multiply two operands
    Mul {
        #[arg(allow_hyphen_values = true)]
        a: String,
        #[arg(allow_hyphen_values = true)]
        b: String,
    },

    /// Print which test mode this binary was built with
    Mode,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() -> Result<ExitCode> {
    init_tracing();

    let status = selftest::run(std::env::args_os());
    if status.tests_ran() {
        return Ok(status.exit_code());
    }

    let cli = Cli::parse();
    if cli.unittest {
        tracing::debug!("--unittest given but inline tests are stripped from this build");
    }

    match cli.command {
        Some(Commands::Add { a, b }) => {
            let sum = arith::add(parse::operand(&a)?, parse::operand(&b)?)?;
            println!("{}", sum);
        }
        Some(Commands::Mul { a, b }) => {
            let product = arith::mul(parse::operand(&a)?, parse::operand(&b)?)?;
            println!("{}", product);
        }
        Some(Commands::Mode) => {
            let mode = if selftest::ACTIVE {
                "tests-active"
            } else {
                "tests-stripped"
            };
            println!("{}", mode);
        }
        None => Cli::command().print_help()?,
    }

    Ok(ExitCode::SUCCESS)
}
