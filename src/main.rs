use anyhow::Context;
use mksc::cli;
use mksc::config::{Config, LoggingConfig};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let mut args = std::env::args_os();
    let argv0 = args.next();
    let config = Config::from_env().with_program_name(argv0.as_deref());

    if let Err(e) = init_tracing(&config.logging) {
        eprintln!("{}: warning: {:#}", config.program_name, e);
    }

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    let code = cli::run(args, &config, &mut stdout.lock(), &mut stderr.lock());
    process::exit(code);
}

/// Internal diagnostics go to stderr; `RUST_LOG` overrides the default level.
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.level)
            .with_context(|| format!("invalid log level '{}'", logging.level))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
}
