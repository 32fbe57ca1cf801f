use brandcheck::cli::{Cli, CliHandler};
use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Clap prints usage and exits on bad arguments
    let cli = Cli::parse();

    init_tracing(cli.is_verbose(), cli.is_debug());

    let exit_code = match CliHandler::new(cli).run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ {}", e);
            e.kind().exit_code()
        }
    };

    process::exit(exit_code);
}

fn init_tracing(verbose: bool, debug: bool) {
    let default_directive = if debug {
        "brandcheck=trace"
    } else if verbose {
        "brandcheck=debug"
    } else {
        "brandcheck=info"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
