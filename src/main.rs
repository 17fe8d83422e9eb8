// Entry point: parse flags, set up logging, print the dashboard.
//
// Logs and interactive questions go to stderr so stdout only carries the
// dashboard (or its JSON form).
use clap::Parser;
use covid_dashboard::cli::{self, Args};
use std::io;
use std::process;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("covid_dashboard={}", args.log_level())));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(io::stderr),
        )
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(&args);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();
    let mut prompts = io::stderr().lock();
    if let Err(e) = cli::run(&args, &mut input, &mut out, &mut prompts) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
