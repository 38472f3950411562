use clap::Parser;
use venv_cleaner::cli::{
    install_interrupt_handler, report_cancelled, Cancelled, Cli, CANCELLED_EXIT_CODE,
};

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(err) = install_interrupt_handler() {
        tracing::warn!("{:#}", err);
    }

    if let Err(err) = cli.run() {
        if err.is::<Cancelled>() {
            let _ = report_cancelled(&mut std::io::stdout());
            std::process::exit(CANCELLED_EXIT_CODE);
        }

        eprintln!("\nAn error occurred: {:#}", err);
        std::process::exit(1);
    }
}
