use clap::Parser;
use rrgchart::cli::{Cli, run};
use rrgchart::logging::{LoggingConfig, init_logging};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_logging(LoggingConfig::from_env().with_verbosity(cli.verbose)) {
        eprintln!("warning: logging disabled: {e}");
    }
    run(cli)
}
