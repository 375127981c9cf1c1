use std::{env, io, process::ExitCode};

use swmi::{cli, fmt::Formatter, platform};
use tracing::Level;

fn main() -> ExitCode {
    let mut stdout = io::stdout().lock();

    let args = match cli::parse(env::args_os(), &mut stdout) {
        Ok(args) => args,
        Err(outcome) => return outcome.into(),
    };

    let max_level = if args.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_writer(io::stderr)
        .event_format(Formatter::new())
        .init();

    cli::run(&args, platform::connect, &mut stdout).into()
}
