use std::{ffi::OsString, io::Write, process::ExitCode};

use anyhow::Context;
use clap::{error::ErrorKind, Parser};
use owo_colors::{OwoColorize, Stream};
use tracing::{debug, warn, Level};

use crate::{
    input::InputSource,
    monitor::{self, LogicalMonitorHandle, PhysicalMonitor, Platform},
    Error, Result,
};

const USAGE: &str = "Usage: swmi <MonitorName> <InputSource>";

/// Switch a monitor's input over DDC/CI
#[derive(Debug, Parser)]
#[command(name = "swmi", version)]
pub struct Args {
    /// Part of the monitor's description (case-sensitive)
    #[arg(allow_hyphen_values = true)]
    pub monitor_name: String,

    /// One of Hdmi1, Hdmi2, DisplayPort, UsbC
    #[arg(allow_hyphen_values = true)]
    pub input_source: String,

    /// Anything after the input source is ignored.
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub extra: Vec<String>,

    /// Log debug information to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Don't switch to an input the monitor's capabilities leave out
    #[arg(long)]
    pub check_capabilities: bool,
}

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Switched,
    /// Help or version information was printed.
    Info,
    Usage,
    NotFound,
    PlatformError,
}

impl Outcome {
    pub fn code(self) -> u8 {
        match self {
            Outcome::Switched | Outcome::Info => 0,
            Outcome::Usage => 1,
            Outcome::NotFound => 2,
            Outcome::PlatformError => 3,
        }
    }
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> ExitCode {
        ExitCode::from(outcome.code())
    }
}

/// Parses the command line, printing usage if it's malformed.
pub fn parse<I, T, W>(args: I, out: &mut W) -> std::result::Result<Args, Outcome>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: Write,
{
    Args::try_parse_from(args).map_err(|err| match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = write!(out, "{}", err.render());
            Outcome::Info
        }
        _ => {
            let _ = writeln!(out, "{USAGE}");
            Outcome::Usage
        }
    })
}

/// Validates the input source, then finds the monitor and switches it.
///
/// `connect` opens the platform backend. It isn't called if the arguments
/// are invalid.
pub fn run<P, F, W>(args: &Args, connect: F, out: &mut W) -> Outcome
where
    P: Platform,
    F: FnOnce() -> Result<P>,
    W: Write,
{
    let input = match args.input_source.parse::<InputSource>() {
        Ok(input) => input,
        Err(_) => {
            let valid_options: Vec<_> =
                InputSource::ALL.iter().map(|i| i.name()).collect();
            let _ = writeln!(
                out,
                "Invalid input source. Valid options are: {}",
                valid_options.join(", ")
            );
            return Outcome::Usage;
        }
    };

    if !args.extra.is_empty() {
        debug!("ignoring extra arguments {:?}", args.extra);
    }

    match switch(args, input, connect, out) {
        Ok(outcome) => outcome,
        Err(err) => report(&err, out),
    }
}

fn switch<P, F, W>(
    args: &Args,
    input: InputSource,
    connect: F,
    out: &mut W,
) -> anyhow::Result<Outcome>
where
    P: Platform,
    F: FnOnce() -> Result<P>,
    W: Write,
{
    let platform = connect()?;

    writeln!(out, "Attempting to retrieve physical monitors...")?;
    let logical_monitors = monitor::logical_monitors(&platform)
        .context("failed to enumerate display monitors")?;

    // Everything in `resolved` is released when it goes out of scope,
    // whichever way this function returns.
    let mut resolved = Vec::new();
    for handle in logical_monitors {
        if tracing::enabled!(Level::DEBUG) {
            log_monitor_info(&platform, handle);
        }
        match monitor::list_physical_monitors(&platform, handle) {
            Ok(physical_monitors) => resolved.push(physical_monitors),
            Err(err) => writeln!(out, "Error retrieving monitors: {err}")?,
        }
    }

    let monitors: Vec<&PhysicalMonitor> =
        resolved.iter().flat_map(|monitors| monitors.iter()).collect();
    if monitors.is_empty() {
        writeln!(out, "No monitors found.")?;
    } else {
        writeln!(out, "Found monitors:")?;
        for (i, monitor) in monitors.iter().enumerate() {
            writeln!(
                out,
                "Monitor {} -> {} -> Handle {}",
                i, monitor.description, monitor.handle
            )?;
        }
    }

    let Some(target) =
        monitor::find_monitor(monitors.iter().copied(), &args.monitor_name)
    else {
        writeln!(out, "Monitor {} not found.", args.monitor_name)?;
        return Ok(Outcome::NotFound);
    };

    if args.check_capabilities {
        check_capabilities(&platform, target, input)?;
    }

    writeln!(out, "Switching {} to {}", target.description, input)?;
    monitor::switch_input(&platform, target.handle, input).with_context(
        || format!("failed to switch {} to {}", target.description, input),
    )?;

    Ok(Outcome::Switched)
}

fn log_monitor_info<P: Platform>(platform: &P, handle: LogicalMonitorHandle) {
    match platform.logical_monitor_info(handle) {
        Ok(info) => debug!(
            "logical monitor {} is {}{}",
            info.device_name,
            info.rect,
            if info.primary { " (primary)" } else { "" }
        ),
        Err(err) => debug!("no information for logical monitor {:?}: {}", handle, err),
    }
}

/// Unreadable capabilities don't stop the switch. Only a monitor that lists
/// its inputs without the requested one does.
fn check_capabilities<P: Platform>(
    platform: &P,
    monitor: &PhysicalMonitor,
    input: InputSource,
) -> Result<()> {
    let capabilities = match monitor::capabilities(platform, monitor.handle) {
        Ok(capabilities) => capabilities,
        Err(err) => {
            warn!(
                "unable to check the capabilities of {}: {}",
                monitor.description, err
            );
            return Ok(());
        }
    };

    if !capabilities.supports_input_select() {
        warn!("{} doesn't advertise input select", monitor.description);
    }

    capabilities.check_input(input)
}

fn report<W: Write>(err: &anyhow::Error, out: &mut W) -> Outcome {
    let (label, outcome) = match err.downcast_ref::<Error>() {
        Some(Error::InvalidInputSource(_) | Error::InputNotAdvertised { .. }) => {
            ("Argument error:", Outcome::Usage)
        }
        Some(Error::PlatformUnavailable(_)) => {
            ("Platform support unavailable:", Outcome::PlatformError)
        }
        Some(Error::PlatformCall { .. }) => {
            ("External error:", Outcome::PlatformError)
        }
        Some(Error::Capabilities(_)) | None => {
            ("An unexpected error occurred:", Outcome::PlatformError)
        }
    };

    let _ = writeln!(
        out,
        "{} {:#}",
        label.if_supports_color(Stream::Stdout, |l| l.red()),
        err
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_args(args: &[&str]) -> (std::result::Result<Args, Outcome>, String) {
        let mut out = Vec::new();
        let result = parse(args, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn too_few_arguments() {
        for args in [&["swmi"][..], &["swmi", "DELL"][..]] {
            let (result, out) = parse_args(args);
            assert_eq!(result.unwrap_err(), Outcome::Usage);
            assert_eq!(out, "Usage: swmi <MonitorName> <InputSource>\n");
        }
    }

    #[test]
    fn extra_arguments_are_kept_aside() {
        let (result, out) = parse_args(&["swmi", "DELL", "Hdmi1", "now"]);
        let args = result.unwrap();
        assert_eq!(args.monitor_name, "DELL");
        assert_eq!(args.input_source, "Hdmi1");
        assert_eq!(args.extra, vec!["now"]);
        assert!(!args.check_capabilities);
        assert!(out.is_empty());
    }

    #[test]
    fn extra_flags_are_ignored() {
        for extra in ["--force", "-x"] {
            let (result, out) = parse_args(&["swmi", "DELL", "Hdmi1", extra, "-v"]);
            let args = result.unwrap();
            assert_eq!(args.monitor_name, "DELL");
            assert_eq!(args.input_source, "Hdmi1");
            assert_eq!(args.extra, vec![extra, "-v"]);
            assert!(!args.verbose);
            assert!(out.is_empty());
        }
    }

    #[test]
    fn monitor_name_can_start_with_a_hyphen() {
        let (result, _) = parse_args(&["swmi", "-27GL", "Hdmi1"]);
        let args = result.unwrap();
        assert_eq!(args.monitor_name, "-27GL");
        assert_eq!(args.input_source, "Hdmi1");
    }

    #[test]
    fn flags_between_positionals() {
        let (result, _) = parse_args(&["swmi", "LG", "-v", "UsbC"]);
        let args = result.unwrap();
        assert!(args.verbose);
        assert_eq!(args.input_source, "UsbC");
    }

    #[test]
    fn flags() {
        let (result, _) =
            parse_args(&["swmi", "-v", "--check-capabilities", "LG", "UsbC"]);
        let args = result.unwrap();
        assert!(args.verbose);
        assert!(args.check_capabilities);
        assert_eq!(args.monitor_name, "LG");
    }

    #[test]
    fn help() {
        let (result, out) = parse_args(&["swmi", "--help"]);
        assert_eq!(result.unwrap_err(), Outcome::Info);
        assert!(out.contains("<MONITOR_NAME>"));
    }

    #[test]
    fn exit_codes() {
        assert_eq!(Outcome::Switched.code(), 0);
        assert_eq!(Outcome::Info.code(), 0);
        assert_eq!(Outcome::Usage.code(), 1);
        assert_eq!(Outcome::NotFound.code(), 2);
        assert_eq!(Outcome::PlatformError.code(), 3);
    }
}
