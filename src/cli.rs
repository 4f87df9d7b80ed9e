//! # Command Line
//!
//! The program takes a single positional argument, the recursion depth.
//! Any other invocation prints the usage line and exits with status 1
//! without generating anything.

use crate::error::{CliError, RenderError};
use clap::error::ErrorKind;
use clap::Parser;
use log::{error, info};
use std::ffi::OsString;

pub const USAGE: &str = "Usage: menger_sponge <depth>";
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

/// Renders a Menger sponge of the given recursion depth.
#[derive(Parser, Debug)]
#[command(name = "menger_sponge")]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Args {
    /// Recursion depth, a non-negative integer.
    #[arg(value_parser = parse_depth, allow_hyphen_values = true)]
    depth: u32,
}

/// Parses a depth string. Only plain ASCII digits are accepted, so signs,
/// whitespace and decimal points are all rejected.
///
/// ```
/// use menger_sponge::cli::parse_depth;
///
/// assert_eq!(parse_depth("3"), Ok(3));
/// assert!(parse_depth("-1").is_err());
/// ```
pub fn parse_depth(value: &str) -> Result<u32, CliError> {
    let invalid = || CliError::InvalidDepthFormat {
        value: value.to_owned(),
    };
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    value.parse::<u32>().map_err(|_| invalid())
}

/// Extracts the depth from a full argument list, program name first.
pub fn parse_args<I, T>(args: I) -> Result<u32, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let given = args.len().saturating_sub(1);
    match Args::try_parse_from(&args) {
        Ok(parsed) => Ok(parsed.depth),
        Err(err) => Err(classify(&err, &args, given)),
    }
}

fn classify(err: &clap::Error, args: &[OsString], given: usize) -> CliError {
    match err.kind() {
        ErrorKind::ValueValidation => std::error::Error::source(err)
            .and_then(|source| source.downcast_ref::<CliError>())
            .cloned()
            .unwrap_or_else(|| CliError::InvalidArgumentCount { got: given }),
        ErrorKind::InvalidUtf8 => {
            let value = args
                .iter()
                .skip(1)
                .find(|arg| arg.to_str().is_none())
                .map(|arg| arg.to_string_lossy().into_owned())
                .unwrap_or_default();
            CliError::InvalidDepthFormat { value }
        }
        _ => CliError::InvalidArgumentCount { got: given },
    }
}

/// Parses `args` and hands the depth to `render`.
///
/// Returns the process exit status. On a bad command line the usage line
/// goes to stderr and `render` is never called.
pub fn run<I, T, F>(args: I, render: F) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
    F: FnOnce(u32) -> Result<(), RenderError>,
{
    let depth = match parse_args(args) {
        Ok(depth) => depth,
        Err(err) => {
            eprintln!("{}", USAGE);
            eprintln!("{}", err);
            return EXIT_FAILURE;
        }
    };
    info!("Menger sponge starting, depth {}", depth);

    match render(depth) {
        Ok(()) => {
            info!("Menger sponge exiting.");
            EXIT_SUCCESS
        }
        Err(err) => {
            error!("{}", err);
            EXIT_FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_valid_depths() {
        assert_eq!(parse_depth("0"), Ok(0));
        assert_eq!(parse_depth("4"), Ok(4));
        assert_eq!(parse_depth("007"), Ok(7));
    }

    #[test]
    fn test_rejects_non_digits() {
        for bad in ["", "-1", "+2", "1.5", " 3", "3 ", "three", "٣"] {
            assert_eq!(
                parse_depth(bad),
                Err(CliError::InvalidDepthFormat {
                    value: bad.to_owned()
                }),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_rejects_overflow() {
        assert!(matches!(
            parse_depth("99999999999"),
            Err(CliError::InvalidDepthFormat { .. })
        ));
    }

    #[test]
    fn test_argument_count() {
        assert_eq!(parse_args(["menger_sponge", "2"]), Ok(2));
        assert_eq!(
            parse_args(["menger_sponge"]),
            Err(CliError::InvalidArgumentCount { got: 0 })
        );
        assert_eq!(
            parse_args(["menger_sponge", "1", "2"]),
            Err(CliError::InvalidArgumentCount { got: 2 })
        );
    }

    #[test]
    fn test_bad_depth_through_args() {
        for bad in ["-1", "abc", "2.0"] {
            assert_eq!(
                parse_args(["menger_sponge", bad]),
                Err(CliError::InvalidDepthFormat {
                    value: bad.to_owned()
                })
            );
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_depth_is_a_format_error() {
        use std::os::unix::ffi::OsStringExt;

        let args = vec![
            OsString::from("menger_sponge"),
            OsString::from_vec(vec![0xff]),
        ];
        assert!(matches!(
            parse_args(args),
            Err(CliError::InvalidDepthFormat { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_non_utf8_exits_without_rendering() {
        use std::os::unix::ffi::OsStringExt;

        let called = Cell::new(false);
        let args = vec![
            OsString::from("menger_sponge"),
            OsString::from_vec(vec![0xff]),
        ];
        let status = run(args, |_| {
            called.set(true);
            Ok(())
        });
        assert_eq!(status, EXIT_FAILURE);
        assert!(!called.get());
    }

    #[test]
    fn test_run_rejects_bad_command_lines() {
        let command_lines = [
            vec!["menger_sponge"],
            vec!["menger_sponge", "x", "y"],
            vec!["menger_sponge", "-3"],
        ];
        for args in command_lines {
            let called = Cell::new(false);
            let status = run(args, |_| {
                called.set(true);
                Ok(())
            });
            assert_eq!(status, EXIT_FAILURE);
            assert!(!called.get());
        }
    }

    #[test]
    fn test_run_passes_depth_through() {
        let seen = Cell::new(None);
        let status = run(["menger_sponge", "3"], |depth| {
            seen.set(Some(depth));
            Ok(())
        });
        assert_eq!(status, EXIT_SUCCESS);
        assert_eq!(seen.get(), Some(3));
    }

    #[test]
    fn test_run_reports_render_failure() {
        let status = run(["menger_sponge", "1"], |_| {
            Err(RenderError::InvalidConfig("alpha must be within [0, 1]".to_owned()))
        });
        assert_eq!(status, EXIT_FAILURE);
    }
}
