//! Failures of a `backdrop` invocation and the exit code each one maps to.
//!
//! Clap exits with 2 on its own before `run` starts. Everything after that
//! goes through [`CliError::exit_code`]: 10 for a rejected config, theme or
//! surface size, 11 when a config file or PNG cannot be read or written,
//! 12 for flag values clap accepts but the command cannot use, and 13 when
//! `--json` output fails to serialize.

use backdrop_core::BackdropError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// The core rejected the field, theme or surface settings.
    #[error(transparent)]
    Backdrop(BackdropError),
    /// Reading `--config` or writing `--output` failed.
    #[error("{0}")]
    Io(String),
    /// A flag combination that parses but makes no sense, e.g. `--step-ms 0`.
    #[error("{0}")]
    Input(String),
    #[error("{0}")]
    Serialization(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Backdrop(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl From<BackdropError> for CliError {
    /// Core I/O failures keep their own exit code rather than folding into 10.
    fn from(e: BackdropError) -> Self {
        match e {
            BackdropError::Io(msg) => CliError::Io(msg),
            other => CliError::Backdrop(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_exits_with_10() {
        let err = CliError::from(BackdropError::InvalidConfig("radius_min must be positive".into()));
        assert_eq!(err.exit_code(), 10);
        assert!(err.to_string().contains("radius_min"));
    }

    #[test]
    fn unwritable_png_exits_with_11() {
        let err = CliError::from(BackdropError::Io("out/frame.png: No such file".into()));
        assert!(matches!(err, CliError::Io(_)));
        assert_eq!(err.exit_code(), 11);
        assert!(err.to_string().contains("frame.png"));
    }

    #[test]
    fn zero_step_exits_with_12() {
        assert_eq!(CliError::Input("--step-ms must be positive".into()).exit_code(), 12);
    }

    #[test]
    fn broken_json_exits_with_13() {
        let parse = serde_json::from_str::<serde_json::Value>("{\"particle_count\":");
        assert_eq!(CliError::from(parse.unwrap_err()).exit_code(), 13);
    }

    #[test]
    fn backdrop_variant_displays_core_message() {
        let core = BackdropError::UnknownTheme("sepia".into());
        let expected = core.to_string();
        assert_eq!(CliError::from(core).to_string(), expected);
    }
}
