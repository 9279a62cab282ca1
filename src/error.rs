use std::fmt::Display;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MkscError>;

/// Conditions that abort the whole run.
#[derive(Error, Debug)]
pub enum MkscError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Interpreter resolution
    #[error("`{}' does not exist", .0.display())]
    InterpreterMissing(PathBuf),

    #[error("`{}' is not executable", .0.display())]
    InterpreterNotExecutable(PathBuf),

    #[error("unable to find environment variable 'PATH'")]
    SearchPathMissing,

    // Command-line usage
    #[error("`{0}' requires an argument")]
    MissingArgument(String),

    #[error("`{0}' unrecognized")]
    UnrecognizedOption(String),

    #[error("`{0}' does not take a value")]
    UnexpectedValue(String),

    #[error("{0}")]
    InvalidUsage(String),

    #[error("nothing to do")]
    NothingToDo,
}

impl MkscError {
    /// Usage errors are followed by the usage line on the error stream.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            MkscError::MissingArgument(_)
                | MkscError::UnrecognizedOption(_)
                | MkscError::UnexpectedValue(_)
                | MkscError::InvalidUsage(_)
                | MkscError::NothingToDo
        )
    }
}

/// Problems that skip a single job but let the run continue.
#[derive(Error, Debug)]
pub enum Warning {
    #[error("unable to find `{0}' in PATH")]
    InterpreterNotFound(String),

    #[error("failed to open `{}' ({source})", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write `{}' ({source})", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to make `{}' executable ({source})", path.display())]
    Permissions {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Write a `prog: warning: ...` line.
///
/// A diagnostics stream that cannot be written to is logged and otherwise
/// ignored; warnings never end the run.
pub fn report_warning<W, M>(diagnostics: &mut W, program_name: &str, message: M)
where
    W: Write + ?Sized,
    M: Display,
{
    if let Err(e) = writeln!(diagnostics, "{program_name}: warning: {message}") {
        tracing::debug!(error = %e, "dropped warning: {}", message);
    }
}
