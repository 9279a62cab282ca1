//! Worklist assembly
//!
//! The command line is parsed by the clap definition in
//! [`crate::cli::build_command`]. Type options and filenames are then put
//! back into command-line order by their argument index, and every filename
//! resolves the selection in force at that point. On success it turns into a
//! [`ScriptJob`]. Nothing is written here; the jobs are handed back in order
//! for the template writer.

use clap::error::{ContextKind, ContextValue, ErrorKind};
use std::ffi::OsString;
use std::io::Write;
use std::iter;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::cli::{build_command, CUSTOM_ID, FILENAMES_ID};
use crate::config::Config;
use crate::error::{report_warning, MkscError, Result, Warning};
use crate::interpreter::{Interpreter, InterpreterKind};
use crate::resolver::{self, ResolvedInterpreter};

/// One output file paired with its resolved interpreter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptJob {
    pub output_path: PathBuf,
    pub interpreter_path: ResolvedInterpreter,
    pub kind: Interpreter,
}

/// What the command line asked for
#[derive(Debug, PartialEq, Eq)]
pub enum Invocation {
    Help,
    Version,
    Write(Vec<ScriptJob>),
}

/// A parsed argument, placed by its position on the command line
#[derive(Debug)]
enum Event {
    Select(Interpreter),
    File(OsString),
}

/// Parse `args` (without the program name) into an [`Invocation`].
///
/// Interpreters that cannot be found in the search list are reported on
/// `diagnostics` and their file is skipped. Help and version stop parsing at
/// once. Anything else that goes wrong, including an empty worklist, is an
/// error.
pub fn build_worklist<I, T, W>(args: I, config: &Config, diagnostics: &mut W) -> Result<Invocation>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
    W: Write,
{
    let argv = iter::once(OsString::from(&config.program_name))
        .chain(args.into_iter().map(Into::into));
    let matches = match build_command(&config.program_name).try_get_matches_from(argv) {
        Ok(matches) => matches,
        Err(err) => return parse_failure(err),
    };

    let mut selection = Interpreter::default();
    let mut jobs = Vec::new();

    for event in ordered_events(&matches)? {
        let filename = match event {
            Event::Select(interpreter) => {
                selection = interpreter;
                continue;
            }
            Event::File(filename) => filename,
        };

        debug!(file = ?filename, interpreter = %selection, "resolving interpreter");
        match resolver::resolve(selection.name(), config.search_path.as_deref())? {
            Some(interpreter_path) => {
                info!(file = ?filename, interpreter = %interpreter_path, "job queued");
                jobs.push(ScriptJob {
                    output_path: PathBuf::from(filename),
                    interpreter_path,
                    kind: selection.clone(),
                });
            }
            None => {
                let name = selection.to_string();
                report_warning(
                    diagnostics,
                    &config.program_name,
                    Warning::InterpreterNotFound(name.clone()),
                );
                report_warning(
                    diagnostics,
                    &config.program_name,
                    format_args!("make sure `{name}' is properly installed"),
                );
            }
        }
    }

    if jobs.is_empty() {
        return Err(MkscError::NothingToDo);
    }
    Ok(Invocation::Write(jobs))
}

/// Merge type options, custom interpreters and filenames back into
/// command-line order.
fn ordered_events(matches: &clap::ArgMatches) -> Result<Vec<Event>> {
    let mut events: Vec<(usize, Event)> = Vec::new();

    for kind in InterpreterKind::ALL {
        if let Some(indices) = matches.indices_of(kind.long_flag()) {
            events.extend(indices.map(|index| (index, Event::Select(Interpreter::Known(kind)))));
        }
    }

    if let (Some(indices), Some(names)) = (
        matches.indices_of(CUSTOM_ID),
        matches.get_many::<OsString>(CUSTOM_ID),
    ) {
        for (index, name) in indices.zip(names) {
            if name.is_empty() {
                return Err(MkscError::MissingArgument("--custom".to_string()));
            }
            events.push((index, Event::Select(Interpreter::Custom(name.clone()))));
        }
    }

    if let (Some(indices), Some(filenames)) = (
        matches.indices_of(FILENAMES_ID),
        matches.get_many::<OsString>(FILENAMES_ID),
    ) {
        for (index, filename) in indices.zip(filenames) {
            if filename == "-" {
                return Err(MkscError::UnrecognizedOption("-".to_string()));
            }
            events.push((index, Event::File(filename.clone())));
        }
    }

    events.sort_by_key(|(index, _)| *index);
    Ok(events.into_iter().map(|(_, event)| event).collect())
}

/// Turn a clap parse failure into an invocation or a usage error.
fn parse_failure(err: clap::Error) -> Result<Invocation> {
    let offending = match err.get(ContextKind::InvalidArg) {
        Some(ContextValue::String(arg)) => arg.clone(),
        _ => String::new(),
    };

    match err.kind() {
        ErrorKind::DisplayHelp => Ok(Invocation::Help),
        ErrorKind::DisplayVersion => Ok(Invocation::Version),
        ErrorKind::UnknownArgument => Err(MkscError::UnrecognizedOption(offending)),
        ErrorKind::TooManyValues => Err(MkscError::UnexpectedValue(offending)),
        ErrorKind::InvalidValue if offending.starts_with("--custom") => {
            Err(MkscError::MissingArgument("--custom".to_string()))
        }
        kind => Err(MkscError::InvalidUsage(
            kind.as_str().unwrap_or("invalid usage").to_string(),
        )),
    }
}
