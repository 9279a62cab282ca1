use clap::{value_parser, Arg, ArgAction, Command};
use std::ffi::OsString;
use std::io::Write;

use crate::builder::{self, Invocation};
use crate::config::{Config, DEFAULT_PROGRAM_NAME, LONG_VERSION, VERSION};
use crate::error::{MkscError, Result};
use crate::interpreter::InterpreterKind;
use crate::template::{self, HeaderContext};

pub const CUSTOM_ID: &str = "custom";
pub const FILENAMES_ID: &str = "filenames";

/// The command-line definition, shared by parsing and by help output.
///
/// Every type option may repeat and is recorded once per occurrence, so
/// [`builder::build_worklist`] can put options and filenames back in
/// command-line order from their indices.
pub fn build_command(program_name: &str) -> Command {
    let mut command = Command::new(DEFAULT_PROGRAM_NAME)
        .bin_name(program_name.to_string())
        .version(VERSION)
        .long_version(LONG_VERSION)
        .about("Create a basic script template")
        .override_usage(usage(program_name))
        .disable_help_flag(true)
        .disable_version_flag(true)
        .after_help("If no script type option is given, `--sh' is assumed.");

    for kind in InterpreterKind::ALL {
        command = command.arg(
            Arg::new(kind.long_flag())
                .short(kind.short_flag())
                .long(kind.long_flag())
                .aliases(kind.long_aliases().iter().copied())
                .help(kind.description())
                .num_args(0)
                .default_missing_value("true")
                .action(ArgAction::Append),
        );
    }

    command
        .arg(
            Arg::new(CUSTOM_ID)
                .short('C')
                .long("custom")
                .value_name("INTERPRETER")
                .help(
                    "Create a script that uses INTERPRETER as the interpreter. \
                     If INTERPRETER is not an absolute path, it is looked up in PATH",
                )
                .value_parser(value_parser!(OsString))
                .allow_hyphen_values(true)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("help")
                .short('h')
                .short_alias('?')
                .long("help")
                .help("Display this text and exit (also -?)")
                .action(ArgAction::Help),
        )
        .arg(
            Arg::new("version")
                .short('v')
                .long("version")
                .help("Display version information and exit")
                .action(ArgAction::Version),
        )
        .arg(
            Arg::new(FILENAMES_ID)
                .value_name("FILENAME")
                .help("Scripts to create; each uses the closest type option before it")
                .value_parser(value_parser!(OsString))
                .num_args(1..)
                .action(ArgAction::Append),
        )
}

/// Usage line body, without the leading `Usage: `
pub fn usage(program_name: &str) -> String {
    let flags: String = InterpreterKind::ALL.iter().map(|k| k.short_flag()).collect();
    format!("{program_name} [-{flags}] [-C INTERPRETER] FILENAME...")
}

/// Run the tool and return the process exit status.
pub fn run<I, T, O, E>(args: I, config: &Config, stdout: &mut O, stderr: &mut E) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
    O: Write,
    E: Write,
{
    match try_run(args, config, stdout, stderr) {
        Ok(()) => 0,
        Err(err) => {
            // Nothing sensible is left to do if stderr itself fails
            let _ = report_error(&err, config, stderr);
            1
        }
    }
}

fn try_run<I, T, O, E>(args: I, config: &Config, stdout: &mut O, stderr: &mut E) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
    O: Write,
    E: Write,
{
    match builder::build_worklist(args, config, stderr)? {
        Invocation::Help => {
            let help = build_command(&config.program_name).render_help();
            write!(stdout, "{help}")?;
        }
        Invocation::Version => {
            let version = build_command(&config.program_name).render_long_version();
            write!(stdout, "{version}")?;
        }
        Invocation::Write(jobs) => {
            let ctx = HeaderContext::now(config);
            let written = template::write_all(&jobs, &ctx, config, stderr);
            tracing::debug!(written, total = jobs.len(), "write phase finished");
        }
    }
    stdout.flush()?;
    Ok(())
}

fn report_error<E: Write>(err: &MkscError, config: &Config, stderr: &mut E) -> std::io::Result<()> {
    writeln!(stderr, "{}: error: {}", config.program_name, err)?;
    if err.is_usage() {
        writeln!(stderr, "Usage: {}", usage(&config.program_name))?;
    }
    Ok(())
}
