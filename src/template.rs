//! Script template writer

use chrono::{Local, NaiveDate};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

use crate::builder::ScriptJob;
use crate::config::Config;
use crate::error::{report_warning, Warning};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Owner read, write and execute; nothing for group or other
pub const SCRIPT_MODE: u32 = 0o700;

/// Attribution written below the filename
#[derive(Debug, Clone, Default)]
pub struct HeaderContext {
    /// Written as-is; an unset `USER` leaves the line empty
    pub user: Option<String>,
    /// Omitted from the header together with its separator when unknown
    pub date: Option<NaiveDate>,
}

impl HeaderContext {
    /// Attribution for "now": the configured user and today's local date.
    pub fn now(config: &Config) -> Self {
        Self {
            user: config.user.clone(),
            date: Some(Local::now().date_naive()),
        }
    }
}

/// Render the header for a script at `output_path`.
///
/// Paths are copied byte for byte, so a name that is not valid UTF-8 ends up
/// in the header exactly as it appears on disk.
pub fn render_header(interpreter: &Path, output_path: &Path, ctx: &HeaderContext) -> Vec<u8> {
    let name = output_path.file_name().unwrap_or(output_path.as_os_str());
    let user = ctx.user.as_deref().unwrap_or("");

    let mut header = Vec::with_capacity(64);
    header.extend_from_slice(b"#!");
    header.extend_from_slice(interpreter.as_os_str().as_encoded_bytes());
    header.extend_from_slice(b"\n#\n# ");
    header.extend_from_slice(name.as_encoded_bytes());
    header.push(b'\n');
    let attribution = match ctx.date {
        Some(date) => format!("#\n# {}\n# {}\n", user, date.format(DATE_FORMAT)),
        None => format!("# {}\n", user),
    };
    header.extend_from_slice(attribution.as_bytes());
    header.extend_from_slice(b"#\n");
    header
}

/// Create or truncate the job's file, write its header and make it
/// executable. Returns every problem met on the way; an empty list means the
/// script is in place.
pub fn write_job(job: &ScriptJob, ctx: &HeaderContext) -> Vec<Warning> {
    write_job_with(job, ctx, make_executable)
}

fn write_job_with<F>(job: &ScriptJob, ctx: &HeaderContext, set_mode: F) -> Vec<Warning>
where
    F: FnOnce(&Path) -> io::Result<()>,
{
    let path = job.output_path.as_path();
    let header = render_header(job.interpreter_path.path(), path, ctx);
    let mut warnings = Vec::new();

    let file = match File::create(path) {
        Ok(file) => file,
        Err(source) => {
            warnings.push(Warning::Open {
                path: path.to_path_buf(),
                source,
            });
            return warnings;
        }
    };

    let mut out = BufWriter::new(file);
    if let Err(source) = out.write_all(&header).and_then(|()| out.flush()) {
        warnings.push(Warning::Write {
            path: path.to_path_buf(),
            source,
        });
    }
    drop(out);

    if let Err(source) = set_mode(path) {
        warnings.push(Warning::Permissions {
            path: path.to_path_buf(),
            source,
        });
    }
    warnings
}

/// Write every job in order, reporting warnings on `diagnostics`.
///
/// Returns how many scripts were written without any warning.
pub fn write_all<W: Write>(
    jobs: &[ScriptJob],
    ctx: &HeaderContext,
    config: &Config,
    diagnostics: &mut W,
) -> usize {
    let mut written = 0;

    for job in jobs {
        let warnings = write_job(job, ctx);
        if warnings.is_empty() {
            info!(path = %job.output_path.display(), interpreter = %job.interpreter_path, "script written");
            written += 1;
            continue;
        }
        for warning in warnings {
            warn!(path = %job.output_path.display(), "{}", warning);
            report_warning(diagnostics, &config.program_name, warning);
        }
    }

    written
}

#[cfg(unix)]
fn make_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(SCRIPT_MODE))
}

#[cfg(not(unix))]
fn make_executable(path: &Path) -> io::Result<()> {
    fs::metadata(path).map(|_| ())
}
