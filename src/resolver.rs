//! Interpreter path resolution
//!
//! Turns an interpreter name into the absolute path written on the shebang
//! line. Absolute names are checked in place; bare names are looked up in a
//! colon separated search list, first match wins. Names and directories stay
//! `OsStr` throughout, so paths that are not valid UTF-8 resolve as given.
//!
//! Empty segments (leading, trailing or doubled `:`) and relative segments
//! are skipped rather than read as the current directory. A shebang needs an
//! absolute path, and a script header pointing into whatever directory the
//! tool happened to run from would be wrong on the next run.

use std::env;
use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use crate::error::{MkscError, Result};

/// An absolute path that was a regular, executable file when it was resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInterpreter(PathBuf);

impl ResolvedInterpreter {
    pub fn path(&self) -> &Path {
        &self.0
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl fmt::Display for ResolvedInterpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Ordered directories parsed from a `PATH`-style value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchList {
    segments: Vec<PathBuf>,
}

impl SearchList {
    pub fn parse<S: AsRef<OsStr> + ?Sized>(raw: &S) -> Self {
        Self {
            segments: env::split_paths(raw).collect(),
        }
    }

    /// Every segment, including empty ones, in source order
    pub fn segments(&self) -> &[PathBuf] {
        &self.segments
    }

    /// Segments that take part in the search: absolute, non-empty
    pub fn directories(&self) -> impl Iterator<Item = &Path> {
        self.segments
            .iter()
            .map(PathBuf::as_path)
            .filter(|dir| dir.is_absolute())
    }

    /// Return the first `dir/name` that is a regular, executable file.
    pub fn find(&self, name: &OsStr) -> Option<ResolvedInterpreter> {
        for dir in self.directories() {
            let candidate = dir.join(name);
            if is_regular_file(&candidate) && is_executable(&candidate) {
                debug!(candidate = %candidate.display(), "interpreter found");
                return Some(ResolvedInterpreter(candidate));
            }
            debug!(candidate = %candidate.display(), "no executable here");
        }
        None
    }
}

/// Resolve `name` to an absolute interpreter path.
///
/// `Ok(None)` means the name was not found anywhere in the search list; the
/// caller reports it and moves on. An absolute `name` that is missing or not
/// executable is an error, as is a bare name with no search list at all.
#[instrument(level = "debug", skip(search_path))]
pub fn resolve(name: &OsStr, search_path: Option<&OsStr>) -> Result<Option<ResolvedInterpreter>> {
    if name.is_empty() {
        return Ok(None);
    }

    if Path::new(name).has_root() {
        let path = PathBuf::from(name);
        if !is_regular_file(&path) {
            return Err(MkscError::InterpreterMissing(path));
        }
        if !is_executable(&path) {
            return Err(MkscError::InterpreterNotExecutable(path));
        }
        return Ok(Some(ResolvedInterpreter(path)));
    }

    let raw = search_path.ok_or(MkscError::SearchPathMissing)?;
    Ok(SearchList::parse(raw).find(name))
}

/// True when `path` exists and, after following symlinks, is a regular file.
pub fn is_regular_file(path: &Path) -> bool {
    fs::metadata(path).map(|meta| meta.is_file()).unwrap_or(false)
}

#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path)
        .map(|meta| meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    is_regular_file(path)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStrExt;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn create_file(dir: &Path, name: &str, mode: u32) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    fn join_dirs(dirs: &[&Path]) -> OsString {
        env::join_paths(dirs).unwrap()
    }

    fn os(s: &str) -> &OsStr {
        OsStr::new(s)
    }

    #[test]
    fn test_empty_name_is_not_found() {
        assert_eq!(resolve(os(""), Some(os("/bin"))).unwrap(), None);
        assert_eq!(resolve(os(""), None).unwrap(), None);
    }

    #[test]
    fn test_absolute_executable_returned_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let interp = create_file(temp_dir.path(), "interp", 0o755);

        let resolved = resolve(interp.as_os_str(), None).unwrap().unwrap();
        assert_eq!(resolved.path(), interp.as_path());
    }

    #[test]
    fn test_absolute_missing_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");

        let err = resolve(missing.as_os_str(), Some(os("/bin"))).unwrap_err();
        assert!(matches!(err, MkscError::InterpreterMissing(p) if p == missing));
    }

    #[test]
    fn test_absolute_directory_is_fatal() {
        let temp_dir = TempDir::new().unwrap();

        let err = resolve(temp_dir.path().as_os_str(), None).unwrap_err();
        assert!(matches!(err, MkscError::InterpreterMissing(_)));
    }

    #[test]
    fn test_absolute_not_executable_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let plain = create_file(temp_dir.path(), "plain", 0o644);

        let err = resolve(plain.as_os_str(), None).unwrap_err();
        assert!(matches!(err, MkscError::InterpreterNotExecutable(p) if p == plain));
    }

    #[test]
    fn test_missing_search_path_is_fatal() {
        let err = resolve(os("sh"), None).unwrap_err();
        assert!(matches!(err, MkscError::SearchPathMissing));
    }

    #[test]
    fn test_first_match_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        create_file(first.path(), "tool", 0o755);
        create_file(second.path(), "tool", 0o755);

        let path = join_dirs(&[first.path(), second.path()]);
        let resolved = resolve(os("tool"), Some(&path)).unwrap().unwrap();
        assert_eq!(resolved.path(), first.path().join("tool"));
    }

    #[test]
    fn test_skips_non_executable_and_directories() {
        let plain_dir = TempDir::new().unwrap();
        let dir_dir = TempDir::new().unwrap();
        let good_dir = TempDir::new().unwrap();
        create_file(plain_dir.path(), "tool", 0o644);
        fs::create_dir(dir_dir.path().join("tool")).unwrap();
        create_file(good_dir.path(), "tool", 0o700);

        let path = join_dirs(&[plain_dir.path(), dir_dir.path(), good_dir.path()]);
        let resolved = resolve(os("tool"), Some(&path)).unwrap().unwrap();
        assert_eq!(resolved.path(), good_dir.path().join("tool"));
    }

    #[test]
    fn test_not_found_is_not_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let path = join_dirs(&[temp_dir.path()]);

        assert_eq!(resolve(os("definitely-not-here"), Some(&path)).unwrap(), None);
    }

    #[test]
    fn test_symlink_to_executable_resolves_to_link() {
        let temp_dir = TempDir::new().unwrap();
        let target = create_file(temp_dir.path(), "real", 0o755);
        let link = temp_dir.path().join("alias");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let path = join_dirs(&[temp_dir.path()]);
        let resolved = resolve(os("alias"), Some(&path)).unwrap().unwrap();
        assert_eq!(resolved.path(), link.as_path());
    }

    #[test]
    fn test_non_utf8_directory_is_searched() {
        let temp_dir = TempDir::new().unwrap();
        let odd_dir = temp_dir.path().join(OsStr::from_bytes(b"bin\xff"));
        fs::create_dir(&odd_dir).unwrap();
        create_file(&odd_dir, "sh", 0o755);

        let mut path = OsString::from("/nonexistent:");
        path.push(odd_dir.as_os_str());

        let resolved = resolve(os("sh"), Some(&path)).unwrap().unwrap();
        assert_eq!(resolved.path(), odd_dir.join("sh"));
        assert!(resolved.path().to_str().is_none());
    }

    #[test]
    fn test_non_utf8_absolute_name() {
        let temp_dir = TempDir::new().unwrap();
        let interp = temp_dir.path().join(OsStr::from_bytes(b"interp\xfe"));
        fs::write(&interp, "").unwrap();
        fs::set_permissions(&interp, fs::Permissions::from_mode(0o755)).unwrap();

        let resolved = resolve(interp.as_os_str(), None).unwrap().unwrap();
        assert_eq!(resolved.path(), interp.as_path());
    }

    #[test]
    fn test_segments_keep_empty_entries() {
        let list = SearchList::parse(":/bin::/usr/bin:");
        let expected: Vec<PathBuf> = ["", "/bin", "", "/usr/bin", ""]
            .iter()
            .map(PathBuf::from)
            .collect();
        assert_eq!(list.segments(), expected.as_slice());
    }

    #[test]
    fn test_empty_and_relative_segments_are_skipped() {
        let list = SearchList::parse(":/bin::relative/dir:/usr/bin:");
        let dirs: Vec<&Path> = list.directories().collect();
        assert_eq!(dirs, [Path::new("/bin"), Path::new("/usr/bin")]);
    }

    #[test]
    fn test_empty_segment_does_not_search_root() {
        // A naive `"" + "/" + name` would look at `/tool`; the root directory
        // must never be consulted through an empty segment.
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "tool", 0o755);

        let mut path = OsString::from(":");
        path.push(temp_dir.path().as_os_str());
        let resolved = resolve(os("tool"), Some(&path)).unwrap().unwrap();
        assert_eq!(resolved.path(), temp_dir.path().join("tool"));

        let list = SearchList::parse("::");
        assert_eq!(list.directories().count(), 0);
        assert_eq!(list.find(os("sh")), None);
    }
}
