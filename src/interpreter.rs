use std::ffi::{OsStr, OsString};
use std::fmt;

/// Interpreters known by name, each with a command-line flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterpreterKind {
    Ash,
    Awk,
    Bash,
    Busybox,
    Csh,
    Dash,
    Ksh,
    Lua,
    Mksh,
    Pdksh,
    Perl,
    Php,
    Python,
    Ruby,
    Sh,
    Tcsh,
    Zsh,
}

impl InterpreterKind {
    /// Every known kind, in the order the help text lists them
    pub const ALL: [InterpreterKind; 17] = [
        InterpreterKind::Ash,
        InterpreterKind::Awk,
        InterpreterKind::Sh,
        InterpreterKind::Bash,
        InterpreterKind::Csh,
        InterpreterKind::Dash,
        InterpreterKind::Pdksh,
        InterpreterKind::Ksh,
        InterpreterKind::Lua,
        InterpreterKind::Mksh,
        InterpreterKind::Perl,
        InterpreterKind::Php,
        InterpreterKind::Ruby,
        InterpreterKind::Tcsh,
        InterpreterKind::Busybox,
        InterpreterKind::Python,
        InterpreterKind::Zsh,
    ];

    /// Executable name searched for in `PATH`
    pub fn default_name(self) -> &'static str {
        match self {
            InterpreterKind::Ash => "ash",
            InterpreterKind::Awk => "awk",
            InterpreterKind::Bash => "bash",
            InterpreterKind::Busybox => "busybox",
            InterpreterKind::Csh => "csh",
            InterpreterKind::Dash => "dash",
            InterpreterKind::Ksh => "ksh",
            InterpreterKind::Lua => "lua",
            InterpreterKind::Mksh => "mksh",
            InterpreterKind::Pdksh => "pdksh",
            InterpreterKind::Perl => "perl",
            InterpreterKind::Php => "php",
            InterpreterKind::Python => "python",
            InterpreterKind::Ruby => "ruby",
            InterpreterKind::Sh => "sh",
            InterpreterKind::Tcsh => "tcsh",
            InterpreterKind::Zsh => "zsh",
        }
    }

    pub fn short_flag(self) -> char {
        match self {
            InterpreterKind::Ash => 'a',
            InterpreterKind::Awk => 'A',
            InterpreterKind::Sh => 'b',
            InterpreterKind::Bash => 'B',
            InterpreterKind::Csh => 'c',
            InterpreterKind::Dash => 'd',
            InterpreterKind::Pdksh => 'D',
            InterpreterKind::Ksh => 'k',
            InterpreterKind::Lua => 'l',
            InterpreterKind::Mksh => 'm',
            InterpreterKind::Perl => 'p',
            InterpreterKind::Php => 'P',
            InterpreterKind::Ruby => 'r',
            InterpreterKind::Tcsh => 't',
            InterpreterKind::Busybox => 'x',
            InterpreterKind::Python => 'y',
            InterpreterKind::Zsh => 'z',
        }
    }

    /// Primary long flag, without the leading `--`
    pub fn long_flag(self) -> &'static str {
        self.default_name()
    }

    /// Descriptive long flags accepted for compatibility with mksc 0.4
    pub fn long_aliases(self) -> &'static [&'static str] {
        match self {
            InterpreterKind::Ash => &["almquist-shell"],
            InterpreterKind::Sh => &["bourne-shell"],
            InterpreterKind::Bash => &["bourne-again-shell"],
            InterpreterKind::Csh => &["c-shell"],
            InterpreterKind::Dash => &["debian-almquist-shell"],
            InterpreterKind::Ksh => &["korn-shell"],
            InterpreterKind::Mksh => &["mirbsd-korn-shell"],
            InterpreterKind::Pdksh => &["public-domain-korn-shell"],
            InterpreterKind::Tcsh => &["tenex-c-shell"],
            InterpreterKind::Zsh => &["z-shell"],
            _ => &[],
        }
    }

    /// Human readable description used by `--help`
    pub fn description(self) -> &'static str {
        match self {
            InterpreterKind::Ash => "Create an Almquist Shell script",
            InterpreterKind::Awk => "Create an AWK script",
            InterpreterKind::Sh => "Create a Bourne Shell script [DEFAULT]",
            InterpreterKind::Bash => "Create a Bourne-Again Shell script",
            InterpreterKind::Csh => "Create a C Shell script",
            InterpreterKind::Dash => "Create a Debian Almquist Shell script",
            InterpreterKind::Pdksh => "Create a Public Domain Korn Shell script",
            InterpreterKind::Ksh => "Create a Korn Shell script",
            InterpreterKind::Lua => "Create a Lua script",
            InterpreterKind::Mksh => "Create a MirBSD Korn Shell script",
            InterpreterKind::Perl => "Create a Perl script",
            InterpreterKind::Php => "Create a PHP script",
            InterpreterKind::Ruby => "Create a Ruby script",
            InterpreterKind::Tcsh => "Create a TENEX C Shell script",
            InterpreterKind::Busybox => "Create a BusyBox script",
            InterpreterKind::Python => "Create a Python script",
            InterpreterKind::Zsh => "Create a Z Shell script",
        }
    }
}

/// The interpreter selection that applies to the next filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpreter {
    Known(InterpreterKind),
    /// A caller supplied name or absolute path
    Custom(OsString),
}

impl Interpreter {
    /// Name handed to the resolver
    pub fn name(&self) -> &OsStr {
        match self {
            Interpreter::Known(kind) => OsStr::new(kind.default_name()),
            Interpreter::Custom(name) => name,
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::Known(InterpreterKind::Sh)
    }
}

impl fmt::Display for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name().to_string_lossy())
    }
}
