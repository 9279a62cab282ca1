pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod resolver;
pub mod template;

pub use builder::{build_worklist, Invocation, ScriptJob};
pub use config::Config;
pub use error::{MkscError, Result, Warning};
pub use interpreter::{Interpreter, InterpreterKind};
pub use resolver::{resolve, ResolvedInterpreter, SearchList};
pub use template::{render_header, write_job, HeaderContext};
