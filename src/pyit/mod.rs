//! PyitLang language interpreter

pub mod parser;
pub mod interpreter;
pub mod builtins;
pub mod diagnostic;
pub mod input;

pub use parser::{Keyword, Stmt};
pub use interpreter::{Interpreter, Report, Value};
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use input::{InputSource, NoInput, ScriptedInput, StdinInput};
