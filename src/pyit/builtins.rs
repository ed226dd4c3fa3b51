//! Built-in PyitLang functions

use crate::pyit::diagnostic::Diagnostic;
use crate::pyit::interpreter::Interpreter;
use tracing::trace;

/// Reads a line of text from the user
pub const GET_STRING: &str = "getString";

/// Prompt shown when `getString` asks for input
pub const INPUT_PROMPT: &str = "Enter a value: ";

/// Call a built-in function, returning the line it adds to the output.
///
/// Arguments are accepted but no built-in uses them.
pub fn call_builtin(interp: &mut Interpreter, name: &str, args: &[&str]) -> Result<String, Diagnostic> {
    match name {
        GET_STRING => {
            if args.iter().any(|arg| !arg.is_empty()) {
                trace!(?args, "ignoring arguments to {}", GET_STRING);
            }
            match interp.request_input(INPUT_PROMPT) {
                Some(text) => Ok(format!("Input received: {}", text)),
                None => Ok("No input received.".to_string()),
            }
        }
        _ => Err(Diagnostic::UnknownFunction(name.to_string())),
    }
}
