//! PyitLang interpreter: line dispatch, expression resolution and block execution

use crate::pyit::builtins::call_builtin;
use crate::pyit::diagnostic::Diagnostic;
use crate::pyit::input::{InputSource, NoInput};
use crate::pyit::parser::{self, Keyword, Stmt};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, trace};

/// A PyitLang value - a number or an opaque string
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    /// Parse a numeric literal: optional sign, decimal digits with an optional
    /// fraction and exponent. Spelled-out forms like `inf` or `NaN` are text.
    pub fn parse_number(text: &str) -> Option<f64> {
        let numeric = text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
        if !numeric {
            return None;
        }
        // overflowing literals like 1e400 stay text
        text.parse().ok().filter(|n: &f64| n.is_finite())
    }

    /// Zero (and NaN) and the empty string are false, everything else true
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // -0 prints as 0
            Value::Number(n) if *n == 0.0 => f.write_str("0"),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// Result of one `run`: the output log plus what went wrong along the way
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Report {
    pub output: String,
    /// Diagnostics in the order they were written to `output`
    pub diagnostics: Vec<Diagnostic>,
    /// Statement lines dispatched, nested block lines included
    pub statements: usize,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// PyitLang interpreter.
///
/// Variables live as long as the interpreter; the output log is per `run`.
pub struct Interpreter {
    variables: HashMap<String, Value>,
    output: String,
    diagnostics: Vec<Diagnostic>,
    statements: usize,
    input: Box<dyn InputSource>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// An interpreter whose input requests are never answered
    pub fn new() -> Self {
        Self::with_input(NoInput)
    }

    pub fn with_input(input: impl InputSource + 'static) -> Self {
        Self {
            variables: HashMap::new(),
            output: String::new(),
            diagnostics: Vec::new(),
            statements: 0,
            input: Box::new(input),
        }
    }

    /// Run a program and return its complete output
    pub fn execute(&mut self, source: &str) -> String {
        self.run(source).output
    }

    /// Run a program, returning the output together with its diagnostics
    pub fn run(&mut self, source: &str) -> Report {
        self.output.clear();
        self.diagnostics.clear();
        self.statements = 0;

        self.execute_block(source);

        debug!(
            statements = self.statements,
            diagnostics = self.diagnostics.len(),
            "program finished"
        );
        Report {
            output: std::mem::take(&mut self.output),
            diagnostics: std::mem::take(&mut self.diagnostics),
            statements: self.statements,
        }
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn variables(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.variables.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Resolve an atomic expression: a declared variable, then a numeric
    /// literal, then the trimmed text itself.
    pub fn evaluate(&self, expr: &str) -> Value {
        let expr = expr.trim();
        if let Some(value) = self.variables.get(expr) {
            trace!(expr, %value, "variable");
            return value.clone();
        }
        match Value::parse_number(expr) {
            Some(n) => Value::Number(n),
            None => {
                trace!(expr, "text literal");
                Value::Text(expr.to_string())
            }
        }
    }

    pub(crate) fn request_input(&mut self, prompt: &str) -> Option<String> {
        self.input.request_input(prompt)
    }

    /// Run each statement line of `block` in order. Blocks share the
    /// interpreter's single variable store.
    fn execute_block(&mut self, block: &str) {
        debug!(lines = block.lines().count(), "block");
        for line in parser::statement_lines(block) {
            self.dispatch(line);
        }
    }

    fn dispatch(&mut self, line: &str) {
        self.statements += 1;

        let Some(keyword) = Keyword::of_line(line) else {
            self.diagnose(Diagnostic::UnknownStatement(line.to_string()));
            return;
        };
        debug!(keyword = keyword.as_str(), line, "dispatch");

        match parser::parse_statement(keyword, line) {
            Some(stmt) => self.execute_stmt(stmt),
            None => self.diagnose(Diagnostic::grammar_mismatch(keyword, line)),
        }
    }

    fn execute_stmt(&mut self, stmt: Stmt<'_>) {
        match stmt {
            Stmt::Declare { name, expr } => {
                let value = self.evaluate(expr);
                self.emit(format_args!("Variable '{}' declared with value: {}", name, value));
                self.variables.insert(name.to_string(), value);
            }

            Stmt::Assign { name, expr } => {
                if !self.variables.contains_key(name) {
                    self.diagnose(Diagnostic::UndefinedVariable(name.to_string()));
                    return;
                }
                let value = self.evaluate(expr);
                self.emit(format_args!("Variable '{}' assigned new value: {}", name, value));
                self.variables.insert(name.to_string(), value);
            }

            Stmt::Print(expr) => {
                let value = self.evaluate(expr);
                self.emit(value);
            }

            Stmt::If { cond, then_block, else_block } => {
                let taken = if self.evaluate(cond).is_truthy() {
                    then_block
                } else {
                    else_block
                };
                debug!(cond = cond.trim(), block = taken.trim(), "branch");
                self.execute_block(taken.trim());
            }

            Stmt::Loop { count, body } => {
                let body = body.trim();
                for i in 0..count {
                    trace!(iteration = i, count, "loop");
                    self.execute_block(body);
                }
            }

            Stmt::Call { name, args } => match call_builtin(self, name, &args) {
                Ok(line) => self.emit(line),
                Err(diagnostic) => self.diagnose(diagnostic),
            },
        }
    }

    fn emit(&mut self, line: impl fmt::Display) {
        self.output.push_str(&line.to_string());
        self.output.push('\n');
    }

    fn diagnose(&mut self, diagnostic: Diagnostic) {
        debug!(%diagnostic, "diagnostic");
        self.emit(&diagnostic);
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pyit::diagnostic::DiagnosticKind;
    use crate::pyit::input::ScriptedInput;
    use pretty_assertions::assert_eq;

    fn run_pyit(code: &str) -> String {
        Interpreter::new().execute(code)
    }

    #[test]
    fn test_simple_print() {
        assert_eq!(run_pyit("pya 3"), "3\n");
        assert_eq!(run_pyit("pya hello there"), "hello there\n");
    }

    #[test]
    fn test_undeclared_name_prints_itself() {
        assert_eq!(run_pyit("pya v"), "v\n");
    }

    #[test]
    fn test_number_rendering() {
        assert_eq!(run_pyit("pya 2.50\npya -3\npya +7\npya -0\npya .5\npya 1e3"), "2.5\n-3\n7\n0\n0.5\n1000\n");
    }

    #[test]
    fn test_non_numeric_spellings_stay_text() {
        assert_eq!(run_pyit("pya inf\npya NaN\npya 1,000\npya 0x10"), "inf\nNaN\n1,000\n0x10\n");
    }

    #[test]
    fn test_overflowing_literals_stay_text() {
        assert_eq!(run_pyit("pya 1e400\npya -1e400"), "1e400\n-1e400\n");
        assert_eq!(Interpreter::new().evaluate("1e400"), Value::Text("1e400".into()));
        assert_eq!(Value::parse_number("1e308"), Some(1e308));
    }

    #[test]
    fn test_declaration() {
        let mut interp = Interpreter::new();
        let output = interp.execute("thatmat x = 5\npya x");
        assert_eq!(output, "Variable 'x' declared with value: 5\n5\n");
        assert_eq!(interp.variable("x"), Some(&Value::Number(5.0)));
    }

    #[test]
    fn test_redeclaration_overwrites() {
        let output = run_pyit("thatmat v = 5\nthatmat v = 7\npya v");
        assert_eq!(
            output,
            "Variable 'v' declared with value: 5\nVariable 'v' declared with value: 7\n7\n"
        );
    }

    #[test]
    fn test_declare_from_variable_copies_value() {
        let output = run_pyit("thatmat a = hi\nthatmat b = a\nphyay a = 2\npya b\npya a");
        assert_eq!(
            output,
            "Variable 'a' declared with value: hi\n\
             Variable 'b' declared with value: hi\n\
             Variable 'a' assigned new value: 2\n\
             hi\n2\n"
        );
    }

    #[test]
    fn test_assignment_to_undeclared() {
        let mut interp = Interpreter::new();
        let report = interp.run("phyay v = 3");
        assert_eq!(report.output, "Variable 'v' is not defined.\n");
        assert_eq!(report.diagnostics, vec![Diagnostic::UndefinedVariable("v".into())]);
        assert_eq!(interp.variable("v"), None);
        assert_eq!(interp.variables().count(), 0);
    }

    #[test]
    fn test_assignment() {
        let output = run_pyit("thatmat n = 1\nphyay n = word\npya n");
        assert_eq!(
            output,
            "Variable 'n' declared with value: 1\nVariable 'n' assigned new value: word\nword\n"
        );
    }

    #[test]
    fn test_invalid_syntax_diagnostics() {
        let code = "thatmat x=1\nphyay x\npyax\nmahsaw 1 {pya 1}\nakyein many {pya 1}\nlohp getString";
        let output = run_pyit(code);
        assert_eq!(
            output,
            "Invalid variable declaration syntax.\n\
             Invalid assignment syntax.\n\
             Invalid print syntax.\n\
             Invalid conditional syntax: mahsaw 1 {pya 1}\n\
             Invalid loop syntax.\n\
             Invalid function definition syntax.\n"
        );
    }

    #[test]
    fn test_unknown_statement() {
        let mut interp = Interpreter::new();
        let report = interp.run("foo bar");
        assert_eq!(report.output, "Syntax error: foo bar\n");
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].kind(), DiagnosticKind::Unrecognized);
        assert_eq!(interp.variables().count(), 0);
    }

    #[test]
    fn test_errors_do_not_stop_execution() {
        let output = run_pyit("oops\npya 1\nphyay z = 2\npya 2");
        assert_eq!(output, "Syntax error: oops\n1\nVariable 'z' is not defined.\n2\n");
    }

    #[test]
    fn test_blank_lines_and_indentation() {
        assert_eq!(run_pyit("\n\n    pya 1   \n\t\n  pya 2\n"), "1\n2\n");
        assert_eq!(run_pyit(""), "");
    }

    #[test]
    fn test_if_false_takes_else() {
        assert_eq!(run_pyit("mahsaw 0 {pya 1} mahoat {pya 2}"), "2\n");
    }

    #[test]
    fn test_if_true_takes_then() {
        assert_eq!(run_pyit("mahsaw 1 {pya 1} mahoat {pya 2}"), "1\n");
    }

    #[test]
    fn test_if_on_variable_and_text() {
        let code = "thatmat flag = 0\n\
                    mahsaw flag {pya yes} mahoat {pya no}\n\
                    phyay flag = on\n\
                    mahsaw flag {pya yes} mahoat {pya no}\n\
                    mahsaw undeclared {pya text is true} mahoat {pya no}";
        let output = run_pyit(code);
        assert_eq!(
            output,
            "Variable 'flag' declared with value: 0\n\
             no\n\
             Variable 'flag' assigned new value: on\n\
             yes\n\
             text is true\n"
        );
    }

    #[test]
    fn test_untaken_branch_is_not_examined() {
        let report = Interpreter::new().run("mahsaw 1 {pya ok} mahoat {garbage here}");
        assert_eq!(report.output, "ok\n");
        assert!(report.is_clean());
    }

    #[test]
    fn test_taken_branch_reports_errors() {
        assert_eq!(run_pyit("mahsaw 0 {pya ok} mahoat {garbage here}"), "Syntax error: garbage here\n");
    }

    #[test]
    fn test_loop_zero_times() {
        assert_eq!(run_pyit("akyein 0 {pya 1}"), "");
    }

    #[test]
    fn test_loop_three_times() {
        assert_eq!(run_pyit("akyein 3 {pya 1}"), "1\n1\n1\n");
    }

    #[test]
    fn test_block_mutations_are_visible_after() {
        let mut interp = Interpreter::new();
        let output = interp.execute("mahsaw 1 {thatmat inner = 9} mahoat {pya no}\npya inner");
        assert_eq!(output, "Variable 'inner' declared with value: 9\n9\n");
        assert_eq!(interp.variable("inner"), Some(&Value::Number(9.0)));
    }

    #[test]
    fn test_loop_re_evaluates_each_iteration() {
        let code = "thatmat x = 1\n\
                    akyein 2 {mahsaw x {phyay x = 0} mahoat {phyay x = 1}}\n\
                    pya x";
        let output = run_pyit(code);
        assert_eq!(
            output,
            "Variable 'x' declared with value: 1\n\
             Variable 'x' assigned new value: 0\n\
             Variable 'x' assigned new value: 1\n\
             1\n"
        );
    }

    #[test]
    fn test_nested_loops() {
        assert_eq!(run_pyit("akyein 2 {akyein 2 {pya x}}"), "x\nx\nx\nx\n");
    }

    #[test]
    fn test_nested_conditional_in_branch() {
        let output = run_pyit("mahsaw 1 {akyein 2 {pya in}} mahoat {pya out}");
        assert_eq!(output, "in\nin\n");
    }

    #[test]
    fn test_get_string() {
        let mut interp = Interpreter::with_input(ScriptedInput::new(["Mya"]).then_cancel());
        let output = interp.execute("lohp getString()\nlohp getString(ignored, args)");
        assert_eq!(output, "Input received: Mya\nNo input received.\n");
    }

    #[test]
    fn test_get_string_without_input() {
        assert_eq!(run_pyit("lohp getString()"), "No input received.\n");
    }

    #[test]
    fn test_unknown_function() {
        let report = Interpreter::new().run("lohp shout(1, 2)");
        assert_eq!(report.output, "Unknown function: shout\n");
        assert_eq!(report.diagnostics[0].kind(), DiagnosticKind::Semantic);
    }

    #[test]
    fn test_report_counts_nested_statements() {
        let report = Interpreter::new().run("akyein 2 {pya 1}\npya 2");
        assert_eq!(report.statements, 4);
        assert!(report.is_clean());
    }

    #[test]
    fn test_fresh_interpreters_agree() {
        let code = "thatmat a = 1\nakyein 2 {pya a}\nmahsaw a {pya t} mahoat {pya f}\nbad line";
        assert_eq!(run_pyit(code), run_pyit(code));
    }

    #[test]
    fn test_output_log_is_per_run() {
        let mut interp = Interpreter::new();
        assert_eq!(interp.execute("thatmat keep = 4"), "Variable 'keep' declared with value: 4\n");
        assert_eq!(interp.execute("pya keep"), "4\n");
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Number(0.0).is_truthy());
        assert!(!Value::Number(f64::NAN).is_truthy());
        assert!(Value::Number(-0.5).is_truthy());
        assert!(Value::Text("0".into()).is_truthy());
        assert!(!Value::Text(String::new()).is_truthy());
    }
}
