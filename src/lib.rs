//! PyitLang
//!
//! A small keyword-based scripting language. Programs are run line by line:
//! each line starts with a statement keyword (`thatmat`, `phyay`, `pya`,
//! `mahsaw`, `akyein`, `lohp`) and writes to a text log that is returned once
//! the whole program has run. Malformed lines add a diagnostic line to the log
//! and execution carries on.

pub mod pyit;

pub use pyit::{Diagnostic, DiagnosticKind, InputSource, Interpreter, NoInput, Report, ScriptedInput, StdinInput, Value};
