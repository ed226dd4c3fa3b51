//! User input capability handed to the interpreter

use std::collections::VecDeque;
use std::io::{BufRead, Write};
use tracing::warn;

/// Source of user-supplied text for `getString`.
///
/// Requests block until answered. `None` means no value was given
/// (cancelled, end of input, nothing scripted).
pub trait InputSource {
    fn request_input(&mut self, prompt: &str) -> Option<String>;
}

impl<T: InputSource + ?Sized> InputSource for Box<T> {
    fn request_input(&mut self, prompt: &str) -> Option<String> {
        (**self).request_input(prompt)
    }
}

/// Never yields a value
#[derive(Clone, Copy, Debug, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn request_input(&mut self, _prompt: &str) -> Option<String> {
        None
    }
}

/// Canned answers handed out in order; `None` once exhausted
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    answers: VecDeque<Option<String>>,
}

impl ScriptedInput {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(|a| Some(a.into())).collect(),
        }
    }

    /// Queue a cancelled request
    pub fn then_cancel(mut self) -> Self {
        self.answers.push_back(None);
        self
    }

    #[cfg(test)]
    pub(crate) fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl InputSource for ScriptedInput {
    fn request_input(&mut self, _prompt: &str) -> Option<String> {
        self.answers.pop_front().flatten()
    }
}

/// Line-oriented terminal input: the prompt goes to `prompt_out`, the
/// answer is one line from `reader` without its line ending.
pub struct StdinInput<R, W> {
    reader: R,
    prompt_out: W,
}

impl<R: BufRead, W: Write> StdinInput<R, W> {
    pub fn new(reader: R, prompt_out: W) -> Self {
        Self { reader, prompt_out }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> (R, W) {
        (self.reader, self.prompt_out)
    }
}

impl<R: BufRead, W: Write> InputSource for StdinInput<R, W> {
    fn request_input(&mut self, prompt: &str) -> Option<String> {
        let prompted = write!(self.prompt_out, "{}", prompt).and_then(|_| self.prompt_out.flush());
        if let Err(err) = prompted {
            warn!(%err, "failed to write input prompt");
        }

        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                let len = line.trim_end_matches(['\r', '\n']).len();
                line.truncate(len);
                Some(line)
            }
            Err(err) => {
                warn!(%err, "failed to read input");
                None
            }
        }
    }
}
