//! The human boundary.
//!
//! Every decision the reconciliation needs comes from an [`Operator`]. The
//! engine owns the validation and re-prompt loops; an operator only relays
//! text. Loops have no retry cap: the operator ends them by answering
//! correctly or by cancelling.

use std::collections::VecDeque;

/// The operator ended the session instead of answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

pub trait Operator {
    /// Show `prompt` and block until the operator answers.
    fn ask(&mut self, prompt: &str) -> Result<String, Cancelled>;

    /// Show an informational message.
    fn tell(&mut self, message: &str);
}

/// Ask a yes/no question until the answer is one of `yes|y|no|n`
/// (case-insensitive).
pub fn ask_yes_no(operator: &mut dyn Operator, prompt: &str) -> Result<bool, Cancelled> {
    loop {
        let answer = operator.ask(prompt)?;
        match answer.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" => return Ok(true),
            "no" | "n" => return Ok(false),
            _ => operator.tell("Enter yes or no"),
        }
    }
}

/// Operator that replays canned answers, recording everything shown.
/// Running out of answers counts as cancelling.
#[derive(Debug, Default)]
pub struct ScriptedOperator {
    answers: VecDeque<String>,
    transcript: Vec<String>,
}

impl ScriptedOperator {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    /// Prompts and messages, in the order they were shown.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Operator for ScriptedOperator {
    fn ask(&mut self, prompt: &str) -> Result<String, Cancelled> {
        self.transcript.push(prompt.to_string());
        self.answers.pop_front().ok_or(Cancelled)
    }

    fn tell(&mut self, message: &str) {
        self.transcript.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_no_accepts_any_case() {
        let mut op = ScriptedOperator::new(["YES", "n", " Y "]);
        assert!(ask_yes_no(&mut op, "?").unwrap());
        assert!(!ask_yes_no(&mut op, "?").unwrap());
        assert!(ask_yes_no(&mut op, "?").unwrap());
    }

    #[test]
    fn yes_no_reprompts_on_garbage() {
        let mut op = ScriptedOperator::new(["maybe", "", "no"]);
        assert!(!ask_yes_no(&mut op, "Duplicates?").unwrap());
        let hints = op.transcript().iter().filter(|t| *t == "Enter yes or no").count();
        assert_eq!(hints, 2);
    }

    #[test]
    fn exhausted_script_cancels() {
        let mut op = ScriptedOperator::new(Vec::<String>::new());
        assert_eq!(ask_yes_no(&mut op, "?"), Err(Cancelled));
    }
}
