//! Terminal operator: prompts on stderr, answers from stdin.

use std::io::{BufRead, Write};

use flightcheck_recon::{Cancelled, Operator};

/// Answers that end the session instead of answering the prompt.
const CANCEL_WORDS: &[&str] = &["abort", "quit", "q"];

pub struct ConsoleOperator<R, W> {
    input: R,
    output: W,
}

impl ConsoleOperator<std::io::StdinLock<'static>, std::io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> ConsoleOperator<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Operator for ConsoleOperator<R, W> {
    fn ask(&mut self, prompt: &str) -> Result<String, Cancelled> {
        let _ = write!(self.output, "{prompt}");
        let _ = self.output.flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => {
                let _ = writeln!(self.output);
                Err(Cancelled)
            }
            Ok(_) => {
                let answer = line.trim_end_matches(['\r', '\n']).to_string();
                if CANCEL_WORDS.iter().any(|w| answer.trim().eq_ignore_ascii_case(w)) {
                    Err(Cancelled)
                } else {
                    Ok(answer)
                }
            }
        }
    }

    fn tell(&mut self, message: &str) {
        let _ = writeln!(self.output, "{message}");
    }
}
