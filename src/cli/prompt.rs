//! Yes/no confirmation on the terminal.

use crate::errors::Result;
use std::io::{self, BufRead, Write};

/// Asks `question` on stdout and reads the answer from stdin.
///
/// # Errors
/// Returns an error if the terminal cannot be read or written.
pub fn confirm(question: &str) -> Result<bool> {
    let stdin = io::stdin();
    confirm_with(question, &mut stdin.lock(), &mut io::stdout())
}

/// Asks `question` on `output` and reads one line from `input`.
///
/// Only an explicit yes (`y`, `yes`, `s`, `si`, `sí`) confirms; anything else,
/// including end of input, declines.
///
/// # Errors
/// Returns an error if reading or writing fails.
pub fn confirm_with<R: BufRead, W: Write>(
    question: &str,
    input: &mut R,
    output: &mut W,
) -> Result<bool> {
    write!(output, "{question} [y/N] ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "s" | "si" | "sí"
    ))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn answer(input: &str) -> (bool, String) {
        let mut output = Vec::new();
        let confirmed = confirm_with("Delete?", &mut input.as_bytes(), &mut output).unwrap();
        (confirmed, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_yes_answers_confirm() {
        for input in ["y\n", "YES\n", "sí\n", " s \n"] {
            assert!(answer(input).0, "{input:?} should confirm");
        }
    }

    #[test]
    fn test_anything_else_declines() {
        for input in ["n\n", "\n", "", "maybe\n"] {
            assert!(!answer(input).0, "{input:?} should decline");
        }
    }

    #[test]
    fn test_question_is_written() {
        assert_eq!(answer("n\n").1, "Delete? [y/N] ");
    }
}
