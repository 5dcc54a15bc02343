use crate::error::{InstallerError, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Line-based interactive prompts over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Prompt on `output`, reading answers from `input`.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Numbered menu; returns the zero-based index of the chosen option.
    ///
    /// An empty answer picks `default`. Anything that is not a listed number re-prompts.
    pub fn choose(&mut self, title: &str, options: &[String], default: usize) -> Result<usize> {
        loop {
            writeln!(self.output, "{title}")?;
            for (i, opt) in options.iter().enumerate() {
                let marker = if i == default { " (default)" } else { "" };
                writeln!(self.output, "  {}) {opt}{marker}", i + 1)?;
            }
            write!(self.output, "> ")?;
            self.output.flush()?;

            let answer = self.read_line()?;
            if answer.is_empty() {
                return Ok(default);
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(n - 1),
                _ => writeln!(self.output, "Please enter a number between 1 and {}.", options.len())?,
            }
        }
    }

    /// Free-text path; an empty answer means none.
    pub fn path(&mut self, question: &str) -> Result<Option<PathBuf>> {
        write!(self.output, "{question} ")?;
        self.output.flush()?;
        let answer = self.read_line()?;
        Ok((!answer.is_empty()).then(|| PathBuf::from(answer)))
    }

    /// Yes/no question. An empty answer picks `default`.
    pub fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            write!(self.output, "{question} {hint} ")?;
            self.output.flush()?;
            match self.read_line()?.to_ascii_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "Please answer y or n.")?,
            }
        }
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(InstallerError::Prompt {
                message: "input closed".into(),
            });
        }
        Ok(line.trim().to_string())
    }
}
