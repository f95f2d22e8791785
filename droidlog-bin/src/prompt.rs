use crossterm::{
    queue,
    style::{Attribute, Print, SetAttribute, SetForegroundColor},
};
use droidlog_core::theme::ACCENT_COLOR;
use std::io::{self, BufRead, Write};

/// interactive questions asked before streaming starts
pub trait Prompter {
    /// Numbered menu. An empty answer picks `default`.
    fn select(&mut self, title: &str, items: &[String], default: usize) -> io::Result<usize>;

    /// free text, trimmed
    fn input(&mut self, title: &str) -> io::Result<String>;

    /// message shown between questions, e.g. why an answer was rejected
    fn notice(&mut self, message: &str) -> io::Result<()>;
}

/// line-based prompter over any reader/writer pair
pub struct TermPrompter<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl TermPrompter<io::StdinLock<'static>, io::Stderr> {
    /// questions go to stderr so stdout only ever carries log lines
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TermPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.output
    }

    fn title(&mut self, title: &str) -> io::Result<()> {
        queue!(
            self.output,
            SetForegroundColor(ACCENT_COLOR),
            SetAttribute(Attribute::Bold),
            Print(title),
            SetAttribute(Attribute::Reset),
        )
    }

    fn read_answer(&mut self) -> io::Result<String> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before an answer was given",
            ));
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Prompter for TermPrompter<R, W> {
    fn select(&mut self, title: &str, items: &[String], default: usize) -> io::Result<usize> {
        if items.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "nothing to choose from",
            ));
        }
        let default = default.min(items.len() - 1);

        self.title(title)?;
        writeln!(self.output)?;
        for (i, item) in items.iter().enumerate() {
            let marker = if i == default { '*' } else { ' ' };
            writeln!(self.output, " {}{:>3}) {}", marker, i + 1, item)?;
        }

        loop {
            write!(self.output, "Choice [{}]: ", default + 1)?;
            let answer = self.read_answer()?;
            if answer.is_empty() {
                return Ok(default);
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=items.len()).contains(&n) => return Ok(n - 1),
                _ => writeln!(
                    self.output,
                    "Please enter a number between 1 and {}.",
                    items.len()
                )?,
            }
        }
    }

    fn input(&mut self, title: &str) -> io::Result<String> {
        self.title(title)?;
        write!(self.output, ": ")?;
        self.read_answer()
    }

    fn notice(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(answers: &str) -> TermPrompter<Cursor<Vec<u8>>, Vec<u8>> {
        TermPrompter::new(Cursor::new(answers.as_bytes().to_vec()), Vec::new())
    }

    fn items() -> Vec<String> {
        vec!["one".into(), "two".into(), "three".into()]
    }

    #[test]
    fn test_select_by_number() {
        let mut p = prompter("2\n");
        assert_eq!(p.select("Pick", &items(), 0).unwrap(), 1);
    }

    #[test]
    fn test_empty_answer_picks_default() {
        let mut p = prompter("\n");
        assert_eq!(p.select("Pick", &items(), 2).unwrap(), 2);
    }

    #[test]
    fn test_out_of_range_reprompts() {
        let mut p = prompter("0\nnine\n4\n3\n");
        assert_eq!(p.select("Pick", &items(), 0).unwrap(), 2);

        let output = String::from_utf8(p.into_output()).unwrap();
        assert_eq!(
            output.matches("Please enter a number between 1 and 3.").count(),
            3
        );
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let mut p = prompter("");
        let err = p.select("Pick", &items(), 0).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_input_is_trimmed() {
        let mut p = prompter("  com.example.app \n");
        assert_eq!(p.input("Package name").unwrap(), "com.example.app");
    }
}
