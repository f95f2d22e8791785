use crossterm::{
    queue,
    style::{Attribute, Print, SetAttribute, SetForegroundColor, SetStyle},
};
use droidlog_core::{AnnotatedLine, LineSink, theme};
use std::io::{self, Write};

/// writes annotated lines to a terminal, one per line
pub struct TerminalSink<W: Write, E: Write> {
    out: W,
    err: E,
    color: bool,
}

impl TerminalSink<io::Stdout, io::Stderr> {
    pub fn stdio(color: bool) -> Self {
        Self::new(io::stdout(), io::stderr(), color)
    }
}

impl<W: Write, E: Write> TerminalSink<W, E> {
    pub fn new(out: W, err: E, color: bool) -> Self {
        Self { out, err, color }
    }

    #[cfg(test)]
    fn into_parts(self) -> (W, E) {
        (self.out, self.err)
    }
}

impl<W: Write, E: Write> LineSink for TerminalSink<W, E> {
    fn emit(&mut self, line: &AnnotatedLine) -> io::Result<()> {
        if self.color {
            queue!(
                self.out,
                SetStyle(theme::level_style(line.level)),
                Print(&line.text),
                SetAttribute(Attribute::Reset),
                Print("\n")
            )?;
        } else {
            writeln!(self.out, "{}", line.text)?;
        }
        // lines arrive slowly, flush so they show up immediately
        self.out.flush()
    }

    fn report_error(&mut self, line: &str) {
        let result = if self.color {
            queue!(
                self.err,
                SetForegroundColor(theme::ERROR_COLOR),
                Print("adb: "),
                Print(line),
                SetAttribute(Attribute::Reset),
                Print("\n")
            )
        } else {
            writeln!(self.err, "adb: {}", line)
        };
        if let Err(e) = result.and_then(|_| self.err.flush()) {
            log::debug!("TerminalSink: could not write to stderr: {}", e);
        }
    }
}
