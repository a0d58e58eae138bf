use std::{
    fmt::Display,
    io::{self, BufRead, StdinLock, Stdout, Write},
};

use crossterm::{
    ExecutableCommand, QueueableCommand,
    style::{Attribute, Print, PrintStyledContent, ResetColor, SetAttribute, Stylize},
    tty::IsTty,
};
use serde_json::Value;

use crate::container::schema::SchemaNode;

/// The operator side of a prompt session.
pub trait Prompter {
    /// Shows `question` and blocks until one line of input is available.
    fn ask(&mut self, question: &str) -> io::Result<String>;

    /// Shows an informational line.
    fn say(&mut self, text: &str) -> io::Result<()>;
}

impl<P: Prompter + ?Sized> Prompter for &mut P {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        (**self).ask(question)
    }

    fn say(&mut self, text: &str) -> io::Result<()> {
        (**self).say(text)
    }
}

/// The text shown for a leaf property.
pub struct Question<'a> {
    pub path: &'a str,
    pub node: &'a SchemaNode,
    pub default: &'a Value,
}

impl Display for Question<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "\nAttribute \"{}\": {}\nType: {} (",
            self.path,
            self.node.description.as_deref().unwrap_or_default(),
            self.node.kind.as_deref().unwrap_or_default(),
        )?;
        match self.default {
            Value::String(text) => f.write_str(text)?,
            other => write!(f, "{other}")?,
        }
        f.write_str("): ")
    }
}

/// Line based session over a terminal, the process stdio by default.
///
/// Terminal attributes are reset when the session is dropped.
pub struct TerminalSession<R = StdinLock<'static>, W: Write = Stdout> {
    reader: R,
    writer: W,
    styled: bool,
}

impl TerminalSession {
    pub fn open() -> Self {
        let stdout = io::stdout();
        let styled = stdout.is_tty();
        Self {
            reader: io::stdin().lock(),
            writer: stdout,
            styled,
        }
    }
}

impl<R: BufRead, W: Write> TerminalSession<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            styled: false,
        }
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalSession<R, W> {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        self.writer.queue(Print(question))?;
        self.writer.flush()?;

        let mut line = Vec::new();
        if self.reader.read_until(b'\n', &mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before all questions were answered",
            ));
        }

        let answer = line.strip_suffix(b"\n").unwrap_or(&line);
        let answer = answer.strip_suffix(b"\r").unwrap_or(answer);
        Ok(String::from_utf8_lossy(answer).into_owned())
    }

    fn say(&mut self, text: &str) -> io::Result<()> {
        if self.styled {
            self.writer.queue(PrintStyledContent(text.bold()))?;
        } else {
            self.writer.queue(Print(text))?;
        }
        self.writer.queue(Print("\n"))?;
        self.writer.flush()
    }
}

impl<R, W: Write> Drop for TerminalSession<R, W> {
    fn drop(&mut self) {
        if self.styled {
            let _ = self
                .writer
                .execute(SetAttribute(Attribute::Reset))
                .and_then(|writer| writer.execute(ResetColor));
        }
        let _ = self.writer.flush();
    }
}
