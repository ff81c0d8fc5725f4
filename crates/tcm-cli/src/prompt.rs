//! Line-oriented prompts for interactive commands.
//!
//! Every prompt accepts `:back` and `:quit`; end of input counts as quit.
//! An empty answer keeps the current value.

use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

/// Answer to a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply<T> {
    Value(T),
    Back,
    Quit,
}

pub struct Prompter<R> {
    lines: Lines<R>,
}

impl Prompter<BufReader<Stdin>> {
    /// Prompter reading from standard input.
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> Prompter<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Next raw line, `None` at end of input.
    pub async fn line(&mut self) -> io::Result<Option<String>> {
        self.lines.next_line().await
    }

    /// Ask for a text value, showing the current one.
    pub async fn ask(&mut self, label: &str, current: &str) -> io::Result<Reply<String>> {
        if current.is_empty() {
            show(&format!("{label}: "))?;
        } else {
            show(&format!("{label} [{current}]: "))?;
        }
        self.answer(current).await
    }

    /// Ask for a secret; the current value is never shown.
    pub async fn ask_secret(&mut self, label: &str, current: &str) -> io::Result<Reply<String>> {
        if current.is_empty() {
            show(&format!("{label}: "))?;
        } else {
            show(&format!("{label} [keep]: "))?;
        }
        self.answer(current).await
    }

    /// Ask a yes/no question until the answer parses.
    pub async fn ask_yes_no(&mut self, label: &str, current: bool) -> io::Result<Reply<bool>> {
        let hint = if current { "Y/n" } else { "y/N" };
        loop {
            show(&format!("{label} [{hint}]: "))?;
            let reply = match self.answer("").await? {
                Reply::Value(answer) => answer,
                Reply::Back => return Ok(Reply::Back),
                Reply::Quit => return Ok(Reply::Quit),
            };
            match parse_yes_no(&reply) {
                Some(value) => return Ok(Reply::Value(value)),
                None if reply.is_empty() => return Ok(Reply::Value(current)),
                None => println!("Please answer y or n."),
            }
        }
    }

    async fn answer(&mut self, current: &str) -> io::Result<Reply<String>> {
        let Some(line) = self.lines.next_line().await? else {
            println!();
            return Ok(Reply::Quit);
        };
        let line = line.trim();
        Ok(match line {
            ":back" => Reply::Back,
            ":quit" => Reply::Quit,
            "" => Reply::Value(current.to_string()),
            _ => Reply::Value(line.to_string()),
        })
    }
}

fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

fn show(prompt: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(prompt.as_bytes())?;
    stdout.flush()
}
