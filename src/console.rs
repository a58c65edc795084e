use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
    tty::IsTty,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Interactive surface the quiz talks to
pub trait Console {
    /// Show `text` and block for one line. `Ok(None)` means input is exhausted.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>>;

    /// Show `text` and block until the user acknowledges it
    fn acknowledge(&mut self, text: &str) -> io::Result<()>;

    /// Wipe the visible output between questions
    fn clear(&mut self) -> io::Result<()>;

    /// Print a line of output
    fn say(&mut self, text: &str) -> io::Result<()>;

    /// `done` of `total` questions have been answered
    fn progress(&mut self, _done: usize, _total: usize) {}
}

/// Production console on stdin/stdout
pub struct TerminalConsole {
    stdin: io::StdinLock<'static>,
    stdout: io::Stdout,
    bar: Option<ProgressBar>,
    interactive: bool,
}

impl TerminalConsole {
    pub fn new() -> Self {
        let stdout = io::stdout();
        let interactive = stdout.is_tty();
        Self {
            stdin: io::stdin().lock(),
            stdout,
            bar: None,
            interactive,
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.stdin.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for TerminalConsole {
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.stdout, "{text}")?;
        self.stdout.flush()?;
        self.read_line()
    }

    fn acknowledge(&mut self, text: &str) -> io::Result<()> {
        write!(self.stdout, "{text}")?;
        self.stdout.flush()?;
        self.read_line().map(|_| ())
    }

    fn clear(&mut self) -> io::Result<()> {
        if self.interactive {
            execute!(self.stdout, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        Ok(())
    }

    fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.stdout, "{text}")
    }

    fn progress(&mut self, done: usize, total: usize) {
        let bar = self.bar.get_or_insert_with(|| {
            let bar = ProgressBar::new(total as u64);
            if let Ok(style) = ProgressStyle::with_template("{bar:30} {pos}/{len} [{elapsed}]") {
                bar.set_style(style);
            }
            bar
        });
        bar.set_position(done as u64);
        if done >= total {
            bar.finish_and_clear();
        }
    }
}

/// Replays canned answers and records what was shown
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    pub prompts: Vec<String>,
    pub acknowledgments: Vec<String>,
    pub output: Vec<String>,
    pub clears: usize,
}

impl ScriptedConsole {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Console for ScriptedConsole {
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        self.prompts.push(text.to_string());
        Ok(self.answers.pop_front())
    }

    fn acknowledge(&mut self, text: &str) -> io::Result<()> {
        self.acknowledgments.push(text.to_string());
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.clears += 1;
        Ok(())
    }

    fn say(&mut self, text: &str) -> io::Result<()> {
        self.output.push(text.to_string());
        Ok(())
    }
}
