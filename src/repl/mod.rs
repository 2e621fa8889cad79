mod buffer;
mod command;
mod input;

pub use buffer::*;
pub use command::MetaCommand;
pub use input::*;

use std::io::Write;

use crate::classify::{SelectPrefixClassifier, StatementClassifier};
use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::render::{render, OutputMode};
use crate::shortcuts::Shortcuts;

/// Read-eval-print loop: one statement at a time, start to finish.
pub struct Repl<'a, C = SelectPrefixClassifier> {
    dispatcher: Dispatcher<'a, C>,
    shortcuts: Shortcuts,
    mode: OutputMode,
}

impl<'a, C: StatementClassifier> Repl<'a, C> {
    pub fn new(dispatcher: Dispatcher<'a, C>, shortcuts: Shortcuts, mode: OutputMode) -> Self {
        Self {
            dispatcher,
            shortcuts,
            mode,
        }
    }

    /// Runs until the input closes. Statement failures go to `err` and the loop
    /// carries on; only failures of the input or output streams end it early.
    pub async fn run<I, W, E>(&mut self, input: &mut I, out: &mut W, err: &mut E) -> Result<()>
    where
        I: InputSource,
        W: Write,
        E: Write,
    {
        let mut buffer = LineBuffer::new();

        while let Some(line) = input.read_line(buffer.prompt())? {
            let Some(completed) = buffer.push(&line) else {
                continue;
            };

            if let Err(e) = input.remember(&completed.raw) {
                tracing::warn!("couldn't save history: {e}");
            }

            self.handle(&completed.statement, out, err).await?;
        }

        let dropped = buffer.discard();
        if dropped > 0 {
            tracing::debug!(lines = dropped, "discarding unterminated input");
        }
        Ok(())
    }

    /// Handles one complete statement: meta-command, or shortcut expansion
    /// followed by execution and rendering.
    pub async fn handle<W: Write, E: Write>(
        &mut self,
        statement: &str,
        out: &mut W,
        err: &mut E,
    ) -> Result<()> {
        if let Some(command) = MetaCommand::parse(statement) {
            self.apply(command, out, err)?;
            return Ok(());
        }

        let statement = self.shortcuts.expand(statement);
        match self.dispatcher.run(&statement).await {
            Ok(result) => render(out, &result, self.mode)?,
            Err(e) => {
                tracing::debug!(error = %e, "statement failed");
                writeln!(err, "Error: {e}")?;
            }
        }
        out.flush()?;
        Ok(())
    }

    fn apply<W: Write, E: Write>(
        &mut self,
        command: MetaCommand,
        out: &mut W,
        err: &mut E,
    ) -> Result<()> {
        match command {
            MetaCommand::Help => write!(out, "{}", self.shortcuts.help_text())?,
            MetaCommand::SetOutput(mode) => self.mode = mode,
            MetaCommand::ShowOutput => writeln!(out, "output: {}", self.mode.as_str())?,
            MetaCommand::UnknownOutput(mode) => {
                writeln!(err, "Error: unknown output mode '{mode}', expected table or csv")?
            }
        }
        Ok(())
    }
}
