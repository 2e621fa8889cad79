use std::io;
use std::path::PathBuf;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::error::{Error, Result};

pub const HISTORY_FILE_NAME: &str = ".sqlsh_history";

/// Where the shell gets its lines from and where finished statements are kept.
pub trait InputSource {
    /// Next line of input, or `None` once the input is closed.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Records a completed statement in history.
    fn remember(&mut self, entry: &str) -> Result<()>;
}

/// Terminal input through rustyline, with an append-only history file.
pub struct TerminalInput {
    editor: DefaultEditor,
    history_path: Option<PathBuf>,
}

impl TerminalInput {
    pub fn new(history_path: Option<PathBuf>) -> Result<Self> {
        let mut editor = DefaultEditor::new().map_err(readline_error)?;
        if let Some(path) = &history_path {
            if let Err(e) = editor.load_history(path) {
                tracing::debug!(path = %path.display(), "no history loaded: {e}");
            }
        }
        Ok(Self {
            editor,
            history_path,
        })
    }

    pub fn default_history_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(HISTORY_FILE_NAME))
    }
}

impl InputSource for TerminalInput {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
            Err(e) => Err(readline_error(e)),
        }
    }

    fn remember(&mut self, entry: &str) -> Result<()> {
        self.editor.add_history_entry(entry).map_err(readline_error)?;
        if let Some(path) = &self.history_path {
            self.editor.append_history(path).map_err(readline_error)?;
        }
        Ok(())
    }
}

fn readline_error(err: ReadlineError) -> Error {
    match err {
        ReadlineError::Io(e) => Error::Io(e),
        other => Error::Io(io::Error::other(other.to_string())),
    }
}
