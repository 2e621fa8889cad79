use crate::render::OutputMode;

/// Commands handled by the shell itself and never sent to the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaCommand {
    Help,
    SetOutput(OutputMode),
    ShowOutput,
    UnknownOutput(String),
}

impl MetaCommand {
    /// Recognises `help` and `/out [table|csv]`, case-insensitively.
    pub fn parse(statement: &str) -> Option<Self> {
        let lowered = statement.trim().to_lowercase();
        let mut words = lowered.split_whitespace();

        match (words.next(), words.next(), words.next()) {
            (Some("help"), None, None) => Some(Self::Help),
            (Some("/out"), None, None) => Some(Self::ShowOutput),
            (Some("/out"), Some("table"), None) => Some(Self::SetOutput(OutputMode::Table)),
            (Some("/out"), Some("csv"), None) => Some(Self::SetOutput(OutputMode::Csv)),
            (Some("/out"), Some(_), _) => {
                let arg = lowered.trim_start_matches("/out").trim().to_string();
                Some(Self::UnknownOutput(arg))
            }
            _ => None,
        }
    }
}
