use serde::Deserialize;

/// Placeholder replaced by the shortcut argument.
pub const SLOT: &str = "%s";

/// A named macro that expands to a full SQL statement.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Shortcut {
    pub name: String,
    pub template: String,
    #[serde(default)]
    pub help: String,
}

impl Shortcut {
    pub fn new(name: &str, template: &str, help: &str) -> Self {
        Self {
            name: name.to_string(),
            template: template.to_string(),
            help: help.to_string(),
        }
    }

    pub fn takes_argument(&self) -> bool {
        self.template.contains(SLOT)
    }

    /// Fills the slot with `arg`. Without an argument the template is returned
    /// untouched, slot included.
    pub fn build(&self, arg: Option<&str>) -> String {
        match arg {
            Some(arg) => self.template.replacen(SLOT, arg, 1),
            None => self.template.clone(),
        }
    }
}

/// Shortcut registry, searched in registration order.
#[derive(Debug, Clone, Default)]
pub struct Shortcuts {
    entries: Vec<Shortcut>,
}

impl Shortcuts {
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                Shortcut::new(
                    "describe",
                    concat!(
                        "SELECT COLUMN_NAME,DATA_TYPE_NAME,LENGTH,IS_NULLABLE, SCHEMA_NAME ",
                        "FROM TABLE_COLUMNS WHERE TABLE_NAME = '%s';",
                    ),
                    "describe TABLE_NAME;  Describes TABLE_NAME",
                ),
                Shortcut::new(
                    "schemas",
                    "SELECT * FROM SCHEMAS;",
                    "schemas; Show all schemas in database.",
                ),
            ],
        }
    }

    pub fn register(&mut self, shortcut: Shortcut) {
        self.entries.push(shortcut);
    }

    /// First shortcut whose name is a prefix of `token`. Unnamed entries never
    /// match.
    pub fn lookup(&self, token: &str) -> Option<&Shortcut> {
        self.entries
            .iter()
            .find(|sc| !sc.name.is_empty() && token.starts_with(sc.name.as_str()))
    }

    /// Rewrites `input` if its first word names a shortcut, otherwise returns
    /// it unchanged, surrounding whitespace included.
    ///
    /// Everything after the first word is the single argument, with `;`
    /// terminators removed. A parameterised shortcut called without an
    /// argument still expands, leaving the slot in place; the database then
    /// rejects the statement.
    pub fn expand(&self, input: &str) -> String {
        let trimmed = input.trim();
        let (token, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((token, rest)) => (token, Some(rest)),
            None => (trimmed, None),
        };

        let Some(shortcut) = self.lookup(token) else {
            return input.to_string();
        };

        let arg = rest
            .map(|r| r.replace(';', ""))
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());

        if arg.is_none() && shortcut.takes_argument() {
            tracing::warn!(shortcut = %shortcut.name, "shortcut called without its argument");
        }

        let statement = shortcut.build(arg.as_deref());
        tracing::info!("running {statement}");
        statement
    }

    pub fn help_text(&self) -> String {
        let mut out = String::from("Help\n");
        for sc in &self.entries {
            out.push_str(&format!("{}\n\tUsage {}\n", sc.name, sc.help));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Shortcuts {
        let mut shortcuts = Shortcuts::default();
        shortcuts.register(Shortcut::new("describe", "DESC %s;", "describe TABLE;"));
        shortcuts.register(Shortcut::new("schemas", "SELECT * FROM SCHEMAS;", "schemas;"));
        shortcuts
    }

    #[test]
    fn test_expand_with_argument() {
        assert_eq!(registry().expand("describe users;"), "DESC users;");
    }

    #[test]
    fn test_expand_without_argument_keeps_slot() {
        assert_eq!(registry().expand("describe"), "DESC %s;");
        assert_eq!(registry().expand("describe ;"), "DESC %s;");
    }

    #[test]
    fn test_expand_no_argument_shortcut() {
        assert_eq!(registry().expand("schemas;"), "SELECT * FROM SCHEMAS;");
        assert_eq!(registry().expand("schemas"), "SELECT * FROM SCHEMAS;");
    }

    #[test]
    fn test_unmatched_input_passes_through() {
        assert_eq!(registry().expand("select * from t"), "select * from t");
        assert_eq!(registry().expand("desc users"), "desc users");
    }

    #[test]
    fn test_unmatched_input_keeps_whitespace() {
        assert_eq!(registry().expand("  select 1  "), "  select 1  ");
        assert_eq!(registry().expand("select\n  1"), "select\n  1");
    }

    #[test]
    fn test_unnamed_shortcut_never_matches() {
        let mut shortcuts = Shortcuts::default();
        shortcuts.register(Shortcut::new("", "DELETE FROM t;", ""));
        assert!(shortcuts.lookup("select").is_none());
        assert_eq!(shortcuts.expand("select 1"), "select 1");
    }

    #[test]
    fn test_first_registered_match_wins() {
        let mut shortcuts = Shortcuts::default();
        shortcuts.register(Shortcut::new("d", "FIRST %s", ""));
        shortcuts.register(Shortcut::new("describe", "SECOND %s", ""));
        assert_eq!(shortcuts.expand("describe t"), "FIRST t");
    }

    #[test]
    fn test_name_is_matched_as_prefix_of_first_word() {
        assert_eq!(registry().expand("describeX users"), "DESC users;");
    }

    #[test]
    fn test_single_slot_only() {
        let sc = Shortcut::new("pair", "SELECT %s, %s", "");
        assert_eq!(sc.build(Some("a")), "SELECT a, %s");
    }

    #[test]
    fn test_help_lists_every_shortcut() {
        let help = Shortcuts::builtin().help_text();
        assert!(help.contains("describe\n\tUsage describe TABLE_NAME;"));
        assert!(help.contains("schemas\n\tUsage schemas; Show all schemas"));
    }
}
