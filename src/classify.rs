#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Produces rows.
    Query,
    /// Produces an affected-row count.
    Mutation,
}

pub trait StatementClassifier {
    fn classify(&self, statement: &str) -> StatementKind;
}

/// Treats a statement as a query only when it starts with `SELECT`.
///
/// This is a plain keyword test, not a parser. Other read-only forms such as
/// `WITH ... SELECT`, `SHOW` or `EXPLAIN` are classified as mutations and run
/// through the execute path, so their rows are not displayed.
#[derive(Debug, Default, Clone, Copy)]
pub struct SelectPrefixClassifier;

const QUERY_KEYWORD: &str = "SELECT";

impl StatementClassifier for SelectPrefixClassifier {
    fn classify(&self, statement: &str) -> StatementKind {
        let statement = statement.trim_start();
        let is_select = statement
            .get(..QUERY_KEYWORD.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(QUERY_KEYWORD));

        if is_select {
            StatementKind::Query
        } else {
            StatementKind::Mutation
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(statement: &str) -> StatementKind {
        SelectPrefixClassifier.classify(statement)
    }

    #[test]
    fn test_select_is_query() {
        assert_eq!(classify("select * from t"), StatementKind::Query);
        assert_eq!(classify("  SELECT 1"), StatementKind::Query);
        assert_eq!(classify("SeLeCt name FROM users"), StatementKind::Query);
    }

    #[test]
    fn test_everything_else_is_mutation() {
        assert_eq!(classify("update t set x=1"), StatementKind::Mutation);
        assert_eq!(classify("insert into t values (1)"), StatementKind::Mutation);
        assert_eq!(classify("WITH x AS (SELECT 1) SELECT * FROM x"), StatementKind::Mutation);
        assert_eq!(classify(""), StatementKind::Mutation);
        assert_eq!(classify("sel"), StatementKind::Mutation);
    }

    #[test]
    fn test_multibyte_prefix_does_not_panic() {
        assert_eq!(classify("séléct 1"), StatementKind::Mutation);
    }
}
