use crate::classify::{SelectPrefixClassifier, StatementClassifier, StatementKind};
use crate::db::{DatabaseConnection, ExecutionResult};
use crate::error::Result;

/// Routes a complete statement to the query or execute path of the connection.
pub struct Dispatcher<'a, C = SelectPrefixClassifier> {
    conn: &'a DatabaseConnection,
    classifier: C,
}

impl<'a> Dispatcher<'a> {
    pub fn new(conn: &'a DatabaseConnection) -> Self {
        Self::with_classifier(conn, SelectPrefixClassifier)
    }
}

impl<'a, C: StatementClassifier> Dispatcher<'a, C> {
    pub fn with_classifier(conn: &'a DatabaseConnection, classifier: C) -> Self {
        Self { conn, classifier }
    }

    /// Executes `statement` once. Driver failures are returned as they are,
    /// nothing is retried.
    pub async fn run(&self, statement: &str) -> Result<ExecutionResult> {
        let sql = strip_terminator(statement);
        let kind = self.classifier.classify(sql);
        tracing::debug!(?kind, "dispatching statement");

        match kind {
            StatementKind::Query => Ok(ExecutionResult::Query(self.conn.query(sql).await?)),
            StatementKind::Mutation => self.conn.execute(sql).await,
        }
    }
}

fn strip_terminator(statement: &str) -> &str {
    statement.trim().trim_end_matches(';').trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    async fn seeded() -> DatabaseConnection {
        let conn = DatabaseConnection::connect("sqlite::memory:").await.unwrap();
        conn.execute("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, score REAL)")
            .await
            .unwrap();
        conn.execute("INSERT INTO users (name, score) VALUES ('ann', 1.5), ('bob', NULL)")
            .await
            .unwrap();
        conn
    }

    #[test]
    fn test_strip_terminator() {
        assert_eq!(strip_terminator(" SELECT 1; "), "SELECT 1");
        assert_eq!(strip_terminator("SELECT 1 ;;"), "SELECT 1");
        assert_eq!(strip_terminator("SELECT 1"), "SELECT 1");
    }

    #[tokio::test]
    async fn test_select_produces_table() {
        let conn = seeded().await;
        let result = Dispatcher::new(&conn)
            .run("select id, name, score from users order by id;")
            .await
            .unwrap();

        let ExecutionResult::Query(table) = result else {
            panic!("expected a query result");
        };
        assert_eq!(table.columns, vec!["id", "name", "score"]);
        assert_eq!(
            table.rows,
            vec![vec!["1", "ann", "1.500000"], vec!["2", "bob", "NULL"]]
        );
        assert_eq!(table.row_count, 2);
    }

    #[tokio::test]
    async fn test_mutation_produces_counts() {
        let conn = seeded().await;
        let result = Dispatcher::new(&conn)
            .run("insert into users (name) values ('cy')")
            .await
            .unwrap();
        assert_eq!(
            result,
            ExecutionResult::Mutation {
                rows_affected: 1,
                last_insert_id: 3
            }
        );
    }

    #[tokio::test]
    async fn test_driver_error_surfaces_and_connection_stays_usable() {
        let conn = seeded().await;
        let dispatcher = Dispatcher::new(&conn);

        let err = dispatcher.run("updat users set name = 'x'").await.unwrap_err();
        assert!(matches!(err, Error::Execution(_)));

        assert!(dispatcher.run("SELECT count(*) FROM users").await.is_ok());
    }

    #[tokio::test]
    async fn test_classifier_is_pluggable() {
        struct AlwaysQuery;
        impl StatementClassifier for AlwaysQuery {
            fn classify(&self, _: &str) -> StatementKind {
                StatementKind::Query
            }
        }

        let conn = seeded().await;
        let result = Dispatcher::with_classifier(&conn, AlwaysQuery)
            .run("WITH n AS (SELECT 7 AS v) SELECT v FROM n")
            .await
            .unwrap();
        let ExecutionResult::Query(table) = result else {
            panic!("expected a query result");
        };
        assert_eq!(table.rows, vec![vec!["7"]]);
    }

    #[tokio::test]
    async fn test_repeated_query_is_identical() {
        let conn = seeded().await;
        let dispatcher = Dispatcher::new(&conn);
        let first = dispatcher.run("SELECT * FROM users ORDER BY id").await.unwrap();
        let second = dispatcher.run("SELECT * FROM users ORDER BY id").await.unwrap();
        assert_eq!(first, second);
    }
}
