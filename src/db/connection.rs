use futures::StreamExt;
use sqlx::mysql::MySqlConnectOptions;
use sqlx::pool::PoolOptions;
use sqlx::postgres::PgConnectOptions;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Column, Connection as _, Executor, Row, Statement};

use super::decode::{decode_mysql_value, decode_pg_value, decode_sqlite_value};
use super::{normalize, DbValue, ExecutionResult, Table};
use crate::config::{Configuration, Driver};
use crate::error::{Error, Result};

/// Every statement goes through a single pooled connection.
const MAX_CONNECTIONS: u32 = 1;

/// Pool options for one long-lived session. The connection is never reaped
/// for idleness or age and is handed out without a liveness check, so it is
/// only replaced if the driver reports it broken.
fn session_pool<DB: sqlx::Database>() -> PoolOptions<DB> {
    PoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .idle_timeout(None)
        .max_lifetime(None)
        .test_before_acquire(false)
}

pub enum DatabaseConnection {
    Postgres(sqlx::PgPool),
    MySql(sqlx::MySqlPool),
    Sqlite(sqlx::SqlitePool),
}

impl DatabaseConnection {
    /// Opens the connection described by `config` and checks it with a ping.
    pub async fn open(config: &Configuration) -> Result<Self> {
        let conn = match &config.url {
            Some(url) => Self::connect(url).await?,
            None => Self::connect_with(config).await?,
        };
        conn.ping().await?;
        tracing::info!(backend = conn.backend_name(), "connected");
        Ok(conn)
    }

    pub async fn connect(connection_string: &str) -> Result<Self> {
        let conn = if connection_string.starts_with("postgres://")
            || connection_string.starts_with("postgresql://")
        {
            let pool = session_pool::<sqlx::Postgres>()
                .connect(connection_string)
                .await
                .map_err(connection_error)?;
            Self::Postgres(pool)
        } else if connection_string.starts_with("mysql://") {
            let pool = session_pool::<sqlx::MySql>()
                .connect(connection_string)
                .await
                .map_err(connection_error)?;
            Self::MySql(pool)
        } else if connection_string.starts_with("sqlite:") || connection_string.ends_with(".db") {
            let conn_str = if connection_string.starts_with("sqlite:") {
                connection_string.to_string()
            } else {
                format!("sqlite://{}", connection_string)
            };
            let pool = session_pool::<sqlx::Sqlite>()
                .connect(&conn_str)
                .await
                .map_err(connection_error)?;
            Self::Sqlite(pool)
        } else {
            return Err(Error::Connection(format!(
                "unsupported database url: {connection_string}"
            )));
        };
        Ok(conn)
    }

    pub async fn connect_with(config: &Configuration) -> Result<Self> {
        let conn = match config.driver {
            Driver::Postgres => {
                let options = PgConnectOptions::new()
                    .host(&config.hostname)
                    .port(config.port())
                    .username(&config.username)
                    .password(&config.password)
                    .database(&config.database);
                let pool = session_pool::<sqlx::Postgres>()
                    .connect_with(options)
                    .await
                    .map_err(connection_error)?;
                Self::Postgres(pool)
            }
            Driver::MySql => {
                let options = MySqlConnectOptions::new()
                    .host(&config.hostname)
                    .port(config.port())
                    .username(&config.username)
                    .password(&config.password)
                    .database(&config.database);
                let pool = session_pool::<sqlx::MySql>()
                    .connect_with(options)
                    .await
                    .map_err(connection_error)?;
                Self::MySql(pool)
            }
            Driver::Sqlite => {
                let options = SqliteConnectOptions::new().filename(&config.database);
                let pool = session_pool::<sqlx::Sqlite>()
                    .connect_with(options)
                    .await
                    .map_err(connection_error)?;
                Self::Sqlite(pool)
            }
        };
        Ok(conn)
    }

    pub async fn ping(&self) -> Result<()> {
        let pinged = match self {
            Self::Postgres(pool) => {
                let mut conn = pool.acquire().await.map_err(connection_error)?;
                conn.ping().await
            }
            Self::MySql(pool) => {
                let mut conn = pool.acquire().await.map_err(connection_error)?;
                conn.ping().await
            }
            Self::Sqlite(pool) => {
                let mut conn = pool.acquire().await.map_err(connection_error)?;
                conn.ping().await
            }
        };
        pinged.map_err(connection_error)
    }

    pub async fn close(&self) {
        match self {
            Self::Postgres(pool) => pool.close().await,
            Self::MySql(pool) => pool.close().await,
            Self::Sqlite(pool) => pool.close().await,
        }
        tracing::info!(backend = self.backend_name(), "connection closed");
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::MySql(_) => "mysql",
            Self::Sqlite(_) => "sqlite",
        }
    }

    /// Runs a row-producing statement and normalizes its result set.
    ///
    /// Columns are taken from the prepared statement, so an empty result still
    /// carries its header.
    pub async fn query(&self, sql: &str) -> Result<Table> {
        match self {
            Self::Postgres(pool) => {
                let statement = pool.prepare(sql).await?;
                let columns = column_names(statement.columns());
                let width = columns.len();
                let rows = statement
                    .query()
                    .fetch(pool)
                    .map(|row| row.and_then(|row| decode_row(&row, width, decode_pg_value)));
                normalize(columns, rows).await
            }
            Self::MySql(pool) => {
                let statement = pool.prepare(sql).await?;
                let columns = column_names(statement.columns());
                let width = columns.len();
                let rows = statement
                    .query()
                    .fetch(pool)
                    .map(|row| row.and_then(|row| decode_row(&row, width, decode_mysql_value)));
                normalize(columns, rows).await
            }
            Self::Sqlite(pool) => {
                let statement = pool.prepare(sql).await?;
                let columns = column_names(statement.columns());
                let width = columns.len();
                let rows = statement
                    .query()
                    .fetch(pool)
                    .map(|row| row.and_then(|row| decode_row(&row, width, decode_sqlite_value)));
                normalize(columns, rows).await
            }
        }
    }

    /// Runs a statement for its side effects.
    ///
    /// PostgreSQL has no last-insert-id; it is reported as 0 there.
    pub async fn execute(&self, sql: &str) -> Result<ExecutionResult> {
        let (rows_affected, last_insert_id) = match self {
            Self::Postgres(pool) => {
                let done = pool.execute(sql).await?;
                (done.rows_affected(), 0)
            }
            Self::MySql(pool) => {
                let done = pool.execute(sql).await?;
                let last_insert_id = i64::try_from(done.last_insert_id()).map_err(|_| {
                    Error::Execution(format!(
                        "last insert id {} does not fit a signed 64-bit integer",
                        done.last_insert_id()
                    ))
                })?;
                (done.rows_affected(), last_insert_id)
            }
            Self::Sqlite(pool) => {
                let done = pool.execute(sql).await?;
                (done.rows_affected(), done.last_insert_rowid())
            }
        };

        Ok(ExecutionResult::Mutation {
            rows_affected,
            last_insert_id,
        })
    }
}

fn connection_error(err: sqlx::Error) -> Error {
    Error::Connection(err.to_string())
}

fn column_names<C: Column>(columns: &[C]) -> Vec<String> {
    columns.iter().map(|c| c.name().to_string()).collect()
}

fn decode_row<R: Row>(
    row: &R,
    width: usize,
    decode: fn(&R, usize) -> std::result::Result<DbValue, sqlx::Error>,
) -> std::result::Result<Vec<DbValue>, sqlx::Error> {
    (0..width).map(|idx| decode(row, idx)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory() -> DatabaseConnection {
        DatabaseConnection::connect("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_pool_holds_one_long_lived_session() {
        let DatabaseConnection::Sqlite(pool) = memory().await else {
            panic!("expected a sqlite pool");
        };
        let options = pool.options();
        assert_eq!(options.get_max_connections(), 1);
        assert_eq!(options.get_idle_timeout(), None);
        assert_eq!(options.get_max_lifetime(), None);
        assert!(!options.get_test_before_acquire());
    }

    #[tokio::test]
    async fn test_session_state_survives_between_statements() {
        let conn = memory().await;
        conn.execute("CREATE TEMP TABLE scratch (x INTEGER)").await.unwrap();
        conn.execute("INSERT INTO scratch VALUES (7)").await.unwrap();
        let table = conn.query("SELECT x FROM scratch").await.unwrap();
        assert_eq!(table.rows, vec![vec!["7"]]);
    }

    #[tokio::test]
    async fn test_unsupported_url_is_connection_error() {
        let err = DatabaseConnection::connect("oracle://db").await.err().unwrap();
        assert!(matches!(err, Error::Connection(_)));
    }

    #[tokio::test]
    async fn test_missing_sqlite_file_is_connection_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = Configuration {
            driver: Driver::Sqlite,
            database: dir.path().join("absent.db").display().to_string(),
            ..Configuration::default()
        };
        let err = DatabaseConnection::open(&config).await.err().unwrap();
        assert!(matches!(err, Error::Connection(_)));
    }

    #[tokio::test]
    async fn test_ping_and_close() {
        let conn = memory().await;
        conn.ping().await.unwrap();
        assert_eq!(conn.backend_name(), "sqlite");
        conn.close().await;
    }

    #[tokio::test]
    async fn test_execute_reports_rows_and_last_id() {
        let conn = memory().await;
        conn.execute("CREATE TABLE t (id INTEGER PRIMARY KEY, x INTEGER)")
            .await
            .unwrap();
        conn.execute("INSERT INTO t (x) VALUES (10)").await.unwrap();

        let result = conn.execute("INSERT INTO t (x) VALUES (20)").await.unwrap();
        assert_eq!(
            result,
            ExecutionResult::Mutation {
                rows_affected: 1,
                last_insert_id: 2
            }
        );

        let result = conn.execute("UPDATE t SET x = 0").await.unwrap();
        assert!(matches!(
            result,
            ExecutionResult::Mutation { rows_affected: 2, .. }
        ));
    }

    #[tokio::test]
    async fn test_query_with_no_rows_keeps_header() {
        let conn = memory().await;
        conn.execute("CREATE TABLE t (id INTEGER, name TEXT)").await.unwrap();

        let table = conn.query("SELECT id, name FROM t").await.unwrap();
        assert_eq!(table.columns, vec!["id", "name"]);
        assert_eq!(table.row_count, 0);
    }

    #[tokio::test]
    async fn test_query_driver_error_is_execution_error() {
        let conn = memory().await;
        let err = conn.query("SELECT * FROM missing").await.unwrap_err();
        match err {
            Error::Execution(msg) => assert!(msg.contains("missing")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
