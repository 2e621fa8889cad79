use futures::{Stream, TryStreamExt};

use super::{DbValue, Table};
use crate::error::{Error, Result};

/// Drains a row stream into a fully materialised [`Table`].
///
/// `columns` comes from the statement metadata; an empty list is rejected
/// before the stream is touched. The stream is consumed either way. Any read
/// error aborts the whole table, rows collected so far are dropped.
pub async fn normalize<S, E>(columns: Vec<String>, rows: S) -> Result<Table>
where
    S: Stream<Item = std::result::Result<Vec<DbValue>, E>>,
    E: std::fmt::Display,
{
    if columns.is_empty() {
        return Err(Error::EmptyColumnSet);
    }

    let mut table = Table::new(columns);
    let mut rows = std::pin::pin!(rows);

    while let Some(values) = rows.try_next().await.map_err(Error::execution)? {
        if values.len() != table.columns.len() {
            return Err(Error::Execution(format!(
                "row {} has {} values, expected {}",
                table.row_count + 1,
                values.len(),
                table.columns.len()
            )));
        }
        table.push_row(values.iter().map(DbValue::coerce).collect());
    }

    Ok(table)
}
