mod connection;
mod decode;
mod normalize;
mod value;

pub use connection::*;
pub use normalize::normalize;
pub use value::*;

/// Fully materialised, text-only result of a query.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub row_count: usize,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: vec![],
            row_count: 0,
        }
    }

    fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
        self.row_count += 1;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExecutionResult {
    Query(Table),
    Mutation {
        rows_affected: u64,
        last_insert_id: i64,
    },
}
