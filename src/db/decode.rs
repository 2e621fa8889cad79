//! Driver adapters: turn one column of a driver row into a [`DbValue`].
//!
//! Each backend reports its own type names, so every adapter switches on the
//! name first and falls back to a generic textual decode when the name is not
//! recognised or the typed decode is rejected. Only a failure to read the raw
//! column is an error.

use sqlx::types::chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::{Column, ColumnIndex, Decode, Row, Type, TypeInfo, ValueRef};

use super::DbValue;

pub fn decode_pg_value(row: &sqlx::postgres::PgRow, idx: usize) -> Result<DbValue, sqlx::Error> {
    let vr = row.try_get_raw(idx)?;
    if vr.is_null() {
        return Ok(DbValue::Null);
    }

    let type_info = vr.type_info().into_owned();
    let type_name = type_info.name();

    match type_name {
        "BOOL" => {
            if let Ok(v) = row.try_get::<bool, _>(idx) {
                return Ok(DbValue::Bool(v));
            }
        }
        "INT2" | "SMALLINT" | "SMALLSERIAL" => {
            if let Ok(v) = row.try_get::<i16, _>(idx) {
                return Ok(DbValue::Integer(v.into()));
            }
        }
        "INT4" | "INT" | "INTEGER" | "SERIAL" => {
            if let Ok(v) = row.try_get::<i32, _>(idx) {
                return Ok(DbValue::Integer(v.into()));
            }
        }
        "INT8" | "BIGINT" | "BIGSERIAL" => {
            if let Ok(v) = row.try_get::<i64, _>(idx) {
                return Ok(DbValue::Integer(v));
            }
        }
        "FLOAT4" | "REAL" => {
            if let Ok(v) = row.try_get::<f32, _>(idx) {
                return Ok(DbValue::Float(v.into()));
            }
        }
        "FLOAT8" | "DOUBLE PRECISION" => {
            if let Ok(v) = row.try_get::<f64, _>(idx) {
                return Ok(DbValue::Float(v));
            }
        }
        "NUMERIC" | "DECIMAL" => {
            if let Ok(v) = row.try_get::<sqlx::types::BigDecimal, _>(idx) {
                return Ok(DbValue::Text(v.to_string()));
            }
        }
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "INET" | "CIDR" => {
            if let Ok(v) = row.try_get::<String, _>(idx) {
                return Ok(DbValue::Text(v));
            }
        }
        "UUID" => {
            if let Ok(v) = row.try_get::<sqlx::types::Uuid, _>(idx) {
                return Ok(DbValue::Text(v.to_string()));
            }
        }
        "DATE" => {
            if let Ok(v) = row.try_get::<NaiveDate, _>(idx) {
                return Ok(DbValue::Text(v.to_string()));
            }
        }
        "TIME" => {
            if let Ok(v) = row.try_get::<NaiveTime, _>(idx) {
                return Ok(DbValue::Text(v.to_string()));
            }
        }
        "TIMESTAMP" => {
            if let Ok(v) = row.try_get::<NaiveDateTime, _>(idx) {
                return Ok(DbValue::Timestamp(v));
            }
        }
        "TIMESTAMPTZ" => {
            if let Ok(v) = row.try_get::<DateTime<Utc>, _>(idx) {
                return Ok(DbValue::Timestamp(v.naive_utc()));
            }
        }
        "JSON" | "JSONB" => {
            if let Ok(v) = row.try_get::<sqlx::types::JsonValue, _>(idx) {
                return Ok(DbValue::Text(v.to_string()));
            }
        }
        "BYTEA" => {
            if let Ok(v) = row.try_get::<Vec<u8>, _>(idx) {
                return Ok(DbValue::Bytes(v));
            }
        }
        _ => {}
    }

    Ok(decode_fallback(row, idx, type_name))
}

pub fn decode_mysql_value(row: &sqlx::mysql::MySqlRow, idx: usize) -> Result<DbValue, sqlx::Error> {
    let vr = row.try_get_raw(idx)?;
    if vr.is_null() {
        return Ok(DbValue::Null);
    }

    let type_info = vr.type_info().into_owned();
    let type_name = type_info.name();

    match type_name {
        "BOOLEAN" => {
            if let Ok(v) = row.try_get::<bool, _>(idx) {
                return Ok(DbValue::Bool(v));
            }
        }
        "TINYINT" | "SMALLINT" | "INT" | "MEDIUMINT" | "BIGINT" | "YEAR" => {
            if let Ok(v) = row.try_get::<i64, _>(idx) {
                return Ok(DbValue::Integer(v));
            }
        }
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "INT UNSIGNED" | "MEDIUMINT UNSIGNED"
        | "BIGINT UNSIGNED" => {
            if let Ok(v) = row.try_get::<u64, _>(idx) {
                return Ok(match i64::try_from(v) {
                    Ok(v) => DbValue::Integer(v),
                    Err(_) => DbValue::Text(v.to_string()),
                });
            }
        }
        "FLOAT" => {
            if let Ok(v) = row.try_get::<f32, _>(idx) {
                return Ok(DbValue::Float(v.into()));
            }
        }
        "DOUBLE" => {
            if let Ok(v) = row.try_get::<f64, _>(idx) {
                return Ok(DbValue::Float(v));
            }
        }
        "DECIMAL" => {
            if let Ok(v) = row.try_get::<sqlx::types::BigDecimal, _>(idx) {
                return Ok(DbValue::Text(v.to_string()));
            }
        }
        "VARCHAR" | "CHAR" | "TEXT" | "TINYTEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM" | "SET" => {
            if let Ok(v) = row.try_get::<String, _>(idx) {
                return Ok(DbValue::Text(v));
            }
        }
        "DATE" => {
            if let Ok(v) = row.try_get::<NaiveDate, _>(idx) {
                return Ok(DbValue::Text(v.to_string()));
            }
        }
        "TIME" => {
            if let Ok(v) = row.try_get::<NaiveTime, _>(idx) {
                return Ok(DbValue::Text(v.to_string()));
            }
        }
        "DATETIME" | "TIMESTAMP" => {
            if let Ok(v) = row.try_get::<NaiveDateTime, _>(idx) {
                return Ok(DbValue::Timestamp(v));
            }
        }
        "JSON" => {
            if let Ok(v) = row.try_get::<sqlx::types::JsonValue, _>(idx) {
                return Ok(DbValue::Text(v.to_string()));
            }
        }
        "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BINARY" | "VARBINARY" => {
            if let Ok(v) = row.try_get::<Vec<u8>, _>(idx) {
                return Ok(DbValue::Bytes(v));
            }
        }
        _ => {}
    }

    Ok(decode_fallback(row, idx, type_name))
}

/// SQLite stores values dynamically, so the declared column type is consulted
/// first for booleans and date-times and the storage class decides the rest.
pub fn decode_sqlite_value(
    row: &sqlx::sqlite::SqliteRow,
    idx: usize,
) -> Result<DbValue, sqlx::Error> {
    let vr = row.try_get_raw(idx)?;
    if vr.is_null() {
        return Ok(DbValue::Null);
    }

    let storage = vr.type_info().into_owned();
    let declared = row.column(idx).type_info().name().to_ascii_uppercase();

    match declared.as_str() {
        "BOOLEAN" | "BOOL" => {
            if let Ok(v) = row.try_get::<bool, _>(idx) {
                return Ok(DbValue::Bool(v));
            }
        }
        "DATETIME" | "TIMESTAMP" => {
            if let Ok(v) = row.try_get::<NaiveDateTime, _>(idx) {
                return Ok(DbValue::Timestamp(v));
            }
        }
        _ => {}
    }

    match storage.name() {
        "INTEGER" => {
            if let Ok(v) = row.try_get::<i64, _>(idx) {
                return Ok(DbValue::Integer(v));
            }
        }
        "REAL" => {
            if let Ok(v) = row.try_get::<f64, _>(idx) {
                return Ok(DbValue::Float(v));
            }
        }
        "TEXT" => {
            if let Ok(v) = row.try_get::<String, _>(idx) {
                return Ok(DbValue::Text(v));
            }
        }
        "BLOB" => {
            if let Ok(v) = row.try_get::<Vec<u8>, _>(idx) {
                return Ok(DbValue::Bytes(v));
            }
        }
        _ => {}
    }

    Ok(decode_fallback(row, idx, storage.name()))
}

fn decode_fallback<'r, R>(row: &'r R, idx: usize, type_name: &str) -> DbValue
where
    R: Row,
    usize: ColumnIndex<R>,
    String: Decode<'r, R::Database> + Type<R::Database>,
    i64: Decode<'r, R::Database> + Type<R::Database>,
    f64: Decode<'r, R::Database> + Type<R::Database>,
    bool: Decode<'r, R::Database> + Type<R::Database>,
{
    row.try_get::<String, _>(idx)
        .map(DbValue::Text)
        .or_else(|_| row.try_get::<i64, _>(idx).map(DbValue::Integer))
        .or_else(|_| row.try_get::<f64, _>(idx).map(DbValue::Float))
        .or_else(|_| row.try_get::<bool, _>(idx).map(DbValue::Bool))
        .unwrap_or_else(|_| DbValue::Other(type_name.to_string()))
}
