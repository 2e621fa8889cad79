use chrono::NaiveDateTime;

pub const NULL_TEXT: &str = "NULL";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// A single column value as handed over by a driver adapter.
#[derive(Clone, Debug, PartialEq)]
pub enum DbValue {
    Float(f64),
    Bool(bool),
    Text(String),
    Integer(i64),
    Null,
    /// Raw binary payload, rendered verbatim rather than encoded.
    Bytes(Vec<u8>),
    Timestamp(NaiveDateTime),
    /// A type the adapters do not know how to decode. Holds the driver's type name.
    Other(String),
}

impl DbValue {
    /// Canonical text of the value. Never fails.
    ///
    /// Bytes are interpreted as a raw byte string; invalid UTF-8 sequences are
    /// replaced, so binary columns do not survive a round trip.
    pub fn coerce(&self) -> String {
        match self {
            Self::Float(v) => format!("{v:.6}"),
            Self::Bool(v) => v.to_string(),
            Self::Text(v) => v.clone(),
            Self::Integer(v) => v.to_string(),
            Self::Null => NULL_TEXT.to_string(),
            Self::Bytes(v) => String::from_utf8_lossy(v).into_owned(),
            Self::Timestamp(v) => v.format(TIMESTAMP_FORMAT).to_string(),
            Self::Other(type_name) => format!("TYPE::{type_name}"),
        }
    }
}
