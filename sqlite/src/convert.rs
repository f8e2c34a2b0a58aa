//! Conversions between core value types and SQLite rows.
//!
//! Maps [`FieldType`] onto SQLite column types, [`FieldValue`] onto bound
//! parameter values, and result rows back into [`Record`]s in statement
//! column order.

use entity_schema_core::{FieldType, FieldValue, Record};
use rusqlite::types::ValueRef;

/// Returns the SQLite column type for a declared field type.
pub(crate) fn sql_type(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Text => "TEXT",
        FieldType::Integer => "INTEGER",
        FieldType::Real => "REAL",
        FieldType::Blob => "BLOB",
    }
}

/// Converts a field value into an owned SQLite parameter value.
pub(crate) fn to_sql(value: &FieldValue) -> rusqlite::types::Value {
    match value {
        FieldValue::Null => rusqlite::types::Value::Null,
        FieldValue::Integer(i) => rusqlite::types::Value::Integer(*i),
        FieldValue::Real(f) => rusqlite::types::Value::Real(*f),
        FieldValue::Text(s) => rusqlite::types::Value::Text(s.clone()),
        FieldValue::Blob(b) => rusqlite::types::Value::Blob(b.clone()),
    }
}

/// Converts a raw SQLite cell back into a field value.
pub(crate) fn from_sql(value: ValueRef<'_>) -> FieldValue {
    match value {
        ValueRef::Null => FieldValue::Null,
        ValueRef::Integer(i) => FieldValue::Integer(i),
        ValueRef::Real(f) => FieldValue::Real(f),
        ValueRef::Text(t) => FieldValue::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => FieldValue::Blob(b.to_vec()),
    }
}

/// Reads a result row into a [`Record`], preserving statement column order.
pub(crate) fn row_to_record(
    row: &rusqlite::Row<'_>,
    column_names: &[String],
) -> rusqlite::Result<Record> {
    let mut columns = Vec::with_capacity(column_names.len());
    for (index, name) in column_names.iter().enumerate() {
        columns.push((name.clone(), from_sql(row.get_ref(index)?)));
    }
    Ok(Record::from_columns(columns))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_type_mapping() {
        assert_eq!(sql_type(FieldType::Text), "TEXT");
        assert_eq!(sql_type(FieldType::Integer), "INTEGER");
        assert_eq!(sql_type(FieldType::Real), "REAL");
        assert_eq!(sql_type(FieldType::Blob), "BLOB");
    }

    #[test]
    fn test_value_round_trip() {
        let original = FieldValue::Text("hello".to_string());
        let sql = to_sql(&original);
        let back = from_sql(rusqlite::types::ValueRef::from(&sql));
        assert_eq!(back, original);

        assert_eq!(
            from_sql(rusqlite::types::ValueRef::from(&to_sql(&FieldValue::Null))),
            FieldValue::Null
        );
    }
}
