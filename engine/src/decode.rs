//! Semantic decoding of raw row values.
//!
//! The adapter hands back only `Null`, `Integer`, `Real`, and `Text`;
//! each field's declared semantic type drives promotion into the typed
//! value the caller sees. Temporal types parse from their canonical text
//! forms. A value that cannot be decoded is a hard error naming the
//! column — the metadata said one thing and the row another.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use data_domain_core::{
    DATE_FORMAT, DATETIME_FORMAT, FieldMeta, FieldType, TIME_FORMAT, Value,
};

use crate::error::{EngineError, Result};

/// Decodes one raw value according to its field's semantic type.
pub(crate) fn decode_field(field: &FieldMeta, raw: &Value) -> Result<Value> {
    let mismatch = || EngineError::ValueDecode {
        column: field.column.clone(),
        expected: field.field_type,
    };

    match (field.field_type, raw) {
        (_, Value::Null) => Ok(Value::Null),
        (FieldType::Number, Value::Integer(_) | Value::Real(_)) => Ok(raw.clone()),
        // SQLite's dynamic typing lets numbers land in text columns
        (FieldType::String, Value::Text(_)) => Ok(raw.clone()),
        (FieldType::String, Value::Integer(n)) => Ok(Value::Text(n.to_string())),
        (FieldType::String, Value::Real(n)) => Ok(Value::Text(n.to_string())),
        (FieldType::Date, Value::Text(s)) => NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(Value::Date)
            .map_err(|_| mismatch()),
        (FieldType::DateTime, Value::Text(s)) => {
            NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
                .map(Value::DateTime)
                .map_err(|_| mismatch())
        }
        (FieldType::Time, Value::Text(s)) => NaiveTime::parse_from_str(s, TIME_FORMAT)
            .map(Value::Time)
            .map_err(|_| mismatch()),
        _ => Err(mismatch()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(field_type: FieldType) -> FieldMeta {
        FieldMeta {
            id: None,
            code: "f".into(),
            column: "f".into(),
            name: "F".into(),
            placeholder: None,
            field_type,
            identifier: false,
            hidden: false,
            mandatory: false,
            generated: false,
        }
    }

    #[test]
    fn test_null_passes_for_every_type() {
        for ty in [
            FieldType::String,
            FieldType::Number,
            FieldType::Date,
            FieldType::DateTime,
            FieldType::Time,
        ] {
            assert_eq!(decode_field(&field(ty), &Value::Null).unwrap(), Value::Null);
        }
    }

    #[test]
    fn test_number_accepts_integers_and_reals() {
        let f = field(FieldType::Number);
        assert_eq!(
            decode_field(&f, &Value::Integer(3)).unwrap(),
            Value::Integer(3)
        );
        assert_eq!(decode_field(&f, &Value::Real(1.5)).unwrap(), Value::Real(1.5));
        assert!(decode_field(&f, &Value::Text("3".into())).is_err());
    }

    #[test]
    fn test_string_renders_numeric_scalars() {
        let f = field(FieldType::String);
        assert_eq!(
            decode_field(&f, &Value::Integer(42)).unwrap(),
            Value::Text("42".into())
        );
        assert_eq!(
            decode_field(&f, &Value::Text("x".into())).unwrap(),
            Value::Text("x".into())
        );
    }

    #[test]
    fn test_date_parses_canonical_text() {
        let f = field(FieldType::Date);
        let decoded = decode_field(&f, &Value::Text("1767-07-11".into())).unwrap();
        assert_eq!(
            decoded,
            Value::Date(NaiveDate::from_ymd_opt(1767, 7, 11).unwrap())
        );

        let err = decode_field(&f, &Value::Text("11.07.1767".into())).unwrap_err();
        assert!(matches!(
            err,
            EngineError::ValueDecode {
                expected: FieldType::Date,
                ..
            }
        ));
    }

    #[test]
    fn test_datetime_and_time_parse_canonical_text() {
        let dt = decode_field(
            &field(FieldType::DateTime),
            &Value::Text("2024-01-31 13:45:00".into()),
        )
        .unwrap();
        assert!(matches!(dt, Value::DateTime(_)));

        let t = decode_field(&field(FieldType::Time), &Value::Text("13:45:00".into())).unwrap();
        assert!(matches!(t, Value::Time(_)));
    }
}
