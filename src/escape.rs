//! Statement parameter escaping.
//!
//! The engine has no client-side prepared statements on this path;
//! parameters are rendered into SQL literals and substituted for `?`
//! placeholders before the statement is sent. The escaper is an explicit
//! collaborator handed to each cursor, so callers with different quoting
//! needs can supply their own.

use std::fmt::Write as _;

use crate::error::EscapeError;
use crate::value::Value;

/// Renders native values as SQL literals and substitutes them into
/// statements.
pub trait ParamEscaper {
    /// Renders one value as a SQL literal.
    ///
    /// # Errors
    ///
    /// Returns [`EscapeError::Unsupported`] for values that have no literal
    /// form (arrays, maps, structs, opaque cells).
    fn literal(&self, value: &Value) -> Result<String, EscapeError>;

    /// Substitutes `params` for the `?` placeholders in `sql`.
    ///
    /// Placeholders inside single-quoted string literals are left alone.
    ///
    /// # Errors
    ///
    /// Returns [`EscapeError::ParameterCount`] when the number of
    /// placeholders does not match the number of parameters.
    fn substitute(&self, sql: &str, params: &[Value]) -> Result<String, EscapeError> {
        let placeholders = count_placeholders(sql);
        if placeholders != params.len() {
            return Err(EscapeError::ParameterCount {
                placeholders,
                parameters: params.len(),
            });
        }

        let mut out = String::with_capacity(sql.len() + params.len() * 8);
        let mut next = params.iter();
        let mut in_string = false;
        let mut prev = '\0';
        for ch in sql.chars() {
            match ch {
                '\'' if prev != '\\' => {
                    in_string = !in_string;
                    out.push(ch);
                }
                '?' if !in_string => {
                    // The count check above guarantees the iterator holds.
                    if let Some(value) = next.next() {
                        out.push_str(&self.literal(value)?);
                    }
                }
                _ => out.push(ch),
            }
            prev = ch;
        }
        Ok(out)
    }
}

fn count_placeholders(sql: &str) -> usize {
    let mut count = 0;
    let mut in_string = false;
    let mut prev = '\0';
    for ch in sql.chars() {
        match ch {
            '\'' if prev != '\\' => in_string = !in_string,
            '?' if !in_string => count += 1,
            _ => {}
        }
        prev = ch;
    }
    count
}

/// Default escaper matching the engine's string-literal rules: backslash,
/// single quote, CR, LF and TAB are backslash-escaped.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnappyEscaper;

impl ParamEscaper for SnappyEscaper {
    fn literal(&self, value: &Value) -> Result<String, EscapeError> {
        match value {
            Value::Null => Ok("NULL".to_string()),
            Value::Bool(true) => Ok("TRUE".to_string()),
            Value::Bool(false) => Ok("FALSE".to_string()),
            Value::TinyInt(v) => Ok(v.to_string()),
            Value::SmallInt(v) => Ok(v.to_string()),
            Value::Int(v) => Ok(v.to_string()),
            Value::BigInt(v) => Ok(v.to_string()),
            Value::Double(v) => Ok(v.to_string()),
            Value::Decimal(v) => Ok(v.to_string()),
            Value::Date(v) => Ok(format!("DATE '{}'", v.format("%Y-%m-%d"))),
            Value::Time(v) => Ok(format!("TIME '{}'", v.format("%H:%M:%S"))),
            Value::Timestamp(v) => Ok(format!("TIMESTAMP '{}'", v.format("%Y-%m-%d %H:%M:%S%.f"))),
            Value::String(v) | Value::Clob(v) => Ok(quote_string(v)),
            Value::Binary(v) | Value::Blob(v) => Ok(hex_literal(v)),
            other => Err(EscapeError::Unsupported {
                kind: other.type_name(),
            }),
        }
    }
}

fn quote_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}

fn hex_literal(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2 + 3);
    out.push_str("X'");
    for byte in bytes {
        let _ = write!(out, "{byte:02X}");
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn test_string_escaping_rules() {
        let escaper = SnappyEscaper;
        let literal = escaper
            .literal(&Value::String("a\\b'c\rd\ne\tf".to_string()))
            .unwrap();
        assert_eq!(literal, "'a\\\\b\\'c\\rd\\ne\\tf'");
    }

    #[test]
    fn test_scalar_literals() {
        let escaper = SnappyEscaper;
        assert_eq!(escaper.literal(&Value::Null).unwrap(), "NULL");
        assert_eq!(escaper.literal(&Value::Bool(true)).unwrap(), "TRUE");
        assert_eq!(escaper.literal(&Value::Int(-5)).unwrap(), "-5");
        assert_eq!(escaper.literal(&Value::Double(2.5)).unwrap(), "2.5");
        assert_eq!(
            escaper.literal(&Value::Binary(vec![0xDE, 0xAD])).unwrap(),
            "X'DEAD'"
        );
    }

    #[test]
    fn test_temporal_literals() {
        let escaper = SnappyEscaper;
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(
            escaper.literal(&Value::Date(date)).unwrap(),
            "DATE '2024-01-15'"
        );
        let time = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        assert_eq!(escaper.literal(&Value::Time(time)).unwrap(), "TIME '09:30:00'");
        let ts = date.and_hms_opt(9, 30, 0).unwrap();
        assert_eq!(
            escaper.literal(&Value::Timestamp(ts)).unwrap(),
            "TIMESTAMP '2024-01-15 09:30:00'"
        );
    }

    #[test]
    fn test_substitute_positional_parameters() {
        let escaper = SnappyEscaper;
        let sql = escaper
            .substitute(
                "SELECT * FROM t WHERE id = ? AND name = ?",
                &[Value::Int(3), Value::String("o'brien".to_string())],
            )
            .unwrap();
        assert_eq!(sql, "SELECT * FROM t WHERE id = 3 AND name = 'o\\'brien'");
    }

    #[test]
    fn test_substitute_ignores_placeholders_inside_strings() {
        let escaper = SnappyEscaper;
        let sql = escaper
            .substitute("SELECT '?' , ? FROM t", &[Value::Int(1)])
            .unwrap();
        assert_eq!(sql, "SELECT '?' , 1 FROM t");
    }

    #[test]
    fn test_substitute_rejects_count_mismatch() {
        let escaper = SnappyEscaper;
        let err = escaper
            .substitute("SELECT ? FROM t", &[Value::Int(1), Value::Int(2)])
            .unwrap_err();
        assert_eq!(
            err,
            EscapeError::ParameterCount {
                placeholders: 1,
                parameters: 2,
            }
        );
    }

    #[test]
    fn test_container_parameters_are_rejected() {
        let escaper = SnappyEscaper;
        let err = escaper.literal(&Value::Array(vec![])).unwrap_err();
        assert_eq!(err, EscapeError::Unsupported { kind: "ARRAY" });
    }
}
