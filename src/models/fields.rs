//! Serde helpers for Odoo wire values.
//!
//! Odoo encodes "no value" as `false` for every field type, and relational
//! fields as a `[id, "Display Name"]` pair. The helpers in this module map
//! those encodings onto `Option`, [`NaiveDate`] and [`Decimal`].

use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

/// The date format Odoo uses for `date` fields.
pub const ODOO_DATE_FORMAT: &str = "%Y-%m-%d";

/// A many-to-one reference as returned by `read`: the target id plus its
/// display name.
///
/// # Example
///
/// ```
/// use colillas::models::Many2One;
///
/// let company = Many2One::new(1, "Empresa Uno S.A.");
/// assert_eq!(company.name, "Empresa Uno S.A.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Many2One {
    /// Id of the referenced record.
    pub id: i64,
    /// Display name of the referenced record.
    pub name: String,
}

impl Many2One {
    /// Creates a reference from an id and display name.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRelation {
    Pair(i64, String),
    Flag(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawText {
    Text(String),
    Flag(IgnoredAny),
}

/// `[id, "name"]` | `false` | `null` as `Option<Many2One>`.
pub mod many2one {
    use super::*;

    /// Deserializes a relational field.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Many2One>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<RawRelation>::deserialize(deserializer)?;
        Ok(match raw {
            Some(RawRelation::Pair(id, name)) => Some(Many2One { id, name }),
            Some(RawRelation::Flag(_)) | None => None,
        })
    }

    /// Serializes a relational field back into Odoo's encoding.
    pub fn serialize<S>(value: &Option<Many2One>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(relation) => (relation.id, relation.name.as_str()).serialize(serializer),
            None => serializer.serialize_bool(false),
        }
    }
}

/// `"YYYY-MM-DD"` | `""` | `false` | `null` as `Option<NaiveDate>`.
///
/// Text that is not a `YYYY-MM-DD` date is logged and read as `None`.
pub mod date {
    use super::*;

    /// Deserializes a date field.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<RawText>::deserialize(deserializer)? {
            Some(RawText::Text(text)) if !text.is_empty() => {
                match NaiveDate::parse_from_str(&text, ODOO_DATE_FORMAT) {
                    Ok(date) => Ok(Some(date)),
                    Err(e) => {
                        warn!(value = %text, error = %e, "Ignoring unparseable date");
                        Ok(None)
                    }
                }
            }
            _ => Ok(None),
        }
    }

    /// Serializes a date field back into Odoo's encoding.
    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format(ODOO_DATE_FORMAT).to_string()),
            None => serializer.serialize_bool(false),
        }
    }
}

/// `"text"` | `false` | `null` as `String` (empty when unset).
pub mod text {
    use super::*;

    /// Deserializes a char field.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<RawText>::deserialize(deserializer)? {
            Some(RawText::Text(text)) => text,
            _ => String::new(),
        })
    }
}

/// JSON number as [`Decimal`].
pub mod amount {
    use super::*;
    use serde::de::Error as _;

    /// Deserializes a float field into a decimal.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Decimal::from_f64(value)
            .ok_or_else(|| D::Error::custom(format!("amount {} is not representable", value)))
    }
}
