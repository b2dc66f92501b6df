use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Date format stamped on every new record.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Wall-clock format stamped on every new record, e.g. `07:45 PM`.
pub const TIME_FORMAT: &str = "%I:%M %p";

/// A single logged meal, as persisted in the meal store.
///
/// Records are immutable once written. Older files may hold rows without a
/// `username` or `date`, amounts stored as strings, or fields of the wrong
/// type, so reading is lenient: no single field can fail a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealRecord {
    #[serde(
        default,
        deserialize_with = "lenient_owner",
        skip_serializing_if = "Option::is_none"
    )]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub calories: i64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub protein: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub time: String,
    /// A stored `null` reads the same as a missing date.
    #[serde(
        default,
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<String>,
}

impl MealRecord {
    /// Creates a record owned by `username`, stamped with the date and time of `now`.
    pub fn new(username: impl Into<String>, entry: MealEntry, now: NaiveDateTime) -> Self {
        Self {
            username: Some(username.into()),
            name: entry.name,
            calories: entry.calories,
            protein: entry.protein,
            time: now.format(TIME_FORMAT).to_string(),
            date: Some(now.format(DATE_FORMAT).to_string()),
        }
    }

    /// Returns true if this record belongs to `username`.
    ///
    /// Rows without an owner belong to nobody.
    pub fn is_owned_by(&self, username: &str) -> bool {
        self.username.as_deref() == Some(username)
    }

    /// The record's date, falling back to `today` for rows written before
    /// dates were stored.
    pub fn date_or<'a>(&'a self, today: &'a str) -> &'a str {
        self.date.as_deref().unwrap_or(today)
    }
}

impl fmt::Display for MealRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} kcal, {} g protein",
            self.time, self.name, self.calories, self.protein
        )
    }
}

/// A meal as submitted by a user, before it is stamped and owned.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MealEntry {
    pub name: String,
    pub calories: i64,
    pub protein: i64,
}

impl MealEntry {
    pub fn new(name: impl Into<String>, calories: i64, protein: i64) -> Self {
        Self {
            name: name.into(),
            calories,
            protein,
        }
    }

    /// Builds an entry from raw form fields.
    ///
    /// Missing or non-numeric amounts become 0; there is no rejection path.
    pub fn from_form(name: Option<&str>, calories: Option<&str>, protein: Option<&str>) -> Self {
        Self {
            name: name.unwrap_or_default().to_string(),
            calories: calories.map(coerce_amount).unwrap_or(0),
            protein: protein.map(coerce_amount).unwrap_or(0),
        }
    }
}

/// Parses a user-supplied amount, treating anything that is not a signed
/// integer as 0. Negative values pass through unchanged.
pub fn coerce_amount(text: &str) -> i64 {
    text.trim().parse().unwrap_or(0)
}

fn amount_from_value(value: &Value) -> i64 {
    match value {
        // Floats truncate toward zero; out-of-range values saturate.
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => coerce_amount(s),
        _ => 0,
    }
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(amount_from_value(&value))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Owners must be strings; any other value belongs to nobody.
fn lenient_owner<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Non-string dates keep their JSON text and so form a day of their own.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => Some(other.to_string()),
    })
}
