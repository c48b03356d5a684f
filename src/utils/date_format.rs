use serde::{self, Deserialize, Deserializer, Serializer};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse a Zoho Books date (`YYYY-MM-DD`).
///
/// Timestamps such as `2024-01-15T10:00:00+0530` are accepted as well; only
/// the date part is kept.
pub fn parse_zoho_date(date_str: &str) -> Result<Date, String> {
    let date_part = date_str.split('T').next().unwrap_or(date_str);
    Date::parse(date_part, DATE_FORMAT)
        .map_err(|e| format!("Failed to parse date '{date_str}': {e}"))
}

/// Format a date the way Zoho Books expects it in request bodies.
pub fn format_zoho_date(date: Date) -> Result<String, time::error::Format> {
    date.format(DATE_FORMAT)
}

// Serialization module for time::Date
pub mod zoho_date_format {
    use super::{Date, Deserialize, Deserializer, Serializer, format_zoho_date, parse_zoho_date, serde};

    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = format_zoho_date(*date).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let date_str = String::deserialize(deserializer)?;
        parse_zoho_date(&date_str).map_err(serde::de::Error::custom)
    }
}

// Optional date serialization module
pub mod zoho_date_format_option {
    use super::{Date, Deserialize, Deserializer, Serializer, format_zoho_date, serde};

    #[allow(clippy::ref_option)]
    pub fn serialize<S>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => {
                let formatted = format_zoho_date(*date).map_err(serde::ser::Error::custom)?;
                serializer.serialize_str(&formatted)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            // Zoho sends "" for unset dates
            Some(s) if !s.is_empty() => super::parse_zoho_date(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use time::macros::date;

    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    struct Dated {
        #[serde(with = "zoho_date_format")]
        date: Date,
        #[serde(default, with = "zoho_date_format_option")]
        due_date: Option<Date>,
    }

    #[test]
    fn parses_plain_and_timestamp_dates() {
        assert_eq!(parse_zoho_date("2024-01-15").unwrap(), date!(2024 - 01 - 15));
        assert_eq!(
            parse_zoho_date("2024-01-15T10:00:00+0530").unwrap(),
            date!(2024 - 01 - 15)
        );
        assert!(parse_zoho_date("15/01/2024").is_err());
    }

    #[test]
    fn empty_optional_dates_are_none() {
        let dated: Dated = serde_json::from_value(json!({ "date": "2024-02-01", "due_date": "" })).unwrap();
        assert_eq!(dated.date, date!(2024 - 02 - 01));
        assert_eq!(dated.due_date, None);

        let value = serde_json::to_value(&dated).unwrap();
        assert_eq!(value, json!({ "date": "2024-02-01", "due_date": null }));
    }
}
