use serde::{Deserialize, Deserializer};

/// Deserializes an optional value, treating `""` as `None`.
///
/// Zoho Books sends empty strings for unset numeric fields such as
/// `tax_percentage` or `exchange_rate` on some records.
pub fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrValue<T> {
        Value(T),
        String(String),
    }

    match Option::<StringOrValue<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(StringOrValue::Value(v)) => Ok(Some(v)),
        Some(StringOrValue::String(s)) if s.is_empty() => Ok(None),
        Some(StringOrValue::String(s)) => Err(serde::de::Error::custom(format!(
            "unexpected string value: {s}"
        ))),
    }
}

/// Deserializes `null` as the type's default, e.g. an empty `Vec`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "empty_string_as_none")]
        rate: Option<Decimal>,
        #[serde(default, deserialize_with = "null_as_default")]
        tags: Vec<String>,
    }

    #[test]
    fn empty_strings_and_nulls() {
        let sample: Sample = serde_json::from_value(json!({ "rate": "", "tags": null })).unwrap();
        assert_eq!(sample.rate, None);
        assert!(sample.tags.is_empty());

        let sample: Sample = serde_json::from_value(json!({ "rate": 12.5, "tags": ["a"] })).unwrap();
        assert_eq!(sample.rate, Some(dec!(12.5)));
        assert_eq!(sample.tags, vec!["a".to_string()]);

        assert!(serde_json::from_value::<Sample>(json!({ "rate": "abc" })).is_err());
    }
}
