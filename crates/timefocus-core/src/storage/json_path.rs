//! Dot-separated key access over serde-serializable records.
//!
//! Backs `config get/set` and `settings set`: the record is converted to a
//! JSON tree, the leaf is replaced with a value parsed to match the type of
//! the existing leaf, and the tree is decoded back into the record.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ConfigError;

pub fn get_by_path<'a>(root: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
    if key.is_empty() {
        return None;
    }

    let mut current = root;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

pub fn set_by_path(root: &mut serde_json::Value, key: &str, value: &str) -> Result<(), ConfigError> {
    let unknown = || ConfigError::UnknownKey(key.to_string());
    let invalid = |message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };

    let mut parts = key.split('.').peekable();
    if key.is_empty() {
        return Err(unknown());
    }

    let mut current = root;
    while let Some(part) = parts.next() {
        if parts.peek().is_none() {
            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                ),
                serde_json::Value::Number(_) => {
                    if let Ok(n) = value.parse::<u64>() {
                        serde_json::Value::Number(n.into())
                    } else if let Ok(n) = value.parse::<f64>() {
                        serde_json::Number::from_f64(n)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                    } else {
                        return Err(invalid(format!("cannot parse '{value}' as number")));
                    }
                }
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        current = current.get_mut(part).ok_or_else(unknown)?;
    }

    Err(unknown())
}

/// Read a field of `record` as display text.
pub fn get_field<T: Serialize>(record: &T, key: &str) -> Option<String> {
    let json = serde_json::to_value(record).ok()?;
    match get_by_path(&json, key)? {
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Return a copy of `record` with the field at `key` replaced.
pub fn with_field<T: Serialize + DeserializeOwned>(
    record: &T,
    key: &str,
    value: &str,
) -> Result<T, ConfigError> {
    let mut json =
        serde_json::to_value(record).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
    set_by_path(&mut json, key, value)?;
    serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn updates_nested_bool() {
        let mut tree = json!({"logging": {"filter": "info"}, "notifications": {"desktop": true}});
        set_by_path(&mut tree, "notifications.desktop", "false").unwrap();
        assert_eq!(
            get_by_path(&tree, "notifications.desktop").unwrap(),
            &serde_json::Value::Bool(false)
        );
    }

    #[test]
    fn updates_number_and_string() {
        let mut tree = json!({"focusMinutes": 25, "label": "x"});
        set_by_path(&mut tree, "focusMinutes", "50").unwrap();
        set_by_path(&mut tree, "label", "deep work").unwrap();
        assert_eq!(tree["focusMinutes"], json!(50));
        assert_eq!(tree["label"], json!("deep work"));
    }

    #[test]
    fn rejects_unknown_key() {
        let mut tree = json!({"a": {"b": 1}});
        assert!(matches!(
            set_by_path(&mut tree, "a.c", "2"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            set_by_path(&mut tree, "", "2"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn rejects_invalid_type() {
        let mut tree = json!({"enabled": true});
        assert!(matches!(
            set_by_path(&mut tree, "enabled", "not_a_bool"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn with_field_rejects_values_the_record_cannot_hold() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Minutes {
            value: u32,
        }
        let record = Minutes { value: 5 };
        // Parses as a number, but not as a u32.
        assert!(with_field(&record, "value", "2.5").is_err());
        assert_eq!(with_field(&record, "value", "7").unwrap().value, 7);
        assert_eq!(get_field(&record, "value").as_deref(), Some("5"));
    }
}
