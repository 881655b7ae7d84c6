use serde::{Deserialize, Deserializer};

/// Deserializer for PATCH-style nullable fields.
///
/// Update DTOs distinguish three states for a nullable column:
/// key absent (leave unchanged), key explicitly `null` (clear), key present
/// with a value (set). Serde collapses the first two unless the field is
/// `Option<Option<T>>` with this deserializer, which only runs when the key
/// is present and wraps the parsed `Option<T>` in `Some`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use uuid::Uuid;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        parent: Option<Option<Uuid>>,
    }

    #[test]
    fn test_absent_key_means_unchanged() {
        let patch: Patch = serde_json::from_str("{}").unwrap();
        assert!(patch.parent.is_none());
    }

    #[test]
    fn test_explicit_null_means_clear() {
        let patch: Patch = serde_json::from_str(r#"{"parent": null}"#).unwrap();
        assert_eq!(patch.parent, Some(None));
    }

    #[test]
    fn test_value_means_set() {
        let id = Uuid::new_v4();
        let patch: Patch = serde_json::from_str(&format!(r#"{{"parent": "{}"}}"#, id)).unwrap();
        assert_eq!(patch.parent, Some(Some(id)));
    }
}
