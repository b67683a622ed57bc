//! Wire shape of one corpus line.

use serde::Deserialize;
use serde_json::{Map, Value};

/// One JSON object as it appears in the corpus.
///
/// List fields are optional; `null` and absence both mean "contributes
/// nothing". Any other key lands in `rest`, where the disease properties are
/// picked up and everything else (e.g. `_id`) is ignored.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawRecord {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub symptom: Option<Vec<String>>,
    /// Accompanying diseases; the misspelling is the corpus key.
    #[serde(default)]
    pub acompany: Option<Vec<String>>,
    #[serde(default)]
    pub cure_department: Option<Vec<String>>,
    #[serde(default)]
    pub common_drug: Option<Vec<String>>,
    #[serde(default)]
    pub recommand_drug: Option<Vec<String>>,
    #[serde(default)]
    pub not_eat: Option<Vec<String>>,
    #[serde(default)]
    pub do_eat: Option<Vec<String>>,
    #[serde(default)]
    pub recommand_eat: Option<Vec<String>>,
    #[serde(default)]
    pub check: Option<Vec<String>>,
    #[serde(default)]
    pub drug_detail: Option<Vec<String>>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl RawRecord {
    /// The disease name, if the record carries one as a string.
    pub fn disease_name(&self) -> Option<&str> {
        self.name.as_ref().and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_lists_are_none() {
        let raw: RawRecord = serde_json::from_str(r#"{"name":"流感"}"#).unwrap();
        assert_eq!(raw.disease_name(), Some("流感"));
        assert!(raw.symptom.is_none());
        assert!(raw.drug_detail.is_none());
    }

    #[test]
    fn test_null_list_is_none() {
        let raw: RawRecord = serde_json::from_str(r#"{"name":"流感","symptom":null}"#).unwrap();
        assert!(raw.symptom.is_none());
    }

    #[test]
    fn test_unknown_keys_land_in_rest() {
        let raw: RawRecord =
            serde_json::from_str(r#"{"_id":{"$oid":"5bb57"},"name":"流感","desc":"急性"}"#)
                .unwrap();
        assert!(raw.rest.contains_key("_id"));
        assert_eq!(raw.rest.get("desc"), Some(&Value::String("急性".into())));
    }

    #[test]
    fn test_non_string_name() {
        let raw: RawRecord = serde_json::from_str(r#"{"name":42}"#).unwrap();
        assert_eq!(raw.disease_name(), None);
    }

    #[test]
    fn test_wrong_list_type_is_an_error() {
        let result: Result<RawRecord, _> =
            serde_json::from_str(r#"{"name":"a","symptom":"发热"}"#);
        assert!(result.is_err());
    }
}
