//! Uniform point-of-interest record emitted once per store.

use serde::{Deserialize, Serialize};

/// Upstream store identifier, copied verbatim in whichever JSON type the
/// source used. Integers, large unsigned ids and floats all stay numeric.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoreRef {
    Number(serde_json::Number),
    Text(String),
}

impl std::fmt::Display for StoreRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreRef::Number(n) => write!(f, "{n}"),
            StoreRef::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A store location normalized for the output sink.
///
/// Optional fields are omitted from serialized output when absent, never
/// written as `null` or an empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiRecord {
    pub name: String,
    #[serde(rename = "ref")]
    pub store_ref: StoreRef,
    pub addr_full: String,
    pub city: String,
    pub state: String,
    pub postcode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// URL of the search response that produced this record.
    pub website: String,
    pub lat: f64,
    pub lon: f64,
    /// OSM-style weekly schedule, e.g. `"Mo-Su 10:00-22:00"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> PoiRecord {
        PoiRecord {
            name: "Insomnia Cookies - Union Square".to_string(),
            store_ref: StoreRef::Number(118.into()),
            addr_full: "50 E 13th St".to_string(),
            city: "New York".to_string(),
            state: "NY".to_string(),
            postcode: "10003".to_string(),
            phone: None,
            website: "https://insomniacookies.com/locations/searchStores".to_string(),
            lat: 40.7340,
            lon: -73.9910,
            opening_hours: None,
        }
    }

    #[test]
    fn absent_optional_fields_are_omitted() {
        let value = serde_json::to_value(sample_record()).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("phone"));
        assert!(!obj.contains_key("opening_hours"));
        assert_eq!(obj["ref"], serde_json::json!(118));
    }

    #[test]
    fn present_optional_fields_are_serialized() {
        let mut record = sample_record();
        record.phone = Some("(212) 555-0100".to_string());
        record.opening_hours = Some("Mo-Su 10:00-03:00".to_string());
        let value = serde_json::to_value(record).unwrap();
        assert_eq!(value["phone"], "(212) 555-0100");
        assert_eq!(value["opening_hours"], "Mo-Su 10:00-03:00");
    }

    #[test]
    fn store_ref_preserves_json_type() {
        let numeric: StoreRef = serde_json::from_value(serde_json::json!(42)).unwrap();
        let text: StoreRef = serde_json::from_value(serde_json::json!("42")).unwrap();
        assert_eq!(numeric, StoreRef::Number(42.into()));
        assert_eq!(text, StoreRef::Text("42".to_string()));
        assert_eq!(serde_json::to_value(&text).unwrap(), serde_json::json!("42"));
        assert_eq!(numeric.to_string(), text.to_string());
    }

    #[test]
    fn store_ref_keeps_non_integer_numbers_numeric() {
        let float: StoreRef = serde_json::from_value(serde_json::json!(12.5)).unwrap();
        let big: StoreRef = serde_json::from_value(serde_json::json!(u64::MAX)).unwrap();
        assert_eq!(serde_json::to_value(&float).unwrap(), serde_json::json!(12.5));
        assert_eq!(serde_json::to_value(&big).unwrap(), serde_json::json!(u64::MAX));
    }

    #[test]
    fn store_ref_keeps_text_verbatim() {
        let text: StoreRef = serde_json::from_value(serde_json::json!(" 0118 ")).unwrap();
        assert_eq!(text, StoreRef::Text(" 0118 ".to_string()));
        assert_eq!(text.to_string(), " 0118 ");
    }
}
