use serde_json::json;

use super::*;

const WEBSITE: &str = "https://insomniacookies.com/locations/searchStores";

fn full_store() -> Value {
    json!({
        "store_info": {
            "id": 118,
            "name": "  Union Square ",
            "address": "50 E 13th St\n",
            "city": " New York",
            "state": "NY ",
            "zip": " 10003 ",
            "phone": "(212) 555-0100",
            "store_lat": "40.7128",
            "store_lon": "-74.0060",
            "store_open": "10:00 AM",
            "store_close": "10:00 PM"
        }
    })
}

fn without(field: &str) -> Value {
    let mut store = full_store();
    store["store_info"]
        .as_object_mut()
        .unwrap()
        .remove(field);
    store
}

fn with(field: &str, value: Value) -> Value {
    let mut store = full_store();
    store["store_info"][field] = value;
    store
}

// -----------------------------------------------------------------------
// validate_store
// -----------------------------------------------------------------------

#[test]
fn validate_store_trims_required_strings() {
    let store = validate_store(&full_store()).unwrap();
    assert_eq!(store.name, "Union Square");
    assert_eq!(store.address, "50 E 13th St");
    assert_eq!(store.city, "New York");
    assert_eq!(store.state, "NY");
    assert_eq!(store.postcode, "10003");
}

#[test]
fn validate_store_parses_coordinates_from_strings() {
    let store = validate_store(&full_store()).unwrap();
    assert!((store.lat - 40.7128).abs() < f64::EPSILON);
    assert!((store.lon - -74.0060).abs() < f64::EPSILON);
}

#[test]
fn latitude_round_trips_through_string_formatting() {
    let store = validate_store(&full_store()).unwrap();
    let reparsed: f64 = store.lat.to_string().parse().unwrap();
    assert!((reparsed - 40.7128).abs() < f64::EPSILON);
}

#[test]
fn validate_store_accepts_numeric_coordinates() {
    let store = validate_store(&with("store_lat", json!(40.5))).unwrap();
    assert!((store.lat - 40.5).abs() < f64::EPSILON);
}

#[test]
fn validate_store_rejects_non_numeric_latitude() {
    let err = validate_store(&with("store_lat", json!("north-ish"))).unwrap_err();
    assert!(
        matches!(
            err,
            ScraperError::InvalidCoordinate { ref store_ref, field: "store_lat", ref value }
                if store_ref == "118" && value == "north-ish"
        ),
        "expected InvalidCoordinate(store_lat), got: {err:?}"
    );
}

#[test]
fn validate_store_rejects_non_finite_longitude() {
    let err = validate_store(&with("store_lon", json!("NaN"))).unwrap_err();
    assert!(matches!(
        err,
        ScraperError::InvalidCoordinate { field: "store_lon", .. }
    ));
}

#[test]
fn validate_store_rejects_missing_latitude() {
    let err = validate_store(&without("store_lat")).unwrap_err();
    assert!(matches!(
        err,
        ScraperError::MissingField { field: "store_lat", .. }
    ));
}

#[test]
fn validate_store_rejects_each_missing_required_field() {
    for field in ["name", "address", "city", "state", "zip"] {
        let err = validate_store(&without(field)).unwrap_err();
        assert!(
            matches!(err, ScraperError::MissingField { field: f, .. } if f == field),
            "expected MissingField({field}), got: {err:?}"
        );
    }
}

#[test]
fn validate_store_keeps_blank_required_field_as_empty() {
    let store = validate_store(&with("city", json!("   "))).unwrap();
    assert_eq!(store.city, "");
}

#[test]
fn normalize_store_with_empty_zip_keeps_record() {
    let record = normalize_store(&with("zip", json!("")), WEBSITE).unwrap();
    assert_eq!(record.postcode, "");
    assert_eq!(record.store_ref, StoreRef::Number(118.into()));
}

#[test]
fn validate_store_treats_null_required_field_as_missing() {
    let err = validate_store(&with("city", Value::Null)).unwrap_err();
    assert!(matches!(err, ScraperError::MissingField { field: "city", .. }));
}

#[test]
fn validate_store_treats_non_string_required_field_as_missing() {
    let err = validate_store(&with("zip", json!(10003))).unwrap_err();
    assert!(matches!(err, ScraperError::MissingField { field: "zip", .. }));
}

#[test]
fn validate_store_rejects_missing_id() {
    let err = validate_store(&without("id")).unwrap_err();
    assert!(matches!(
        err,
        ScraperError::MissingField { ref store_ref, field: "id" } if store_ref == "<unknown>"
    ));
}

#[test]
fn validate_store_rejects_entry_without_store_info() {
    let err = validate_store(&json!({"id": 1})).unwrap_err();
    assert!(matches!(
        err,
        ScraperError::MissingField { field: "store_info", .. }
    ));
}

#[test]
fn validate_store_keeps_numeric_ref_numeric() {
    let store = validate_store(&full_store()).unwrap();
    assert_eq!(store.store_ref, StoreRef::Number(118.into()));
}

#[test]
fn validate_store_keeps_string_ref_string() {
    let store = validate_store(&with("id", json!("0118"))).unwrap();
    assert_eq!(store.store_ref, StoreRef::Text("0118".to_string()));
}

#[test]
fn validate_store_keeps_padded_string_ref_verbatim() {
    let store = validate_store(&with("id", json!(" 0118 "))).unwrap();
    assert_eq!(store.store_ref, StoreRef::Text(" 0118 ".to_string()));
}

#[test]
fn validate_store_rejects_blank_string_ref() {
    let err = validate_store(&with("id", json!("  "))).unwrap_err();
    assert!(matches!(err, ScraperError::MissingField { field: "id", .. }));
}

#[test]
fn float_ref_serializes_as_number() {
    let record = normalize_store(&with("id", json!(12.5)), WEBSITE).unwrap();
    let value = serde_json::to_value(&record).unwrap();
    assert!(value["ref"].is_number(), "ref was {}", value["ref"]);
    assert_eq!(value["ref"], json!(12.5));
}

#[test]
fn ref_above_i64_range_serializes_as_number() {
    let record = normalize_store(&with("id", json!(u64::MAX)), WEBSITE).unwrap();
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["ref"], json!(u64::MAX));
}

#[test]
fn validate_store_treats_blank_phone_as_absent() {
    let store = validate_store(&with("phone", json!(" "))).unwrap();
    assert_eq!(store.phone, None);
}

// -----------------------------------------------------------------------
// map_store / normalize_store
// -----------------------------------------------------------------------

#[test]
fn normalize_store_builds_full_record() {
    let record = normalize_store(&full_store(), WEBSITE).unwrap();
    assert_eq!(record.name, "Union Square");
    assert_eq!(record.store_ref, StoreRef::Number(118.into()));
    assert_eq!(record.addr_full, "50 E 13th St");
    assert_eq!(record.city, "New York");
    assert_eq!(record.state, "NY");
    assert_eq!(record.postcode, "10003");
    assert_eq!(record.phone.as_deref(), Some("(212) 555-0100"));
    assert_eq!(record.website, WEBSITE);
    assert_eq!(record.opening_hours.as_deref(), Some("Mo-Su 10:00-22:00"));
}

#[test]
fn normalize_store_without_phone_omits_field() {
    let record = normalize_store(&without("phone"), WEBSITE).unwrap();
    assert_eq!(record.phone, None);

    let value = serde_json::to_value(&record).unwrap();
    assert!(value.get("phone").is_none());
}

#[test]
fn normalize_store_with_null_phone_omits_field() {
    let record = normalize_store(&with("phone", Value::Null), WEBSITE).unwrap();
    assert_eq!(record.phone, None);
}

#[test]
fn normalize_store_without_close_time_omits_opening_hours() {
    let record = normalize_store(&with("store_close", json!("")), WEBSITE).unwrap();
    assert_eq!(record.opening_hours, None);

    let value = serde_json::to_value(&record).unwrap();
    assert!(value.get("opening_hours").is_none());
}

#[test]
fn normalize_store_with_malformed_hours_keeps_record() {
    let record = normalize_store(&with("store_open", json!("whenever")), WEBSITE).unwrap();
    assert_eq!(record.opening_hours, None);
    assert_eq!(record.name, "Union Square");
}

// -----------------------------------------------------------------------
// normalize_stores
// -----------------------------------------------------------------------

#[test]
fn normalize_stores_skips_malformed_entries_and_counts_them() {
    let stores = vec![
        full_store(),
        with("store_lon", json!("west")),
        without("name"),
        with("id", json!(119)),
    ];
    let normalized = normalize_stores(&stores, WEBSITE, "NY");
    assert_eq!(normalized.records.len(), 2);
    assert_eq!(normalized.skipped, 2);
    assert_eq!(normalized.records[1].store_ref, StoreRef::Number(119.into()));
}

#[test]
fn normalize_stores_of_empty_list_is_empty() {
    let normalized = normalize_stores(&[], WEBSITE, "WY");
    assert!(normalized.records.is_empty());
    assert_eq!(normalized.skipped, 0);
}
