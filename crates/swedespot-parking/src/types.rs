//! Open-data response types.
//!
//! The rowstore endpoint returns `{ "results": [ ... ] }`. Field values are
//! mostly strings, but numeric columns sometimes arrive as JSON numbers, so
//! every field is read leniently into `Option<String>` and interpreted later
//! by [`crate::normalize`].

use serde::{Deserialize, Deserializer, Serialize};

/// Top-level body of the dataset endpoint.
#[derive(Debug, Deserialize)]
pub struct RawResponse {
    /// Entries that are not JSON objects are dropped here; they never fail
    /// the whole response.
    #[serde(deserialize_with = "lenient_records")]
    pub results: Vec<RawRecord>,
}

/// One unnormalized entry as returned by the dataset endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub vehicle_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lat: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lng: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub max_duration: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cost: Option<String>,
    /// Comma-separated, e.g. `"app,kort"`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub payment_method: Option<String>,
    /// Comma-separated free text.
    #[serde(default, deserialize_with = "lenient_string")]
    pub restrictions: Option<String>,
    /// Compact form, e.g. `"Onsdag 10:00-12:00"`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub cleaning_schedule: Option<String>,
}

/// Accepts a JSON string, number, or boolean as text; `null` becomes `None`.
///
/// Arrays and objects are not a documented shape for any field. They read as
/// absent, so an odd optional field falls back to its default and odd
/// coordinates get the record rejected during normalization.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;

    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other @ (Value::Array(_) | Value::Object(_)) => {
            tracing::debug!(value = %other, "ignoring non-scalar field value");
            Ok(None)
        }
    }
}

fn lenient_records<'de, D>(deserializer: D) -> Result<Vec<RawRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Vec::<serde_json::Value>::deserialize(deserializer)?;
    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<RawRecord>(entry) {
            Ok(record) => records.push(record),
            Err(err) => tracing::warn!(index, error = %err, "skipping malformed dataset entry"),
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_record_reads_string_fields() {
        let json = serde_json::json!({
            "id": "p-1",
            "type": "elbil",
            "lat": "59.3293",
            "lng": "18.0686",
            "maxDuration": "2 tim",
            "paymentMethod": "app,kort",
            "cleaningSchedule": "Onsdag 10:00-12:00"
        });
        let rec: RawRecord = serde_json::from_value(json).unwrap();
        assert_eq!(rec.id.as_deref(), Some("p-1"));
        assert_eq!(rec.vehicle_type.as_deref(), Some("elbil"));
        assert_eq!(rec.lat.as_deref(), Some("59.3293"));
        assert_eq!(rec.max_duration.as_deref(), Some("2 tim"));
        assert_eq!(rec.payment_method.as_deref(), Some("app,kort"));
        assert_eq!(rec.cleaning_schedule.as_deref(), Some("Onsdag 10:00-12:00"));
        assert!(rec.address.is_none());
        assert!(rec.cost.is_none());
    }

    #[test]
    fn raw_record_accepts_numeric_fields() {
        let json = serde_json::json!({ "id": 42, "lat": 59.1955, "lng": 17.6253, "cost": 10 });
        let rec: RawRecord = serde_json::from_value(json).unwrap();
        assert_eq!(rec.id.as_deref(), Some("42"));
        assert_eq!(rec.lat.as_deref(), Some("59.1955"));
        assert_eq!(rec.lng.as_deref(), Some("17.6253"));
        assert_eq!(rec.cost.as_deref(), Some("10"));
    }

    #[test]
    fn raw_record_treats_null_as_absent_and_ignores_unknown_fields() {
        let json = serde_json::json!({ "id": null, "lat": "1", "lng": "2", "zon": "B" });
        let rec: RawRecord = serde_json::from_value(json).unwrap();
        assert!(rec.id.is_none());
        assert_eq!(rec.lat.as_deref(), Some("1"));
    }

    #[test]
    fn raw_record_reads_nested_values_as_absent() {
        let json = serde_json::json!({
            "lat": ["59.0"],
            "lng": "18.0",
            "restrictions": ["Ej helg", "Max 2h"],
            "address": { "gata": "Storgatan" }
        });
        let rec: RawRecord = serde_json::from_value(json).unwrap();
        assert!(rec.lat.is_none());
        assert!(rec.restrictions.is_none());
        assert!(rec.address.is_none());
        assert_eq!(rec.lng.as_deref(), Some("18.0"));
    }

    #[test]
    fn raw_response_drops_entries_that_are_not_objects() {
        let body = r#"{"results": [{"id": "a"}, "stray", 7, null, {"id": "b"}]}"#;
        let parsed: RawResponse = serde_json::from_str(body).unwrap();
        let ids: Vec<_> = parsed.results.iter().map(|r| r.id.as_deref()).collect();
        assert_eq!(ids, vec![Some("a"), Some("b")]);
    }

    #[test]
    fn raw_response_requires_results_array() {
        assert!(serde_json::from_str::<RawResponse>(r#"{"rows": []}"#).is_err());
        let ok: RawResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert!(ok.results.is_empty());
    }
}
