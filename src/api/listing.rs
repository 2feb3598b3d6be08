//! Wire schema of the item captures listing.
//!
//! The listing body looks like
//! `{"nyplAPI": {"response": {"numResults": "3", "capture": [...]}}}`.
//! `numResults` arrives as a string or a number, and `capture` is a single
//! object when an item has exactly one capture.

use serde::{Deserialize, Deserializer};

use crate::capture::{CaptureRecord, ListingPage};

#[derive(Debug, Deserialize)]
struct ListingEnvelope {
    #[serde(rename = "nyplAPI")]
    nypl_api: ListingBody,
}

#[derive(Debug, Deserialize)]
struct ListingBody {
    response: ListingResponse,
}

#[derive(Debug, Deserialize)]
struct ListingResponse {
    #[serde(rename = "numResults", deserialize_with = "count")]
    num_results: u64,
    #[serde(default, deserialize_with = "one_or_many")]
    capture: Vec<CaptureEntry>,
}

#[derive(Debug, Deserialize)]
struct CaptureEntry {
    #[serde(rename = "imageID", deserialize_with = "text")]
    image_id: String,
    uuid: String,
    #[serde(rename = "sortString")]
    sort_string: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(u64),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Scalar::deserialize(deserializer)? {
        Scalar::Number(n) => Ok(n),
        Scalar::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid numResults '{}'", s))),
    }
}

fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(s) => s,
        Scalar::Number(n) => n.to_string(),
    })
}

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::Many(items) => items,
        OneOrMany::One(item) => vec![item],
    })
}

/// Parse one listing response body into a [`ListingPage`].
pub fn parse_listing_page(page_number: u32, body: &[u8]) -> Result<ListingPage, serde_json::Error> {
    let envelope: ListingEnvelope = serde_json::from_slice(body)?;
    let response = envelope.nypl_api.response;
    let records = response
        .capture
        .into_iter()
        .map(|entry| CaptureRecord::new(entry.image_id, entry.uuid, &entry.sort_string))
        .collect();
    Ok(ListingPage {
        page_number,
        total_result_count: response.num_results,
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn test_parses_captures_in_order() {
        let page = parse_listing_page(
            1,
            &body(json!({"nyplAPI": {"response": {
                "numResults": "2",
                "capture": [
                    {"imageID": "100", "uuid": "u-1", "sortString": "0|0000001|0000001"},
                    {"imageID": "101", "uuid": "u-2", "sortString": "0|0000001|0000002"}
                ]
            }}})),
        )
        .unwrap();

        assert_eq!(page.page_number, 1);
        assert_eq!(page.total_result_count, 2);
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.records[0].image_id, "100");
        assert_eq!(page.records[0].capture_uuid, "u-1");
        assert_eq!(page.records[0].sort_key, "");
        assert_eq!(page.records[1].image_id, "101");
    }

    #[test]
    fn test_numeric_fields_are_accepted() {
        let page = parse_listing_page(
            3,
            &body(json!({"nyplAPI": {"response": {
                "numResults": 1,
                "capture": [{"imageID": 42, "uuid": "u-1", "sortString": "x|ABCDEFG0001"}]
            }}})),
        )
        .unwrap();

        assert_eq!(page.total_result_count, 1);
        assert_eq!(page.records[0].image_id, "42");
        assert_eq!(page.records[0].sort_key, "0001");
    }

    #[test]
    fn test_single_capture_object_is_one_record() {
        let page = parse_listing_page(
            1,
            &body(json!({"nyplAPI": {"response": {
                "numResults": "1",
                "capture": {"imageID": "7", "uuid": "u-7", "sortString": "a|XXXXXXX9"}
            }}})),
        )
        .unwrap();

        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].sort_key, "9");
    }

    #[test]
    fn test_missing_capture_is_empty_page() {
        let page = parse_listing_page(
            1,
            &body(json!({"nyplAPI": {"response": {"numResults": "0"}}})),
        )
        .unwrap();

        assert_eq!(page.total_result_count, 0);
        assert!(page.records.is_empty());
    }

    #[test]
    fn test_invalid_count_is_an_error() {
        let result = parse_listing_page(
            1,
            &body(json!({"nyplAPI": {"response": {"numResults": "many", "capture": []}}})),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_envelope_is_an_error() {
        assert!(parse_listing_page(1, &body(json!({"response": {}}))).is_err());
        assert!(parse_listing_page(1, b"<html>oops</html>").is_err());
    }

    #[test]
    fn test_capture_missing_uuid_is_an_error() {
        let result = parse_listing_page(
            1,
            &body(json!({"nyplAPI": {"response": {
                "numResults": "1",
                "capture": [{"imageID": "1", "sortString": "a"}]
            }}})),
        );
        assert!(result.is_err());
    }
}
