//! Normalization of the backend's response envelopes.
//!
//! The backend is inconsistent about nesting: a payload may sit at the root of
//! the body, under `data`, or under `data.data`. Every decoder here first
//! strips that nesting, rejects `success: false`, and then decodes strictly.
//! Partial data is never returned.

use portal_core::{Article, Category, CurrentUser, JobReceipt, ResultPage, StatsSnapshot};
use portal_logging::portal_debug;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::GatewayError;

const LIST_KEYS: [&str; 3] = ["news", "articles", "items"];

pub(crate) fn parse(bytes: &[u8]) -> Result<Value, GatewayError> {
    serde_json::from_slice(bytes).map_err(|err| GatewayError::malformed(err.to_string()))
}

/// Strips up to two levels of `data` nesting.
pub(crate) fn payload(mut value: Value) -> Result<Value, GatewayError> {
    for _ in 0..2 {
        reject_failure(&value)?;
        match value.get_mut("data").map(Value::take) {
            Some(inner) => value = inner,
            None => break,
        }
    }
    reject_failure(&value)?;
    Ok(value)
}

fn reject_failure(value: &Value) -> Result<(), GatewayError> {
    if value.get("success").and_then(Value::as_bool) == Some(false) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("request reported failure");
        return Err(GatewayError::malformed(message));
    }
    Ok(())
}

pub(crate) fn article_page(value: Value, requested_page: u32) -> Result<ResultPage, GatewayError> {
    let root_pagination = value.get("pagination").cloned();
    let (items, pagination) = match payload(value)? {
        Value::Array(items) => (items, root_pagination),
        Value::Object(mut map) => {
            let list = LIST_KEYS
                .iter()
                .find_map(|key| map.remove(*key))
                .ok_or_else(|| GatewayError::malformed("no article list in payload"))?;
            let Value::Array(items) = list else {
                return Err(GatewayError::malformed("article list is not an array"));
            };
            (items, map.remove("pagination").or(root_pagination))
        }
        _ => return Err(GatewayError::malformed("unrecognized article list envelope")),
    };

    let items: Vec<Article> = decode_all(items)?;
    let pagination = pagination.unwrap_or(Value::Null);
    let total_pages = read_count(&pagination, &["totalPages", "pages"])
        .filter(|pages| *pages > 0)
        .unwrap_or(1);
    let current_page = read_count(&pagination, &["page", "currentPage"])
        .filter(|page| *page > 0)
        .unwrap_or(u64::from(requested_page));
    let total = read_count(&pagination, &["total"])
        .filter(|total| *total > 0)
        .unwrap_or(items.len() as u64);

    Ok(ResultPage {
        items,
        total_pages: saturating_u32(total_pages),
        current_page: saturating_u32(current_page),
        total,
    })
}

pub(crate) fn article(value: Value) -> Result<Article, GatewayError> {
    let mut payload = payload(value)?;
    let record = match payload.get_mut("article").map(Value::take) {
        Some(record) => record,
        None => payload,
    };
    decode(record)
}

pub(crate) fn categories(value: Value) -> Result<Vec<Category>, GatewayError> {
    match payload(value)? {
        Value::Array(items) => decode_all(items),
        Value::Object(mut map) => match map.remove("categories") {
            Some(Value::Array(items)) => decode_all(items),
            _ => Err(GatewayError::malformed("no category list in payload")),
        },
        _ => Err(GatewayError::malformed("unrecognized category envelope")),
    }
}

pub(crate) fn stats(value: Value) -> Result<StatsSnapshot, GatewayError> {
    let payload = payload(value)?;
    if !payload.is_object() {
        return Err(GatewayError::malformed("stats payload is not an object"));
    }
    let total = read_count(&payload, &["totalNews", "totalArticles", "total"]);
    let original = read_count(&payload, &["totalOriginal", "originalNews", "originalCount"]);
    let scraped = read_count(&payload, &["totalScraped", "scrapedNews", "scrapedCount"]);
    let categories = read_count(&payload, &["totalCategories", "categoryCount"]);
    if [total, original, scraped, categories].iter().all(Option::is_none) {
        return Err(GatewayError::malformed("no counters in stats payload"));
    }
    Ok(StatsSnapshot {
        total_articles: total.unwrap_or(0),
        original_count: original.unwrap_or(0),
        scraped_count: scraped.unwrap_or(0),
        category_count: categories.unwrap_or(0),
    })
}

/// A job response may carry no payload at all; the count then defaults to 0.
pub(crate) fn job_receipt(value: Value) -> Result<JobReceipt, GatewayError> {
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .map(ToOwned::to_owned);
    let payload = payload(value)?;
    let accepted_count = read_count(&payload, &["totalNews", "newsScraped", "acceptedCount"])
        .unwrap_or(0);
    Ok(JobReceipt {
        accepted_count,
        message,
    })
}

pub(crate) fn current_user(value: Value) -> Result<Option<CurrentUser>, GatewayError> {
    let mut payload = payload(value)?;
    let record = match payload.get_mut("user").map(Value::take) {
        Some(record) => record,
        None => payload,
    };
    if record.is_null() {
        return Ok(None);
    }
    let role = read_text(&record, &["role"])
        .ok_or_else(|| GatewayError::malformed("profile has no role"))?;
    Ok(Some(CurrentUser {
        id: read_text(&record, &["id", "_id"]),
        name: read_text(&record, &["name", "username", "email"]),
        role,
    }))
}

/// Decodes the record echoed by a create/update, if the backend sent one.
pub(crate) fn optional_record<T: DeserializeOwned>(bytes: &[u8]) -> Result<Option<T>, GatewayError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let payload = payload(parse(bytes)?)?;
    match serde_json::from_value(payload) {
        Ok(record) => Ok(Some(record)),
        Err(err) => {
            portal_debug!("Ignoring undecodable echoed record: {}", err);
            Ok(None)
        }
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, GatewayError> {
    serde_json::from_value(value).map_err(|err| GatewayError::malformed(err.to_string()))
}

fn decode_all<T: DeserializeOwned>(items: Vec<Value>) -> Result<Vec<T>, GatewayError> {
    items.into_iter().map(decode).collect()
}

/// Reads the first present key as a count, accepting numeric strings.
fn read_count(value: &Value, keys: &[&str]) -> Option<u64> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find_map(|field| match field {
            Value::Number(number) => number.as_u64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        })
}

fn read_text(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find_map(|field| match field {
            Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        })
}

fn saturating_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(id: u32) -> Value {
        json!({"id": id, "title": format!("t{id}"), "content": "c"})
    }

    #[test]
    fn list_payload_found_at_any_nesting_level() {
        let nested = json!({"success": true, "data": {"news": [item(1)], "pagination": {"total": 25, "page": 2, "totalPages": 3}}});
        let page = article_page(nested, 2).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!((page.current_page, page.total_pages, page.total), (2, 3, 25));

        let doubly = json!({"data": {"data": {"articles": [item(1), item(2)]}}});
        assert_eq!(article_page(doubly, 1).unwrap().items.len(), 2);

        let root = json!({"items": [item(3)]});
        assert_eq!(article_page(root, 1).unwrap().items[0].id, "3");
    }

    #[test]
    fn missing_pagination_uses_defaults() {
        let body = json!({"data": {"news": [item(1), item(2)], "pagination": {"totalPages": 0}}});
        let page = article_page(body, 4).unwrap();
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 4);
        assert_eq!(page.total, 2);
    }

    #[test]
    fn failure_envelope_is_rejected() {
        let body = json!({"success": false, "message": "boom", "data": {"news": []}});
        let err = article_page(body, 1).unwrap_err();
        assert_eq!(err.kind, crate::FailureKind::MalformedResponse);
        assert_eq!(err.message, "boom");
    }

    #[test]
    fn undecodable_item_fails_whole_page() {
        let body = json!({"data": {"news": [item(1), {"title": "no id"}]}});
        assert!(article_page(body, 1).is_err());
    }

    #[test]
    fn unrecognized_envelope_is_malformed() {
        assert!(article_page(json!({"data": {"rows": []}}), 1).is_err());
        assert!(article_page(json!("nope"), 1).is_err());
        assert!(categories(json!({"data": 5})).is_err());
    }

    #[test]
    fn stats_accept_field_aliases() {
        let body = json!({"success": true, "data": {"totalNews": 29, "totalOriginal": "3", "scrapedNews": 26, "totalCategories": 3}});
        let snapshot = stats(body).unwrap();
        assert_eq!(
            snapshot,
            StatsSnapshot {
                total_articles: 29,
                original_count: 3,
                scraped_count: 26,
                category_count: 3,
            }
        );
    }

    #[test]
    fn stats_without_any_counter_are_malformed() {
        for body in [
            json!({"success": true, "data": {"rows": [1, 2]}}),
            json!({"data": {"rows": []}}),
            json!({"message": "Route not found"}),
        ] {
            let err = stats(body).unwrap_err();
            assert_eq!(err.kind, crate::FailureKind::MalformedResponse);
        }
    }

    #[test]
    fn stats_missing_some_counters_default_them() {
        let snapshot = stats(json!({"data": {"totalNews": 5}})).unwrap();
        assert_eq!(snapshot.total_articles, 5);
        assert_eq!(snapshot.category_count, 0);
    }

    #[test]
    fn echoed_record_that_does_not_decode_is_dropped() {
        let echoed: Option<Category> =
            optional_record(br#"{"success": true, "data": {"name": 3}}"#).unwrap();
        assert_eq!(echoed, None);
        let echoed: Option<Category> =
            optional_record(br#"{"data": {"_id": "c9", "name": "Tech"}}"#).unwrap();
        assert_eq!(echoed.map(|category| category.id), Some("c9".to_string()));
        assert!(optional_record::<Category>(b"  ").unwrap().is_none());
    }

    #[test]
    fn job_receipt_prefers_total_news() {
        let body = json!({"success": true, "message": "ok", "data": {"newsScraped": 9, "totalNews": 4}});
        let receipt = job_receipt(body).unwrap();
        assert_eq!(receipt.accepted_count, 4);
        assert_eq!(receipt.message.as_deref(), Some("ok"));

        let bare = job_receipt(json!({"success": true})).unwrap();
        assert_eq!(bare.accepted_count, 0);
    }

    #[test]
    fn categories_as_bare_array_or_keyed() {
        let bare = json!([{"_id": "a", "name": "Tech"}]);
        assert_eq!(categories(bare).unwrap()[0].id, "a");
        let keyed = json!({"data": {"categories": [{"id": 2, "name": null}]}});
        let list = categories(keyed).unwrap();
        assert_eq!(list[0].id, "2");
        assert_eq!(list[0].name, "");
    }

    #[test]
    fn profile_reads_nested_user() {
        let body = json!({"data": {"user": {"_id": "u1", "username": "ana", "role": "admin"}}});
        let user = current_user(body).unwrap().unwrap();
        assert!(user.is_admin());
        assert_eq!(user.id.as_deref(), Some("u1"));
        assert_eq!(user.name.as_deref(), Some("ana"));
    }
}
