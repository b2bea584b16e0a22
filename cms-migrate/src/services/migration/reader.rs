//! Cursor-paginated reading of every entry of a model

use log::{debug, info};
use serde_json::{Value, json};

use crate::api::{ApiError, ContentApi, CursorPage, Entry, ModelOperations, content_payload};

pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Fetch every entry matched by `filter`, following the cursor until the
/// service reports no more items
///
/// Pages are requested strictly one after another since each request needs
/// the previous cursor. Always performs at least one request. The first
/// failing page aborts the whole read.
pub async fn fetch_all(
    client: &dyn ContentApi,
    operations: &ModelOperations,
    filter: Option<&Value>,
    page_size: u32,
) -> Result<Vec<Entry>, ApiError> {
    let mut entries = Vec::new();
    let mut cursor: Option<String> = None;
    let mut batch = 0usize;

    loop {
        batch += 1;
        let variables = json!({
            "where": filter,
            "after": cursor,
            "limit": page_size,
        });
        debug!(
            "{} batch {} (after: {:?})",
            operations.list.name(),
            batch,
            cursor
        );

        let response = client.request(&operations.list, variables).await?;
        let page: CursorPage = serde_json::from_value(content_payload(response)?)
            .map_err(|e| ApiError::malformed(format!("unexpected list page: {}", e)))?;

        entries.extend(page.data);
        info!(
            "Retrieved {} batch {} | items: {} of {}",
            operations.list.root_field(),
            batch,
            entries.len(),
            page.meta.total_count
        );

        if !page.meta.has_more_items {
            break;
        }

        match page.meta.cursor {
            Some(next) => cursor = Some(next),
            None => {
                return Err(ApiError::malformed(
                    "page reports more items but carries no cursor",
                ));
            }
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OperationKind;
    use crate::api::mock::MockContentApi;
    use crate::api::models::ContentModel;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn operations() -> ModelOperations {
        let model: ContentModel = serde_json::from_value(json!({
            "modelId": "article",
            "name": "Article",
            "fields": [{"fieldId": "title", "type": "text"}]
        }))
        .unwrap();
        ModelOperations::build(&model)
    }

    fn page(ids: &[&str], cursor: Option<&str>, has_more: bool, total: u64) -> Value {
        let data: Vec<Value> = ids.iter().map(|id| json!({"id": id})).collect();
        json!({"content": {
            "data": data,
            "meta": {"cursor": cursor, "hasMoreItems": has_more, "totalCount": total},
            "error": null
        }})
    }

    fn paged_api(pages: Vec<Value>) -> MockContentApi {
        let served = AtomicUsize::new(0);
        MockContentApi::new().on(OperationKind::List, move |_, _| {
            let index = served.fetch_add(1, Ordering::SeqCst);
            pages
                .get(index)
                .cloned()
                .ok_or_else(|| ApiError::transport("no more pages scripted", None))
        })
    }

    fn ids(entries: &[Entry]) -> Vec<&str> {
        entries.iter().filter_map(Entry::id).collect()
    }

    #[tokio::test]
    async fn test_pages_are_concatenated_in_order() {
        let api = paged_api(vec![
            page(&["a#1", "b#1"], Some("c1"), true, 5),
            page(&["c#1", "d#1"], Some("c2"), true, 5),
            page(&["e#1"], None, false, 5),
        ]);

        let entries = fetch_all(&api, &operations(), None, 2).await.unwrap();

        assert_eq!(ids(&entries), vec!["a#1", "b#1", "c#1", "d#1", "e#1"]);
        let calls = api.calls_of(OperationKind::List);
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].variables["after"], Value::Null);
        assert_eq!(calls[1].variables["after"], "c1");
        assert_eq!(calls[2].variables["after"], "c2");
        assert!(calls.iter().all(|c| c.variables["limit"] == 2));
    }

    #[tokio::test]
    async fn test_empty_set_makes_one_request() {
        let api = paged_api(vec![page(&[], None, false, 0)]);

        let entries = fetch_all(&api, &operations(), None, DEFAULT_PAGE_SIZE)
            .await
            .unwrap();

        assert!(entries.is_empty());
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_filter_is_sent_as_where() {
        let api = paged_api(vec![page(&["a#1"], None, false, 1)]);
        let filter = json!({"title_contains": "Rust"});

        fetch_all(&api, &operations(), Some(&filter), 10).await.unwrap();

        let calls = api.calls();
        assert_eq!(calls[0].variables["where"], filter);
        assert_eq!(calls[0].name, "CmsEntriesListArticles");
    }

    #[tokio::test]
    async fn test_failing_page_aborts_the_read() {
        // Second page is not scripted, so the mock fails it
        let api = paged_api(vec![page(&["a#1"], Some("c1"), true, 3)]);

        let err = fetch_all(&api, &operations(), None, 1).await.unwrap_err();

        assert!(err.is_transport());
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_remote_error_on_page() {
        let api = MockContentApi::new().on(OperationKind::List, |_, _| {
            Ok(json!({"content": {"data": null, "meta": null, "error": {
                "code": "SECURITY_NOT_AUTHORIZED", "message": "Not authorized!", "data": null
            }}}))
        });

        let err = fetch_all(&api, &operations(), None, 10).await.unwrap_err();
        assert!(matches!(err, ApiError::Remote(_)));
    }

    #[tokio::test]
    async fn test_more_items_without_cursor_is_malformed() {
        let api = paged_api(vec![page(&["a#1"], None, true, 2)]);

        let err = fetch_all(&api, &operations(), None, 1).await.unwrap_err();

        assert!(matches!(err, ApiError::MalformedResponse { .. }));
        assert_eq!(api.calls().len(), 1);
    }
}
