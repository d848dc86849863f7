//! Entity fetcher abstraction and lazy pagination.

use std::time::Duration;

use async_trait::async_trait;
use futures::Stream;
use futures::stream;
use serde_json::Value;

use crate::error::FetchError;

/// Opaque pagination cursor handed back by a fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One page of raw records.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<Value>,
    /// Cursor of the following page; `None` on the last page.
    pub next: Option<Cursor>,
}

/// Source of raw entity records.
#[async_trait]
pub trait EntityFetcher: Send + Sync {
    /// Fetch the page at `cursor` (the first page when `None`).
    async fn fetch(&self, selector: &str, cursor: Option<&Cursor>) -> Result<Page, FetchError>;
}

enum PageState {
    First,
    Next(Cursor),
    Done,
}

/// Stream every page for `selector`, one request at a time.
///
/// The next page is requested only when the stream is polled again, and
/// `interval` elapses before each request after the first. The stream ends
/// after the first error.
pub fn page_stream<'a, F>(
    fetcher: &'a F,
    selector: &'a str,
    interval: Duration,
) -> impl Stream<Item = Result<Vec<Value>, FetchError>> + 'a
where
    F: EntityFetcher + ?Sized,
{
    stream::try_unfold(PageState::First, move |state| async move {
        let cursor = match state {
            PageState::First => None,
            PageState::Next(cursor) => {
                tokio::time::sleep(interval).await;
                Some(cursor)
            }
            PageState::Done => return Ok(None),
        };

        let page = fetcher.fetch(selector, cursor.as_ref()).await?;
        let next = match page.next {
            Some(cursor) => PageState::Next(cursor),
            None => PageState::Done,
        };
        Ok(Some((page.items, next)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use serde_json::json;
    use std::sync::Mutex;

    struct Scripted {
        pages: Vec<Page>,
        requested: Mutex<Vec<Option<String>>>,
    }

    #[async_trait]
    impl EntityFetcher for Scripted {
        async fn fetch(&self, _selector: &str, cursor: Option<&Cursor>) -> Result<Page, FetchError> {
            self.requested
                .lock()
                .unwrap()
                .push(cursor.map(|c| c.as_str().to_string()));
            let index = cursor.map(|c| c.as_str().parse::<usize>().unwrap()).unwrap_or(0);
            match self.pages.get(index) {
                Some(page) => Ok(page.clone()),
                None => Err(FetchError::Status {
                    url: format!("scripted/{}", index),
                    status: 500,
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_follows_cursors_until_exhausted() {
        let fetcher = Scripted {
            pages: vec![
                Page { items: vec![json!({"id": 1})], next: Some(Cursor::new("1")) },
                Page { items: vec![json!({"id": 2}), json!({"id": 3})], next: None },
            ],
            requested: Mutex::new(Vec::new()),
        };

        let pages: Vec<Vec<Value>> = page_stream(&fetcher, "Person", Duration::ZERO)
            .try_collect()
            .await
            .unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].len(), 2);
        assert_eq!(
            *fetcher.requested.lock().unwrap(),
            vec![None, Some("1".to_string())]
        );
    }

    #[tokio::test]
    async fn test_is_lazy() {
        let fetcher = Scripted {
            pages: vec![
                Page { items: vec![], next: Some(Cursor::new("1")) },
                Page { items: vec![], next: None },
            ],
            requested: Mutex::new(Vec::new()),
        };

        let mut pages = Box::pin(page_stream(&fetcher, "Person", Duration::ZERO));
        pages.try_next().await.unwrap();
        assert_eq!(fetcher.requested.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_error_terminates() {
        let fetcher = Scripted {
            pages: vec![Page { items: vec![], next: Some(Cursor::new("7")) }],
            requested: Mutex::new(Vec::new()),
        };

        let result: Result<Vec<Vec<Value>>, FetchError> =
            page_stream(&fetcher, "Person", Duration::ZERO).try_collect().await;
        assert!(matches!(result, Err(FetchError::Status { status: 500, .. })));
    }
}
