//! Paginated sources of video references.

use async_trait::async_trait;
use tracing::debug;

use crate::{error::SourceError, types::VideoReference};

/// One page of a source listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<VideoReference>,
    /// Continuation token. `None` or an empty string ends the source.
    pub next_token: Option<String>,
}

#[async_trait]
pub trait SourceReader: Send + Sync {
    async fn fetch_page(
        &self,
        source_id: &str,
        token: Option<&str>,
    ) -> Result<Page, SourceError>;
}

/// Position inside one source's page chain.
///
/// Each page's token depends on the previous response, so a cursor is only
/// ever advanced sequentially. The cursor is a plain value: it can be held,
/// inspected and resumed later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    source_id: String,
    next_token: Option<String>,
    pages_read: usize,
    finished: bool,
}

impl PageCursor {
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            next_token: None,
            pages_read: 0,
            finished: false,
        }
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn token(&self) -> Option<&str> {
        self.next_token.as_deref()
    }

    pub fn pages_read(&self) -> usize {
        self.pages_read
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Fetch the next page. Returns `None` once the source is exhausted.
    ///
    /// A failed fetch leaves the cursor where it was, so the same page can be
    /// requested again.
    pub async fn advance<R>(
        &mut self,
        reader: &R,
    ) -> Result<Option<Vec<VideoReference>>, SourceError>
    where
        R: SourceReader + ?Sized,
    {
        if self.finished {
            return Ok(None);
        }

        let page = reader
            .fetch_page(&self.source_id, self.next_token.as_deref())
            .await
            .map_err(|e| e.at_page(self.pages_read + 1))?;

        self.pages_read += 1;
        self.next_token = page.next_token.filter(|t| !t.is_empty());
        self.finished = self.next_token.is_none();

        debug!(
            source_id = %self.source_id,
            page = self.pages_read,
            items = page.items.len(),
            "fetched source page"
        );

        Ok(Some(page.items))
    }
}

/// Read every page of a source, refusing to follow more than `max_pages`.
pub async fn collect_source<R>(
    reader: &R,
    source_id: &str,
    max_pages: usize,
) -> Result<Vec<VideoReference>, SourceError>
where
    R: SourceReader + ?Sized,
{
    let mut cursor = PageCursor::new(source_id);
    let mut refs = Vec::new();

    while !cursor.is_finished() {
        if cursor.pages_read() >= max_pages {
            return Err(SourceError::PageLimit {
                source_id: cursor.source_id().to_string(),
                limit: max_pages,
            });
        }
        if let Some(items) = cursor.advance(reader).await? {
            refs.extend(items);
        }
    }

    Ok(refs)
}
