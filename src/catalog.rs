use std::collections::BTreeSet;

use futures::StreamExt;
use tracing::{info, warn};

use crate::api::RecipeBackend;
use crate::error::{BulkDeleteError, ClientError};
use crate::models::{RECIPES_NOT_FOUND, RecipeListResponse};

/// What the favorites view shows after a fetch: the recipes and, separately,
/// an error message. An empty catalog is not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogListing {
    pub files: Vec<String>,
    pub error: Option<String>,
}

impl CatalogListing {
    pub fn from_response(response: RecipeListResponse) -> Self {
        if response.error_code == Some(RECIPES_NOT_FOUND) {
            return Self::default();
        }
        if let Some(message) = response.message.filter(|m| !m.is_empty()) {
            return Self {
                files: Vec::new(),
                error: Some(message),
            };
        }
        Self {
            files: response.files,
            error: None,
        }
    }

    pub fn from_error(err: &ClientError) -> Self {
        Self {
            files: Vec::new(),
            error: Some(err.to_string()),
        }
    }
}

pub async fn fetch_listing(backend: &dyn RecipeBackend) -> CatalogListing {
    match backend.list_recipes().await {
        Ok(response) => CatalogListing::from_response(response),
        Err(err) => {
            warn!("listing recipes failed: {err}");
            CatalogListing::from_error(&err)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatalogEntry {
    AddNew,
    Recipe(String),
}

/// Cards in display order. Browsing shows an "add recipe" card first;
/// selection mode shows only real recipes.
pub fn visible_entries(files: &[String], selecting: bool) -> Vec<CatalogEntry> {
    let prefix = (!selecting).then_some(CatalogEntry::AddNew);
    prefix
        .into_iter()
        .chain(files.iter().cloned().map(CatalogEntry::Recipe))
        .collect()
}

/// References marked for deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    selected: BTreeSet<String>,
}

impl SelectionSet {
    pub fn toggle(&mut self, reference: &str) -> bool {
        if self.selected.remove(reference) {
            false
        } else {
            self.selected.insert(reference.to_string());
            true
        }
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.selected.contains(reference)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn references(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }
}

/// Issues one delete per reference, all in flight together, and waits for
/// every one to settle.
pub async fn delete_all(
    backend: &dyn RecipeBackend,
    references: &[String],
) -> Result<(), BulkDeleteError> {
    let total = references.len();
    let mut stream = futures::stream::iter(references.iter().map(|reference| async move {
        let result = backend.delete_recipe(reference).await;
        (reference, result)
    }))
    .buffer_unordered(total.max(1));

    let mut failed = 0;
    let mut first = None;
    while let Some((reference, result)) = stream.next().await {
        if let Err(err) = result {
            warn!("deleting {reference} failed: {err}");
            failed += 1;
            first.get_or_insert(err);
        }
    }

    match first {
        None => {
            info!("deleted {total} recipes");
            Ok(())
        }
        Some(first) => Err(BulkDeleteError {
            failed,
            total,
            first,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::api::fake::FakeBackend;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn not_found_sentinel_is_an_empty_catalog() {
        let listing = CatalogListing::from_response(RecipeListResponse {
            files: Vec::new(),
            message: Some("No recipes folder".to_string()),
            error_code: Some(RECIPES_NOT_FOUND),
        });
        assert_eq!(listing, CatalogListing::default());
    }

    #[test]
    fn files_are_shown_verbatim() {
        let listing = CatalogListing::from_response(RecipeListResponse {
            files: names(&["a.md", "b.pdf"]),
            message: None,
            error_code: None,
        });
        assert_eq!(listing.files, names(&["a.md", "b.pdf"]));
        assert_eq!(listing.error, None);
    }

    #[test]
    fn other_messages_are_errors() {
        let listing = CatalogListing::from_response(RecipeListResponse {
            files: names(&["ignored.md"]),
            message: Some("vault locked".to_string()),
            error_code: Some(50000),
        });
        assert!(listing.files.is_empty());
        assert_eq!(listing.error.as_deref(), Some("vault locked"));
    }

    #[test]
    fn whitespace_message_is_still_an_error() {
        let listing = CatalogListing::from_response(RecipeListResponse {
            files: names(&["a.md"]),
            message: Some(" ".to_string()),
            error_code: None,
        });
        assert!(listing.files.is_empty());
        assert_eq!(listing.error.as_deref(), Some(" "));
    }

    #[test]
    fn empty_message_is_ignored() {
        let listing = CatalogListing::from_response(RecipeListResponse {
            files: names(&["a.md"]),
            message: Some(String::new()),
            error_code: None,
        });
        assert_eq!(listing.files, names(&["a.md"]));
        assert_eq!(listing.error, None);
    }

    #[test]
    fn transport_failure_becomes_error_state() {
        let backend = FakeBackend::default();
        let listing = block_on(fetch_listing(&backend));
        assert!(listing.files.is_empty());
        assert!(listing.error.unwrap().contains("connection refused"));
    }

    #[test]
    fn add_new_entry_only_while_browsing() {
        let files = names(&["a.md"]);
        assert_eq!(
            visible_entries(&files, false),
            vec![CatalogEntry::AddNew, CatalogEntry::Recipe("a.md".to_string())]
        );
        assert_eq!(
            visible_entries(&files, true),
            vec![CatalogEntry::Recipe("a.md".to_string())]
        );
        assert_eq!(visible_entries(&[], false), vec![CatalogEntry::AddNew]);
    }

    #[test]
    fn selection_toggles() {
        let mut selection = SelectionSet::default();
        assert!(selection.toggle("a.md"));
        assert!(selection.toggle("b.pdf"));
        assert!(!selection.toggle("a.md"));
        assert_eq!(selection.references(), names(&["b.pdf"]));
        selection.clear();
        assert!(selection.is_empty());
    }

    #[test]
    fn bulk_delete_issues_one_call_per_reference() {
        let backend = FakeBackend::default();
        let refs = names(&["a.md", "b.pdf", "c.md"]);
        block_on(delete_all(&backend, &refs)).unwrap();
        let mut deleted = backend.deleted.borrow().clone();
        deleted.sort();
        assert_eq!(deleted, refs);
    }

    #[test]
    fn bulk_delete_settles_all_and_reports_one_error() {
        let backend = FakeBackend {
            failing_deletes: HashSet::from(["a.md".to_string(), "c.md".to_string()]),
            ..FakeBackend::default()
        };
        let refs = names(&["a.md", "b.pdf", "c.md"]);
        let err = block_on(delete_all(&backend, &refs)).unwrap_err();

        assert_eq!(backend.deleted.borrow().len(), 3);
        assert_eq!(err.failed, 2);
        assert_eq!(err.total, 3);
        assert!(err.to_string().starts_with("failed to delete 2 of 3 recipes"));
    }

    #[test]
    fn bulk_delete_error_keeps_first_failure() {
        let backend = FakeBackend {
            failing_deletes: HashSet::from(["b.pdf".to_string()]),
            ..FakeBackend::default()
        };
        let err = block_on(delete_all(&backend, &names(&["a.md", "b.pdf"]))).unwrap_err();
        assert!(matches!(err.first, ClientError::Status { status: 500, .. }));
    }
}
