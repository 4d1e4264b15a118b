use tracing::{info, warn};

use crate::api::RecipeBackend;
use crate::error::ValidationErrors;

pub const TITLE_REQUIRED: &str = "Title is required";
pub const CONTENT_REQUIRED: &str = "Recipe content is required";
pub const SAVE_SUCCEEDED: &str = "Saved successfully";
pub const SAVE_FAILED: &str = "An error occurred while saving the recipe.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    pub title: String,
    pub content: String,
}

impl RecipeDraft {
    /// Reference the backend stores the draft under.
    pub fn file_name(&self) -> String {
        format!("{}.md", self.title)
    }
}

/// Checks both fields and reports every problem at once.
pub fn validate(title: &str, content: &str) -> Result<RecipeDraft, ValidationErrors> {
    let title = title.trim();
    let errors = ValidationErrors {
        title: title.is_empty().then(|| TITLE_REQUIRED.to_string()),
        content: content
            .trim()
            .is_empty()
            .then(|| CONTENT_REQUIRED.to_string()),
    };
    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(RecipeDraft {
        title: title.to_string(),
        content: content.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub success: bool,
    pub message: &'static str,
    /// Where "View recipe" leads after a successful save.
    pub reference: Option<String>,
}

pub async fn submit(backend: &dyn RecipeBackend, draft: &RecipeDraft) -> SubmitOutcome {
    let reference = draft.file_name();
    match backend.create_recipe(&reference, &draft.content).await {
        Ok(()) => {
            info!("created recipe {reference}");
            SubmitOutcome {
                success: true,
                message: SAVE_SUCCEEDED,
                reference: Some(reference),
            }
        }
        Err(err) => {
            warn!("creating recipe {reference} failed: {err}");
            SubmitOutcome {
                success: false,
                message: SAVE_FAILED,
                reference: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::api::fake::FakeBackend;

    #[test]
    fn empty_title_only() {
        let err = validate("", "x").unwrap_err();
        assert_eq!(err.title.as_deref(), Some(TITLE_REQUIRED));
        assert_eq!(err.content, None);
    }

    #[test]
    fn empty_content_only() {
        let err = validate("x", "").unwrap_err();
        assert_eq!(err.title, None);
        assert_eq!(err.content.as_deref(), Some(CONTENT_REQUIRED));
    }

    #[test]
    fn both_fields_reported_together() {
        let err = validate("", "").unwrap_err();
        assert_eq!(
            err,
            ValidationErrors {
                title: Some(TITLE_REQUIRED.to_string()),
                content: Some(CONTENT_REQUIRED.to_string()),
            }
        );
    }

    #[test]
    fn whitespace_counts_as_empty() {
        let err = validate("   ", "\n\t").unwrap_err();
        assert!(err.title.is_some());
        assert!(err.content.is_some());
    }

    #[test]
    fn valid_draft_passes() {
        let draft = validate(" x ", "y").unwrap();
        assert_eq!(
            draft,
            RecipeDraft {
                title: "x".to_string(),
                content: "y".to_string(),
            }
        );
        assert_eq!(draft.file_name(), "x.md");
    }

    #[test]
    fn submit_posts_markdown_file_name() {
        let backend = FakeBackend::default();
        let draft = validate("Shakshuka", "# Eggs\n\ntomatoes").unwrap();
        let outcome = block_on(submit(&backend, &draft));

        assert!(outcome.success);
        assert_eq!(outcome.message, SAVE_SUCCEEDED);
        assert_eq!(outcome.reference.as_deref(), Some("Shakshuka.md"));
        assert_eq!(
            *backend.created.borrow(),
            vec![("Shakshuka.md".to_string(), "# Eggs\n\ntomatoes".to_string())]
        );
    }

    #[test]
    fn submit_failure_is_generic() {
        let backend = FakeBackend {
            create_fails: true,
            ..FakeBackend::default()
        };
        let draft = validate("Shakshuka", "eggs").unwrap();
        let outcome = block_on(submit(&backend, &draft));
        assert_eq!(
            outcome,
            SubmitOutcome {
                success: false,
                message: SAVE_FAILED,
                reference: None,
            }
        );
    }
}
