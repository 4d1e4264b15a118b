use serde::{Deserialize, Serialize};

pub const AGENT_ID: &str = "agent";
pub const AGENT_NAME: &str = "Agent";
pub const HUMAN_ID: &str = "my_id";

/// Catalog `errorCode` meaning "no recipes yet", not a failure.
pub const RECIPES_NOT_FOUND: i64 = 40400;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatUser {
    pub name: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub text: String,
    pub user: ChatUser,
}

impl ChatTurn {
    pub fn human(text: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            user: ChatUser {
                name: name.into(),
                id: HUMAN_ID.to_string(),
            },
        }
    }

    pub fn agent(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            user: ChatUser {
                name: AGENT_NAME.to_string(),
                id: AGENT_ID.to_string(),
            },
        }
    }

    pub fn is_agent(&self) -> bool {
        self.user.id == AGENT_ID
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub agent: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveDinnerResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub response: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RecipeListResponse {
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "errorCode")]
    pub error_code: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteRecipeRequest<'a> {
    pub title: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateRecipeRequest<'a> {
    pub title: &'a str,
    pub content: &'a str,
}

/// Human-facing title for a recipe reference.
pub fn recipe_title(reference: &str) -> &str {
    reference.strip_suffix(".md").unwrap_or(reference)
}
