use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::normalize_server_url;
use crate::error::ClientError;
use crate::models::{
    ChatReply, ChatTurn, CreateRecipeRequest, DeleteRecipeRequest, RecipeListResponse,
    SaveDinnerResponse,
};

/// The remote recipe service. Everything the views need goes through here so
/// the flows can be exercised against an in-memory fake.
#[async_trait(?Send)]
pub trait RecipeBackend {
    async fn dinner_chat(&self, turn: &ChatTurn) -> Result<ChatReply, ClientError>;
    async fn save_dinner(&self, turns: &[ChatTurn]) -> Result<SaveDinnerResponse, ClientError>;
    async fn list_recipes(&self) -> Result<RecipeListResponse, ClientError>;
    async fn delete_recipe(&self, title: &str) -> Result<(), ClientError>;
    async fn create_recipe(&self, title: &str, content: &str) -> Result<(), ClientError>;
    async fn load_recipe(&self, name: &str) -> Result<Vec<u8>, ClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    base: String,
}

impl HttpBackend {
    pub fn new(base: &str) -> Self {
        Self {
            base: normalize_server_url(base),
        }
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        endpoint(&self.base, path)
    }
}

pub fn endpoint(base: &str, path: &str) -> Result<Url, ClientError> {
    let raw = format!("{}/{}", normalize_server_url(base), path.trim_start_matches('/'));
    Url::parse(&raw).map_err(|err| ClientError::InvalidUrl {
        url: raw.clone(),
        message: err.to_string(),
    })
}

pub fn load_recipe_url(base: &str, name: &str) -> Result<Url, ClientError> {
    let mut url = endpoint(base, "load_recipe")?;
    url.query_pairs_mut().append_pair("name", name);
    Ok(url)
}

async fn send(url: &Url, request: Result<Request, gloo_net::Error>) -> Result<Response, ClientError> {
    let request = request.map_err(|err| ClientError::Transport {
        url: url.to_string(),
        message: err.to_string(),
    })?;
    let response = request
        .send()
        .await
        .map_err(|err| ClientError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        })?;
    if !response.ok() {
        return Err(ClientError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }
    debug!("{} -> {}", url, response.status());
    Ok(response)
}

async fn decode<T: DeserializeOwned>(url: &Url, response: Response) -> Result<T, ClientError> {
    response.json::<T>().await.map_err(|err| ClientError::Decode {
        url: url.to_string(),
        message: err.to_string(),
    })
}

#[async_trait(?Send)]
impl RecipeBackend for HttpBackend {
    async fn dinner_chat(&self, turn: &ChatTurn) -> Result<ChatReply, ClientError> {
        let url = self.endpoint("dinnerchat")?;
        let response = send(&url, Request::post(url.as_str()).json(turn)).await?;
        decode(&url, response).await
    }

    async fn save_dinner(&self, turns: &[ChatTurn]) -> Result<SaveDinnerResponse, ClientError> {
        let url = self.endpoint("savedinner")?;
        let response = send(&url, Request::post(url.as_str()).json(&turns)).await?;
        decode(&url, response).await
    }

    async fn list_recipes(&self) -> Result<RecipeListResponse, ClientError> {
        let url = self.endpoint("list_recipes")?;
        let response = send(&url, Request::get(url.as_str()).build()).await?;
        decode(&url, response).await
    }

    async fn delete_recipe(&self, title: &str) -> Result<(), ClientError> {
        let url = self.endpoint("delete_recipe")?;
        let body = DeleteRecipeRequest { title };
        send(&url, Request::delete(url.as_str()).json(&body)).await?;
        Ok(())
    }

    async fn create_recipe(&self, title: &str, content: &str) -> Result<(), ClientError> {
        let url = self.endpoint("create_recipe")?;
        let body = CreateRecipeRequest { title, content };
        send(&url, Request::post(url.as_str()).json(&body)).await?;
        Ok(())
    }

    async fn load_recipe(&self, name: &str) -> Result<Vec<u8>, ClientError> {
        let url = load_recipe_url(&self.base, name)?;
        let response = send(&url, Request::get(url.as_str()).build()).await?;
        response.binary().await.map_err(|err| ClientError::Decode {
            url: url.to_string(),
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use std::cell::RefCell;
    use std::collections::{HashSet, VecDeque};

    use async_trait::async_trait;

    use super::RecipeBackend;
    use crate::error::ClientError;
    use crate::models::{ChatReply, ChatTurn, RecipeListResponse, SaveDinnerResponse};

    /// Scripted backend shared by the flow tests.
    #[derive(Default)]
    pub struct FakeBackend {
        pub chat_replies: RefCell<VecDeque<Result<String, ClientError>>>,
        pub save_response: RefCell<Option<Result<SaveDinnerResponse, ClientError>>>,
        pub listing: RefCell<Option<Result<RecipeListResponse, ClientError>>>,
        pub failing_deletes: HashSet<String>,
        pub create_fails: bool,
        pub recipe_bytes: Vec<u8>,
        pub chat_sent: RefCell<Vec<ChatTurn>>,
        pub saved: RefCell<Vec<Vec<ChatTurn>>>,
        pub deleted: RefCell<Vec<String>>,
        pub created: RefCell<Vec<(String, String)>>,
        pub loaded: RefCell<Vec<String>>,
    }

    pub fn transport(url: &str) -> ClientError {
        ClientError::Transport {
            url: url.to_string(),
            message: "connection refused".to_string(),
        }
    }

    #[async_trait(?Send)]
    impl RecipeBackend for FakeBackend {
        async fn dinner_chat(&self, turn: &ChatTurn) -> Result<ChatReply, ClientError> {
            self.chat_sent.borrow_mut().push(turn.clone());
            let next = self
                .chat_replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(transport("/dinnerchat")));
            next.map(|agent| ChatReply { agent })
        }

        async fn save_dinner(
            &self,
            turns: &[ChatTurn],
        ) -> Result<SaveDinnerResponse, ClientError> {
            self.saved.borrow_mut().push(turns.to_vec());
            self.save_response
                .borrow_mut()
                .take()
                .unwrap_or_else(|| Err(transport("/savedinner")))
        }

        async fn list_recipes(&self) -> Result<RecipeListResponse, ClientError> {
            self.listing
                .borrow()
                .clone()
                .unwrap_or_else(|| Err(transport("/list_recipes")))
        }

        async fn delete_recipe(&self, title: &str) -> Result<(), ClientError> {
            self.deleted.borrow_mut().push(title.to_string());
            if self.failing_deletes.contains(title) {
                return Err(ClientError::Status {
                    url: "/delete_recipe".to_string(),
                    status: 500,
                });
            }
            Ok(())
        }

        async fn create_recipe(&self, title: &str, content: &str) -> Result<(), ClientError> {
            self.created
                .borrow_mut()
                .push((title.to_string(), content.to_string()));
            if self.create_fails {
                return Err(transport("/create_recipe"));
            }
            Ok(())
        }

        async fn load_recipe(&self, name: &str) -> Result<Vec<u8>, ClientError> {
            self.loaded.borrow_mut().push(name.to_string());
            Ok(self.recipe_bytes.clone())
        }
    }
}
