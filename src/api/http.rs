use super::{ApiError, TodoResource};
use crate::model::{ClientConfig, Todo, TodoDraft, TodoId};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

/// `TodoResource` over HTTP. The configured base URL is the collection root.
pub struct HttpTodoResource {
    http: Client,
    base: Url,
}

impl HttpTodoResource {
    pub fn new(cfg: &ClientConfig) -> Result<Self, ApiError> {
        let base = Url::parse(&cfg.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", cfg.base_url)))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(format!(
                "{}: not usable as a collection root",
                cfg.base_url
            )));
        }

        let mut builder = Client::builder().user_agent(cfg.user_agent.clone());
        if let Some(timeout) = cfg.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|source| ApiError::Transport {
            url: base.to_string(),
            source,
        })?;

        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Collection root with one extra, percent-encoded path segment.
    /// A blank id would address the collection root, so it is rejected.
    pub(super) fn item_url(&self, id: &str) -> Result<Url, ApiError> {
        if id.trim().is_empty() {
            return Err(ApiError::InvalidUrl(format!("{}: empty todo id", self.base)));
        }
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    fn request(&self, method: Method, url: &Url) -> RequestBuilder {
        debug!(%method, %url, "todo api request");
        self.http.request(method, url.clone())
    }

    /// Send and reject non-2xx. A 404 on an item path becomes `NotFound`.
    async fn send(
        &self,
        req: RequestBuilder,
        url: &Url,
        item: Option<&str>,
    ) -> Result<Response, ApiError> {
        let response = req.send().await.map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        warn!(%url, %status, "todo api returned error status");
        match (status, item) {
            (StatusCode::NOT_FOUND, Some(id)) => Err(ApiError::NotFound { id: id.to_string() }),
            _ => Err(ApiError::Status {
                url: url.to_string(),
                status,
            }),
        }
    }
}

/// Read a JSON body. An empty body or a literal `null` yields `None`.
async fn read_json<T: DeserializeOwned>(response: Response, url: &Url) -> Result<Option<T>, ApiError> {
    let bytes = response.bytes().await.map_err(|source| ApiError::Transport {
        url: url.to_string(),
        source,
    })?;
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(None);
    }
    serde_json::from_slice::<Option<T>>(&bytes).map_err(|e| ApiError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

fn empty_body(url: &Url) -> ApiError {
    ApiError::Decode {
        url: url.to_string(),
        reason: "empty body".into(),
    }
}

#[async_trait]
impl TodoResource for HttpTodoResource {
    async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        let url = &self.base;
        let response = self.send(self.request(Method::GET, url), url, None).await?;
        read_json(response, url).await?.ok_or_else(|| empty_body(url))
    }

    async fn create(&self, draft: &TodoDraft) -> Result<Todo, ApiError> {
        let url = &self.base;
        let req = self.request(Method::POST, url).json(draft);
        let response = self.send(req, url, None).await?;
        read_json(response, url).await?.ok_or_else(|| empty_body(url))
    }

    async fn update(&self, id: &TodoId, draft: &TodoDraft) -> Result<Todo, ApiError> {
        let key = id.to_string();
        let url = self.item_url(&key)?;
        let req = self.request(Method::PUT, &url).json(draft);
        let response = self.send(req, &url, Some(&key)).await?;
        read_json(response, &url).await?.ok_or_else(|| empty_body(&url))
    }

    async fn delete(&self, id: &TodoId) -> Result<(), ApiError> {
        let key = id.to_string();
        let url = self.item_url(&key)?;
        self.send(self.request(Method::DELETE, &url), &url, Some(&key))
            .await?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Todo, ApiError> {
        let url = self.item_url(id)?;
        let response = self
            .send(self.request(Method::GET, &url), &url, Some(id))
            .await?;
        read_json(response, &url)
            .await?
            .ok_or_else(|| ApiError::NotFound { id: id.to_string() })
    }
}
