//! HTTP implementation of the backend collaborators.

use super::{ActionsApi, ApiError, AuthApi, CREATE_ACTION_PATH, LIST_ACTIONS_PATH, LOGIN_PATH};
use crate::config::Config;
use crate::model::{ActionForm, Credentials, LoginResponse, PageQuery};
use crate::storage::{KeyValueStore, TOKEN_KEY};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Client for the two backend hosts.
///
/// The auth host only serves login. Every request to the API host carries
/// `Authorization: Bearer <token>` when a token is persisted.
#[derive(Clone)]
pub struct HttpApi {
    auth_base: String,
    api_base: String,
    http: Client,
    storage: Arc<dyn KeyValueStore>,
}

impl HttpApi {
    pub fn new(config: &Config, storage: Arc<dyn KeyValueStore>) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            auth_base: config.auth_api_url.clone(),
            api_base: config.api_url.clone(),
            http,
            storage,
        })
    }

    fn url(base: &str, path: &str) -> String {
        let base = base.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.storage.get(TOKEN_KEY) {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Turn a response into its JSON body, or into an [`ApiError`] for non-2xx statuses.
    ///
    /// A 2xx body that is not JSON comes back as a JSON string; an empty one as `null`.
    async fn check_response(response: Response) -> Result<Value, ApiError> {
        let status = response.status();
        let text = response.text().await?;
        debug!(status = status.as_u16(), bytes = text.len(), "Response");

        if !status.is_success() {
            return Err(ApiError::from_response(status.as_u16(), &text));
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }

    fn multipart(form: &ActionForm) -> Result<Form, ApiError> {
        let mut body = Form::new()
            .text("name", form.name.clone())
            .text("description", form.description.clone());
        if let Some(color) = form.normalized_color() {
            body = body.text("color", color);
        }
        body = body.text("status", form.status_field());
        if let Some(icon) = &form.icon {
            let part = Part::bytes(icon.bytes.clone())
                .file_name(icon.file_name.clone())
                .mime_str(&icon.content_type)?;
            body = body.part("icon", part);
        }
        Ok(body)
    }
}

#[async_trait]
impl AuthApi for HttpApi {
    #[instrument(skip(self))]
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let url = Self::url(&self.auth_base, LOGIN_PATH);
        let response = self.http.post(&url).json(credentials).send().await?;
        let body = Self::check_response(response).await?;
        LoginResponse::from_value(body).map_err(|e| ApiError::InvalidBody(e.to_string()))
    }
}

#[async_trait]
impl ActionsApi for HttpApi {
    #[instrument(skip(self))]
    async fn list(&self, query: PageQuery) -> Result<Value, ApiError> {
        let url = Self::url(&self.api_base, LIST_ACTIONS_PATH);
        let request = self.authorized(self.http.get(&url).query(&query));
        Self::check_response(request.send().await?).await
    }

    #[instrument(skip(self))]
    async fn create(&self, form: &ActionForm) -> Result<Value, ApiError> {
        let url = Self::url(&self.api_base, CREATE_ACTION_PATH);
        let request = self.authorized(self.http.post(&url).multipart(Self::multipart(form)?));
        Self::check_response(request.send().await?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        assert_eq!(
            HttpApi::url("https://api.example.com/", LIST_ACTIONS_PATH),
            "https://api.example.com/api/v1/actions/admin-list"
        );
        assert_eq!(
            HttpApi::url("https://auth.example.com", "api/Authentication/Login"),
            "https://auth.example.com/api/Authentication/Login"
        );
    }

    #[test]
    fn test_multipart_rejects_bad_mime() {
        let form = ActionForm::new("Recycle", "Sort the weekly trash").with_icon(crate::model::IconFile {
            file_name: "x.png".into(),
            content_type: "not a mime".into(),
            bytes: vec![1, 2, 3],
        });
        assert!(HttpApi::multipart(&form).is_err());
    }

    #[test]
    fn test_page_query_serializes_camel_case() {
        let query = PageQuery { page_number: 2, page_size: 20 };
        let value = serde_json::to_value(query).unwrap();
        assert_eq!(value, serde_json::json!({ "pageNumber": 2, "pageSize": 20 }));
    }
}
