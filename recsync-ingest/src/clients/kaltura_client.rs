//! Kaltura REST API v3 client
//!
//! Every call is `POST {service_url}/api_v3/service/{service}/action/{action}`
//! with form parameters and `format=1` (JSON responses). An admin session
//! token (`ks`) is started on first use and reused until the API rejects it
//! as invalid or expired, at which point a new session is started and the
//! rejected call is repeated once.
//!
//! API failures come back as HTTP 200 with an exception object, so every
//! response goes through [`check_api_exception`].

use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::io::ReaderStream;

use crate::config::PublisherConfig;
use crate::error::PublishError;
use crate::types::Publisher;

const USER_AGENT: &str = concat!("recsync/", env!("CARGO_PKG_VERSION"));
const RESPONSE_FORMAT_JSON: &str = "1";
const SESSION_TYPE_ADMIN: &str = "2";
const MEDIA_TYPE_VIDEO: &str = "1";
const API_EXCEPTION: &str = "KalturaAPIException";
const SESSION_EXPIRED_CODES: [&str; 2] = ["INVALID_KS", "EXPIRED_KS"];

type Params = Vec<(String, String)>;

fn param(key: &str, value: impl Into<String>) -> (String, String) {
    (key.to_string(), value.into())
}

/// Kaltura publication client
pub struct KalturaClient {
    http_client: reqwest::Client,
    config: PublisherConfig,
    ks: Mutex<Option<String>>,
}

impl KalturaClient {
    pub fn new(config: PublisherConfig) -> Result<Self, PublishError> {
        // Uploads can be large; only bound the connection phase
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| PublishError::Network(e.to_string()))?;

        tracing::info!(
            service_url = %config.service_url,
            partner_id = %config.partner_id,
            user_id = %config.user_id,
            "Kaltura client configured"
        );

        Ok(Self {
            http_client,
            config,
            ks: Mutex::new(None),
        })
    }

    fn action_url(&self, service: &str, action: &str) -> String {
        format!(
            "{}/api_v3/service/{}/action/{}",
            self.config.service_url.trim_end_matches('/'),
            service,
            action
        )
    }

    /// Admin session token, started on demand
    async fn session(&self) -> Result<String, PublishError> {
        let mut ks = self.ks.lock().await;
        if let Some(token) = ks.as_ref() {
            return Ok(token.clone());
        }

        let params = vec![
            param("format", RESPONSE_FORMAT_JSON),
            param("secret", self.config.admin_secret.as_str()),
            param("userId", self.config.user_id.as_str()),
            param("type", SESSION_TYPE_ADMIN),
            param("partnerId", self.config.partner_id.as_str()),
        ];
        let body = self.post_form("session", "start", &params).await?;
        let token = body
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| PublishError::Parse("session.start did not return a token".to_string()))?;

        tracing::info!("Kaltura session initialized");
        *ks = Some(token.clone());
        Ok(token)
    }

    async fn post_form(
        &self,
        service: &str,
        action: &str,
        params: &Params,
    ) -> Result<Value, PublishError> {
        tracing::debug!(service = service, action = action, "Kaltura API call");
        let response = self
            .http_client
            .post(self.action_url(service, action))
            .form(params)
            .send()
            .await
            .map_err(|e| PublishError::Network(e.to_string()))?;
        read_response(response).await
    }

    /// Drop the cached token if it is still `stale`
    ///
    /// A token started by a concurrent caller after `stale` was rejected is
    /// left in place.
    async fn invalidate_session(&self, stale: &str) {
        let mut ks = self.ks.lock().await;
        if ks.as_deref() == Some(stale) {
            tracing::info!("Kaltura session rejected, starting a new one");
            *ks = None;
        }
    }

    /// Authenticated call with form parameters
    async fn call(&self, service: &str, action: &str, params: Params) -> Result<Value, PublishError> {
        let ks = self.session().await?;
        match self.post_authenticated(service, action, &params, &ks).await {
            Err(e) if is_session_expired(&e) => {
                self.invalidate_session(&ks).await;
                let ks = self.session().await?;
                self.post_authenticated(service, action, &params, &ks).await
            }
            result => result,
        }
    }

    async fn post_authenticated(
        &self,
        service: &str,
        action: &str,
        params: &Params,
        ks: &str,
    ) -> Result<Value, PublishError> {
        let mut params = params.clone();
        params.push(param("format", RESPONSE_FORMAT_JSON));
        params.push(param("ks", ks));
        self.post_form(service, action, &params).await
    }

    async fn upload_file(&self, token_id: &str, path: &Path, title: &str) -> Result<(), PublishError> {
        let ks = self.session().await?;
        match self.upload_with_session(token_id, path, title, &ks).await {
            Err(e) if is_session_expired(&e) => {
                self.invalidate_session(&ks).await;
                let ks = self.session().await?;
                self.upload_with_session(token_id, path, title, &ks).await
            }
            result => result,
        }
    }

    async fn upload_with_session(
        &self,
        token_id: &str,
        path: &Path,
        title: &str,
        ks: &str,
    ) -> Result<(), PublishError> {
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| PublishError::File(path.to_path_buf(), e.to_string()))?;
        let length = file
            .metadata()
            .await
            .map_err(|e| PublishError::File(path.to_path_buf(), e.to_string()))?
            .len();

        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
        let part = Part::stream_with_length(body, length).file_name(title.to_string());
        let form = Form::new()
            .text("format", RESPONSE_FORMAT_JSON)
            .text("ks", ks.to_string())
            .text("uploadTokenId", token_id.to_string())
            .part("fileData", part);

        let response = self
            .http_client
            .post(self.action_url("uploadToken", "upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| PublishError::Network(e.to_string()))?;
        read_response(response).await?;

        tracing::debug!(token_id = %token_id, bytes = length, "File uploaded to token");
        Ok(())
    }
}

async fn read_response(response: reqwest::Response) -> Result<Value, PublishError> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(PublishError::Http(status.as_u16(), error_text));
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| PublishError::Parse(e.to_string()))?;
    check_api_exception(&body)?;
    Ok(body)
}

/// Map an API exception object to [`PublishError::Api`]
pub fn check_api_exception(body: &Value) -> Result<(), PublishError> {
    if body.get("objectType").and_then(Value::as_str) == Some(API_EXCEPTION) {
        let code = body
            .get("code")
            .and_then(Value::as_str)
            .unwrap_or("UNKNOWN")
            .to_string();
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        return Err(PublishError::Api(code, message));
    }
    Ok(())
}

/// Whether the API rejected the session token
pub fn is_session_expired(err: &PublishError) -> bool {
    matches!(err, PublishError::Api(code, _) if SESSION_EXPIRED_CODES.contains(&code.as_str()))
}

/// `id` of a returned object
pub fn object_id(body: &Value) -> Result<String, PublishError> {
    body.get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| PublishError::Parse("response has no id".to_string()))
}

/// Account id of the listed user whose email equals `email`
pub fn find_account(body: &Value, email: &str) -> Option<String> {
    body.get("objects")?
        .as_array()?
        .iter()
        .find(|user| {
            user.get("email")
                .and_then(Value::as_str)
                .map(|e| e.eq_ignore_ascii_case(email))
                .unwrap_or(false)
        })
        .and_then(|user| user.get("id").and_then(Value::as_str))
        .map(str::to_string)
}

#[async_trait::async_trait]
impl Publisher for KalturaClient {
    async fn resolve_account(&self, email: &str) -> Result<Option<String>, PublishError> {
        let body = self
            .call(
                "user",
                "list",
                vec![
                    param("filter[objectType]", "KalturaUserFilter"),
                    param("filter[emailStartsWith]", email),
                ],
            )
            .await?;
        Ok(find_account(&body, email))
    }

    async fn publish(&self, path: &Path, title: &str) -> Result<String, PublishError> {
        let token = self
            .call(
                "uploadToken",
                "add",
                vec![param("uploadToken[objectType]", "KalturaUploadToken")],
            )
            .await?;
        let token_id = object_id(&token)?;

        self.upload_file(&token_id, path, title).await?;

        let entry = self
            .call(
                "media",
                "add",
                vec![
                    param("entry[objectType]", "KalturaMediaEntry"),
                    param("entry[name]", title),
                    param("entry[mediaType]", MEDIA_TYPE_VIDEO),
                ],
            )
            .await?;
        let entry_id = object_id(&entry)?;

        self.call(
            "media",
            "addContent",
            vec![
                param("entryId", entry_id.as_str()),
                param("resource[objectType]", "KalturaUploadedFileTokenResource"),
                param("resource[token]", token_id.as_str()),
            ],
        )
        .await?;

        Ok(entry_id)
    }

    async fn set_owner(&self, entry_id: &str, account: &str) -> Result<(), PublishError> {
        self.call(
            "media",
            "update",
            vec![
                param("entryId", entry_id),
                param("mediaEntry[objectType]", "KalturaMediaEntry"),
                param("mediaEntry[userId]", account),
            ],
        )
        .await?;
        Ok(())
    }
}
