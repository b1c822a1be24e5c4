//! HTTP client for the ordering backend

use super::{
    feedback_outcome, login_outcome, register_outcome, rejection, Backend, BackendError,
    FEEDBACK_PATH, LOGIN_PATH, MENU_PATH, ORDER_PATH, REGISTER_PATH,
};
use crate::config::StorefrontConfig;
use crate::model::{
    AuthReply, Credentials, Feedback, FeedbackAck, MenuSnapshot, OrderReceipt, OrderSubmission,
    Registration, UserProfile,
};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &StorefrontConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response, BackendError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        debug!(path, status = response.status().as_u16(), "Backend replied");
        Ok(response)
    }

    /// Reads a JSON body regardless of status; an empty body decodes from `null`.
    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<(u16, T), BackendError> {
        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = if text.trim().is_empty() {
            serde_json::from_value(Value::Null)?
        } else {
            serde_json::from_str(&text)?
        };
        Ok((status, body))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    #[instrument(skip(self))]
    async fn fetch_menu(&self) -> Result<MenuSnapshot, BackendError> {
        let response = self.client.get(self.url(MENU_PATH)).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Menu fetch failed");
            return Err(rejection(status.as_u16(), &text, "فشل في جلب البيانات"));
        }

        let body: Value = response.json().await?;
        let menu = MenuSnapshot::from_backend_json(&body)?;
        debug!(categories = menu.categories().len(), "Menu fetched");
        Ok(menu)
    }

    #[instrument(skip(self, order), fields(lines = order.items.len()))]
    async fn submit_order(&self, order: &OrderSubmission) -> Result<OrderReceipt, BackendError> {
        let response = self.post(ORDER_PATH, order).await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Order rejected");
            return Err(rejection(status.as_u16(), &text, "فشل في إرسال الطلب"));
        }

        let (_, body): (u16, Value) = Self::read_json(response).await?;
        Ok(OrderReceipt::from_backend_json(&body, Utc::now()))
    }

    #[instrument(skip(self))]
    async fn login(&self, credentials: &Credentials) -> Result<UserProfile, BackendError> {
        if let Some(field) = credentials.missing_field() {
            return Err(BackendError::missing(field));
        }
        let response = self.post(LOGIN_PATH, credentials).await?;
        let (status, reply): (u16, Option<AuthReply>) = Self::read_json(response).await?;
        login_outcome(status, reply.unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn register(&self, registration: &Registration) -> Result<UserProfile, BackendError> {
        if let Some(field) = registration.missing_field() {
            return Err(BackendError::missing(field));
        }
        let response = self.post(REGISTER_PATH, registration).await?;
        let (status, reply): (u16, Option<AuthReply>) = Self::read_json(response).await?;
        register_outcome(status, reply.unwrap_or_default())
    }

    #[instrument(skip(self, feedback))]
    async fn send_feedback(&self, feedback: &Feedback) -> Result<FeedbackAck, BackendError> {
        if let Some(field) = feedback.missing_field() {
            return Err(BackendError::missing(field));
        }
        let response = self.post(FEEDBACK_PATH, feedback).await?;
        let (status, ack): (u16, Option<FeedbackAck>) = Self::read_json(response).await?;
        feedback_outcome(status, ack.unwrap_or_default())
    }
}
