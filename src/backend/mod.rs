//! # Ordering Backend
//!
//! Menu, orders, accounts and feedback live in an external service. [`Backend`] is
//! the seam the rest of the crate talks to:
//!
//! - [`HttpBackend`]: the real service over HTTPS
//! - [`InMemoryBackend`]: a self-contained stand-in for tests and demos
//!
//! The functions in this module turn raw replies into results. They are shared by
//! both implementations so the success rules (login needs a 2xx *and*
//! `success: true`, register only looks at `success`, ...) live in one place.

pub mod error;
pub mod http;
pub mod memory;

pub use error::BackendError;
pub use http::HttpBackend;
pub use memory::InMemoryBackend;

use crate::model::{
    AuthReply, Credentials, Feedback, FeedbackAck, MenuSnapshot, OrderReceipt, OrderSubmission,
    Registration, UserProfile,
};
use async_trait::async_trait;
use serde_json::Value;

pub const MENU_PATH: &str = "/api/menu";
pub const ORDER_PATH: &str = "/api/OnlineOrder";
pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REGISTER_PATH: &str = "/api/auth/register";
pub const FEEDBACK_PATH: &str = "/api/Feedback";

#[async_trait]
pub trait Backend: Send + Sync {
    /// `GET /api/menu`
    async fn fetch_menu(&self) -> Result<MenuSnapshot, BackendError>;

    /// `POST /api/OnlineOrder`
    async fn submit_order(&self, order: &OrderSubmission) -> Result<OrderReceipt, BackendError>;

    /// `POST /api/auth/login`
    async fn login(&self, credentials: &Credentials) -> Result<UserProfile, BackendError>;

    /// `POST /api/auth/register`
    async fn register(&self, registration: &Registration) -> Result<UserProfile, BackendError>;

    /// `POST /api/Feedback`
    async fn send_feedback(&self, feedback: &Feedback) -> Result<FeedbackAck, BackendError>;
}

/// Builds a `Rejected` error from a failure body, preferring its `message` field.
pub fn rejection(status: u16, body: &str, fallback: &str) -> BackendError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_string());
    BackendError::Rejected { status, message }
}

pub fn login_outcome(status: u16, reply: AuthReply) -> Result<UserProfile, BackendError> {
    match reply.user {
        Some(user) if is_success(status) && reply.success => Ok(user.into()),
        _ => Err(BackendError::Rejected {
            status: failure_status(status, 401),
            message: reply
                .message
                .unwrap_or_else(|| "Invalid username/email or password.".to_string()),
        }),
    }
}

/// Registration trusts the `success` flag over the HTTP status.
pub fn register_outcome(status: u16, reply: AuthReply) -> Result<UserProfile, BackendError> {
    match reply.user {
        Some(user) if reply.success => Ok(user.into()),
        _ => Err(BackendError::Rejected {
            status: failure_status(status, 400),
            message: reply
                .message
                .unwrap_or_else(|| "فشل إنشاء الحساب.".to_string()),
        }),
    }
}

pub fn feedback_outcome(status: u16, ack: FeedbackAck) -> Result<FeedbackAck, BackendError> {
    if ack.success {
        return Ok(FeedbackAck {
            success: true,
            message: ack
                .message
                .or_else(|| Some("تم إرسال الملاحظات بنجاح.".to_string())),
        });
    }
    Err(BackendError::Rejected {
        status: failure_status(status, 400),
        message: ack
            .message
            .unwrap_or_else(|| "فشل إرسال الملاحظات.".to_string()),
    })
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// A 2xx carrying `success: false` is still reported with a failure status.
fn failure_status(status: u16, fallback: u16) -> u16 {
    if is_success(status) || status == 0 {
        fallback
    } else {
        status
    }
}
