//! In-process backend for tests and the demo binary.
//!
//! Behaves like the real service as far as this crate can observe: accepted
//! orders lower the stock reported by the next menu fetch, logins are checked
//! against registered accounts, and failures can be injected.

use super::{Backend, BackendError};
use crate::model::{
    Category, Credentials, Feedback, FeedbackAck, MenuItemId, MenuSnapshot, OrderReceipt,
    OrderSubmission, Registration, UserProfile,
};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

struct Account {
    profile: UserProfile,
    password: String,
}

#[derive(Default)]
struct State {
    categories: Vec<Category>,
    orders: Vec<OrderSubmission>,
    accounts: Vec<Account>,
    feedback: Vec<Feedback>,
    order_failure: Option<(u16, String)>,
    offline: bool,
}

#[derive(Default)]
pub struct InMemoryBackend {
    state: Mutex<State>,
}

impl InMemoryBackend {
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            state: Mutex::new(State {
                categories,
                ..State::default()
            }),
        }
    }

    /// Adds an account that can log in with `password`.
    pub fn with_account(self, profile: UserProfile, password: impl Into<String>) -> Self {
        self.lock().accounts.push(Account {
            profile,
            password: password.into(),
        });
        self
    }

    pub fn set_stock(&self, item_id: MenuItemId, available: u32) {
        let mut state = self.lock();
        for item in state.categories.iter_mut().flat_map(|c| c.items.iter_mut()) {
            if item.id == item_id {
                item.available_quantity = available;
            }
        }
    }

    /// Makes every following order submission fail with `status`.
    pub fn reject_orders(&self, status: u16, message: impl Into<String>) {
        self.lock().order_failure = Some((status, message.into()));
    }

    /// While offline every call fails as `Unavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    pub fn orders(&self) -> Vec<OrderSubmission> {
        self.lock().orders.clone()
    }

    pub fn feedback(&self) -> Vec<Feedback> {
        self.lock().feedback.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn online(&self) -> Result<MutexGuard<'_, State>, BackendError> {
        let state = self.lock();
        if state.offline {
            return Err(BackendError::Unavailable("backend is offline".to_string()));
        }
        Ok(state)
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn fetch_menu(&self) -> Result<MenuSnapshot, BackendError> {
        let state = self.online()?;
        Ok(MenuSnapshot::new(state.categories.clone()))
    }

    async fn submit_order(&self, order: &OrderSubmission) -> Result<OrderReceipt, BackendError> {
        let mut state = self.online()?;
        if let Some((status, message)) = &state.order_failure {
            return Err(BackendError::Rejected {
                status: *status,
                message: message.clone(),
            });
        }

        for line in &order.items {
            for item in state.categories.iter_mut().flat_map(|c| c.items.iter_mut()) {
                if item.id == line.product_id {
                    item.available_quantity = item.available_quantity.saturating_sub(line.quantity);
                }
            }
        }
        state.orders.push(order.clone());

        let order_id = (1000 + state.orders.len()).to_string();
        info!(%order_id, lines = order.items.len(), "Order stored");
        Ok(OrderReceipt {
            success: true,
            order_id,
            message: OrderReceipt::DEFAULT_MESSAGE.to_string(),
        })
    }

    async fn login(&self, credentials: &Credentials) -> Result<UserProfile, BackendError> {
        if let Some(field) = credentials.missing_field() {
            return Err(BackendError::missing(field));
        }
        let state = self.online()?;
        state
            .accounts
            .iter()
            .find(|account| {
                (account.profile.username == credentials.user_name
                    || account.profile.email == credentials.user_name)
                    && account.password == credentials.password
            })
            .map(|account| account.profile.clone())
            .ok_or_else(|| BackendError::Rejected {
                status: 401,
                message: "Invalid username/email or password.".to_string(),
            })
    }

    async fn register(&self, registration: &Registration) -> Result<UserProfile, BackendError> {
        if let Some(field) = registration.missing_field() {
            return Err(BackendError::missing(field));
        }
        let mut state = self.online()?;
        if state
            .accounts
            .iter()
            .any(|account| account.profile.username == registration.user_name)
        {
            return Err(BackendError::Rejected {
                status: 409,
                message: "اسم المستخدم مستخدم مسبقاً.".to_string(),
            });
        }

        let profile = UserProfile {
            id: (state.accounts.len() + 1).to_string(),
            name: registration.name.trim().to_string(),
            username: registration.user_name.clone(),
            email: registration.email.clone(),
            phone: Some(registration.surname.clone()),
        };
        state.accounts.push(Account {
            profile: profile.clone(),
            password: registration.password.clone(),
        });
        debug!(username = %profile.username, "Account registered");
        Ok(profile)
    }

    async fn send_feedback(&self, feedback: &Feedback) -> Result<FeedbackAck, BackendError> {
        if let Some(field) = feedback.missing_field() {
            return Err(BackendError::missing(field));
        }
        self.online()?.feedback.push(feedback.clone());
        Ok(FeedbackAck {
            success: true,
            message: Some("تم إرسال الملاحظات بنجاح.".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MenuItem, OrderLine, PaymentMethod};
    use chrono::Utc;

    fn backend() -> InMemoryBackend {
        InMemoryBackend::new(vec![Category {
            id: "1".into(),
            name: "Grill".into(),
            name_en: None,
            items: vec![MenuItem::new(1, "Kebab", 3000.0).with_stock(5)],
        }])
    }

    fn order(quantity: u32) -> OrderSubmission {
        OrderSubmission {
            customer_name: "Nour".into(),
            customer_phone: "777777777".into(),
            customer_email: None,
            order_date: Utc::now(),
            payment_method: PaymentMethod::BankTransfer,
            notes: None,
            payment_proof_base64: Some("cHJvb2YtaW1hZ2U=".into()),
            gps_link: None,
            latitude: None,
            longitude: None,
            location_description: None,
            items: vec![OrderLine {
                product_id: MenuItemId(1),
                quantity,
                item_note: None,
            }],
        }
    }

    #[tokio::test]
    async fn test_orders_lower_stock() {
        let backend = backend();
        let receipt = backend.submit_order(&order(2)).await.unwrap();
        assert_eq!(receipt.order_id, "1001");

        let menu = backend.fetch_menu().await.unwrap();
        assert_eq!(menu.item(MenuItemId(1)).unwrap().available_quantity, 3);
        assert_eq!(backend.orders().len(), 1);
    }

    #[tokio::test]
    async fn test_register_then_login_by_email() {
        let backend = backend();
        let profile = backend
            .register(&Registration::new(" Nour ", "777777777", "n@x.com", "nour", "pw"))
            .await
            .unwrap();
        assert_eq!(profile.name, "Nour");

        let logged_in = backend
            .login(&Credentials::new("n@x.com", "pw"))
            .await
            .unwrap();
        assert_eq!(logged_in, profile);

        let err = backend
            .login(&Credentials::new("nour", "wrong"))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Rejected { status: 401, .. }));

        let err = backend
            .register(&Registration::new("N", "7", "o@x.com", "nour", "pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Rejected { status: 409, .. }));
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let backend = backend();
        backend.reject_orders(500, "down for maintenance");
        let err = backend.submit_order(&order(1)).await.unwrap_err();
        assert_eq!(
            err,
            BackendError::Rejected {
                status: 500,
                message: "down for maintenance".into()
            }
        );
        assert!(backend.orders().is_empty());

        backend.set_offline(true);
        let err = backend.fetch_menu().await.unwrap_err();
        assert!(matches!(err, BackendError::Unavailable(_)));
    }
}
