//! # Checkout
//!
//! Turns a cart and a filled-in form into an order the backend accepts.
//!
//! [`validate`] applies the form rules and yields a [`ValidatedOrder`];
//! [`OrderSubmission::from_cart`] combines that with the cart lines into the wire
//! payload. Submitting, and clearing the cart afterwards, is done by
//! [`ShoppingSession::checkout`](crate::lifecycle::ShoppingSession::checkout).

pub mod payment_proof;
pub mod pricing;

pub use payment_proof::{PaymentProof, PaymentProofError};
pub use pricing::{PriceSummary, TaxPolicy};

pub use crate::model::{OrderType, PaymentMethod};

use crate::backend::BackendError;
use crate::cart_actor::CartError;
use crate::model::{CartState, OrderSubmission, StockError, UserProfile};
use chrono::{DateTime, Utc};
use thiserror::Error;

pub const MIN_NAME_CHARS: usize = 2;
pub const MIN_PHONE_CHARS: usize = 9;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CheckoutError {
    #[error("You must add items to your order")]
    EmptyCart,

    #[error("Customer name must be at least 2 characters")]
    NameTooShort,

    #[error("Phone number must be at least 9 characters")]
    PhoneTooShort,

    #[error("Payment proof is required")]
    MissingPaymentProof,

    #[error("Delivery orders need a {0}")]
    MissingDeliveryField(&'static str),

    #[error(transparent)]
    PaymentProof(#[from] PaymentProofError),

    #[error(transparent)]
    Stock(#[from] StockError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Where a delivery goes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeliveryDetails {
    pub location_description: String,
    pub gps_link: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl DeliveryDetails {
    /// Details for a device position, with a maps link built from it.
    pub fn at(latitude: f64, longitude: f64, location_description: impl Into<String>) -> Self {
        Self {
            location_description: location_description.into(),
            gps_link: Some(format!("https://maps.google.com/?q={latitude},{longitude}")),
            latitude: Some(latitude),
            longitude: Some(longitude),
        }
    }
}

/// What the customer filled in.
#[derive(Debug, Clone, Default)]
pub struct CheckoutForm {
    pub customer_name: String,
    pub customer_phone: String,
    pub order_type: OrderType,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub payment_proof: Option<PaymentProof>,
    /// Ignored for pickup orders.
    pub delivery: Option<DeliveryDetails>,
}

impl CheckoutForm {
    pub fn pickup(
        customer_name: impl Into<String>,
        customer_phone: impl Into<String>,
        payment_proof: PaymentProof,
    ) -> Self {
        Self {
            customer_name: customer_name.into(),
            customer_phone: customer_phone.into(),
            payment_proof: Some(payment_proof),
            ..Self::default()
        }
    }

    pub fn delivery(
        customer_name: impl Into<String>,
        customer_phone: impl Into<String>,
        payment_proof: PaymentProof,
        delivery: DeliveryDetails,
    ) -> Self {
        Self {
            order_type: OrderType::Delivery,
            delivery: Some(delivery),
            ..Self::pickup(customer_name, customer_phone, payment_proof)
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// A form that passed [`validate`], with account details merged in.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedOrder {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub order_type: OrderType,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub payment_proof: PaymentProof,
    pub delivery: Option<DeliveryDetails>,
}

/// Checks `form` against `cart` and the logged-in `user`, if any.
///
/// A logged-in customer's name, phone and email replace the form's; the form
/// is used for whatever the account lacks. Delivery details are dropped for pickup orders.
pub fn validate(
    form: &CheckoutForm,
    cart: &CartState,
    user: Option<&UserProfile>,
) -> Result<ValidatedOrder, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let customer_name = match user {
        Some(user) if !user.name.trim().is_empty() => user.name.trim(),
        _ => form.customer_name.trim(),
    };
    if customer_name.chars().count() < MIN_NAME_CHARS {
        return Err(CheckoutError::NameTooShort);
    }

    let customer_phone = match user.and_then(|u| u.phone.as_deref()) {
        Some(phone) if !phone.trim().is_empty() => phone.trim(),
        _ => form.customer_phone.trim(),
    };
    if customer_phone.chars().count() < MIN_PHONE_CHARS {
        return Err(CheckoutError::PhoneTooShort);
    }

    let payment_proof = form
        .payment_proof
        .clone()
        .ok_or(CheckoutError::MissingPaymentProof)?;

    let delivery = match form.order_type {
        OrderType::Pickup => None,
        OrderType::Delivery => Some(validate_delivery(form.delivery.as_ref())?),
    };

    Ok(ValidatedOrder {
        customer_name: customer_name.to_string(),
        customer_phone: customer_phone.to_string(),
        customer_email: user.map(|u| u.email.clone()).filter(|e| !e.is_empty()),
        order_type: form.order_type,
        payment_method: form.payment_method,
        notes: form
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string),
        payment_proof,
        delivery,
    })
}

fn validate_delivery(details: Option<&DeliveryDetails>) -> Result<DeliveryDetails, CheckoutError> {
    let details = details.ok_or(CheckoutError::MissingDeliveryField("location description"))?;
    if details.location_description.trim().is_empty() {
        return Err(CheckoutError::MissingDeliveryField("location description"));
    }
    if details.gps_link.as_deref().map_or(true, |l| l.trim().is_empty()) {
        return Err(CheckoutError::MissingDeliveryField("GPS link"));
    }
    if details.latitude.is_none() {
        return Err(CheckoutError::MissingDeliveryField("latitude"));
    }
    if details.longitude.is_none() {
        return Err(CheckoutError::MissingDeliveryField("longitude"));
    }
    Ok(details.clone())
}

impl OrderSubmission {
    /// Builds the order payload for `cart`, dated `placed_at`.
    pub fn from_cart(order: &ValidatedOrder, cart: &CartState, placed_at: DateTime<Utc>) -> Self {
        let delivery = order.delivery.as_ref();
        Self {
            customer_name: order.customer_name.clone(),
            customer_phone: order.customer_phone.clone(),
            customer_email: order.customer_email.clone(),
            order_date: placed_at,
            payment_method: order.payment_method,
            notes: order.notes.clone(),
            payment_proof_base64: Some(order.payment_proof.base64().to_string()),
            gps_link: delivery.and_then(|d| d.gps_link.clone()),
            latitude: delivery.and_then(|d| d.latitude),
            longitude: delivery.and_then(|d| d.longitude),
            location_description: delivery.map(|d| d.location_description.clone()),
            items: Self::lines_from(cart),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MenuItem, MenuItemId};

    fn proof() -> PaymentProof {
        PaymentProof::from_base64("aGVsbG8gd29ybGQ=", "image/jpeg").unwrap()
    }

    fn cart() -> CartState {
        let mut cart = CartState::new();
        cart.add_item(MenuItem::new(1, "Mandi", 4500.0), 1, Some("extra rice".into()));
        cart
    }

    fn user() -> UserProfile {
        UserProfile {
            id: "3".into(),
            name: "Khaled".into(),
            username: "khaled".into(),
            email: "k@example.com".into(),
            phone: Some("771234567".into()),
        }
    }

    #[test]
    fn test_pickup_order_is_valid() {
        let form = CheckoutForm::pickup("Aisha", "773456789", proof()).with_notes("  ring twice ");
        let order = validate(&form, &cart(), None).unwrap();

        assert_eq!(order.customer_name, "Aisha");
        assert_eq!(order.customer_email, None);
        assert_eq!(order.notes.as_deref(), Some("ring twice"));
        assert!(order.delivery.is_none());
    }

    #[test]
    fn test_rules_in_order() {
        let form = CheckoutForm::pickup("A", "1", proof());
        assert_eq!(validate(&form, &CartState::new(), None), Err(CheckoutError::EmptyCart));
        assert_eq!(validate(&form, &cart(), None), Err(CheckoutError::NameTooShort));

        let form = CheckoutForm::pickup("Aisha", "12345678", proof());
        assert_eq!(validate(&form, &cart(), None), Err(CheckoutError::PhoneTooShort));

        let form = CheckoutForm {
            payment_proof: None,
            ..CheckoutForm::pickup("Aisha", "123456789", proof())
        };
        assert_eq!(validate(&form, &cart(), None), Err(CheckoutError::MissingPaymentProof));
    }

    #[test]
    fn test_user_overrides_form() {
        let form = CheckoutForm::pickup("x", "", proof());
        let order = validate(&form, &cart(), Some(&user())).unwrap();

        assert_eq!(order.customer_name, "Khaled");
        assert_eq!(order.customer_phone, "771234567");
        assert_eq!(order.customer_email.as_deref(), Some("k@example.com"));
    }

    #[test]
    fn test_account_phone_wins_over_typed_phone() {
        let form = CheckoutForm::pickup("x", "700000000", proof());
        let order = validate(&form, &cart(), Some(&user())).unwrap();
        assert_eq!(order.customer_phone, "771234567");

        // Accounts without a phone keep the typed one
        let no_phone = UserProfile {
            phone: Some("  ".into()),
            ..user()
        };
        let order = validate(&form, &cart(), Some(&no_phone)).unwrap();
        assert_eq!(order.customer_phone, "700000000");

        let order = validate(&form, &cart(), Some(&UserProfile { phone: None, ..user() })).unwrap();
        assert_eq!(order.customer_phone, "700000000");
    }

    #[test]
    fn test_delivery_needs_every_location_field() {
        let full = DeliveryDetails::at(15.35, 44.2, "Near the old gate");
        assert_eq!(full.gps_link.as_deref(), Some("https://maps.google.com/?q=15.35,44.2"));

        let form = CheckoutForm::delivery("Aisha", "773456789", proof(), full.clone());
        let order = validate(&form, &cart(), None).unwrap();
        assert_eq!(order.delivery, Some(full.clone()));

        let cases = [
            (
                DeliveryDetails {
                    location_description: " ".into(),
                    ..full.clone()
                },
                "location description",
            ),
            (
                DeliveryDetails {
                    gps_link: None,
                    ..full.clone()
                },
                "GPS link",
            ),
            (
                DeliveryDetails {
                    latitude: None,
                    ..full.clone()
                },
                "latitude",
            ),
            (
                DeliveryDetails {
                    longitude: None,
                    ..full.clone()
                },
                "longitude",
            ),
        ];
        for (details, field) in cases {
            let form = CheckoutForm::delivery("Aisha", "773456789", proof(), details);
            assert_eq!(
                validate(&form, &cart(), None),
                Err(CheckoutError::MissingDeliveryField(field))
            );
        }

        let no_details = CheckoutForm {
            delivery: None,
            ..CheckoutForm::delivery("Aisha", "773456789", proof(), full)
        };
        assert!(validate(&no_details, &cart(), None).is_err());
    }

    #[test]
    fn test_pickup_drops_delivery_details() {
        let form = CheckoutForm {
            order_type: OrderType::Pickup,
            ..CheckoutForm::delivery(
                "Aisha",
                "773456789",
                proof(),
                DeliveryDetails::at(1.0, 2.0, "x"),
            )
        };
        let order = validate(&form, &cart(), None).unwrap();
        let submission = OrderSubmission::from_cart(&order, &cart(), Utc::now());

        assert!(submission.gps_link.is_none());
        assert!(submission.latitude.is_none());
        assert!(submission.location_description.is_none());
    }

    #[test]
    fn test_submission_from_cart() {
        let form = CheckoutForm::delivery(
            "Aisha",
            "773456789",
            proof(),
            DeliveryDetails::at(15.0, 44.0, "Blue door"),
        );
        let order = validate(&form, &cart(), Some(&user())).unwrap();
        let submission = OrderSubmission::from_cart(&order, &cart(), Utc::now());

        assert_eq!(submission.customer_name, "Khaled");
        assert_eq!(submission.customer_phone, "771234567");
        assert_eq!(submission.payment_proof_base64.as_deref(), Some("aGVsbG8gd29ybGQ="));
        assert_eq!(submission.latitude, Some(15.0));
        assert_eq!(submission.location_description.as_deref(), Some("Blue door"));
        assert_eq!(submission.items.len(), 1);
        assert_eq!(submission.items[0].product_id, MenuItemId(1));
        assert_eq!(submission.items[0].item_note.as_deref(), Some("extra rice"));
    }
}
