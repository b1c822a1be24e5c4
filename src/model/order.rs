//! Bodies of `POST /api/OnlineOrder` and its reply.

use crate::model::cart::{CartLine, CartState};
use crate::model::menu::MenuItemId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    #[default]
    Pickup,
    Delivery,
}

/// The only accepted payment method is a bank transfer ("حوالة") proven by a
/// receipt image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "حوالة")]
    BankTransfer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: MenuItemId,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_note: Option<String>,
}

impl From<&CartLine> for OrderLine {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.id(),
            quantity: line.quantity,
            item_note: line.special_request.clone(),
        }
    }
}

/// An order as the backend expects it.
///
/// Delivery fields are `null` for pickup orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubmission {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub order_date: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub payment_proof_base64: Option<String>,
    pub gps_link: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location_description: Option<String>,
    #[serde(rename = "tblOnlineOrderItem")]
    pub items: Vec<OrderLine>,
}

impl OrderSubmission {
    pub fn lines_from(cart: &CartState) -> Vec<OrderLine> {
        cart.lines().iter().map(OrderLine::from).collect()
    }
}

/// Confirmation handed back to the customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub success: bool,
    pub order_id: String,
    pub message: String,
}

impl OrderReceipt {
    pub const DEFAULT_MESSAGE: &'static str = "تم إرسال الطلب بنجاح";

    /// Reads the backend's 2xx reply. A missing or empty `orderId` becomes
    /// `ORD-{unix millis}` of `received_at`.
    pub fn from_backend_json(body: &Value, received_at: DateTime<Utc>) -> Self {
        let order_id = match body.get("orderId") {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => Self::fallback_id(received_at),
        };
        Self {
            success: true,
            order_id,
            message: Self::DEFAULT_MESSAGE.to_string(),
        }
    }

    pub fn fallback_id(at: DateTime<Utc>) -> String {
        format!("ORD-{}", at.timestamp_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::menu::MenuItem;
    use chrono::TimeZone;
    use serde_json::json;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_receipt_reads_order_id() {
        let receipt = OrderReceipt::from_backend_json(&json!({ "orderId": 512 }), at());
        assert!(receipt.success);
        assert_eq!(receipt.order_id, "512");

        let receipt = OrderReceipt::from_backend_json(&json!({ "orderId": "A-9" }), at());
        assert_eq!(receipt.order_id, "A-9");
    }

    #[test]
    fn test_receipt_falls_back_to_timestamp() {
        let receipt = OrderReceipt::from_backend_json(&json!({ "orderId": "" }), at());
        assert_eq!(receipt.order_id, format!("ORD-{}", at().timestamp_millis()));

        let receipt = OrderReceipt::from_backend_json(&json!({}), at());
        assert_eq!(receipt.order_id, OrderReceipt::fallback_id(at()));
    }

    #[test]
    fn test_submission_wire_names() {
        let mut cart = CartState::new();
        cart.add_item(MenuItem::new(4, "Tea", 200.0), 2, Some("no sugar".into()));
        cart.add_item(MenuItem::new(5, "Cake", 900.0), 1, None);

        let submission = OrderSubmission {
            customer_name: "Sara".into(),
            customer_phone: "777123456".into(),
            customer_email: None,
            order_date: at(),
            payment_method: PaymentMethod::BankTransfer,
            notes: None,
            payment_proof_base64: Some("aGVsbG8gd29ybGQ=".into()),
            gps_link: None,
            latitude: None,
            longitude: None,
            location_description: None,
            items: OrderSubmission::lines_from(&cart),
        };

        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["customerName"], "Sara");
        assert_eq!(json["paymentMethod"], "حوالة");
        assert_eq!(json["customerEmail"], Value::Null);
        assert_eq!(json["gpsLink"], Value::Null);
        assert_eq!(json["tblOnlineOrderItem"][0]["productId"], 4);
        assert_eq!(json["tblOnlineOrderItem"][0]["itemNote"], "no sugar");
        assert!(json["tblOnlineOrderItem"][1].get("itemNote").is_none());
        assert!(json["orderDate"].as_str().unwrap().starts_with("2025-03-01T12:00:00"));
    }
}
