//! Walks one customer through the storefront against an in-memory backend:
//! browse, fill the cart, log in and check out.

use crisper_storefront::backend::InMemoryBackend;
use crisper_storefront::checkout::{CheckoutForm, DeliveryDetails, PaymentProof};
use crisper_storefront::config::StorefrontConfig;
use crisper_storefront::lifecycle::{setup_tracing, Storefront};
use crisper_storefront::model::{Category, Credentials, Locale, MenuItem, MenuItemId, UserProfile};
use std::sync::Arc;
use tracing::{error, info, Instrument};

fn demo_menu() -> Vec<Category> {
    vec![
        Category {
            id: "1".into(),
            name: "برجر".into(),
            name_en: Some("Burgers".into()),
            items: vec![
                MenuItem::new(1, "برجر كرسبي", 2500.0)
                    .with_english_name("Crispy Burger")
                    .in_category("1")
                    .with_stock(5),
                MenuItem::new(2, "برجر لحم", 3000.0)
                    .with_english_name("Beef Burger")
                    .in_category("1"),
            ],
        },
        Category {
            id: "2".into(),
            name: "مشروبات".into(),
            name_en: Some("Drinks".into()),
            items: vec![MenuItem::new(3, "ليمون بالنعناع", 800.0)
                .with_english_name("Lemon Mint")
                .in_category("2")
                .with_stock(20)],
        },
    ]
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let config = StorefrontConfig::from_env()?;
    let backend = InMemoryBackend::new(demo_menu()).with_account(
        UserProfile {
            id: "1".into(),
            name: "Aisha".into(),
            username: "aisha".into(),
            email: "aisha@example.com".into(),
            phone: Some("773456789".into()),
        },
        "s3cret",
    );
    let storefront = Storefront::new(config, Arc::new(backend));

    let mut session = storefront.open_session().await?;
    session.set_locale(Locale::En);

    let span = tracing::info_span!("browsing");
    async {
        let menu = session.refresh_menu().await?;
        for item in menu.items() {
            info!(
                item = item.display_name(Locale::En),
                price = item.price,
                in_stock = !item.is_out_of_stock(),
                "On the menu"
            );
        }

        session.add_to_cart(MenuItemId(1), None).await?;
        session
            .add_to_cart(MenuItemId(1), Some("no onions".into()))
            .await?;
        session.add_to_cart(MenuItemId(3), None).await?;

        if let Err(e) = session.add_to_cart(MenuItemId(2), None).await {
            info!(error = %e, "Could not add item");
        }
        Ok::<_, Box<dyn std::error::Error>>(())
    }
    .instrument(span)
    .await?;

    let summary = session.summary().await?;
    info!(
        items = summary.total_items,
        total = summary.total,
        currency = %storefront.config().currency,
        "Cart ready"
    );

    session
        .login(&Credentials::new("aisha@example.com", "s3cret"))
        .await?;

    let receipt_png = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0x0d];
    let form = CheckoutForm::delivery(
        "",
        "",
        PaymentProof::from_bytes(&receipt_png, "image/png")?,
        DeliveryDetails::at(15.3694, 44.1910, "Next to the pharmacy, blue gate"),
    );

    let span = tracing::info_span!("checkout");
    match session.checkout(form).instrument(span).await {
        Ok(receipt) => info!(order_id = %receipt.order_id, "Order confirmed"),
        Err(e) => error!(error = %e, "Checkout failed"),
    }

    session.close().await?;
    storefront.shutdown().await?;

    info!("Demo completed successfully");
    Ok(())
}
