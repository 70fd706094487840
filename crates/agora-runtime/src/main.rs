//! # Agora Runtime
//!
//! The composition root for the marketplace platform. All services talk
//! exclusively over one shared message bus; synchronous call semantics
//! come from the request/reply layer in `shared-rpc`.
//!
//! ```text
//! catalog ──┐                         ┌── identity (credential validation)
//!           │      ┌───────────┐      │
//! media   ──┼────▶ │  Message  │ ◀────┤
//!           │      │    Bus    │      │
//! orders  ──┘      └───────────┘      └── (replies route by correlation id)
//! ```
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults + environment overrides)
//! 2. Initialize structured logging
//! 3. Wire all services onto one bus (responders, gateways, gates)
//! 4. Seed demo users and run a smoke flow
//! 5. Serve until ctrl-c

pub mod config;
pub mod wiring;

use anyhow::Result;
use catalog_service::CreateProduct;
use config::AgoraConfig;
use order_service::OrderItem;
use shared_rpc::InboundCall;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("AGORA_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .compact()
        .init();

    let config = AgoraConfig::from_env();
    info!(
        timeout_secs = config.rpc.default_timeout.as_secs(),
        bus_capacity = config.bus_capacity,
        "Starting Agora platform"
    );

    let platform = wiring::start(&config);
    let (seller, buyer) = wiring::seed_demo_users(&platform);

    smoke_flow(&platform, &seller.token, &buyer.token).await;

    info!("Platform running; press ctrl-c to stop");
    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    Ok(())
}

/// Exercise the cross-service paths once so a fresh deployment proves its
/// wiring in the logs.
async fn smoke_flow(platform: &wiring::Platform, seller_token: &str, buyer_token: &str) {
    let seller_credential = format!("Bearer {seller_token}");
    let buyer_credential = format!("Bearer {buyer_token}");

    let created = platform
        .catalog
        .create_product(
            InboundCall::mutation("create_product", seller_credential.clone()),
            CreateProduct {
                name: "widget".into(),
                description: "A demonstration widget".into(),
                price: 9.99,
                quantity: 10,
            },
        )
        .await;
    info!(status = created.status, message = %created.message, "Smoke: create product");

    let product_id = created
        .data
        .as_ref()
        .and_then(|data| data["id"].as_str())
        .unwrap_or_default()
        .to_string();

    let uploaded = platform
        .media
        .upload(
            InboundCall::mutation("upload", seller_credential.clone()),
            &product_id,
            "/images/widget.png",
        )
        .await;
    info!(status = uploaded.status, message = %uploaded.message, "Smoke: upload media");

    let placed = platform
        .orders
        .place_order(
            InboundCall::mutation("place_order", buyer_credential),
            vec![OrderItem {
                product_id: product_id.clone(),
                quantity: 2,
            }],
        )
        .await;
    info!(status = placed.status, message = %placed.message, "Smoke: place order");

    let deleted = platform
        .catalog
        .delete_product(
            InboundCall::mutation("delete_product", seller_credential),
            &product_id,
        )
        .await;
    info!(status = deleted.status, message = %deleted.message, "Smoke: delete product");
}
