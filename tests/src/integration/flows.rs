//! # Cross-Service Flow Tests
//!
//! End-to-end scenarios over the shared bus: catalog, media, orders, and
//! identity running together, replies routed by correlation id.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{start_platform, test_rpc_config};
    use catalog_service::CreateProduct;
    use order_service::OrderItem;
    use serde_json::json;
    use shared_bus::{BusPublisher, InMemoryBus};
    use shared_rpc::{decode_item, InboundCall, RequestGateway};
    use shared_types::channels::get_product_route;
    use shared_types::{Product, Route, ServiceTag};
    use std::sync::Arc;
    use std::time::Duration;

    async fn create_widget(platform: &crate::integration::fixtures::Platform) -> String {
        let envelope = platform
            .catalog
            .create_product(
                InboundCall::mutation("create_product", platform.seller_credential()),
                CreateProduct {
                    name: "widget".into(),
                    description: "a widget".into(),
                    price: 9.99,
                    quantity: 5,
                },
            )
            .await;
        assert_eq!(envelope.status, 201);
        envelope.data.unwrap()["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn get_product_over_the_bus_decodes_the_record() {
        let platform = start_platform();
        let id = create_widget(&platform).await;

        // A bare gateway call on the well-known route, as the media
        // service issues it.
        let gateway = RequestGateway::connect(
            Arc::clone(&platform.bus),
            ServiceTag::Media,
            &[get_product_route()],
            &test_rpc_config(),
        );
        let envelope = gateway.call(&get_product_route(), json!(id), None).await;

        assert!(!envelope.is_error());
        let product = decode_item::<Product>(envelope.data.as_ref())
            .unwrap()
            .unwrap();
        assert_eq!(product.id, id);
        assert_eq!(product.name, "widget");
        assert!((product.price - 9.99).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn delete_product_continues_past_missing_media() {
        let platform = start_platform();
        let id = create_widget(&platform).await;

        // No media was ever uploaded: the media service answers 404 and
        // the delete flow treats that as nothing to do.
        let envelope = platform
            .catalog
            .delete_product(
                InboundCall::mutation("delete_product", platform.seller_credential()),
                &id,
            )
            .await;

        assert!(!envelope.is_error());
        assert!(platform.product_store.is_empty());
    }

    #[tokio::test]
    async fn call_without_subscriber_times_out_with_bad_request() {
        let bus = Arc::new(InMemoryBus::new());
        let orphan = Route::new("nobody-home-request", "nobody-home-reply");
        let gateway = RequestGateway::connect(
            Arc::clone(&bus),
            ServiceTag::Orders,
            &[orphan.clone()],
            &test_rpc_config(),
        );

        let envelope = gateway
            .call(&orphan, json!("ping"), Some(Duration::from_millis(100)))
            .await;

        assert_eq!(envelope.status, 400);
        assert!(envelope.message.contains("timed out"));
        assert_eq!(gateway.pending_count(), 0);
    }

    #[tokio::test]
    async fn exempt_read_issues_no_bus_traffic() {
        let platform = start_platform();
        let id = create_widget(&platform).await;

        let before = platform.bus.messages_published();
        let envelope = platform
            .catalog
            .get_product(InboundCall::read("get_product"), &id)
            .await;

        assert!(!envelope.is_error());
        // Catalog reads are exempt: no validation call went out.
        assert_eq!(platform.bus.messages_published(), before);
    }

    #[tokio::test]
    async fn invalid_credential_short_circuits_before_the_store() {
        let platform = start_platform();

        let envelope = platform
            .catalog
            .create_product(
                InboundCall::mutation("create_product", "Bearer forged"),
                CreateProduct {
                    name: "widget".into(),
                    description: String::new(),
                    price: 1.0,
                    quantity: 1,
                },
            )
            .await;

        assert_eq!(envelope.status, 401);
        // The protected handler never ran.
        assert!(platform.product_store.is_empty());
    }

    #[tokio::test]
    async fn full_marketplace_flow() {
        let platform = start_platform();
        let id = create_widget(&platform).await;

        // Seller attaches media; ownership is checked through the catalog.
        let uploaded = platform
            .media
            .upload(
                InboundCall::mutation("upload", platform.seller_credential()),
                &id,
                "/images/widget.png",
            )
            .await;
        assert_eq!(uploaded.status, 201);
        assert_eq!(platform.media_store.len(), 1);

        // Buyer places an order; stock decrements through the catalog.
        let placed = platform
            .orders
            .place_order(
                InboundCall::mutation("place_order", platform.buyer_credential()),
                vec![OrderItem {
                    product_id: id.clone(),
                    quantity: 2,
                }],
            )
            .await;
        assert_eq!(placed.status, 201);
        assert_eq!(platform.product_store.get(&id).unwrap().quantity, 3);
        assert_eq!(platform.order_store.len(), 1);

        // Seller deletes the product; the cascade removes its media.
        let deleted = platform
            .catalog
            .delete_product(
                InboundCall::mutation("delete_product", platform.seller_credential()),
                &id,
            )
            .await;
        assert!(!deleted.is_error());
        assert!(platform.product_store.is_empty());
        assert!(platform.media_store.is_empty());
    }

    #[tokio::test]
    async fn buyer_mutation_on_catalog_is_forbidden() {
        let platform = start_platform();

        let envelope = platform
            .catalog
            .create_product(
                InboundCall::mutation("create_product", platform.buyer_credential()),
                CreateProduct {
                    name: "widget".into(),
                    description: String::new(),
                    price: 1.0,
                    quantity: 1,
                },
            )
            .await;

        assert_eq!(envelope.status, 403);
    }
}
