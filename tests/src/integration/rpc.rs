//! # Request/Reply Discipline Tests
//!
//! Properties of the correlation layer exercised over a real bus: id
//! uniqueness under concurrency, reply routing under arbitrary
//! interleaving, exactly-once resolution, and late-reply silence.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::test_rpc_config;
    use async_trait::async_trait;
    use rand::Rng;
    use serde_json::{json, Value};
    use shared_bus::{BusMessage, BusPublisher, ChannelFilter, InMemoryBus};
    use shared_rpc::{Responder, RequestGateway, RequestHandler};
    use shared_types::{Envelope, Route, ServiceTag};
    use std::sync::Arc;
    use std::time::Duration;

    fn echo_route() -> Route {
        Route::new("echo-request", "echo-reply-tests")
    }

    /// Echoes the payload back after a small random delay, so replies
    /// arrive in arbitrary order relative to send order.
    struct JitteryEchoHandler;

    #[async_trait]
    impl RequestHandler for JitteryEchoHandler {
        async fn handle(&self, payload: Value) -> Envelope {
            let delay = rand::thread_rng().gen_range(1..10);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Envelope::ok(&payload, "echo")
        }
    }

    #[tokio::test]
    async fn concurrent_calls_each_get_their_own_reply() {
        let bus = Arc::new(InMemoryBus::new());
        let responder = Responder::new(Arc::clone(&bus), ServiceTag::Catalog)
            .bind(echo_route(), Arc::new(JitteryEchoHandler));
        tokio::spawn(responder.run());

        let gateway = RequestGateway::connect(
            Arc::clone(&bus),
            ServiceTag::Orders,
            &[echo_route()],
            &test_rpc_config(),
        );

        let mut handles = Vec::new();
        for n in 0..16 {
            let gateway = Arc::clone(&gateway);
            handles.push(tokio::spawn(async move {
                let envelope = gateway
                    .call(&echo_route(), json!(n), Some(Duration::from_secs(2)))
                    .await;
                (n, envelope)
            }));
        }

        for handle in handles {
            let (n, envelope) = handle.await.unwrap();
            assert!(!envelope.is_error());
            // Each caller got exactly its own payload back.
            assert_eq!(envelope.data.unwrap(), json!(n));
        }
        assert_eq!(gateway.pending_count(), 0);
    }

    #[tokio::test]
    async fn late_reply_leaves_no_trace() {
        let bus = Arc::new(InMemoryBus::new());
        let route = Route::new("slow-request", "slow-reply-tests");

        // Responder that answers well past the caller's deadline.
        let mut requests = bus.subscribe(ChannelFilter::channel(route.request.clone()));
        let responder_bus = Arc::clone(&bus);
        tokio::spawn(async move {
            while let Some(message) = requests.recv().await {
                tokio::time::sleep(Duration::from_millis(150)).await;
                let reply = BusMessage::reply(
                    message.reply_to.unwrap(),
                    message.correlation_id,
                    ServiceTag::Catalog,
                    serde_json::to_value(Envelope::ok_empty("too late")).unwrap(),
                );
                responder_bus.publish(reply).await;
            }
        });

        let gateway = RequestGateway::connect(
            Arc::clone(&bus),
            ServiceTag::Media,
            &[route.clone()],
            &test_rpc_config(),
        );

        let envelope = gateway
            .call(&route, json!("ping"), Some(Duration::from_millis(40)))
            .await;
        assert!(envelope.message.contains("timed out"));

        // Let the late reply land; it must resolve nothing and leak nothing.
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(gateway.pending_count(), 0);

        // The layer still works afterwards.
        let again = gateway
            .call(&route, json!("ping"), Some(Duration::from_millis(400)))
            .await;
        assert!(!again.is_error());
    }

    #[tokio::test]
    async fn duplicate_replies_do_not_alter_the_result() {
        let bus = Arc::new(InMemoryBus::new());
        let route = Route::new("dup-request", "dup-reply-tests");

        // Responder that answers every request twice, differently.
        let mut requests = bus.subscribe(ChannelFilter::channel(route.request.clone()));
        let responder_bus = Arc::clone(&bus);
        tokio::spawn(async move {
            while let Some(message) = requests.recv().await {
                for (n, text) in ["first", "second"].iter().enumerate() {
                    let reply = BusMessage::reply(
                        message.reply_to.clone().unwrap(),
                        message.correlation_id,
                        ServiceTag::Catalog,
                        serde_json::to_value(Envelope::ok_empty(*text)).unwrap(),
                    );
                    responder_bus.publish(reply).await;
                    if n == 0 {
                        tokio::time::sleep(Duration::from_millis(5)).await;
                    }
                }
            }
        });

        let gateway = RequestGateway::connect(
            Arc::clone(&bus),
            ServiceTag::Orders,
            &[route.clone()],
            &test_rpc_config(),
        );

        let envelope = gateway.call(&route, json!("ping"), None).await;
        assert_eq!(envelope.message, "first");

        // The duplicate resolves nothing.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(gateway.pending_count(), 0);
    }
}
