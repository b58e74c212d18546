//! Single-operation pipeline behaviour over the recording transport.

use crate::support::{client, RecordingTransport};
use async_trait::async_trait;
use graphql_fetch::interceptors::{from_fn, Interceptor, Next, RequestEnvelope, ResponseEnvelope};
use graphql_fetch::transport::TransportError;
use graphql_fetch::{Error, GraphQLFetch, GraphQLRequest, Operation, Phase};
use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
#[error("Middleware error")]
struct Denied;

fn hello() -> GraphQLRequest {
    GraphQLRequest::new("query Hello { hello }")
        .with_variables(json!({ "name": "world" }))
        .with_operation_name("Hello")
}

#[tokio::test]
async fn resolves_parsed_body_without_handlers() {
    let transport = RecordingTransport::json(200, json!({ "data": { "hello": "world" } }));
    let client = client(&transport);

    let result = client.fetch(hello()).await.unwrap();
    assert_eq!(result, json!({ "data": { "hello": "world" } }));

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    let (uri, options) = &calls[0];
    assert_eq!(uri, "/graphql");
    assert_eq!(options.method, Some(Method::POST));
    assert_eq!(options.headers[ACCEPT], "*/*");
    assert_eq!(options.headers[CONTENT_TYPE], "application/json");
    assert_eq!(
        transport.sent_body(0),
        json!({
            "query": "query Hello { hello }",
            "variables": { "name": "world" },
            "operationName": "Hello"
        })
    );
}

#[tokio::test]
async fn invoke_single_resolves_single() {
    let transport = RecordingTransport::json(200, json!({ "data": 1 }));
    let client = client(&transport);

    let response = client.invoke(hello()).await.unwrap();
    assert!(!response.is_batched());
    assert_eq!(response.into_single().unwrap(), json!({ "data": 1 }));
}

#[tokio::test]
async fn middleware_runs_in_order_and_edits_reach_the_wire() {
    let transport = RecordingTransport::json(200, json!({ "data": {} }));
    let client = client(&transport);
    let order = Arc::new(Mutex::new(Vec::new()));

    let log = order.clone();
    client.use_middleware(from_fn(move |envelope: &mut RequestEnvelope, next: Next<'_>| {
        log.lock().unwrap().push("auth");
        envelope
            .options
            .headers
            .insert(AUTHORIZATION, HeaderValue::from_static("Bearer token"));
        envelope.request.set_variable("limit", json!(10));
        next.proceed();
        Ok(())
    }));
    let log = order.clone();
    client.use_middleware(from_fn(move |envelope: &mut RequestEnvelope, next: Next<'_>| {
        log.lock().unwrap().push("extra");
        assert_eq!(envelope.request.variable("limit"), Some(&json!(10)));
        envelope.options.extra.insert("credentials".into(), json!("include"));
        envelope.request.extra.insert("extensions".into(), json!({ "persisted": true }));
        next.proceed();
        Ok(())
    }));

    client.fetch(hello()).await.unwrap();

    assert_eq!(*order.lock().unwrap(), vec!["auth", "extra"]);
    let (_, options) = &transport.calls()[0];
    assert_eq!(options.headers[AUTHORIZATION], "Bearer token");
    assert_eq!(options.headers[ACCEPT], "*/*");
    assert_eq!(options.extra["credentials"], json!("include"));

    let body = transport.sent_body(0);
    assert_eq!(body["variables"], json!({ "name": "world", "limit": 10 }));
    assert_eq!(body["extensions"], json!({ "persisted": true }));
}

#[tokio::test]
async fn caller_headers_replace_defaults() {
    let transport = RecordingTransport::json(200, json!({ "data": {} }));
    let client = client(&transport);
    client.use_middleware(from_fn(|envelope: &mut RequestEnvelope, next: Next<'_>| {
        envelope
            .options
            .headers
            .insert(ACCEPT, HeaderValue::from_static("application/graphql-response+json"));
        next.proceed();
        Ok(())
    }));

    client.fetch(hello()).await.unwrap();

    let (_, options) = &transport.calls()[0];
    let accept: Vec<_> = options.headers.get_all(ACCEPT).iter().collect();
    assert_eq!(accept, vec!["application/graphql-response+json"]);
    assert_eq!(options.headers[CONTENT_TYPE], "application/json");
}

#[tokio::test]
async fn context_stays_local() {
    let transport = RecordingTransport::json(200, json!({ "data": {} }));
    let client = client(&transport);
    let seen = Arc::new(Mutex::new(None));
    let slot = seen.clone();
    client.use_middleware(from_fn(move |envelope: &mut RequestEnvelope, next: Next<'_>| {
        *slot.lock().unwrap() = envelope.request.context.clone();
        next.proceed();
        Ok(())
    }));

    client
        .fetch(hello().with_context(json!({ "tenant": "acme" })))
        .await
        .unwrap();

    assert_eq!(*seen.lock().unwrap(), Some(json!({ "tenant": "acme" })));
    assert!(transport.sent_body(0).get("context").is_none());
}

#[tokio::test]
async fn same_client_serves_repeated_calls() {
    let transport = RecordingTransport::json(200, json!({ "data": { "n": 1 } }));
    let client = client(&transport);
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = runs.clone();
    client.use_middleware(from_fn(move |_: &mut RequestEnvelope, next: Next<'_>| {
        counter.fetch_add(1, Ordering::SeqCst);
        next.proceed();
        Ok(())
    }));

    for _ in 0..2 {
        let result = client.fetch(hello()).await.unwrap();
        assert_eq!(result, json!({ "data": { "n": 1 } }));
    }
    assert_eq!(runs.load(Ordering::SeqCst), 2);
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test]
async fn concurrent_calls_share_one_client() {
    let transport = RecordingTransport::json(200, json!({ "data": {} }));
    let client = Arc::new(client(&transport));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.fetch(hello()).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(transport.call_count(), 8);
}

#[tokio::test]
async fn middleware_error_skips_transport() {
    let transport = RecordingTransport::json(200, json!({ "data": {} }));
    let client = client(&transport);
    client.use_middleware(from_fn(|_: &mut RequestEnvelope, _next: Next<'_>| {
        Err(Error::interceptor(Denied))
    }));

    let err = client.fetch(hello()).await.unwrap_err();
    match err {
        Error::Interceptor(inner) => assert!(inner.downcast_ref::<Denied>().is_some()),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn middleware_without_next_halts() {
    let transport = RecordingTransport::json(200, json!({ "data": {} }));
    let client = client(&transport);
    client.use_middleware(from_fn(|_: &mut RequestEnvelope, next: Next<'_>| {
        next.proceed();
        Ok(())
    }));
    client.use_middleware(from_fn(|_: &mut RequestEnvelope, _next: Next<'_>| Ok(())));

    let err = client.fetch(hello()).await.unwrap_err();
    assert!(matches!(
        err,
        Error::ChainHalted {
            phase: Phase::Middleware,
            index: 1
        }
    ));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn invalid_json_on_success_is_an_http_error() {
    let transport = RecordingTransport::new(200, "not json");
    let client = client(&transport);

    let err = client.fetch(hello()).await.unwrap_err();
    assert_eq!(err.to_string(), "Network request failed to return valid JSON");
    match err {
        Error::Http(http) => {
            assert_eq!(http.raw(), "not json");
            assert_eq!(http.response.status, 200);
            assert!(http.parse_error.is_some());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn forbidden_without_body_reports_status() {
    let transport = RecordingTransport::new(403, "");
    let client = client(&transport);

    let err = client.fetch(hello()).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Network request failed with status 403 - \"Forbidden\""
    );
    assert_eq!(err.response().map(|r| r.status), Some(403));
}

#[tokio::test]
async fn afterware_can_rescue_a_failed_response() {
    let transport = RecordingTransport::new(403, "");
    let client = client(&transport);
    client.use_afterware(from_fn(|envelope: &mut ResponseEnvelope, next: Next<'_>| {
        if envelope.response.status == 403 {
            envelope.response.parsed = Some(json!({ "data": { "mock": "stub" } }));
        }
        next.proceed();
        Ok(())
    }));

    let result = client.fetch(hello()).await.unwrap();
    assert_eq!(result, json!({ "data": { "mock": "stub" } }));
}

#[tokio::test]
async fn afterware_sees_raw_body_and_sent_options() {
    let transport = RecordingTransport::json(200, json!({ "data": { "x": 1 } }));
    let client = client(&transport);
    let seen = Arc::new(Mutex::new(None));
    let slot = seen.clone();
    client.use_afterware(from_fn(move |envelope: &mut ResponseEnvelope, next: Next<'_>| {
        *slot.lock().unwrap() = Some((
            envelope.response.raw.clone(),
            envelope.response.url.clone(),
            envelope.options.method.clone(),
        ));
        next.proceed();
        Ok(())
    }));

    client.fetch(hello()).await.unwrap();

    let (raw, url, method) = seen.lock().unwrap().take().unwrap();
    assert_eq!(raw, r#"{"data":{"x":1}}"#);
    assert_eq!(url, "/graphql");
    assert_eq!(method, Some(Method::POST));
}

#[tokio::test]
async fn valid_json_resolves_regardless_of_status() {
    let body = json!({ "errors": [{ "message": "Unauthorized" }] });
    let transport = RecordingTransport::json(401, body.clone());
    let client = client(&transport);

    let result = client.fetch(hello()).await.unwrap();
    assert_eq!(result, body);
    assert!(result.has_errors());
}

#[tokio::test]
async fn non_object_body_is_a_shape_error() {
    let transport = RecordingTransport::json(200, json!(["a", "b"]));
    let client = client(&transport);

    let err = client.fetch(hello()).await.unwrap_err();
    assert!(matches!(err, Error::ResultShape { .. }));
}

#[tokio::test]
async fn afterware_error_propagates() {
    let transport = RecordingTransport::json(200, json!({ "data": {} }));
    let client = client(&transport);
    client.use_afterware(from_fn(|_: &mut ResponseEnvelope, _next: Next<'_>| {
        Err(Error::interceptor("Afterware error"))
    }));

    let err = client.fetch(hello()).await.unwrap_err();
    assert_eq!(err.to_string(), "Interceptor error: Afterware error");
    assert_eq!(transport.call_count(), 1);
}

struct SlowStamp;

#[async_trait]
impl Interceptor<RequestEnvelope> for SlowStamp {
    async fn intercept(
        &self,
        envelope: &mut RequestEnvelope,
        next: Next<'_>,
    ) -> graphql_fetch::Result<()> {
        tokio::time::sleep(Duration::from_millis(5)).await;
        envelope.request.set_variable("stamped", json!(true));
        next.proceed();
        Ok(())
    }

    fn name(&self) -> &str {
        "slow-stamp"
    }
}

#[tokio::test]
async fn async_object_handlers_are_awaited_before_the_next_one() {
    let transport = RecordingTransport::json(200, json!({ "data": {} }));
    let client = client(&transport);
    client.use_middleware(SlowStamp);
    client.use_middleware(from_fn(|envelope: &mut RequestEnvelope, next: Next<'_>| {
        assert_eq!(envelope.request.variable("stamped"), Some(&json!(true)));
        next.proceed();
        Ok(())
    }));

    client.fetch(hello()).await.unwrap();
    assert_eq!(transport.sent_body(0)["variables"]["stamped"], json!(true));
}

#[tokio::test]
async fn use_all_registers_in_order_and_rejects_empty() {
    let transport = RecordingTransport::json(200, json!({ "data": {} }));
    let client = client(&transport);

    let err = client.use_all(Vec::new()).unwrap_err();
    assert!(matches!(err, Error::Registration { .. }));

    let first: Arc<dyn Interceptor<RequestEnvelope>> =
        Arc::new(from_fn(|envelope: &mut RequestEnvelope, next: Next<'_>| {
            envelope.request.set_variable("step", json!(1));
            next.proceed();
            Ok(())
        }));
    let second: Arc<dyn Interceptor<RequestEnvelope>> =
        Arc::new(from_fn(|envelope: &mut RequestEnvelope, next: Next<'_>| {
            envelope.request.set_variable("step", json!(2));
            next.proceed();
            Ok(())
        }));
    client.use_all(vec![first, second]).unwrap();
    assert_eq!(client.handler_counts(), [2, 0, 0, 0]);

    client.fetch(hello()).await.unwrap();
    assert_eq!(transport.sent_body(0)["variables"]["step"], json!(2));
}

#[tokio::test]
async fn custom_option_builder_sees_post_middleware_operation() {
    let seen = Arc::new(Mutex::new(None));
    let slot = seen.clone();
    let transport = RecordingTransport::json(200, json!({ "data": {} }));
    let client = GraphQLFetch::builder()
        .uri("/graphql")
        .transport(transport.clone())
        .construct_options_fn(move |operation: Operation, options| {
            *slot.lock().unwrap() = Some(operation.clone());
            graphql_fetch::options::construct_default_options(&operation, options)
        })
        .build()
        .unwrap();
    client.use_middleware(from_fn(|envelope: &mut RequestEnvelope, next: Next<'_>| {
        envelope.request.query = Some("{ rewritten }".into());
        next.proceed();
        Ok(())
    }));

    client.fetch(hello()).await.unwrap();

    let operation = seen.lock().unwrap().take().unwrap();
    assert_eq!(operation.requests()[0].query.as_deref(), Some("{ rewritten }"));
    assert_eq!(transport.sent_body(0)["query"], json!("{ rewritten }"));
}

#[tokio::test]
async fn option_build_failure_skips_transport() {
    let transport = RecordingTransport::json(200, json!({ "data": {} }));
    let client = GraphQLFetch::builder()
        .uri("/graphql")
        .transport(transport.clone())
        .construct_options_fn(|_, _| {
            let cause = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
            Err(Error::Serialization(cause))
        })
        .build()
        .unwrap();

    let err = client.fetch(hello()).await.unwrap_err();
    assert!(matches!(err, Error::Serialization(_)));
    assert!(err
        .to_string()
        .starts_with("Network request failed. Payload is not serializable"));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn afterware_options_share_the_sent_body() {
    let transport = RecordingTransport::json(200, json!({ "data": {} }));
    let client = client(&transport);
    let seen = Arc::new(Mutex::new(None));
    let slot = seen.clone();
    client.use_afterware(from_fn(move |envelope: &mut ResponseEnvelope, next: Next<'_>| {
        *slot.lock().unwrap() = envelope.options.json_body().map(|body| body.as_ptr() as usize);
        next.proceed();
        Ok(())
    }));

    client.fetch(hello()).await.unwrap();

    let sent = transport.calls()[0].1.json_body().map(|body| body.as_ptr() as usize);
    assert!(sent.is_some());
    assert_eq!(*seen.lock().unwrap(), sent);
}

#[derive(Debug, thiserror::Error)]
#[error("offline")]
struct Offline;

#[tokio::test]
async fn custom_transport_errors_pass_through() {
    let client = GraphQLFetch::builder()
        .uri("/graphql")
        .custom_fetch(|_uri, _options| async { Err(TransportError::custom(Offline)) })
        .build()
        .unwrap();

    let err = client.fetch(hello()).await.unwrap_err();
    match err {
        Error::Transport(TransportError::Custom(inner)) => {
            assert!(inner.downcast_ref::<Offline>().is_some())
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
