//! End-to-end tests: a real relay listener in front of mock downstreams.

use std::time::{Duration, Instant};

use axum::http::StatusCode;
use webhook_relay::http::X_REQUEST_ID;

mod common;

fn ok_everywhere(_: &str) -> u16 {
    200
}

#[tokio::test]
async fn test_trade_forwarded_verbatim() {
    let mock = common::start_capturing_backend(ok_everywhere).await;
    let (relay, shutdown) = common::start_relay(common::relay_config(&mock)).await;

    let body = "trade: long BTCUSD leverage=5";
    let res = common::client()
        .post(format!("http://{}/", relay))
        .header("content-type", "application/x-www-form-urlencoded")
        .body(body)
        .send()
        .await
        .expect("relay unreachable");

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key(X_REQUEST_ID));
    assert_eq!(res.text().await.unwrap(), "");

    let captured = mock.captured();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].method, "POST");
    assert_eq!(captured[0].path, "/trade");
    assert_eq!(captured[0].headers["content-type"], "text/plain");
    assert_eq!(captured[0].body, body);

    shutdown.trigger();
}

#[tokio::test]
async fn test_trade_downstream_failure_is_500() {
    let mock = common::start_capturing_backend(|_| 503).await;
    let (relay, shutdown) = common::start_relay(common::relay_config(&mock)).await;

    let res = common::client()
        .post(format!("http://{}/", relay))
        .body("trade: buy")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(mock.captured().len(), 1, "exactly one attempt");

    shutdown.trigger();
}

#[tokio::test]
async fn test_exit_forwarded_as_original_json() {
    let mock = common::start_capturing_backend(ok_everywhere).await;
    let (relay, shutdown) = common::start_relay(common::relay_config(&mock)).await;

    let body = "{ \"type\":\"exit\",\n  \"pair\" : \"BTCUSD\", \"key\": \"k\" }";
    let res = common::client()
        .post(format!("http://{}/", relay))
        .body(body)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let captured = mock.captured();
    assert_eq!(captured[0].path, "/exit");
    assert_eq!(captured[0].headers["content-type"], "application/json");
    assert_eq!(captured[0].body, body);

    shutdown.trigger();
}

#[tokio::test]
async fn test_exit_unreachable_target_is_500() {
    let mock = common::start_capturing_backend(ok_everywhere).await;
    let mut config = common::relay_config(&mock);
    config.targets.exit = format!("http://{}/exit", common::unused_addr().await);
    let (relay, shutdown) = common::start_relay(config).await;

    let res = common::client()
        .post(format!("http://{}/", relay))
        .body(r#"{"type":"exit"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(mock.captured().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_downstream_timeout_is_500() {
    let mock = common::start_capturing_backend(ok_everywhere).await;
    let mut config = common::relay_config(&mock);
    config.targets.trade = format!("http://{}/trade", common::start_silent_backend().await);
    config.timeouts.forward_secs = 1;
    let (relay, shutdown) = common::start_relay(config).await;

    let started = Instant::now();
    let res = common::client()
        .post(format!("http://{}/", relay))
        .body("trade: buy")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(mock.captured().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_bad_requests() {
    let mock = common::start_capturing_backend(ok_everywhere).await;
    let (relay, shutdown) = common::start_relay(common::relay_config(&mock)).await;
    let client = common::client();

    for body in [
        "",
        "   \n\t",
        "buy BTCUSD",
        "{\"type\":\"exit\"",
        r#"{"type":"hold","pair":"BTCUSD"}"#,
        r#"{"pair":"BTCUSD"}"#,
        r#"[{"type":"exit"}]"#,
    ] {
        let res = client
            .post(format!("http://{}/", relay))
            .body(body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body {:?}", body);
        assert_eq!(res.text().await.unwrap(), "");
    }

    assert!(mock.captured().is_empty());
    shutdown.trigger();
}

#[tokio::test]
async fn test_oversized_body_is_413() {
    let mock = common::start_capturing_backend(ok_everywhere).await;
    let (relay, shutdown) = common::start_relay(common::relay_config(&mock)).await;

    let body = format!("trade:{}", "x".repeat(100 * 1024));
    let res = common::client()
        .post(format!("http://{}/", relay))
        .body(body)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(mock.captured().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_unknown_source_is_forbidden_everywhere() {
    let mock = common::start_capturing_backend(ok_everywhere).await;
    let mut config = common::relay_config(&mock);
    config.access.allowed_ips = vec!["203.0.113.7".into(), "::ffff:203.0.113.8".into()];
    let (relay, shutdown) = common::start_relay(config).await;
    let client = common::client();

    let res = client
        .post(format!("http://{}/", relay))
        .body("trade: buy")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Checked before routing, so unknown paths and methods are 403 too.
    let res = client
        .get(format!("http://{}/elsewhere", relay))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    assert!(mock.captured().is_empty());
    shutdown.trigger();
}

#[tokio::test]
async fn test_method_and_path_checks() {
    let mock = common::start_capturing_backend(ok_everywhere).await;
    let (relay, shutdown) = common::start_relay(common::relay_config(&mock)).await;
    let client = common::client();

    for method in [reqwest::Method::GET, reqwest::Method::PUT, reqwest::Method::DELETE] {
        let res = client
            .request(method.clone(), format!("http://{}/", relay))
            .body("trade: buy")
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED, "{}", method);
    }

    let res = client
        .post(format!("http://{}/webhook", relay))
        .body("trade: buy")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    assert!(mock.captured().is_empty());
    shutdown.trigger();
}

#[tokio::test]
async fn test_reverse_exit_failure_returns_500_without_waiting() {
    let mock = common::start_capturing_backend(|path| {
        if path == "/reverse/exit" {
            502
        } else {
            200
        }
    })
    .await;
    let (relay, shutdown) = common::start_relay(common::relay_config(&mock)).await;

    let started = Instant::now();
    let res = common::client()
        .post(format!("http://{}/", relay))
        .body(r#"{"type":"reverse","key":"k","pair":"BTCUSD","entrySide":"sell"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(started.elapsed() < Duration::from_secs(10));

    let captured = mock.captured();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].path, "/reverse/exit");

    shutdown.trigger();
}

#[tokio::test]
async fn test_pending_reverse_flow_does_not_block_other_requests() {
    let mock = common::start_capturing_backend(ok_everywhere).await;
    let (relay, shutdown) = common::start_relay(common::relay_config(&mock)).await;

    let reverse_body = r#"{"type":"reverse","key":"k","pair":"BTCUSD","exchange":"binance","exchangeAccountType":"futures","signalId":"s1","positionSizePercentage":10,"entrySide":"buy","entryOrderType":"limit","entryLeverage":5}"#;
    let pending = tokio::spawn({
        let url = format!("http://{}/", relay);
        async move { common::client().post(url).body(reverse_body).send().await }
    });

    let captured = mock.wait_for(1, Duration::from_secs(5)).await;
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].path, "/reverse/exit");
    assert_eq!(captured[0].headers["content-type"], "application/json");
    assert_eq!(
        captured[0].body,
        r#"{"key":"k","pair":"BTCUSD","exchange":"binance","exchangeAccountType":"futures","signalId":"s1","orderType":"market","type":"exit"}"#
    );

    // The reverse request is now parked in its 120 s pause.
    let started = Instant::now();
    let res = common::client()
        .post(format!("http://{}/", relay))
        .body("trade: buy")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(!pending.is_finished(), "reverse response is held until the entry leg");

    let paths: Vec<_> = mock.captured().into_iter().map(|c| c.path).collect();
    assert_eq!(paths, vec!["/reverse/exit", "/trade"]);

    pending.abort();
    shutdown.trigger();
}
