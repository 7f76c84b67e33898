use core_logic::Shutdown;
use fanable::{Bot, FanableConfig, IterationOutcome, KeyPair, RunParams};
use serde_json::json;
use std::fs;
use std::path::Path;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(base_url: &str, dir: &Path) -> FanableConfig {
    FanableConfig {
        api_base_url: base_url.to_string(),
        request_timeout_ms: 5_000,
        timestamp_retry_delay_ms: 1,
        social_task_delay_ms: 0,
        post_wallet_delay_ms: 0,
        iteration_delay_ms: 0,
        addresses_file: dir.join("config/addresses.txt").display().to_string(),
        private_keys_file: dir.join("config/private_keys.txt").display().to_string(),
        ..Default::default()
    }
}

async fn mount_api(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/wallet/signature"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "tok"})))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/wallet/referral"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/wallet/social"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/wallet/0x[0-9a-f]{40}$"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"points": 10, "referralCount": 0})),
        )
        .mount(server)
        .await;
}

fn lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_two_iterations_end_to_end() {
    let server = MockServer::start().await;
    mount_api(&server).await;
    let dir = tempfile::tempdir().unwrap();

    let bot = Bot::new(test_config(&server.uri(), dir.path()), Vec::new());
    let params = RunParams::parse("2", "REF42").unwrap();
    let stats = bot.run(&params, &Shutdown::new()).await;

    assert_eq!(stats.success, 2);
    assert_eq!(stats.failed, 0);

    let requests = server.received_requests().await.unwrap();
    let signature_calls = requests
        .iter()
        .filter(|r| r.url.path() == "/wallet/signature")
        .count();
    assert_eq!(signature_calls, 2);
    assert_eq!(requests.len() - signature_calls, 14);

    let addresses = lines(bot.store().addresses_path());
    let keys = lines(bot.store().private_keys_path());
    assert_eq!(addresses.len(), 2);
    assert_eq!(keys.len(), 2);
    assert_ne!(addresses[0], addresses[1]);

    // Records are matched pairs
    for (address, key) in addresses.iter().zip(&keys) {
        assert_eq!(KeyPair::from_private_key(key).unwrap().address(), address);
    }
}

#[tokio::test]
async fn test_auth_failure_skips_tasks_but_keeps_wallet() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/wallet/signature"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"message": "Forbidden"})))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    let bot = Bot::new(test_config(&server.uri(), dir.path()), Vec::new());
    let params = RunParams::parse("2", "REF42").unwrap();
    let stats = bot.run(&params, &Shutdown::new()).await;

    assert_eq!(stats.success, 0);
    assert_eq!(stats.failed, 2);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.url.path() == "/wallet/signature"));

    assert_eq!(lines(bot.store().addresses_path()).len(), 2);
    assert_eq!(lines(bot.store().private_keys_path()).len(), 2);
}

#[tokio::test]
async fn test_bad_proxy_fails_iteration_after_saving_wallet() {
    let server = MockServer::start().await;
    mount_api(&server).await;
    let dir = tempfile::tempdir().unwrap();

    let bot = Bot::new(
        test_config(&server.uri(), dir.path()),
        vec!["http://".to_string()],
    );
    let params = RunParams::parse("1", "REF42").unwrap();

    let outcome = bot.run_iteration(1, &params).await;
    assert!(matches!(outcome, IterationOutcome::ClientFailed { .. }));
    assert!(!outcome.is_success());

    assert!(server.received_requests().await.unwrap().is_empty());
    assert_eq!(lines(bot.store().addresses_path()).len(), 1);
}

#[tokio::test]
async fn test_interrupt_stops_before_next_iteration() {
    let server = MockServer::start().await;
    mount_api(&server).await;
    let dir = tempfile::tempdir().unwrap();

    let bot = Bot::new(test_config(&server.uri(), dir.path()), Vec::new());
    let params = RunParams::parse("3", "REF42").unwrap();
    let shutdown = Shutdown::new();
    shutdown.trigger();

    let stats = bot.run(&params, &shutdown).await;

    assert_eq!(stats.total(), 0);
    assert!(server.received_requests().await.unwrap().is_empty());
    assert!(lines(bot.store().addresses_path()).is_empty());
}
