#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::path::PathBuf;

use external_services::configs::Config;
use serial_test::serial;

const NMI_URL: &str = "PAYMENT_GATEWAY__CONNECTORS__NMI__BASE_URL";
const TIMEOUT: &str = "PAYMENT_GATEWAY__HTTP_CLIENT__TIMEOUT";

fn missing_file() -> Option<PathBuf> {
    Some(PathBuf::from("does/not/exist.toml"))
}

#[test]
#[serial]
fn defaults_apply_without_a_file() {
    std::env::remove_var(NMI_URL);
    std::env::remove_var(TIMEOUT);

    let config = Config::new_with_config_path(missing_file()).expect("config");
    assert_eq!(config.connectors.nmi.base_url, "https://secure.nmi.com");
    assert_eq!(config.http_client.timeout, 30);
    assert!(config.log.console.enabled);
}

#[test]
#[serial]
fn environment_overrides_file_values() {
    let path = std::env::temp_dir().join("payment_gateway_config_test.toml");
    std::fs::write(
        &path,
        r#"
[connectors.nmi]
base_url = "http://from-file"

[http_client]
timeout = 10
"#,
    )
    .expect("write config");

    std::env::set_var(NMI_URL, "http://from-env");
    let config = Config::new_with_config_path(Some(path.clone())).expect("config");
    std::env::remove_var(NMI_URL);
    let _ = std::fs::remove_file(&path);

    assert_eq!(config.connectors.nmi.base_url, "http://from-env");
    assert_eq!(config.http_client.timeout, 10);
    assert_eq!(
        config.connectors.forte.base_url,
        "https://sandbox.forte.net/api/v3"
    );
}

#[test]
#[serial]
fn zero_timeout_is_rejected() {
    std::env::set_var(TIMEOUT, "0");
    let config = Config::new_with_config_path(missing_file());
    std::env::remove_var(TIMEOUT);
    assert!(config.is_err());
}
