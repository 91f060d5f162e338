use std::sync::Mutex;

use tempfile::NamedTempFile;

use ecosort_kernel::config::ScanConfig;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "ECOSORT_CONFIG",
        "ECOSORT_SERVICE_URL",
        "ECOSORT_SERVICE_TOKEN_PATH",
        "ECOSORT_TIMEOUT_SECS",
        "ECOSORT_HISTORY_DB",
        "ECOSORT_VIEWPORT",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let token_path = file.path().with_extension("token");
    let json = format!(
        r#"{{
            "service": {{
                "base_url": "https://scan.ecosort.example",
                "token_path": "{}",
                "timeout_secs": 12
            }},
            "viewport": {{
                "width": 430,
                "height": 932
            }},
            "history": {{
                "db_path": "scans_prod.db"
            }}
        }}"#,
        token_path.display()
    );
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");

    std::env::set_var("ECOSORT_CONFIG", file.path());
    std::env::set_var("ECOSORT_TIMEOUT_SECS", "30");
    std::env::set_var("ECOSORT_VIEWPORT", "390x844");

    let cfg = ScanConfig::load().expect("load config");

    assert_eq!(cfg.service.base_url, "https://scan.ecosort.example");
    assert_eq!(cfg.service.token_path.unwrap(), token_path);
    assert_eq!(cfg.service.timeout.as_secs(), 30);
    assert_eq!(cfg.viewport.width, 390.0);
    assert_eq!(cfg.viewport.height, 844.0);
    assert_eq!(cfg.history_db_path, "scans_prod.db");

    clear_env();
}

#[test]
fn defaults_apply_without_file_or_env() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = ScanConfig::load().expect("load config");

    assert_eq!(cfg.service.base_url, "http://127.0.0.1:8000");
    assert!(cfg.service.token_path.is_none());
    assert_eq!(cfg.service.timeout.as_secs(), 20);
    assert_eq!(cfg.viewport.width, 390.0);
    assert_eq!(cfg.viewport.height, 844.0);
    assert_eq!(cfg.history_db_path, "ecosort_scans.db");
    assert!(cfg.service_token().expect("no token configured").is_none());

    clear_env();
}

#[test]
fn rejects_zero_timeout() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("ECOSORT_TIMEOUT_SECS", "0");
    let err = ScanConfig::load().expect_err("zero timeout must fail validation");
    assert!(err.to_string().contains("timeout"));

    clear_env();
}

#[test]
fn rejects_malformed_viewport() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("ECOSORT_VIEWPORT", "wide");
    assert!(ScanConfig::load().is_err());

    std::env::set_var("ECOSORT_VIEWPORT", "0x844");
    assert!(ScanConfig::load().is_err());

    clear_env();
}

#[test]
fn reads_service_token_from_file() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut token_file = NamedTempFile::new().expect("temp token");
    std::io::Write::write_all(&mut token_file, b"secret-token\n").expect("write token");
    std::env::set_var("ECOSORT_SERVICE_TOKEN_PATH", token_file.path());

    let cfg = ScanConfig::load().expect("load config");
    assert_eq!(
        cfg.service_token().expect("read token").as_deref(),
        Some("secret-token")
    );

    clear_env();
}
