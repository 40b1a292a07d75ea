use std::sync::Mutex;

use minihttp::config::Config;

// Config::load reads process-wide environment variables, so tests that
// mutate them must not run concurrently.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn env_guard() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

fn clear_env() {
    unsafe {
        std::env::remove_var("LISTEN");
        std::env::remove_var("MINIHTTP_CONFIG");
    }
}

#[test]
fn test_config_default_address() {
    let _guard = env_guard();
    clear_env();

    let cfg = Config::load().unwrap();

    assert_eq!(cfg.listen_addr, "127.0.0.1:42069");
}

#[test]
fn test_config_custom_address_from_env() {
    let _guard = env_guard();
    clear_env();
    unsafe {
        std::env::set_var("LISTEN", "0.0.0.0:3000");
    }

    let cfg = Config::load().unwrap();

    assert_eq!(cfg.listen_addr, "0.0.0.0:3000");
    clear_env();
}

#[test]
fn test_config_from_yaml_file() {
    let _guard = env_guard();
    clear_env();

    let path = std::env::temp_dir().join("minihttp_test_config_yaml.yaml");
    std::fs::write(&path, "listen_addr: \"127.0.0.1:9000\"\n").unwrap();
    unsafe {
        std::env::set_var("MINIHTTP_CONFIG", &path);
    }

    let cfg = Config::load().unwrap();

    assert_eq!(cfg.listen_addr, "127.0.0.1:9000");
    clear_env();
    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_config_listen_env_overrides_yaml_file() {
    let _guard = env_guard();
    clear_env();

    let path = std::env::temp_dir().join("minihttp_test_config_override.yaml");
    std::fs::write(&path, "listen_addr: \"127.0.0.1:9000\"\n").unwrap();
    unsafe {
        std::env::set_var("MINIHTTP_CONFIG", &path);
        std::env::set_var("LISTEN", "0.0.0.0:5000");
    }

    let cfg = Config::load().unwrap();

    assert_eq!(cfg.listen_addr, "0.0.0.0:5000");
    clear_env();
    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_config_missing_yaml_file_is_an_error() {
    let _guard = env_guard();
    clear_env();
    unsafe {
        std::env::set_var("MINIHTTP_CONFIG", "/nonexistent/minihttp.yaml");
    }

    let result = Config::load();

    assert!(result.is_err());
    clear_env();
}

#[test]
fn test_config_clone() {
    let _guard = env_guard();
    clear_env();

    let cfg1 = Config::load().unwrap();
    let cfg2 = cfg1.clone();

    assert_eq!(cfg1.listen_addr, cfg2.listen_addr);
}
