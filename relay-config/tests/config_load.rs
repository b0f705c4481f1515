use relay_config::{KNOWN_ENV_KEYS, RelayConfigLoader};
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

/// Run `f` with every known variable cleared, plus the given overrides.
fn with_clean_env<F: FnOnce()>(overrides: &[(&str, &str)], f: F) {
    let mut vars: Vec<(String, Option<String>)> = KNOWN_ENV_KEYS
        .iter()
        .map(|k| (k.to_string(), None))
        .collect();
    for (k, v) in overrides {
        vars.retain(|(name, _)| name != k);
        vars.push((k.to_string(), Some(v.to_string())));
    }
    temp_env::with_vars(vars, f);
}

#[test]
#[serial]
fn test_config_load_from_file() {
    let tmp = TempDir::new().unwrap();
    let file_yaml = r#"
openai_api_key: "${RELAY_TEST_OPENAI_KEY}"
openai_model: "gpt-4o"
log_level: debug
port: 8100
tg_key: "123:abc"
"#;
    let p = write_yaml(&tmp, "relay.yaml", file_yaml);

    with_clean_env(&[("RELAY_TEST_OPENAI_KEY", "sk-test")], || {
        let config = RelayConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load config");

        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.openai_model, "gpt-4o");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.bind_addr(8000), "0.0.0.0:8100");
        assert_eq!(config.telegram_token(), Some("123:abc"));
        assert!(config.analyze_llm().is_configured());
    });
}

#[test]
#[serial]
fn missing_optional_file_falls_back_to_defaults() {
    let tmp = TempDir::new().unwrap();
    let p = tmp.path().join("absent.yaml");

    with_clean_env(&[], || {
        let config = RelayConfigLoader::new()
            .with_optional_file(&p)
            .load()
            .expect("optional file may be absent");

        assert_eq!(config.openai_model, "gpt-4o-mini");
        assert_eq!(config.bind_addr(5000), "0.0.0.0:5000");
        assert!(!config.analyze_llm().is_configured());
    });
}

#[test]
#[serial]
fn missing_required_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let p = tmp.path().join("absent.yaml");

    with_clean_env(&[], || {
        assert!(RelayConfigLoader::new().with_file(&p).load().is_err());
    });
}

#[test]
#[serial]
fn legacy_env_names_override_file() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "relay.yaml", "openai_model: gpt-4o\nport: 8100\n");

    with_clean_env(
        &[
            ("OPENAI_API_KEY", "sk-env"),
            ("OPENAI_MODEL", "gpt-4.1-mini"),
            ("PORT", "9001"),
            ("HOST", "127.0.0.1"),
        ],
        || {
            let config = RelayConfigLoader::new().with_file(&p).load().unwrap();

            assert_eq!(config.openai_model, "gpt-4.1-mini");
            assert_eq!(config.bind_addr(8000), "127.0.0.1:9001");
            assert_eq!(config.openai_api_key.as_deref(), Some("sk-env"));
        },
    );
}

#[test]
#[serial]
fn prefixed_env_beats_legacy_names() {
    with_clean_env(
        &[("OPEN_ROUTER_MODEL", "legacy/model"), ("RELAY__OPEN_ROUTER_MODEL", "prefixed/model")],
        || {
            let config = RelayConfigLoader::new().load().unwrap();
            assert_eq!(config.open_router_model, "prefixed/model");
        },
    );
}

#[test]
#[serial]
fn blank_api_key_counts_as_missing() {
    with_clean_env(&[("OPENAI_API_KEY", "   ")], || {
        let config = RelayConfigLoader::new().load().unwrap();
        assert!(!config.analyze_llm().is_configured());
    });
}

#[test]
#[serial]
fn invalid_port_is_rejected() {
    with_clean_env(&[("PORT", "eighty")], || {
        assert!(RelayConfigLoader::new().load().is_err());
    });
}
