use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use xpass_config::{Config, Discovery, Error};

const SAMPLE_CONFIG_TOML: &str = include_str!("fixtures/sample_config.toml");

fn sample_with_discovery(key: &str, value: Value) -> String {
	let mut root: Value = toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.");
	let discovery = root
		.as_table_mut()
		.and_then(|table| table.get_mut("discovery"))
		.and_then(Value::as_table_mut)
		.expect("Sample config must include [discovery].");

	discovery.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render sample config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("xpass_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_payload(payload: String) -> xpass_config::Result<Config> {
	let path = write_temp_config(payload);
	let result = xpass_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

#[test]
fn sample_config_loads() {
	let cfg = load_payload(SAMPLE_CONFIG_TOML.to_string()).expect("Sample config must load.");

	assert_eq!(cfg.service.http_bind, "127.0.0.1:8080");
	assert_eq!(cfg.storage.postgres.pool_max_conns, 8);
	assert_eq!(cfg.discovery.home_limit, 12);
	assert_eq!(cfg.discovery.strategy_timeout_ms, None);
}

#[test]
fn discovery_section_defaults_when_missing() {
	let payload = "\
[service]
http_bind = \"127.0.0.1:8080\"

[storage.postgres]
dsn = \"postgres://localhost/xpass\"
pool_max_conns = 1
";
	let cfg = load_payload(payload.to_string()).expect("Config without [discovery] must load.");
	let defaults = Discovery::default();

	assert_eq!(cfg.service.log_level, "info");
	assert_eq!(cfg.discovery.home_limit, defaults.home_limit);
	assert_eq!(cfg.discovery.top_week_window_days, 7);
	assert_eq!(cfg.discovery.proximity_radius_km, 50.0);
	assert_eq!(cfg.discovery.autocomplete_limit, 3);
}

#[test]
fn zero_home_limit_is_rejected() {
	let err = load_payload(sample_with_discovery("home_limit", Value::Integer(0)))
		.expect_err("Expected home_limit validation error.");
	let message = err.to_string();

	assert!(
		message.contains("discovery.home_limit must be greater than zero."),
		"Unexpected error message: {message}"
	);
}

#[test]
fn non_positive_radius_is_rejected() {
	let err = load_payload(sample_with_discovery("proximity_radius_km", Value::Float(-1.0)))
		.expect_err("Expected proximity_radius_km validation error.");

	assert!(matches!(err, Error::Validation { .. }));
	assert!(err.to_string().contains("proximity_radius_km"));
}

#[test]
fn zero_strategy_timeout_is_rejected() {
	let err = load_payload(sample_with_discovery("strategy_timeout_ms", Value::Integer(0)))
		.expect_err("Expected strategy_timeout_ms validation error.");

	assert!(err.to_string().contains("discovery.strategy_timeout_ms"));
}

#[test]
fn missing_file_reports_path() {
	let path = PathBuf::from("/nonexistent/xpass/config.toml");
	let err = xpass_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }));
	assert!(err.to_string().contains("config.toml"));
}

#[test]
fn media_base_url_drops_trailing_slash() {
	let cfg = load_payload(SAMPLE_CONFIG_TOML.to_string()).expect("Sample config must load.");

	assert_eq!(cfg.media.base_url.as_deref(), Some("https://cdn.xpass.example/app"));
}

#[test]
fn blank_media_base_url_is_rejected() {
	let payload = SAMPLE_CONFIG_TOML.replace("https://cdn.xpass.example/app/", "  ");
	let err = load_payload(payload).expect_err("Expected media.base_url validation error.");

	assert!(err.to_string().contains("media.base_url"));
}
