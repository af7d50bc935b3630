use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub discovery: Discovery,
	#[serde(default)]
	pub media: Media,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

/// Tuning for the ranking strategies and the composite home view.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Discovery {
	/// Page size used by every section of the home view.
	pub home_limit: u32,
	/// Trailing window, in days, that counts toward the weekly trend.
	pub top_week_window_days: u32,
	/// Half-size of the proximity bounding box, in kilometers.
	pub proximity_radius_km: f64,
	/// Maximum number of blended autocomplete suggestions.
	pub autocomplete_limit: u32,
	/// Optional per-strategy deadline. A strategy that misses it contributes an empty section.
	pub strategy_timeout_ms: Option<u64>,
}
impl Default for Discovery {
	fn default() -> Self {
		Self {
			home_limit: 12,
			top_week_window_days: 7,
			proximity_radius_km: 50.0,
			autocomplete_limit: 3,
			strategy_timeout_ms: None,
		}
	}
}

/// Public location of profile images. Without a base URL views carry no `imageUrl`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Media {
	pub base_url: Option<String>,
}

fn default_log_level() -> String {
	"info".to_string()
}
