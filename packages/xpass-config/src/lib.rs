mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Discovery, Media, Postgres, Service, Storage};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}

	let discovery = &cfg.discovery;

	if discovery.home_limit == 0 {
		return Err(Error::Validation {
			message: "discovery.home_limit must be greater than zero.".to_string(),
		});
	}
	if discovery.top_week_window_days == 0 {
		return Err(Error::Validation {
			message: "discovery.top_week_window_days must be greater than zero.".to_string(),
		});
	}
	if !discovery.proximity_radius_km.is_finite() {
		return Err(Error::Validation {
			message: "discovery.proximity_radius_km must be a finite number.".to_string(),
		});
	}
	if discovery.proximity_radius_km <= 0.0 {
		return Err(Error::Validation {
			message: "discovery.proximity_radius_km must be greater than zero.".to_string(),
		});
	}
	if discovery.autocomplete_limit == 0 {
		return Err(Error::Validation {
			message: "discovery.autocomplete_limit must be greater than zero.".to_string(),
		});
	}

	if let Some(timeout_ms) = discovery.strategy_timeout_ms
		&& timeout_ms == 0
	{
		return Err(Error::Validation {
			message: "discovery.strategy_timeout_ms must be greater than zero when set."
				.to_string(),
		});
	}

	if let Some(base_url) = &cfg.media.base_url
		&& base_url.is_empty()
	{
		return Err(Error::Validation {
			message: "media.base_url must be non-empty when set.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.service.http_bind = cfg.service.http_bind.trim().to_string();

	if cfg.service.log_level.trim().is_empty() {
		cfg.service.log_level = "info".to_string();
	}

	cfg.media.base_url = cfg
		.media
		.base_url
		.take()
		.map(|url| url.trim().trim_end_matches('/').to_string());
}
