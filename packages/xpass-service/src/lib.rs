pub mod autocomplete;
pub mod catalog;
pub mod home;
pub mod profile;
pub mod social;
pub mod strategy;
pub mod view;

mod error;
mod resolve;
mod time_serde;

pub use catalog::CategoryBranch;
pub use error::{Error, Result};
pub use home::HomeCategories;
pub use profile::ProfileDetail;
pub use social::{FollowStats, FollowSummary};
pub use strategy::{Strategy, StrategyRequest};
pub use view::{AddressView, CardView, CategoryView, FollowView, ProfileView};

use std::sync::Arc;

use xpass_config::Config;
use xpass_domain::geo::Coordinates;
use xpass_storage::{BoxFuture, GraphStore};

/// Fallback position lookup for viewers that send no coordinates.
pub trait GeoLocator
where
	Self: Send + Sync,
{
	fn locate<'a>(&'a self, client_address: &'a str) -> BoxFuture<'a, Option<Coordinates>>;
}

/// Knows no positions, so proximity needs explicit coordinates.
pub struct NoGeoLocator;

pub struct DiscoveryService {
	pub cfg: Config,
	pub store: Arc<dyn GraphStore>,
	pub geo: Arc<dyn GeoLocator>,
}
impl DiscoveryService {
	pub fn new(cfg: Config, store: Arc<dyn GraphStore>) -> Self {
		Self { cfg, store, geo: Arc::new(NoGeoLocator) }
	}

	pub fn with_geo_locator(
		cfg: Config,
		store: Arc<dyn GraphStore>,
		geo: Arc<dyn GeoLocator>,
	) -> Self {
		Self { cfg, store, geo }
	}
}

impl GeoLocator for NoGeoLocator {
	fn locate<'a>(&'a self, _client_address: &'a str) -> BoxFuture<'a, Option<Coordinates>> {
		Box::pin(async { None })
	}
}

pub(crate) fn count_to_i64(count: usize) -> i64 {
	i64::try_from(count).unwrap_or(i64::MAX)
}
