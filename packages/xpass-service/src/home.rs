use serde::Serialize;
use uuid::Uuid;

use xpass_domain::{geo::Coordinates, page::Window, text::TextFilter};
use xpass_storage::ProfileQuery;

use crate::{
	DiscoveryService, Result,
	strategy::{Strategy, StrategyRequest},
	view::ProfileView,
};

/// The composite home view: one first page per strategy.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeCategories {
	pub top_week: Vec<ProfileView>,
	pub like_you: Vec<ProfileView>,
	pub like_your_follows: Vec<ProfileView>,
	pub recent: Vec<ProfileView>,
	pub near_to_you: Vec<ProfileView>,
}

impl DiscoveryService {
	/// Plain text search in store order. No terms means no results, not everything.
	pub async fn search(&self, terms: &[String], page: u32, limit: u32) -> Result<Vec<ProfileView>> {
		if terms.is_empty() {
			return Ok(Vec::new());
		}

		let query = ProfileQuery::new()
			.with_text_filter(TextFilter::new(terms))
			.paginate(Window::new(page, limit));
		let ids: Vec<Uuid> = self
			.store
			.find_profiles(&query)
			.await?
			.into_iter()
			.map(|key| key.profile_id)
			.collect();

		self.resolve(&ids).await
	}

	/// Evaluates the five strategies concurrently and waits for all of them. A failing or slow
	/// strategy only empties its own section.
	pub async fn home_categories(
		&self,
		viewer_id: Option<Uuid>,
		coords: Option<Coordinates>,
		client_address: Option<String>,
	) -> HomeCategories {
		let request = StrategyRequest {
			terms: Vec::new(),
			viewer_id,
			coords,
			client_address,
			page: 0,
			limit: self.cfg.discovery.home_limit,
		};
		let (top_week, like_you, like_your_follows, recent, near_to_you) = tokio::join!(
			self.run_strategy(Strategy::TopWeek, &request),
			self.run_strategy(Strategy::Affinity, &request),
			self.run_strategy(Strategy::SocialAffinity, &request),
			self.run_strategy(Strategy::Recency, &request),
			self.run_strategy(Strategy::Proximity, &request),
		);

		HomeCategories { top_week, like_you, like_your_follows, recent, near_to_you }
	}

	/// Deep pagination into one home section, addressed by its category key.
	pub async fn home_category(
		&self,
		category_key: &str,
		request: &StrategyRequest,
	) -> Result<Vec<ProfileView>> {
		let strategy: Strategy = category_key.parse()?;

		Ok(self.run_strategy(strategy, request).await)
	}
}
