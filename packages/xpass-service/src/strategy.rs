//! The five ranking strategies and the guard that keeps their faults away from callers.
//!
//! Every strategy ranks profile ids first and hydrates them second. The guard maps data-layer
//! faults and timeouts to an empty page and logs them as degraded, while a missing input is a
//! plain empty answer logged at debug.

mod affinity;
mod proximity;
mod recency;
mod social_affinity;
mod top_week;

use std::{collections::HashMap, fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use xpass_domain::{geo::Coordinates, page::Window, text::TextFilter};
use xpass_storage::ProfileQuery;

use crate::{DiscoveryService, Error, Result, view::ProfileView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
	/// Most accessed cards over the trailing window.
	#[serde(rename = "topWeek")]
	TopWeek,
	/// Profiles sharing a category with the viewer's card.
	#[serde(rename = "likeYou")]
	Affinity,
	/// Profiles sharing a category with the viewer's two hop follow neighborhood.
	#[serde(rename = "likeYourFollows")]
	SocialAffinity,
	/// Cards the viewer opened, latest first.
	#[serde(rename = "recent")]
	Recency,
	/// Profiles whose address falls in the box around the viewer.
	#[serde(rename = "nearToYou")]
	Proximity,
}
impl Strategy {
	pub const ALL: [Self; 5] =
		[Self::TopWeek, Self::Affinity, Self::SocialAffinity, Self::Recency, Self::Proximity];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::TopWeek => "topWeek",
			Self::Affinity => "likeYou",
			Self::SocialAffinity => "likeYourFollows",
			Self::Recency => "recent",
			Self::Proximity => "nearToYou",
		}
	}
}
impl FromStr for Strategy {
	type Err = Error;

	fn from_str(raw: &str) -> Result<Self> {
		Self::ALL.into_iter().find(|strategy| strategy.as_str() == raw).ok_or_else(|| {
			Error::InvalidRequest { message: format!("Unknown category key {raw:?}.") }
		})
	}
}
impl fmt::Display for Strategy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Inputs shared by every strategy. Each one reads only what it needs.
#[derive(Debug, Clone, Default)]
pub struct StrategyRequest {
	pub terms: Vec<String>,
	pub viewer_id: Option<Uuid>,
	pub coords: Option<Coordinates>,
	pub client_address: Option<String>,
	/// Zero based.
	pub page: u32,
	pub limit: u32,
}

pub(crate) enum Ranking {
	/// Profile ids of the requested window, best first.
	Ranked(Vec<Uuid>),
	/// A required input is absent, so the page is empty by definition.
	Skipped(&'static str),
}

pub(crate) struct Context<'a> {
	pub(crate) request: &'a StrategyRequest,
	pub(crate) filter: TextFilter,
	pub(crate) window: Window,
}
impl Context<'_> {
	/// Base query carrying the text filter. Strategies add their own restrictions.
	pub(crate) fn query(&self) -> ProfileQuery {
		ProfileQuery::new().with_text_filter(self.filter.clone())
	}
}

enum Outcome {
	Views(Vec<ProfileView>),
	Skipped(&'static str),
}

impl DiscoveryService {
	/// Runs one strategy. Never fails: faults and timeouts yield an empty page.
	pub async fn run_strategy(
		&self,
		strategy: Strategy,
		request: &StrategyRequest,
	) -> Vec<ProfileView> {
		let evaluation = self.evaluate(strategy, request);
		let outcome = match self.cfg.discovery.strategy_timeout_ms {
			Some(timeout_ms) =>
				match tokio::time::timeout(Duration::from_millis(timeout_ms), evaluation).await {
					Ok(outcome) => outcome,
					Err(_) => {
						tracing::warn!(
							strategy = strategy.as_str(),
							timeout_ms,
							degraded = true,
							"Strategy timed out. Serving an empty page."
						);

						return Vec::new();
					},
				},
			None => evaluation.await,
		};

		match outcome {
			Ok(Outcome::Views(views)) => views,
			Ok(Outcome::Skipped(reason)) => {
				tracing::debug!(strategy = strategy.as_str(), reason, "Strategy skipped.");

				Vec::new()
			},
			Err(err) => {
				tracing::warn!(
					strategy = strategy.as_str(),
					error = %err,
					degraded = true,
					"Strategy failed. Serving an empty page."
				);

				Vec::new()
			},
		}
	}

	async fn evaluate(&self, strategy: Strategy, request: &StrategyRequest) -> Result<Outcome> {
		let ctx = Context {
			request,
			filter: TextFilter::new(&request.terms),
			window: Window::new(request.page, request.limit),
		};

		if ctx.window.limit == 0 {
			return Ok(Outcome::Views(Vec::new()));
		}

		let ranking = match strategy {
			Strategy::TopWeek => top_week::rank(self, &ctx).await?,
			Strategy::Affinity => affinity::rank(self, &ctx).await?,
			Strategy::SocialAffinity => social_affinity::rank(self, &ctx).await?,
			Strategy::Recency => recency::rank(self, &ctx).await?,
			Strategy::Proximity => proximity::rank(self, &ctx).await?,
		};

		match ranking {
			Ranking::Ranked(ids) => Ok(Outcome::Views(self.resolve(&ids).await?)),
			Ranking::Skipped(reason) => Ok(Outcome::Skipped(reason)),
		}
	}

	/// Profiles owning `ranked_cards` that pass the text filter, in card rank order.
	pub(crate) async fn profiles_for_cards(
		&self,
		ctx: &Context<'_>,
		ranked_cards: Vec<Uuid>,
	) -> Result<Vec<Uuid>> {
		if ranked_cards.is_empty() {
			return Ok(Vec::new());
		}

		let query = ctx.query().with_cards(ranked_cards.clone());
		let owners: HashMap<Uuid, Uuid> = self
			.store
			.find_profiles(&query)
			.await?
			.into_iter()
			.map(|key| (key.card_id, key.profile_id))
			.collect();

		Ok(ranked_cards.iter().filter_map(|card_id| owners.get(card_id).copied()).collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn keys_round_trip_through_from_str() {
		for strategy in Strategy::ALL {
			assert_eq!(strategy.as_str().parse::<Strategy>().ok(), Some(strategy));
		}
	}

	#[test]
	fn unknown_key_is_invalid_request() {
		let err = "popular".parse::<Strategy>().expect_err("Expected unknown key error.");

		assert!(matches!(err, Error::InvalidRequest { .. }));
	}

	#[test]
	fn serde_uses_category_keys() {
		let json = serde_json::to_string(&Strategy::SocialAffinity).expect("Failed to serialize.");

		assert_eq!(json, "\"likeYourFollows\"");
	}
}
