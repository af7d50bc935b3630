//! One and two hop relations over follow edges, plus the follow summaries shown on profiles.

use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

use xpass_domain::{count, page::Window, text::TextFilter};
use xpass_storage::ProfileQuery;

use crate::{DiscoveryService, Error, Result, count_to_i64};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowStats {
	pub following_count: String,
	pub followers_count: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowSummary {
	pub name: String,
	pub nickname: String,
	pub bio: Option<String>,
	pub image_url: Option<String>,
}

impl DiscoveryService {
	/// Profiles `profile_id` follows, oldest edge first.
	pub async fn following(&self, profile_id: Uuid) -> Result<Vec<Uuid>> {
		let edges = self.store.following(profile_id).await?;

		Ok(edges.into_iter().map(|edge| edge.followee_id).collect())
	}

	pub async fn followers(&self, profile_id: Uuid) -> Result<Vec<Uuid>> {
		Ok(self.store.followers(profile_id).await?)
	}

	/// Categories on the cards of every profile reachable within two follow hops of
	/// `profile_id`, the profile itself excluded.
	pub async fn second_degree_categories(&self, profile_id: Uuid) -> Result<Vec<Uuid>> {
		let first_hop = self.following(profile_id).await?;

		if first_hop.is_empty() {
			return Ok(Vec::new());
		}

		// Hydrated records carry their outgoing edges, which is the second hop.
		let records = self.store.hydrate_profiles(&first_hop).await?;
		let mut seen: HashSet<Uuid> = HashSet::from([profile_id]);
		let mut reach = Vec::new();
		let second_hop =
			records.iter().flat_map(|record| &record.following).map(|edge| edge.followee_id);

		for id in first_hop.iter().copied().chain(second_hop) {
			if seen.insert(id) {
				reach.push(id);
			}
		}

		if reach.is_empty() {
			return Ok(Vec::new());
		}

		Ok(self.store.card_category_ids(&reach).await?)
	}

	pub async fn follow_stats(&self, profile_id: Uuid) -> Result<FollowStats> {
		self.require_profile(profile_id).await?;

		let (following, followers) =
			tokio::join!(self.store.following(profile_id), self.store.followers(profile_id));

		Ok(FollowStats {
			following_count: count::abbreviate(count_to_i64(following?.len())),
			followers_count: count::abbreviate(count_to_i64(followers?.len())),
		})
	}

	pub async fn following_cards(
		&self,
		profile_id: Uuid,
		term: Option<&str>,
		page: u32,
		limit: u32,
	) -> Result<Vec<FollowSummary>> {
		self.require_profile(profile_id).await?;

		let ids = self.following(profile_id).await?;

		self.follow_summaries(ids, term, Window::new(page, limit)).await
	}

	pub async fn followers_cards(
		&self,
		profile_id: Uuid,
		term: Option<&str>,
		page: u32,
		limit: u32,
	) -> Result<Vec<FollowSummary>> {
		self.require_profile(profile_id).await?;

		let ids = self.followers(profile_id).await?;

		self.follow_summaries(ids, term, Window::new(page, limit)).await
	}

	async fn require_profile(&self, profile_id: Uuid) -> Result<()> {
		match self.store.profile(profile_id).await? {
			Some(_) => Ok(()),
			None => Err(Error::NotFound { message: format!("Profile {profile_id} does not exist.") }),
		}
	}

	/// Filters `ids` by name, keeps their order and pages the result.
	async fn follow_summaries(
		&self,
		ids: Vec<Uuid>,
		term: Option<&str>,
		window: Window,
	) -> Result<Vec<FollowSummary>> {
		if ids.is_empty() || window.limit == 0 {
			return Ok(Vec::new());
		}

		let filter = TextFilter::new(term);
		let ids = if filter.is_empty() {
			ids
		} else {
			let query = ProfileQuery::new().with_profiles(ids.clone()).with_name_filter(filter);
			let matched: HashSet<Uuid> = self
				.store
				.find_profiles(&query)
				.await?
				.into_iter()
				.map(|key| key.profile_id)
				.collect();

			ids.into_iter().filter(|id| matched.contains(id)).collect()
		};
		let page = window.slice(ids);
		let views = self.resolve(&page).await?;

		Ok(views
			.into_iter()
			.map(|view| FollowSummary {
				name: view.name,
				nickname: view.nickname,
				bio: view.bio,
				image_url: view.image_url,
			})
			.collect())
	}
}
