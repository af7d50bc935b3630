//! In-memory [`GraphStore`] with the same ordering and filtering semantics as the Postgres
//! store. Writes go through `&mut self`, so a populated store is shared read-only.

use std::collections::{HashMap, HashSet};

use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	BoxFuture, Error, Result,
	models::{
		AccessEvent, Address, Card, CardScore, CardVisit, Category, CategoryNode, FollowEdge,
		Profile, ProfileKey, ProfileRecord,
	},
	query::ProfileQuery,
	store::GraphStore,
};

const MAX_CARD_CATEGORIES: usize = 3;

/// Every row held by a [`MemoryGraphStore`], ordered so each row only references rows before it.
#[derive(Debug, Clone, Default)]
pub struct GraphSnapshot {
	/// Parents precede their children.
	pub categories: Vec<Category>,
	pub addresses: Vec<Address>,
	/// Each card with its category ids in card order.
	pub cards: Vec<(Card, Vec<Uuid>)>,
	pub profiles: Vec<Profile>,
	pub follows: Vec<FollowEdge>,
	pub accesses: Vec<AccessEvent>,
}

#[derive(Debug, Default)]
pub struct MemoryGraphStore {
	profiles: HashMap<Uuid, Profile>,
	cards: HashMap<Uuid, Card>,
	card_categories: HashMap<Uuid, Vec<Uuid>>,
	categories: HashMap<Uuid, Category>,
	addresses: HashMap<Uuid, Address>,
	follows: Vec<FollowEdge>,
	accesses: Vec<AccessEvent>,
}
impl MemoryGraphStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert_category(&mut self, category: Category) -> Result<()> {
		if let Some(parent_id) = category.parent_id
			&& !self.categories.contains_key(&parent_id)
		{
			return Err(Error::NotFound(format!("parent category {parent_id}")));
		}

		self.categories.insert(category.category_id, category);

		Ok(())
	}

	pub fn insert_address(&mut self, address: Address) {
		self.addresses.insert(address.address_id, address);
	}

	pub fn insert_card(&mut self, card: Card, category_ids: Vec<Uuid>) -> Result<()> {
		if category_ids.len() > MAX_CARD_CATEGORIES {
			return Err(Error::InvalidArgument(format!(
				"a card holds at most {MAX_CARD_CATEGORIES} categories"
			)));
		}
		if let Some(missing) = category_ids.iter().find(|id| !self.categories.contains_key(*id)) {
			return Err(Error::NotFound(format!("category {missing}")));
		}
		if let Some(address_id) = card.address_id
			&& !self.addresses.contains_key(&address_id)
		{
			return Err(Error::NotFound(format!("address {address_id}")));
		}

		self.card_categories.insert(card.card_id, category_ids);
		self.cards.insert(card.card_id, card);

		Ok(())
	}

	pub fn insert_profile(&mut self, profile: Profile) -> Result<()> {
		if !self.cards.contains_key(&profile.card_id) {
			return Err(Error::NotFound(format!("card {}", profile.card_id)));
		}
		if self.profiles.values().any(|existing| {
			existing.profile_id != profile.profile_id && existing.nickname == profile.nickname
		}) {
			return Err(Error::Conflict(format!("nickname {}", profile.nickname)));
		}

		self.profiles.insert(profile.profile_id, profile);

		Ok(())
	}

	pub fn insert_follow(&mut self, edge: FollowEdge) -> Result<()> {
		if edge.follower_id == edge.followee_id {
			return Err(Error::InvalidArgument("a profile cannot follow itself".to_string()));
		}
		if self.follows.iter().any(|existing| {
			existing.follower_id == edge.follower_id && existing.followee_id == edge.followee_id
		}) {
			return Err(Error::Conflict(format!(
				"{} already follows {}",
				edge.follower_id, edge.followee_id
			)));
		}

		self.follows.push(edge);

		Ok(())
	}

	/// Upserts the access event for `(card, ip, viewer)`: the first view creates it, later views
	/// bump `count` and `updated_at`.
	pub fn record_access(
		&mut self,
		card_id: Uuid,
		ip: &str,
		viewer_id: Option<Uuid>,
		at: OffsetDateTime,
	) -> Result<()> {
		if !self.cards.contains_key(&card_id) {
			return Err(Error::NotFound(format!("card {card_id}")));
		}

		if let Some(event) = self.accesses.iter_mut().find(|event| {
			event.card_id == card_id && event.ip == ip && event.viewer_id == viewer_id
		}) {
			event.count += 1;
			event.updated_at = at;

			return Ok(());
		}

		self.accesses.push(AccessEvent {
			access_id: Uuid::new_v4(),
			card_id,
			ip: ip.to_string(),
			viewer_id,
			count: 1,
			created_at: at,
			updated_at: at,
		});

		Ok(())
	}

	pub fn insert_access(&mut self, event: AccessEvent) -> Result<()> {
		if self.accesses.iter().any(|existing| {
			existing.card_id == event.card_id
				&& existing.ip == event.ip
				&& existing.viewer_id == event.viewer_id
		}) {
			return Err(Error::Conflict(format!("access event for card {}", event.card_id)));
		}

		self.accesses.push(event);

		Ok(())
	}

	pub fn snapshot(&self) -> GraphSnapshot {
		let mut categories = self.sorted_categories();

		categories.sort_by_cached_key(|category| self.category_depth(category));

		let mut addresses: Vec<Address> = self.addresses.values().cloned().collect();

		addresses.sort_by_key(|address| address.address_id);

		let mut cards: Vec<(Card, Vec<Uuid>)> = self
			.cards
			.values()
			.map(|card| {
				let category_ids =
					self.card_categories.get(&card.card_id).cloned().unwrap_or_default();

				(card.clone(), category_ids)
			})
			.collect();

		cards.sort_by_key(|(card, _)| card.card_id);

		let mut follows = self.follows.clone();

		sort_edges(&mut follows);

		GraphSnapshot {
			categories,
			addresses,
			cards,
			profiles: self.ordered_profiles().into_iter().cloned().collect(),
			follows,
			accesses: self.accesses.clone(),
		}
	}

	fn category_depth(&self, category: &Category) -> usize {
		let mut depth = 0;
		let mut parent_id = category.parent_id;

		while let Some(id) = parent_id {
			depth += 1;
			parent_id = self.categories.get(&id).and_then(|parent| parent.parent_id);

			if depth > self.categories.len() {
				break;
			}
		}

		depth
	}

	fn ordered_profiles(&self) -> Vec<&Profile> {
		let mut profiles: Vec<&Profile> = self.profiles.values().collect();

		profiles.sort_by(|a, b| {
			a.created_at.cmp(&b.created_at).then_with(|| a.profile_id.cmp(&b.profile_id))
		});

		profiles
	}

	fn record(&self, profile: &Profile) -> Option<ProfileRecord> {
		let card = self.cards.get(&profile.card_id)?.clone();
		let categories = self
			.card_categories
			.get(&card.card_id)
			.map(|ids| {
				ids.iter()
					.filter_map(|id| self.categories.get(id))
					.map(|category| CategoryNode {
						category: category.clone(),
						parent: category.parent_id.and_then(|id| self.categories.get(&id)).cloned(),
					})
					.collect()
			})
			.unwrap_or_default();
		let address = card.address_id.and_then(|id| self.addresses.get(&id)).cloned();
		let mut following: Vec<FollowEdge> = self
			.follows
			.iter()
			.filter(|edge| edge.follower_id == profile.profile_id)
			.cloned()
			.collect();

		sort_edges(&mut following);

		Some(ProfileRecord { profile: profile.clone(), card, categories, address, following })
	}

	fn find_profiles_now(&self, query: &ProfileQuery) -> Vec<ProfileKey> {
		if query.is_unsatisfiable() {
			return Vec::new();
		}

		let matched: Vec<ProfileKey> = self
			.ordered_profiles()
			.into_iter()
			.filter_map(|profile| self.record(profile))
			.filter(|record| query.matches(record))
			.map(|record| ProfileKey {
				profile_id: record.profile.profile_id,
				card_id: record.card.card_id,
			})
			.collect();

		match query.window {
			Some(window) => window.slice(matched),
			None => matched,
		}
	}

	fn top_cards_now(&self, since: OffsetDateTime) -> Vec<CardScore> {
		let mut totals: HashMap<Uuid, i64> = HashMap::new();

		for event in self.accesses.iter().filter(|event| event.updated_at >= since) {
			*totals.entry(event.card_id).or_default() += event.count;
		}

		let mut scores: Vec<CardScore> =
			totals.into_iter().map(|(card_id, total)| CardScore { card_id, total }).collect();

		scores.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.card_id.cmp(&b.card_id)));

		scores
	}

	fn recent_cards_now(&self, viewer_id: Uuid, exclude_card: Option<Uuid>) -> Vec<CardVisit> {
		let mut latest: HashMap<Uuid, OffsetDateTime> = HashMap::new();

		for event in &self.accesses {
			if event.viewer_id != Some(viewer_id) || Some(event.card_id) == exclude_card {
				continue;
			}

			let entry = latest.entry(event.card_id).or_insert(event.updated_at);

			if event.updated_at > *entry {
				*entry = event.updated_at;
			}
		}

		let mut visits: Vec<CardVisit> = latest
			.into_iter()
			.map(|(card_id, last_access)| CardVisit { card_id, last_access })
			.collect();

		visits.sort_by(|a, b| {
			b.last_access.cmp(&a.last_access).then_with(|| a.card_id.cmp(&b.card_id))
		});

		visits
	}

	fn profile_names_now(&self, term: &str, exclude: Option<Uuid>, limit: u32) -> Vec<String> {
		let needle = term.to_lowercase();
		let mut matched: Vec<(&Profile, i64)> = self
			.ordered_profiles()
			.into_iter()
			.filter(|profile| Some(profile.profile_id) != exclude)
			.filter(|profile| profile.name.to_lowercase().contains(needle.as_str()))
			.map(|profile| {
				let views = self.cards.get(&profile.card_id).map(|card| card.views_count);

				(profile, views.unwrap_or_default())
			})
			.collect();

		// Stable sort keeps store order among equal view counts.
		matched.sort_by(|a, b| b.1.cmp(&a.1));

		matched.into_iter().take(limit as usize).map(|(profile, _)| profile.name.clone()).collect()
	}

	fn category_names_now(&self, term: &str, limit: u32) -> Vec<String> {
		let needle = term.to_lowercase();

		self.sorted_categories()
			.into_iter()
			.filter(|category| category.name.to_lowercase().contains(needle.as_str()))
			.take(limit as usize)
			.map(|category| category.name)
			.collect()
	}

	fn sorted_categories(&self) -> Vec<Category> {
		let mut categories: Vec<Category> = self.categories.values().cloned().collect();

		categories
			.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.category_id.cmp(&b.category_id)));

		categories
	}
}

impl GraphStore for MemoryGraphStore {
	fn profile<'a>(&'a self, profile_id: Uuid) -> BoxFuture<'a, Result<Option<Profile>>> {
		let profile = self.profiles.get(&profile_id).cloned();

		Box::pin(async move { Ok(profile) })
	}

	fn profile_by_nickname<'a>(
		&'a self,
		nickname: &'a str,
	) -> BoxFuture<'a, Result<Option<Profile>>> {
		let profile = self.profiles.values().find(|profile| profile.nickname == nickname).cloned();

		Box::pin(async move { Ok(profile) })
	}

	fn find_profiles<'a>(
		&'a self,
		query: &'a ProfileQuery,
	) -> BoxFuture<'a, Result<Vec<ProfileKey>>> {
		let keys = self.find_profiles_now(query);

		Box::pin(async move { Ok(keys) })
	}

	fn hydrate_profiles<'a>(
		&'a self,
		profile_ids: &'a [Uuid],
	) -> BoxFuture<'a, Result<Vec<ProfileRecord>>> {
		let unique: HashSet<&Uuid> = profile_ids.iter().collect();
		let records: Vec<ProfileRecord> = unique
			.into_iter()
			.filter_map(|id| self.profiles.get(id))
			.filter_map(|profile| self.record(profile))
			.collect();

		Box::pin(async move { Ok(records) })
	}

	fn card_category_ids<'a>(&'a self, profile_ids: &'a [Uuid]) -> BoxFuture<'a, Result<Vec<Uuid>>> {
		let mut seen = HashSet::new();
		let mut ids = Vec::new();

		for profile in profile_ids.iter().filter_map(|id| self.profiles.get(id)) {
			for category_id in self.card_categories.get(&profile.card_id).into_iter().flatten() {
				if seen.insert(*category_id) {
					ids.push(*category_id);
				}
			}
		}

		Box::pin(async move { Ok(ids) })
	}

	fn following<'a>(&'a self, profile_id: Uuid) -> BoxFuture<'a, Result<Vec<FollowEdge>>> {
		let mut edges: Vec<FollowEdge> =
			self.follows.iter().filter(|edge| edge.follower_id == profile_id).cloned().collect();

		sort_edges(&mut edges);

		Box::pin(async move { Ok(edges) })
	}

	fn followers<'a>(&'a self, profile_id: Uuid) -> BoxFuture<'a, Result<Vec<Uuid>>> {
		let followers: HashSet<Uuid> = self
			.follows
			.iter()
			.filter(|edge| edge.followee_id == profile_id)
			.map(|edge| edge.follower_id)
			.collect();
		let ids: Vec<Uuid> = self
			.ordered_profiles()
			.into_iter()
			.map(|profile| profile.profile_id)
			.filter(|id| followers.contains(id))
			.collect();

		Box::pin(async move { Ok(ids) })
	}

	fn top_cards_since<'a>(&'a self, since: OffsetDateTime) -> BoxFuture<'a, Result<Vec<CardScore>>> {
		let scores = self.top_cards_now(since);

		Box::pin(async move { Ok(scores) })
	}

	fn recent_cards<'a>(
		&'a self,
		viewer_id: Uuid,
		exclude_card: Option<Uuid>,
	) -> BoxFuture<'a, Result<Vec<CardVisit>>> {
		let visits = self.recent_cards_now(viewer_id, exclude_card);

		Box::pin(async move { Ok(visits) })
	}

	fn profile_names_matching<'a>(
		&'a self,
		term: &'a str,
		exclude: Option<Uuid>,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<String>>> {
		let names = self.profile_names_now(term, exclude, limit);

		Box::pin(async move { Ok(names) })
	}

	fn category_names_matching<'a>(
		&'a self,
		term: &'a str,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<String>>> {
		let names = self.category_names_now(term, limit);

		Box::pin(async move { Ok(names) })
	}

	fn categories<'a>(&'a self) -> BoxFuture<'a, Result<Vec<Category>>> {
		let categories = self.sorted_categories();

		Box::pin(async move { Ok(categories) })
	}
}

fn sort_edges(edges: &mut [FollowEdge]) {
	edges.sort_by(|a, b| {
		a.followed_at.cmp(&b.followed_at).then_with(|| a.followee_id.cmp(&b.followee_id))
	});
}
