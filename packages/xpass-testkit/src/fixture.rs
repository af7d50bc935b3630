//! Deterministic graph builder over [`MemoryGraphStore`].
//!
//! Profiles are created one second apart in insertion order, so store order (creation time, then
//! id) equals the order in which a test seeds them.

use std::sync::Arc;

use sqlx::types::Json;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use xpass_storage::{
	memory::MemoryGraphStore,
	models::{Address, Card, CardBackground, CardIcon, Category, FollowEdge, Profile},
};

use crate::Result;

/// Ids of a seeded profile and its card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seeded {
	pub profile_id: Uuid,
	pub card_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct ProfileSpec {
	name: String,
	nickname: Option<String>,
	bio: Option<String>,
	image: Option<String>,
	categories: Vec<Uuid>,
	location: Option<(String, String, String, f64, f64)>,
	views: i64,
}
impl ProfileSpec {
	pub fn named(name: &str) -> Self {
		Self {
			name: name.to_string(),
			nickname: None,
			bio: None,
			image: None,
			categories: Vec::new(),
			location: None,
			views: 0,
		}
	}

	pub fn nickname(mut self, nickname: &str) -> Self {
		self.nickname = Some(nickname.to_string());

		self
	}

	pub fn bio(mut self, bio: &str) -> Self {
		self.bio = Some(bio.to_string());

		self
	}

	pub fn image(mut self, image: &str) -> Self {
		self.image = Some(image.to_string());

		self
	}

	pub fn categories<I>(mut self, category_ids: I) -> Self
	where
		I: IntoIterator<Item = Uuid>,
	{
		self.categories = category_ids.into_iter().collect();

		self
	}

	/// Attaches an address at the coordinate with placeholder locality fields.
	pub fn at(self, latitude: f64, longitude: f64) -> Self {
		self.located("Springfield", "Central", "Freedonia", latitude, longitude)
	}

	pub fn located(
		mut self,
		city: &str,
		region: &str,
		country: &str,
		latitude: f64,
		longitude: f64,
	) -> Self {
		self.location =
			Some((city.to_string(), region.to_string(), country.to_string(), latitude, longitude));

		self
	}

	pub fn views(mut self, views: i64) -> Self {
		self.views = views;

		self
	}
}

pub struct GraphFixture {
	store: MemoryGraphStore,
	epoch: OffsetDateTime,
	seq: i64,
}
impl GraphFixture {
	pub fn new() -> Self {
		Self {
			store: MemoryGraphStore::new(),
			epoch: OffsetDateTime::now_utc() - Duration::days(90),
			seq: 0,
		}
	}

	pub fn category(&mut self, name: &str) -> Result<Uuid> {
		self.insert_category(name, None)
	}

	pub fn subcategory(&mut self, name: &str, parent_id: Uuid) -> Result<Uuid> {
		self.insert_category(name, Some(parent_id))
	}

	pub fn profile(&mut self, spec: ProfileSpec) -> Result<Seeded> {
		let created_at = self.tick();
		let address_id = match spec.location {
			Some((city, region, country, latitude, longitude)) => {
				let address_id = Uuid::new_v4();

				self.store.insert_address(Address {
					address_id,
					description: format!("{city} main street"),
					zip_code: None,
					city,
					region,
					country,
					complement: None,
					reference_point: None,
					latitude,
					longitude,
				});

				Some(address_id)
			},
			None => None,
		};
		let card_id = Uuid::new_v4();
		let card = Card {
			card_id,
			background: Json(CardBackground {
				contrast_color: "#ffffff".to_string(),
				..CardBackground::default()
			}),
			icons: Json(vec![CardIcon {
				key: "site".to_string(),
				social_network: "website".to_string(),
				link: format!("https://{}.example", spec.name.to_lowercase().replace(' ', "-")),
				nick: None,
				title: None,
				position: 0,
			}]),
			views_count: spec.views,
			unique_views_count: spec.views,
			address_id,
			created_at,
			updated_at: created_at,
		};

		self.store.insert_card(card, spec.categories)?;

		let profile_id = Uuid::new_v4();
		let nickname = spec
			.nickname
			.unwrap_or_else(|| format!("{}-{}", spec.name.to_lowercase().replace(' ', "."), self.seq));

		self.store.insert_profile(Profile {
			profile_id,
			name: spec.name,
			nickname,
			bio: spec.bio,
			image: spec.image,
			facebook_user_id: None,
			google_user_id: None,
			linkedin_user_id: None,
			card_id,
			created_at,
			updated_at: created_at,
		})?;

		Ok(Seeded { profile_id, card_id })
	}

	pub fn follow(&mut self, follower: Seeded, followee: Seeded) -> Result<()> {
		let followed_at = self.tick();

		self.store.insert_follow(FollowEdge {
			follower_id: follower.profile_id,
			followee_id: followee.profile_id,
			followed_at,
		})?;

		Ok(())
	}

	/// Registers `times` views of `card` from `ip`, the last one at `at`.
	pub fn view(
		&mut self,
		card: Seeded,
		ip: &str,
		viewer: Option<Seeded>,
		times: u32,
		at: OffsetDateTime,
	) -> Result<()> {
		let viewer_id = viewer.map(|seeded| seeded.profile_id);

		for _ in 0..times {
			self.store.record_access(card.card_id, ip, viewer_id, at)?;
		}

		Ok(())
	}

	pub fn into_store(self) -> Arc<MemoryGraphStore> {
		Arc::new(self.store)
	}

	fn insert_category(&mut self, name: &str, parent_id: Option<Uuid>) -> Result<Uuid> {
		let category_id = Uuid::new_v4();

		self.store.insert_category(Category { category_id, name: name.to_string(), parent_id })?;

		Ok(category_id)
	}

	fn tick(&mut self) -> OffsetDateTime {
		self.seq += 1;

		self.epoch + Duration::seconds(self.seq)
	}
}
impl Default for GraphFixture {
	fn default() -> Self {
		Self::new()
	}
}
