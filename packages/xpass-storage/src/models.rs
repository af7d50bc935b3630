use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Profile {
	pub profile_id: Uuid,
	pub name: String,
	pub nickname: String,
	pub bio: Option<String>,
	pub image: Option<String>,
	pub facebook_user_id: Option<String>,
	pub google_user_id: Option<String>,
	pub linkedin_user_id: Option<String>,
	pub card_id: Uuid,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardBackground {
	pub image: Option<String>,
	pub color_rgb: Option<Vec<u8>>,
	pub blur: Option<f32>,
	pub contrast_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardIcon {
	pub key: String,
	pub social_network: String,
	pub link: String,
	pub nick: Option<String>,
	pub title: Option<String>,
	pub position: i32,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Card {
	pub card_id: Uuid,
	pub background: Json<CardBackground>,
	pub icons: Json<Vec<CardIcon>>,
	pub views_count: i64,
	pub unique_views_count: i64,
	pub address_id: Option<Uuid>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Category {
	pub category_id: Uuid,
	pub name: String,
	pub parent_id: Option<Uuid>,
}

/// A card category with its parent resolved. The hierarchy is two levels deep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryNode {
	pub category: Category,
	pub parent: Option<Category>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Address {
	pub address_id: Uuid,
	pub description: String,
	pub zip_code: Option<String>,
	pub city: String,
	pub region: String,
	pub country: String,
	pub complement: Option<String>,
	pub reference_point: Option<String>,
	pub latitude: f64,
	pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct FollowEdge {
	pub follower_id: Uuid,
	pub followee_id: Uuid,
	pub followed_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccessEvent {
	pub access_id: Uuid,
	pub card_id: Uuid,
	pub ip: String,
	pub viewer_id: Option<Uuid>,
	pub count: i64,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

/// A profile with everything its public view needs.
#[derive(Debug, Clone)]
pub struct ProfileRecord {
	pub profile: Profile,
	pub card: Card,
	pub categories: Vec<CategoryNode>,
	pub address: Option<Address>,
	pub following: Vec<FollowEdge>,
}
impl ProfileRecord {
	pub fn profile_id(&self) -> Uuid {
		self.profile.profile_id
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::FromRow)]
pub struct ProfileKey {
	pub profile_id: Uuid,
	pub card_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct CardScore {
	pub card_id: Uuid,
	pub total: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct CardVisit {
	pub card_id: Uuid,
	pub last_access: OffsetDateTime,
}
