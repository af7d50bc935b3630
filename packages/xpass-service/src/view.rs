//! Public JSON shapes for profiles and their cards.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use xpass_domain::count;
use xpass_storage::models::{
	Address, Card, CardBackground, CardIcon, Category, CategoryNode, FollowEdge, ProfileRecord,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
	pub id: Uuid,
	pub name: String,
	pub nickname: String,
	pub bio: Option<String>,
	pub image: Option<String>,
	pub image_url: Option<String>,
	pub facebook_user_id: Option<String>,
	pub google_user_id: Option<String>,
	pub linkedin_user_id: Option<String>,
	pub card: CardView,
	pub following: Vec<FollowView>,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl ProfileView {
	/// `base_url` prefixes stored image names. Without it no URLs are rendered.
	pub fn render(record: ProfileRecord, base_url: Option<&str>) -> Self {
		let ProfileRecord { profile, card, categories, address, following } = record;

		Self {
			id: profile.profile_id,
			image_url: media_url(base_url, profile.image.as_deref()),
			name: profile.name,
			nickname: profile.nickname,
			bio: profile.bio,
			image: profile.image,
			facebook_user_id: profile.facebook_user_id,
			google_user_id: profile.google_user_id,
			linkedin_user_id: profile.linkedin_user_id,
			card: CardView::render(card, categories, address, base_url),
			following: following.into_iter().map(FollowView::from).collect(),
			created_at: profile.created_at,
			updated_at: profile.updated_at,
		}
	}
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
	pub id: Uuid,
	pub background: BackgroundView,
	pub icons: Vec<IconView>,
	/// Abbreviated, e.g. `1.2k`.
	pub views_count: String,
	pub unique_views_count: String,
	pub categories: Vec<CategoryView>,
	pub address: Option<AddressView>,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl CardView {
	fn render(
		card: Card,
		categories: Vec<CategoryNode>,
		address: Option<Address>,
		base_url: Option<&str>,
	) -> Self {
		let mut icons: Vec<IconView> = card.icons.0.into_iter().map(IconView::from).collect();

		icons.sort_by_key(|icon| icon.position);

		Self {
			id: card.card_id,
			background: BackgroundView::render(card.background.0, base_url),
			icons,
			views_count: count::abbreviate(card.views_count),
			unique_views_count: count::abbreviate(card.unique_views_count),
			categories: categories.into_iter().map(CategoryView::from).collect(),
			address: address.map(AddressView::from),
			created_at: card.created_at,
			updated_at: card.updated_at,
		}
	}
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundView {
	pub image: Option<String>,
	pub image_url: Option<String>,
	pub color_rgb: Option<Vec<u8>>,
	pub blur: Option<f32>,
	pub contrast_color: String,
}
impl BackgroundView {
	fn render(background: CardBackground, base_url: Option<&str>) -> Self {
		Self {
			image_url: media_url(base_url, background.image.as_deref()),
			image: background.image,
			color_rgb: background.color_rgb,
			blur: background.blur,
			contrast_color: background.contrast_color,
		}
	}
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconView {
	pub key: String,
	pub social_network: String,
	pub link: String,
	pub nick: Option<String>,
	pub title: Option<String>,
	pub position: i32,
}
impl From<CardIcon> for IconView {
	fn from(icon: CardIcon) -> Self {
		Self {
			key: icon.key,
			social_network: icon.social_network,
			link: icon.link,
			nick: icon.nick,
			title: icon.title,
			position: icon.position,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
	pub id: Uuid,
	pub name: String,
	pub parent: Option<Box<CategoryView>>,
}
impl From<Category> for CategoryView {
	fn from(category: Category) -> Self {
		Self { id: category.category_id, name: category.name, parent: None }
	}
}
impl From<CategoryNode> for CategoryView {
	fn from(node: CategoryNode) -> Self {
		Self {
			parent: node.parent.map(|parent| Box::new(CategoryView::from(parent))),
			..CategoryView::from(node.category)
		}
	}
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressView {
	pub id: Uuid,
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
impl From<Address> for AddressView {
	fn from(address: Address) -> Self {
		Self {
			id: address.address_id,
			description: address.description,
			zip_code: address.zip_code,
			city: address.city,
			region: address.region,
			country: address.country,
			complement: address.complement,
			reference_point: address.reference_point,
			latitude: address.latitude,
			longitude: address.longitude,
		}
	}
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowView {
	pub profile_id: Uuid,
	#[serde(with = "crate::time_serde")]
	pub followed_at: OffsetDateTime,
}
impl From<FollowEdge> for FollowView {
	fn from(edge: FollowEdge) -> Self {
		Self { profile_id: edge.followee_id, followed_at: edge.followed_at }
	}
}

pub(crate) fn media_url(base_url: Option<&str>, name: Option<&str>) -> Option<String> {
	match (base_url, name) {
		(Some(base_url), Some(name)) if !name.is_empty() => Some(format!("{base_url}/{name}")),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn media_url_needs_base_and_name() {
		assert_eq!(
			media_url(Some("https://cdn.example/app"), Some("a.png")).as_deref(),
			Some("https://cdn.example/app/a.png")
		);
		assert_eq!(media_url(None, Some("a.png")), None);
		assert_eq!(media_url(Some("https://cdn.example/app"), Some("")), None);
	}

	#[test]
	fn category_view_nests_parent() {
		let parent = Category { category_id: Uuid::new_v4(), name: "Sports".to_string(), parent_id: None };
		let child = Category {
			category_id: Uuid::new_v4(),
			name: "Surf".to_string(),
			parent_id: Some(parent.category_id),
		};
		let view = CategoryView::from(CategoryNode { category: child, parent: Some(parent) });
		let json = serde_json::to_value(&view).expect("Failed to serialize category.");

		assert_eq!(json["name"], "Surf");
		assert_eq!(json["parent"]["name"], "Sports");
		assert!(json["parent"]["parent"].is_null());
	}
}
