use std::collections::HashMap;

use sqlx::{PgPool, Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use xpass_domain::text::{TextFilter, escape_like};

use crate::{
	Result,
	models::{
		Address, Card, CardScore, CardVisit, Category, CategoryNode, FollowEdge, Profile,
		ProfileKey, ProfileRecord,
	},
	query::ProfileQuery,
};

const PROFILE_COLUMNS: &str = "\
profile_id, name, nickname, bio, image, facebook_user_id, google_user_id, linkedin_user_id, \
card_id, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct CardCategoryRow {
	card_id: Uuid,
	category_id: Uuid,
	name: String,
	parent_id: Option<Uuid>,
	parent_name: Option<String>,
	parent_parent_id: Option<Uuid>,
}

pub async fn fetch_profile(pool: &PgPool, profile_id: Uuid) -> Result<Option<Profile>> {
	let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE profile_id = $1");
	let profile = sqlx::query_as::<_, Profile>(sql.as_str())
		.bind(profile_id)
		.fetch_optional(pool)
		.await?;

	Ok(profile)
}

pub async fn fetch_profile_by_nickname(pool: &PgPool, nickname: &str) -> Result<Option<Profile>> {
	let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE nickname = $1");
	let profile = sqlx::query_as::<_, Profile>(sql.as_str())
		.bind(nickname)
		.fetch_optional(pool)
		.await?;

	Ok(profile)
}

pub async fn find_profiles(pool: &PgPool, query: &ProfileQuery) -> Result<Vec<ProfileKey>> {
	if query.is_unsatisfiable() {
		return Ok(Vec::new());
	}

	let mut builder = QueryBuilder::<Postgres>::new(
		"\
SELECT p.profile_id, p.card_id
FROM profiles p
JOIN cards c ON c.card_id = p.card_id
LEFT JOIN addresses a ON a.address_id = c.address_id
WHERE TRUE",
	);

	push_text_filter(&mut builder, &query.text);

	if !query.name.is_empty() {
		builder.push(" AND p.name ILIKE ANY(");
		builder.push_bind(query.name.like_patterns());
		builder.push(")");
	}
	if let Some(category_ids) = &query.categories {
		builder.push(
			" AND EXISTS (SELECT 1 FROM card_categories cc WHERE cc.card_id = p.card_id AND cc.category_id = ANY(",
		);
		builder.push_bind(category_ids.clone());
		builder.push("))");
	}
	if let Some(card_ids) = &query.cards {
		builder.push(" AND p.card_id = ANY(");
		builder.push_bind(card_ids.clone());
		builder.push(")");
	}
	if let Some(profile_ids) = &query.profiles {
		builder.push(" AND p.profile_id = ANY(");
		builder.push_bind(profile_ids.clone());
		builder.push(")");
	}
	if !query.excluded.is_empty() {
		builder.push(" AND p.profile_id <> ALL(");
		builder.push_bind(query.excluded.clone());
		builder.push(")");
	}
	if let Some(bbox) = &query.within {
		builder.push(" AND a.latitude BETWEEN ");
		builder.push_bind(bbox.min.latitude);
		builder.push(" AND ");
		builder.push_bind(bbox.max.latitude);
		builder.push(" AND a.longitude BETWEEN ");
		builder.push_bind(bbox.min.longitude);
		builder.push(" AND ");
		builder.push_bind(bbox.max.longitude);
	}

	builder.push(" ORDER BY p.created_at ASC, p.profile_id ASC");

	if let Some(window) = query.window {
		builder.push(" LIMIT ");
		builder.push_bind(to_i64(window.limit));
		builder.push(" OFFSET ");
		builder.push_bind(to_i64(window.offset));
	}

	let keys: Vec<ProfileKey> = builder.build_query_as().fetch_all(pool).await?;

	Ok(keys)
}

pub async fn hydrate_profiles(pool: &PgPool, profile_ids: &[Uuid]) -> Result<Vec<ProfileRecord>> {
	if profile_ids.is_empty() {
		return Ok(Vec::new());
	}

	let sql = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE profile_id = ANY($1)");
	let profiles: Vec<Profile> =
		sqlx::query_as(sql.as_str()).bind(profile_ids).fetch_all(pool).await?;
	let card_ids: Vec<Uuid> = profiles.iter().map(|profile| profile.card_id).collect();
	let cards: Vec<Card> = sqlx::query_as(
		"\
SELECT card_id, background, icons, views_count, unique_views_count, address_id, created_at, updated_at
FROM cards
WHERE card_id = ANY($1)",
	)
	.bind(card_ids.as_slice())
	.fetch_all(pool)
	.await?;
	let address_ids: Vec<Uuid> = cards.iter().filter_map(|card| card.address_id).collect();
	let addresses: Vec<Address> = sqlx::query_as(
		"\
SELECT address_id, description, zip_code, city, region, country, complement, reference_point, latitude, longitude
FROM addresses
WHERE address_id = ANY($1)",
	)
	.bind(address_ids.as_slice())
	.fetch_all(pool)
	.await?;
	let category_rows: Vec<CardCategoryRow> = sqlx::query_as(
		"\
SELECT
	cc.card_id,
	cat.category_id,
	cat.name,
	cat.parent_id,
	parent.name AS parent_name,
	parent.parent_id AS parent_parent_id
FROM card_categories cc
JOIN categories cat ON cat.category_id = cc.category_id
LEFT JOIN categories parent ON parent.category_id = cat.parent_id
WHERE cc.card_id = ANY($1)
ORDER BY cc.card_id, cc.position",
	)
	.bind(card_ids.as_slice())
	.fetch_all(pool)
	.await?;
	let edges: Vec<FollowEdge> = sqlx::query_as(
		"\
SELECT follower_id, followee_id, followed_at
FROM follow_edges
WHERE follower_id = ANY($1)
ORDER BY followed_at ASC, followee_id ASC",
	)
	.bind(profile_ids)
	.fetch_all(pool)
	.await?;
	let mut cards_by_id: HashMap<Uuid, Card> =
		cards.into_iter().map(|card| (card.card_id, card)).collect();
	let addresses_by_id: HashMap<Uuid, Address> =
		addresses.into_iter().map(|address| (address.address_id, address)).collect();
	let mut categories_by_card: HashMap<Uuid, Vec<CategoryNode>> = HashMap::new();

	for row in category_rows {
		let parent = match (row.parent_id, row.parent_name) {
			(Some(category_id), Some(name)) =>
				Some(Category { category_id, name, parent_id: row.parent_parent_id }),
			_ => None,
		};

		categories_by_card.entry(row.card_id).or_default().push(CategoryNode {
			category: Category {
				category_id: row.category_id,
				name: row.name,
				parent_id: row.parent_id,
			},
			parent,
		});
	}

	let mut edges_by_follower: HashMap<Uuid, Vec<FollowEdge>> = HashMap::new();

	for edge in edges {
		edges_by_follower.entry(edge.follower_id).or_default().push(edge);
	}

	let mut records = Vec::with_capacity(profiles.len());

	for profile in profiles {
		let Some(card) = cards_by_id.remove(&profile.card_id) else {
			tracing::warn!(profile_id = %profile.profile_id, card_id = %profile.card_id, "Profile card is missing.");

			continue;
		};
		let address = card.address_id.and_then(|id| addresses_by_id.get(&id).cloned());
		let categories = categories_by_card.remove(&card.card_id).unwrap_or_default();
		let following = edges_by_follower.remove(&profile.profile_id).unwrap_or_default();

		records.push(ProfileRecord { profile, card, categories, address, following });
	}

	Ok(records)
}

pub async fn card_category_ids(pool: &PgPool, profile_ids: &[Uuid]) -> Result<Vec<Uuid>> {
	if profile_ids.is_empty() {
		return Ok(Vec::new());
	}

	let ids: Vec<Uuid> = sqlx::query_scalar(
		"\
SELECT DISTINCT cc.category_id
FROM profiles p
JOIN card_categories cc ON cc.card_id = p.card_id
WHERE p.profile_id = ANY($1)",
	)
	.bind(profile_ids)
	.fetch_all(pool)
	.await?;

	Ok(ids)
}

pub async fn following(pool: &PgPool, profile_id: Uuid) -> Result<Vec<FollowEdge>> {
	let edges = sqlx::query_as::<_, FollowEdge>(
		"\
SELECT follower_id, followee_id, followed_at
FROM follow_edges
WHERE follower_id = $1
ORDER BY followed_at ASC, followee_id ASC",
	)
	.bind(profile_id)
	.fetch_all(pool)
	.await?;

	Ok(edges)
}

pub async fn followers(pool: &PgPool, profile_id: Uuid) -> Result<Vec<Uuid>> {
	let ids: Vec<Uuid> = sqlx::query_scalar(
		"\
SELECT f.follower_id
FROM follow_edges f
JOIN profiles p ON p.profile_id = f.follower_id
WHERE f.followee_id = $1
ORDER BY p.created_at ASC, p.profile_id ASC",
	)
	.bind(profile_id)
	.fetch_all(pool)
	.await?;

	Ok(ids)
}

pub async fn top_cards_since(pool: &PgPool, since: OffsetDateTime) -> Result<Vec<CardScore>> {
	let scores = sqlx::query_as::<_, CardScore>(
		"\
SELECT card_id, SUM(count)::BIGINT AS total
FROM card_accesses
WHERE updated_at >= $1
GROUP BY card_id
ORDER BY total DESC, card_id ASC",
	)
	.bind(since)
	.fetch_all(pool)
	.await?;

	Ok(scores)
}

pub async fn recent_cards(
	pool: &PgPool,
	viewer_id: Uuid,
	exclude_card: Option<Uuid>,
) -> Result<Vec<CardVisit>> {
	let visits = sqlx::query_as::<_, CardVisit>(
		"\
SELECT card_id, MAX(updated_at) AS last_access
FROM card_accesses
WHERE viewer_id = $1 AND card_id IS DISTINCT FROM $2
GROUP BY card_id
ORDER BY last_access DESC, card_id ASC",
	)
	.bind(viewer_id)
	.bind(exclude_card)
	.fetch_all(pool)
	.await?;

	Ok(visits)
}

pub async fn profile_names_matching(
	pool: &PgPool,
	term: &str,
	exclude: Option<Uuid>,
	limit: u32,
) -> Result<Vec<String>> {
	let pattern = format!("%{}%", escape_like(term));
	let names: Vec<String> = sqlx::query_scalar(
		"\
SELECT p.name
FROM profiles p
JOIN cards c ON c.card_id = p.card_id
WHERE p.name ILIKE $1 AND ($2::uuid IS NULL OR p.profile_id <> $2)
ORDER BY c.views_count DESC, p.created_at ASC, p.profile_id ASC
LIMIT $3",
	)
	.bind(pattern)
	.bind(exclude)
	.bind(i64::from(limit))
	.fetch_all(pool)
	.await?;

	Ok(names)
}

pub async fn category_names_matching(pool: &PgPool, term: &str, limit: u32) -> Result<Vec<String>> {
	let pattern = format!("%{}%", escape_like(term));
	let names: Vec<String> = sqlx::query_scalar(
		"\
SELECT name
FROM categories
WHERE name ILIKE $1
ORDER BY name ASC, category_id ASC
LIMIT $2",
	)
	.bind(pattern)
	.bind(i64::from(limit))
	.fetch_all(pool)
	.await?;

	Ok(names)
}

pub async fn list_categories(pool: &PgPool) -> Result<Vec<Category>> {
	let categories = sqlx::query_as::<_, Category>(
		"SELECT category_id, name, parent_id FROM categories ORDER BY name ASC, category_id ASC",
	)
	.fetch_all(pool)
	.await?;

	Ok(categories)
}

fn push_text_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &TextFilter) {
	if filter.is_empty() {
		return;
	}

	let patterns = filter.like_patterns();

	builder.push(" AND (");

	for (idx, column) in ["p.name", "p.nickname", "a.city", "a.region", "a.country"].iter().enumerate()
	{
		if idx > 0 {
			builder.push(" OR ");
		}

		builder.push(*column);
		builder.push(" ILIKE ANY(");
		builder.push_bind(patterns.clone());
		builder.push(")");
	}

	builder.push(
		" OR EXISTS (SELECT 1 FROM card_categories fc JOIN categories fcat ON fcat.category_id = fc.category_id WHERE fc.card_id = p.card_id AND fcat.name ILIKE ANY(",
	);
	builder.push_bind(patterns);
	builder.push(")))");
}

fn to_i64(value: usize) -> i64 {
	i64::try_from(value).unwrap_or(i64::MAX)
}
