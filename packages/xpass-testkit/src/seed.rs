//! Copies a fixture graph into Postgres so both stores can be checked against the same data.

use sqlx::{PgConnection, PgPool};

use xpass_storage::memory::{GraphSnapshot, MemoryGraphStore};

use crate::{Error, Result};

/// Inserts every row of `store` in one transaction. The schema must already exist.
pub async fn copy_to_postgres(store: &MemoryGraphStore, pool: &PgPool) -> Result<()> {
	let snapshot = store.snapshot();
	let mut tx = pool.begin().await?;

	insert_snapshot(&mut *tx, &snapshot).await?;

	tx.commit().await?;

	Ok(())
}

async fn insert_snapshot(conn: &mut PgConnection, snapshot: &GraphSnapshot) -> Result<()> {
	for category in &snapshot.categories {
		sqlx::query("INSERT INTO categories (category_id, name, parent_id) VALUES ($1, $2, $3)")
			.bind(category.category_id)
			.bind(category.name.as_str())
			.bind(category.parent_id)
			.execute(&mut *conn)
			.await?;
	}
	for address in &snapshot.addresses {
		sqlx::query(
			"\
INSERT INTO addresses (
	address_id, description, zip_code, city, region, country, complement, reference_point,
	latitude, longitude
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
		)
		.bind(address.address_id)
		.bind(address.description.as_str())
		.bind(address.zip_code.as_deref())
		.bind(address.city.as_str())
		.bind(address.region.as_str())
		.bind(address.country.as_str())
		.bind(address.complement.as_deref())
		.bind(address.reference_point.as_deref())
		.bind(address.latitude)
		.bind(address.longitude)
		.execute(&mut *conn)
		.await?;
	}
	for (card, category_ids) in &snapshot.cards {
		sqlx::query(
			"\
INSERT INTO cards (
	card_id, background, icons, views_count, unique_views_count, address_id, created_at, updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
		)
		.bind(card.card_id)
		.bind(card.background.clone())
		.bind(card.icons.clone())
		.bind(card.views_count)
		.bind(card.unique_views_count)
		.bind(card.address_id)
		.bind(card.created_at)
		.bind(card.updated_at)
		.execute(&mut *conn)
		.await?;

		for (position, category_id) in category_ids.iter().enumerate() {
			let position = i16::try_from(position)
				.map_err(|_| Error::Message(format!("Card {} has too many categories.", card.card_id)))?;

			sqlx::query(
				"INSERT INTO card_categories (card_id, category_id, position) VALUES ($1, $2, $3)",
			)
			.bind(card.card_id)
			.bind(*category_id)
			.bind(position)
			.execute(&mut *conn)
			.await?;
		}
	}
	for profile in &snapshot.profiles {
		sqlx::query(
			"\
INSERT INTO profiles (
	profile_id, name, nickname, bio, image, facebook_user_id, google_user_id, linkedin_user_id,
	card_id, created_at, updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
		)
		.bind(profile.profile_id)
		.bind(profile.name.as_str())
		.bind(profile.nickname.as_str())
		.bind(profile.bio.as_deref())
		.bind(profile.image.as_deref())
		.bind(profile.facebook_user_id.as_deref())
		.bind(profile.google_user_id.as_deref())
		.bind(profile.linkedin_user_id.as_deref())
		.bind(profile.card_id)
		.bind(profile.created_at)
		.bind(profile.updated_at)
		.execute(&mut *conn)
		.await?;
	}
	for edge in &snapshot.follows {
		sqlx::query(
			"INSERT INTO follow_edges (follower_id, followee_id, followed_at) VALUES ($1, $2, $3)",
		)
		.bind(edge.follower_id)
		.bind(edge.followee_id)
		.bind(edge.followed_at)
		.execute(&mut *conn)
		.await?;
	}
	for event in &snapshot.accesses {
		sqlx::query(
			"\
INSERT INTO card_accesses (access_id, card_id, ip, viewer_id, count, created_at, updated_at)
VALUES ($1, $2, $3, $4, $5, $6, $7)",
		)
		.bind(event.access_id)
		.bind(event.card_id)
		.bind(event.ip.as_str())
		.bind(event.viewer_id)
		.bind(event.count)
		.bind(event.created_at)
		.bind(event.updated_at)
		.execute(&mut *conn)
		.await?;
	}

	Ok(())
}
