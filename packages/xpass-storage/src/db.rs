use sqlx::{PgPool, postgres::PgPoolOptions};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	BoxFuture, Result,
	models::{CardScore, CardVisit, Category, FollowEdge, Profile, ProfileKey, ProfileRecord},
	queries,
	query::ProfileQuery,
	schema,
	store::GraphStore,
};

/// Postgres-backed [`GraphStore`].
#[derive(Clone)]
pub struct Db {
	pub pool: PgPool,
}
impl Db {
	pub async fn connect(cfg: &xpass_config::Postgres) -> Result<Self> {
		let pool =
			PgPoolOptions::new().max_connections(cfg.pool_max_conns).connect(&cfg.dsn).await?;

		Ok(Self { pool })
	}

	pub async fn ensure_schema(&self) -> Result<()> {
		let sql = schema::render_schema();
		let lock_id: i64 = 5_318_008;
		// Advisory locks are held per connection. A single transaction keeps the lock on one
		// connection and releases it on commit.
		let mut tx = self.pool.begin().await?;

		sqlx::query("SELECT pg_advisory_xact_lock($1)").bind(lock_id).execute(&mut *tx).await?;

		for statement in sql.split(';') {
			let trimmed = statement.trim();

			if trimmed.is_empty() {
				continue;
			}

			sqlx::query(trimmed).execute(&mut *tx).await?;
		}

		tx.commit().await?;

		Ok(())
	}
}

impl GraphStore for Db {
	fn profile<'a>(&'a self, profile_id: Uuid) -> BoxFuture<'a, Result<Option<Profile>>> {
		Box::pin(queries::fetch_profile(&self.pool, profile_id))
	}

	fn profile_by_nickname<'a>(
		&'a self,
		nickname: &'a str,
	) -> BoxFuture<'a, Result<Option<Profile>>> {
		Box::pin(queries::fetch_profile_by_nickname(&self.pool, nickname))
	}

	fn find_profiles<'a>(
		&'a self,
		query: &'a ProfileQuery,
	) -> BoxFuture<'a, Result<Vec<ProfileKey>>> {
		Box::pin(queries::find_profiles(&self.pool, query))
	}

	fn hydrate_profiles<'a>(
		&'a self,
		profile_ids: &'a [Uuid],
	) -> BoxFuture<'a, Result<Vec<ProfileRecord>>> {
		Box::pin(queries::hydrate_profiles(&self.pool, profile_ids))
	}

	fn card_category_ids<'a>(&'a self, profile_ids: &'a [Uuid]) -> BoxFuture<'a, Result<Vec<Uuid>>> {
		Box::pin(queries::card_category_ids(&self.pool, profile_ids))
	}

	fn following<'a>(&'a self, profile_id: Uuid) -> BoxFuture<'a, Result<Vec<FollowEdge>>> {
		Box::pin(queries::following(&self.pool, profile_id))
	}

	fn followers<'a>(&'a self, profile_id: Uuid) -> BoxFuture<'a, Result<Vec<Uuid>>> {
		Box::pin(queries::followers(&self.pool, profile_id))
	}

	fn top_cards_since<'a>(&'a self, since: OffsetDateTime) -> BoxFuture<'a, Result<Vec<CardScore>>> {
		Box::pin(queries::top_cards_since(&self.pool, since))
	}

	fn recent_cards<'a>(
		&'a self,
		viewer_id: Uuid,
		exclude_card: Option<Uuid>,
	) -> BoxFuture<'a, Result<Vec<CardVisit>>> {
		Box::pin(queries::recent_cards(&self.pool, viewer_id, exclude_card))
	}

	fn profile_names_matching<'a>(
		&'a self,
		term: &'a str,
		exclude: Option<Uuid>,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<String>>> {
		Box::pin(queries::profile_names_matching(&self.pool, term, exclude, limit))
	}

	fn category_names_matching<'a>(
		&'a self,
		term: &'a str,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<String>>> {
		Box::pin(queries::category_names_matching(&self.pool, term, limit))
	}

	fn categories<'a>(&'a self) -> BoxFuture<'a, Result<Vec<Category>>> {
		Box::pin(queries::list_categories(&self.pool))
	}
}
