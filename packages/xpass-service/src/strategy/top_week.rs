use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{
	DiscoveryService, Result,
	strategy::{Context, Ranking},
};

pub(super) async fn rank(service: &DiscoveryService, ctx: &Context<'_>) -> Result<Ranking> {
	let days = i64::from(service.cfg.discovery.top_week_window_days);
	let since = OffsetDateTime::now_utc() - Duration::days(days);
	let scores = service.store.top_cards_since(since).await?;
	let cards: Vec<Uuid> = scores.into_iter().map(|score| score.card_id).collect();
	let ranked = service.profiles_for_cards(ctx, cards).await?;

	Ok(Ranking::Ranked(ctx.window.slice(ranked)))
}
