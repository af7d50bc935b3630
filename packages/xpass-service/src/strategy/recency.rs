use uuid::Uuid;

use crate::{
	DiscoveryService, Result,
	strategy::{Context, Ranking},
};

pub(super) async fn rank(service: &DiscoveryService, ctx: &Context<'_>) -> Result<Ranking> {
	let Some(viewer_id) = ctx.request.viewer_id else {
		return Ok(Ranking::Skipped("no viewer"));
	};
	let Some(viewer) = service.store.profile(viewer_id).await? else {
		return Ok(Ranking::Skipped("unknown viewer"));
	};
	let visits = service.store.recent_cards(viewer_id, Some(viewer.card_id)).await?;
	let mut cards: Vec<Uuid> = Vec::with_capacity(visits.len());

	for visit in visits {
		if !cards.contains(&visit.card_id) {
			cards.push(visit.card_id);
		}
	}

	let ranked = service.profiles_for_cards(ctx, cards).await?;

	Ok(Ranking::Ranked(ctx.window.slice(ranked)))
}
