use crate::{
	DiscoveryService, Result,
	strategy::{Context, Ranking},
};

pub(super) async fn rank(service: &DiscoveryService, ctx: &Context<'_>) -> Result<Ranking> {
	let Some(viewer_id) = ctx.request.viewer_id else {
		return Ok(Ranking::Skipped("no viewer"));
	};

	if service.store.profile(viewer_id).await?.is_none() {
		return Ok(Ranking::Skipped("unknown viewer"));
	}

	let categories = service.store.card_category_ids(&[viewer_id]).await?;

	if categories.is_empty() {
		return Ok(Ranking::Ranked(Vec::new()));
	}

	let query = ctx
		.query()
		.with_category_filter(categories)
		.excluding([viewer_id])
		.paginate(ctx.window);
	let keys = service.store.find_profiles(&query).await?;

	Ok(Ranking::Ranked(keys.into_iter().map(|key| key.profile_id).collect()))
}
