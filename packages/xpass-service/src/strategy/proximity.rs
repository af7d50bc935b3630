use xpass_domain::geo::BoundingBox;

use crate::{
	DiscoveryService, Result,
	strategy::{Context, Ranking},
};

pub(super) async fn rank(service: &DiscoveryService, ctx: &Context<'_>) -> Result<Ranking> {
	let explicit = ctx.request.coords.filter(|coords| coords.is_valid());
	let coords = match (explicit, ctx.request.client_address.as_deref()) {
		(Some(coords), _) => Some(coords),
		(None, Some(client_address)) => service.geo.locate(client_address).await,
		(None, None) => None,
	};
	let Some(center) = coords.filter(|coords| coords.is_valid()) else {
		return Ok(Ranking::Skipped("no coordinates"));
	};
	let bbox = BoundingBox::around(center, service.cfg.discovery.proximity_radius_km);
	let mut query = ctx.query().within(bbox).paginate(ctx.window);

	if let Some(viewer_id) = ctx.request.viewer_id {
		query = query.excluding([viewer_id]);
	}

	let keys = service.store.find_profiles(&query).await?;

	Ok(Ranking::Ranked(keys.into_iter().map(|key| key.profile_id).collect()))
}
