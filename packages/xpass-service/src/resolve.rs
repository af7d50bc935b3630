use uuid::Uuid;

use xpass_domain::rank;
use xpass_storage::models::ProfileRecord;

use crate::{DiscoveryService, Result, view::ProfileView};

impl DiscoveryService {
	/// Hydrates ranked ids into views, in the ranked order. Hydration order is never trusted.
	pub(crate) async fn resolve(&self, ranked: &[Uuid]) -> Result<Vec<ProfileView>> {
		if ranked.is_empty() {
			return Ok(Vec::new());
		}

		let records = self.store.hydrate_profiles(ranked).await?;
		let ordered = rank::restore_rank_order(ranked, records, ProfileRecord::profile_id);
		let base_url = self.cfg.media.base_url.as_deref();

		Ok(ordered.into_iter().map(|record| ProfileView::render(record, base_url)).collect())
	}
}
