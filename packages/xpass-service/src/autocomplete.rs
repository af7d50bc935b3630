use uuid::Uuid;

use xpass_domain::suggest::{self, Suggestion};

use crate::{DiscoveryService, Result};

impl DiscoveryService {
	/// Blends profile names, most viewed first and never the viewer's own, with category names.
	pub async fn autocompletes(&self, viewer_id: Option<Uuid>, term: &str) -> Result<Vec<Suggestion>> {
		let term = term.trim();

		if term.is_empty() {
			return Ok(Vec::new());
		}

		let limit = self.cfg.discovery.autocomplete_limit;
		let (names, categories) = tokio::join!(
			self.store.profile_names_matching(term, viewer_id, limit),
			self.store.category_names_matching(term, limit),
		);

		Ok(suggest::blend_suggestions(names?, categories?, limit as usize))
	}
}
