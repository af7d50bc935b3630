use serde::Serialize;

use xpass_domain::count;

use crate::{DiscoveryService, Error, Result, count_to_i64, view::ProfileView};

/// A public profile page: the profile view plus how many profiles follow it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDetail {
	#[serde(flatten)]
	pub profile: ProfileView,
	/// Abbreviated, like the card counters.
	pub followers_count: String,
}

impl DiscoveryService {
	pub async fn profile_by_nickname(&self, nickname: &str) -> Result<ProfileDetail> {
		let Some(profile) = self.store.profile_by_nickname(nickname).await? else {
			return Err(not_found(nickname));
		};
		let profile_id = profile.profile_id;
		let profile_ids = [profile_id];
		let (views, followers) =
			tokio::join!(self.resolve(&profile_ids), self.store.followers(profile_id));
		let Some(view) = views?.into_iter().next() else {
			return Err(not_found(nickname));
		};

		Ok(ProfileDetail {
			profile: view,
			followers_count: count::abbreviate(count_to_i64(followers?.len())),
		})
	}
}

fn not_found(nickname: &str) -> Error {
	Error::NotFound { message: format!("Profile @{nickname} does not exist.") }
}
