use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	BoxFuture, Result,
	models::{CardScore, CardVisit, Category, FollowEdge, Profile, ProfileKey, ProfileRecord},
	query::ProfileQuery,
};

/// Read-only query surface over profiles, cards, categories, addresses, follow edges and access
/// events. Implementations carry no ranking logic.
pub trait GraphStore
where
	Self: Send + Sync,
{
	fn profile<'a>(&'a self, profile_id: Uuid) -> BoxFuture<'a, Result<Option<Profile>>>;

	/// Exact, case-sensitive nickname lookup.
	fn profile_by_nickname<'a>(
		&'a self,
		nickname: &'a str,
	) -> BoxFuture<'a, Result<Option<Profile>>>;

	/// Matching candidates in store order: profile creation time, then profile id.
	fn find_profiles<'a>(
		&'a self,
		query: &'a ProfileQuery,
	) -> BoxFuture<'a, Result<Vec<ProfileKey>>>;

	/// Full records for the given ids, in no particular order. Unknown ids are skipped.
	fn hydrate_profiles<'a>(
		&'a self,
		profile_ids: &'a [Uuid],
	) -> BoxFuture<'a, Result<Vec<ProfileRecord>>>;

	/// Distinct category ids found on the cards of the given profiles.
	fn card_category_ids<'a>(&'a self, profile_ids: &'a [Uuid]) -> BoxFuture<'a, Result<Vec<Uuid>>>;

	/// Outgoing edges, oldest first.
	fn following<'a>(&'a self, profile_id: Uuid) -> BoxFuture<'a, Result<Vec<FollowEdge>>>;

	/// Profiles holding an edge toward `profile_id`, in store order.
	fn followers<'a>(&'a self, profile_id: Uuid) -> BoxFuture<'a, Result<Vec<Uuid>>>;

	/// Access counts summed per card over events updated at or after `since`, highest first,
	/// ties broken by card id.
	fn top_cards_since<'a>(&'a self, since: OffsetDateTime) -> BoxFuture<'a, Result<Vec<CardScore>>>;

	/// One entry per card the viewer accessed, latest access first.
	fn recent_cards<'a>(
		&'a self,
		viewer_id: Uuid,
		exclude_card: Option<Uuid>,
	) -> BoxFuture<'a, Result<Vec<CardVisit>>>;

	/// Profile names containing `term`, most viewed card first.
	fn profile_names_matching<'a>(
		&'a self,
		term: &'a str,
		exclude: Option<Uuid>,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<String>>>;

	fn category_names_matching<'a>(
		&'a self,
		term: &'a str,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<String>>>;

	/// Every category, ordered by name then id.
	fn categories<'a>(&'a self) -> BoxFuture<'a, Result<Vec<Category>>>;
}
