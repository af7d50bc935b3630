//! Fault injection around any [`GraphStore`].

use std::{collections::HashMap, sync::Arc, time::Duration};

use time::OffsetDateTime;
use uuid::Uuid;

use xpass_storage::{
	BoxFuture, Error, GraphStore, ProfileQuery, Result,
	models::{CardScore, CardVisit, Category, FollowEdge, Profile, ProfileKey, ProfileRecord},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
	Profile,
	ProfileByNickname,
	FindProfiles,
	HydrateProfiles,
	CardCategoryIds,
	Following,
	Followers,
	TopCardsSince,
	RecentCards,
	ProfileNamesMatching,
	CategoryNamesMatching,
	Categories,
}

#[derive(Debug, Clone, Copy)]
enum Fault {
	Fail,
	Stall(Duration),
}

/// Delegates to an inner store, failing or stalling the configured operations.
pub struct FailingStore {
	inner: Arc<dyn GraphStore>,
	faults: HashMap<Operation, Fault>,
}
impl FailingStore {
	pub fn new(inner: Arc<dyn GraphStore>) -> Self {
		Self { inner, faults: HashMap::new() }
	}

	pub fn failing(mut self, operation: Operation) -> Self {
		self.faults.insert(operation, Fault::Fail);

		self
	}

	pub fn stalling(mut self, operation: Operation, delay: Duration) -> Self {
		self.faults.insert(operation, Fault::Stall(delay));

		self
	}

	fn guard<'a, T>(
		&'a self,
		operation: Operation,
		call: BoxFuture<'a, Result<T>>,
	) -> BoxFuture<'a, Result<T>>
	where
		T: Send + 'a,
	{
		let fault = self.faults.get(&operation).copied();

		Box::pin(async move {
			match fault {
				Some(Fault::Fail) =>
					Err(Error::Backend(format!("Injected fault in {operation:?}."))),
				Some(Fault::Stall(delay)) => {
					tokio::time::sleep(delay).await;

					call.await
				},
				None => call.await,
			}
		})
	}
}

impl GraphStore for FailingStore {
	fn profile<'a>(&'a self, profile_id: Uuid) -> BoxFuture<'a, Result<Option<Profile>>> {
		self.guard(Operation::Profile, self.inner.profile(profile_id))
	}

	fn profile_by_nickname<'a>(
		&'a self,
		nickname: &'a str,
	) -> BoxFuture<'a, Result<Option<Profile>>> {
		self.guard(Operation::ProfileByNickname, self.inner.profile_by_nickname(nickname))
	}

	fn find_profiles<'a>(
		&'a self,
		query: &'a ProfileQuery,
	) -> BoxFuture<'a, Result<Vec<ProfileKey>>> {
		self.guard(Operation::FindProfiles, self.inner.find_profiles(query))
	}

	fn hydrate_profiles<'a>(
		&'a self,
		profile_ids: &'a [Uuid],
	) -> BoxFuture<'a, Result<Vec<ProfileRecord>>> {
		self.guard(Operation::HydrateProfiles, self.inner.hydrate_profiles(profile_ids))
	}

	fn card_category_ids<'a>(&'a self, profile_ids: &'a [Uuid]) -> BoxFuture<'a, Result<Vec<Uuid>>> {
		self.guard(Operation::CardCategoryIds, self.inner.card_category_ids(profile_ids))
	}

	fn following<'a>(&'a self, profile_id: Uuid) -> BoxFuture<'a, Result<Vec<FollowEdge>>> {
		self.guard(Operation::Following, self.inner.following(profile_id))
	}

	fn followers<'a>(&'a self, profile_id: Uuid) -> BoxFuture<'a, Result<Vec<Uuid>>> {
		self.guard(Operation::Followers, self.inner.followers(profile_id))
	}

	fn top_cards_since<'a>(&'a self, since: OffsetDateTime) -> BoxFuture<'a, Result<Vec<CardScore>>> {
		self.guard(Operation::TopCardsSince, self.inner.top_cards_since(since))
	}

	fn recent_cards<'a>(
		&'a self,
		viewer_id: Uuid,
		exclude_card: Option<Uuid>,
	) -> BoxFuture<'a, Result<Vec<CardVisit>>> {
		self.guard(Operation::RecentCards, self.inner.recent_cards(viewer_id, exclude_card))
	}

	fn profile_names_matching<'a>(
		&'a self,
		term: &'a str,
		exclude: Option<Uuid>,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<String>>> {
		self.guard(
			Operation::ProfileNamesMatching,
			self.inner.profile_names_matching(term, exclude, limit),
		)
	}

	fn category_names_matching<'a>(
		&'a self,
		term: &'a str,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<String>>> {
		self.guard(Operation::CategoryNamesMatching, self.inner.category_names_matching(term, limit))
	}

	fn categories<'a>(&'a self) -> BoxFuture<'a, Result<Vec<Category>>> {
		self.guard(Operation::Categories, self.inner.categories())
	}
}
