use uuid::Uuid;

use xpass_domain::{
	geo::{BoundingBox, Coordinates},
	page::Window,
	text::TextFilter,
};

use crate::models::ProfileRecord;

/// Composable candidate selection over the joined profile, card, category and address graph.
///
/// Every restriction is conjunctive. An id restriction set to an empty list matches nothing.
#[derive(Debug, Clone, Default)]
pub struct ProfileQuery {
	pub text: TextFilter,
	pub name: TextFilter,
	pub categories: Option<Vec<Uuid>>,
	pub cards: Option<Vec<Uuid>>,
	pub profiles: Option<Vec<Uuid>>,
	pub excluded: Vec<Uuid>,
	pub within: Option<BoundingBox>,
	pub window: Option<Window>,
}
impl ProfileQuery {
	pub fn new() -> Self {
		Self::default()
	}

	/// Any term against name, nickname, category names, city, region or country.
	pub fn with_text_filter(mut self, filter: TextFilter) -> Self {
		self.text = filter;

		self
	}

	/// Any term against the profile name only.
	pub fn with_name_filter(mut self, filter: TextFilter) -> Self {
		self.name = filter;

		self
	}

	/// Cards carrying at least one of the categories.
	pub fn with_category_filter<I>(mut self, category_ids: I) -> Self
	where
		I: IntoIterator<Item = Uuid>,
	{
		self.categories = Some(category_ids.into_iter().collect());

		self
	}

	pub fn with_cards<I>(mut self, card_ids: I) -> Self
	where
		I: IntoIterator<Item = Uuid>,
	{
		self.cards = Some(card_ids.into_iter().collect());

		self
	}

	pub fn with_profiles<I>(mut self, profile_ids: I) -> Self
	where
		I: IntoIterator<Item = Uuid>,
	{
		self.profiles = Some(profile_ids.into_iter().collect());

		self
	}

	pub fn excluding<I>(mut self, profile_ids: I) -> Self
	where
		I: IntoIterator<Item = Uuid>,
	{
		self.excluded.extend(profile_ids);

		self
	}

	pub fn within(mut self, bbox: BoundingBox) -> Self {
		self.within = Some(bbox);

		self
	}

	pub fn paginate(mut self, window: Window) -> Self {
		self.window = Some(window);

		self
	}

	/// True when an id restriction can never match, so callers may skip the round trip.
	pub fn is_unsatisfiable(&self) -> bool {
		[&self.categories, &self.cards, &self.profiles]
			.into_iter()
			.any(|ids| ids.as_ref().is_some_and(Vec::is_empty))
			|| self.window.is_some_and(|window| window.limit == 0)
	}

	/// Evaluates every restriction except the window against a hydrated record.
	pub fn matches(&self, record: &ProfileRecord) -> bool {
		let profile = &record.profile;

		if self.excluded.contains(&profile.profile_id) {
			return false;
		}
		if let Some(ids) = &self.profiles
			&& !ids.contains(&profile.profile_id)
		{
			return false;
		}
		if let Some(ids) = &self.cards
			&& !ids.contains(&record.card.card_id)
		{
			return false;
		}
		if let Some(ids) = &self.categories
			&& !record.categories.iter().any(|node| ids.contains(&node.category.category_id))
		{
			return false;
		}
		if let Some(bbox) = &self.within {
			let Some(address) = &record.address else {
				return false;
			};

			if !bbox.contains(Coordinates::new(address.latitude, address.longitude)) {
				return false;
			}
		}
		if !self.name.matches_text(&profile.name) {
			return false;
		}

		self.text.matches_any(searchable_fields(record))
	}
}

fn searchable_fields(record: &ProfileRecord) -> Vec<&str> {
	let mut fields = vec![record.profile.name.as_str(), record.profile.nickname.as_str()];

	fields.extend(record.categories.iter().map(|node| node.category.name.as_str()));

	if let Some(address) = &record.address {
		fields.extend([address.city.as_str(), address.region.as_str(), address.country.as_str()]);
	}

	fields
}
