//! The category catalog offered when a card picks its categories.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use xpass_storage::models::Category;

use crate::{DiscoveryService, Result};

/// A category with its subcategories, both ordered by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryBranch {
	pub id: Uuid,
	pub name: String,
	pub children: Vec<CategoryBranch>,
}

impl DiscoveryService {
	/// Root categories with their descendants nested below them.
	pub async fn category_tree(&self) -> Result<Vec<CategoryBranch>> {
		let categories = self.store.categories().await?;

		Ok(build_tree(categories))
	}
}

/// Categories whose parent is absent from the input are dropped along with their subtree.
pub(crate) fn build_tree(categories: Vec<Category>) -> Vec<CategoryBranch> {
	let mut roots = Vec::new();
	let mut children: HashMap<Uuid, Vec<Category>> = HashMap::new();

	for category in categories {
		match category.parent_id {
			Some(parent_id) => children.entry(parent_id).or_default().push(category),
			None => roots.push(category),
		}
	}

	roots.into_iter().map(|root| branch(root, &mut children)).collect()
}

fn branch(category: Category, children: &mut HashMap<Uuid, Vec<Category>>) -> CategoryBranch {
	let nested = children.remove(&category.category_id).unwrap_or_default();

	CategoryBranch {
		id: category.category_id,
		name: category.name,
		children: nested.into_iter().map(|child| branch(child, children)).collect(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn category(name: &str, parent_id: Option<Uuid>) -> Category {
		Category { category_id: Uuid::new_v4(), name: name.to_string(), parent_id }
	}

	#[test]
	fn children_nest_under_their_root_in_input_order() {
		let music = category("Music", None);
		let sports = category("Sports", None);
		let jazz = category("Jazz", Some(music.category_id));
		let rock = category("Rock", Some(music.category_id));
		let surf = category("Surf", Some(sports.category_id));
		let tree = build_tree(vec![jazz, music.clone(), rock, sports.clone(), surf]);

		assert_eq!(tree.len(), 2);
		assert_eq!(tree[0].id, music.category_id);
		assert_eq!(
			tree[0].children.iter().map(|child| child.name.as_str()).collect::<Vec<_>>(),
			vec!["Jazz", "Rock"]
		);
		assert_eq!(tree[1].children[0].name, "Surf");
		assert!(tree[1].children[0].children.is_empty());
	}

	#[test]
	fn orphans_are_left_out() {
		let stray = category("Stray", Some(Uuid::new_v4()));
		let tree = build_tree(vec![stray, category("Art", None)]);

		assert_eq!(tree.len(), 1);
		assert_eq!(tree[0].name, "Art");
	}
}
