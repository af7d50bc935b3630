/// Zero-based page window: `offset = page * limit`, `count = limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
	pub offset: usize,
	pub limit: usize,
}
impl Window {
	pub fn new(page: u32, limit: u32) -> Self {
		let limit = limit as usize;

		Self { offset: (page as usize).saturating_mul(limit), limit }
	}

	pub fn first(limit: u32) -> Self {
		Self::new(0, limit)
	}

	pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
		items.into_iter().skip(self.offset).take(self.limit).collect()
	}
}
