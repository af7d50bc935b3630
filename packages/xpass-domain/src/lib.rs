pub mod count;
pub mod geo;
pub mod page;
pub mod rank;
pub mod suggest;
pub mod text;
