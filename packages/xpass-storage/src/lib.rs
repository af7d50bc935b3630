pub mod db;
pub mod memory;
pub mod models;
pub mod queries;
pub mod query;
pub mod schema;
pub mod store;

mod error;

pub use error::Error;
pub use query::ProfileQuery;
pub use store::GraphStore;

use std::{future::Future, pin::Pin};

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
