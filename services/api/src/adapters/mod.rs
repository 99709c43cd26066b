pub mod corpus;
pub mod db;
pub mod memory;

pub use corpus::load_corpus;
pub use db::PgPositionStore;
pub use memory::InMemoryPositionStore;
