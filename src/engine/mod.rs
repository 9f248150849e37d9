// Core engine components
pub mod store;
pub mod predicate;
pub mod statement;
pub mod query_executor;
pub mod mutation_executor;
pub mod engine;
pub mod transaction;
pub mod migration;

pub use store::*;
pub use predicate::*;
pub use statement::*;
pub use query_executor::*;
pub use mutation_executor::*;
pub use engine::*;
pub use transaction::*;
pub use migration::*;
