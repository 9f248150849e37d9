// DataStore interface and backends
pub mod datastore_trait;
pub mod mock_datastore;

pub use datastore_trait::*;
pub use mock_datastore::*;
