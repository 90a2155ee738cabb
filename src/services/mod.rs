// Service exports
pub mod media;
pub mod memory;
pub mod postgres;
pub mod store;
pub mod tokens;

pub use media::{LocalMediaStorage, MediaError};
pub use memory::MemoryStore;
pub use postgres::PostgresClient;
pub use store::{Store, StoreError};
pub use tokens::{Claims, TokenError, TokenIssuer, TokenPair, TokenType};
