pub mod cache;
pub mod entities;
pub mod ports;
pub mod services;

pub use cache::EmbeddingCache;
pub use entities::*;
pub use ports::EmbeddingClient;
pub use services::Embedder;
