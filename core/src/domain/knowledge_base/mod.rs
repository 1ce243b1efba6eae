pub mod cache;
pub mod entities;
pub mod ports;
pub mod services;
pub mod similarity;
pub mod value_objects;

pub use cache::SearchCache;
pub use entities::*;
pub use ports::{IngredientSearchService, KnowledgeBaseRepository};
pub use services::SimilaritySearch;
