pub mod common;
pub mod embedding;
pub mod ingredient_extraction;
pub mod knowledge_base;
pub mod product;
pub mod risk_assessment;
pub mod scan;
pub mod sensitivity;

#[cfg(test)]
pub(crate) mod testing;
