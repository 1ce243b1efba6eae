pub mod client;
pub mod mappers;
pub mod repositories;

pub use client::SupabaseClient;
