pub mod llm;
pub mod supabase;
