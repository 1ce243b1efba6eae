use std::time::Duration;

use clap::{Parser, Subcommand};
use lotus_core::domain::common::{LLMConfig, LotusConfig, PipelineConfig, SupabaseConfig};

#[derive(Debug, Clone, Parser)]
#[command(name = "lotus", author, version, about = "Assess personal-care product ingredients against a curated knowledge base")]
pub struct Args {
    #[command(flatten)]
    pub openai: OpenAiArgs,

    #[command(flatten)]
    pub supabase: SupabaseArgs,

    #[command(flatten)]
    pub pipeline: PipelineArgs,

    #[command(flatten)]
    pub log: LogArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Extract the ingredient list from a label photo and assess it
    Scan {
        /// Path to a JPEG, PNG, GIF or WEBP image
        image: std::path::PathBuf,

        #[arg(long, env = "LOTUS_USER_ID", default_value = "anonymous")]
        user_id: String,
    },
    /// Assess an ingredient list given on the command line
    Assess {
        #[arg(required = true, num_args = 1..)]
        ingredients: Vec<String>,

        #[arg(long, env = "LOTUS_USER_ID", default_value = "anonymous")]
        user_id: String,
    },
    /// Look up a product by barcode and assess its catalog ingredients
    Barcode {
        barcode: String,

        #[arg(long, env = "LOTUS_USER_ID", default_value = "anonymous")]
        user_id: String,
    },
    /// Search the ingredient knowledge base
    Search {
        query: String,

        #[arg(long, default_value_t = 5)]
        limit: usize,

        /// Only keep entries with this risk level (Low, Medium or High)
        #[arg(long)]
        risk_level: Option<String>,

        /// Match names by substring instead of semantic similarity
        #[arg(long, default_value_t = false)]
        by_name: bool,
    },
}

#[derive(Debug, Clone, clap::Args)]
pub struct OpenAiArgs {
    #[arg(long = "openai-api-key", env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: String,

    #[arg(
        long = "openai-base-url",
        env = "OPENAI_BASE_URL",
        default_value = "https://api.openai.com/v1"
    )]
    pub base_url: String,

    #[arg(long, env = "LOTUS_CHAT_MODEL", default_value = "gpt-4o-mini")]
    pub chat_model: String,

    #[arg(long, env = "LOTUS_VISION_MODEL", default_value = "gpt-4o-mini")]
    pub vision_model: String,

    #[arg(long, env = "LOTUS_EMBEDDING_MODEL", default_value = "text-embedding-3-small")]
    pub embedding_model: String,

    #[arg(long, env = "LOTUS_EMBEDDING_DIMENSIONS", default_value_t = 1536)]
    pub embedding_dimensions: usize,

    #[arg(long, env = "LOTUS_MAX_RETRIES", default_value_t = 3)]
    pub max_retries: usize,

    /// Client-level HTTP timeout, in seconds
    #[arg(id = "openai_timeout", long = "openai-timeout", env = "OPENAI_TIMEOUT", default_value_t = 90)]
    pub request_timeout: u64,
}

#[derive(Debug, Clone, clap::Args)]
pub struct SupabaseArgs {
    #[arg(long = "supabase-url", env = "SUPABASE_URL")]
    pub url: String,

    #[arg(long = "supabase-key", env = "SUPABASE_KEY", hide_env_values = true)]
    pub service_key: String,

    /// Client-level HTTP timeout, in seconds
    #[arg(id = "supabase_timeout", long = "supabase-timeout", env = "SUPABASE_TIMEOUT", default_value_t = 30)]
    pub request_timeout: u64,
}

/// Per-call deadlines in seconds.
#[derive(Debug, Clone, clap::Args)]
pub struct PipelineArgs {
    #[arg(long, env = "LOTUS_EMBEDDING_TIMEOUT", default_value_t = 15)]
    pub embedding_timeout: u64,

    #[arg(long, env = "LOTUS_SEARCH_TIMEOUT", default_value_t = 10)]
    pub search_timeout: u64,

    #[arg(long, env = "LOTUS_PROFILE_TIMEOUT", default_value_t = 5)]
    pub profile_timeout: u64,

    #[arg(long, env = "LOTUS_VISION_TIMEOUT", default_value_t = 60)]
    pub vision_timeout: u64,

    #[arg(long, env = "LOTUS_CHAT_TIMEOUT", default_value_t = 60)]
    pub chat_timeout: u64,

    #[arg(long, env = "LOTUS_CATALOG_TIMEOUT", default_value_t = 10)]
    pub catalog_timeout: u64,

    #[arg(long, env = "LOTUS_SEARCH_CACHE_TTL", default_value_t = 3600)]
    pub search_cache_ttl: u64,

    #[arg(long, env = "LOTUS_SEARCH_CACHE_CAPACITY", default_value_t = 500)]
    pub search_cache_capacity: u64,
}

#[derive(Debug, Clone, clap::Args)]
pub struct LogArgs {
    /// Default filter when RUST_LOG is unset
    #[arg(long = "log-level", env = "LOG_LEVEL", default_value = "info")]
    pub level: String,

    #[arg(long = "log-json", env = "LOG_JSON", default_value_t = false)]
    pub json: bool,
}

impl From<PipelineArgs> for PipelineConfig {
    fn from(args: PipelineArgs) -> Self {
        Self {
            embedding_timeout: Duration::from_secs(args.embedding_timeout),
            search_timeout: Duration::from_secs(args.search_timeout),
            profile_timeout: Duration::from_secs(args.profile_timeout),
            vision_timeout: Duration::from_secs(args.vision_timeout),
            chat_timeout: Duration::from_secs(args.chat_timeout),
            catalog_timeout: Duration::from_secs(args.catalog_timeout),
            search_cache_ttl: Duration::from_secs(args.search_cache_ttl),
            search_cache_capacity: args.search_cache_capacity,
        }
    }
}

impl From<Args> for LotusConfig {
    fn from(args: Args) -> Self {
        Self {
            llm: LLMConfig {
                openai_api_key: args.openai.api_key,
                openai_base_url: args.openai.base_url,
                chat_model: args.openai.chat_model,
                vision_model: args.openai.vision_model,
                embedding_model: args.openai.embedding_model,
                embedding_dimensions: args.openai.embedding_dimensions,
                max_retries: args.openai.max_retries,
                request_timeout: Duration::from_secs(args.openai.request_timeout),
            },
            supabase: SupabaseConfig {
                url: args.supabase.url,
                service_key: args.supabase.service_key,
                request_timeout: Duration::from_secs(args.supabase.request_timeout),
            },
            pipeline: args.pipeline.into(),
        }
    }
}
