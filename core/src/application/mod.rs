use std::sync::Arc;

use tracing::info;

use crate::{
    domain::common::{LotusConfig, entities::app_errors::CoreError, services::Service},
    infrastructure::{
        llm::openai_client::OpenAiClient,
        supabase::{
            SupabaseClient,
            repositories::{
                SupabaseKnowledgeBaseRepository, SupabaseProductCatalog,
                SupabaseProfileRepository,
            },
        },
    },
};

pub type LotusService = Service<
    OpenAiClient,
    SupabaseKnowledgeBaseRepository,
    SupabaseProfileRepository,
    OpenAiClient,
    OpenAiClient,
    SupabaseProductCatalog,
>;

pub async fn create_service(config: LotusConfig) -> Result<LotusService, CoreError> {
    let openai = Arc::new(OpenAiClient::new(&config.llm)?);
    let supabase = SupabaseClient::new(&config.supabase)?;

    info!(
        chat_model = %config.llm.chat_model,
        vision_model = %config.llm.vision_model,
        embedding_model = %config.llm.embedding_model,
        "assessment service ready"
    );

    Ok(Service::new(
        Arc::clone(&openai),
        Arc::new(SupabaseKnowledgeBaseRepository::new(supabase.clone())),
        Arc::new(SupabaseProfileRepository::new(supabase.clone())),
        Arc::clone(&openai),
        openai,
        Arc::new(SupabaseProductCatalog::new(supabase)),
        config.pipeline,
    ))
}
