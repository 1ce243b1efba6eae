pub mod knowledge_base_repository;
pub mod product_catalog;
pub mod profile_repository;

pub use knowledge_base_repository::SupabaseKnowledgeBaseRepository;
pub use product_catalog::SupabaseProductCatalog;
pub use profile_repository::SupabaseProfileRepository;

#[cfg(test)]
pub(crate) fn test_client(server: &httpmock::MockServer) -> super::SupabaseClient {
    use crate::domain::common::SupabaseConfig;

    super::SupabaseClient::new(&SupabaseConfig {
        url: server.base_url(),
        service_key: "service-key".to_string(),
        request_timeout: std::time::Duration::from_secs(5),
    })
    .unwrap()
}
