use serde::Serialize;
use tracing::debug;

use crate::{
    domain::{
        common::entities::app_errors::CoreError,
        knowledge_base::{
            entities::{
                IngredientId, IngredientRef, IngredientSummary, KnowledgeBaseEntry,
                SimilarityResult,
            },
            ports::KnowledgeBaseRepository,
        },
    },
    infrastructure::supabase::{
        client::SupabaseClient,
        mappers::{IngredientNameRow, IngredientRow, SimilarityRow},
    },
};

const INGREDIENTS_TABLE: &str = "ingredients_library";
const SEARCH_FUNCTION: &str = "search_ingredients";

#[derive(Debug, Serialize)]
struct SearchIngredientsParams {
    query_embedding: Vec<f32>,
    match_limit: usize,
    match_threshold: f32,
}

#[derive(Debug, Clone)]
pub struct SupabaseKnowledgeBaseRepository {
    pub client: SupabaseClient,
}

impl SupabaseKnowledgeBaseRepository {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

impl KnowledgeBaseRepository for SupabaseKnowledgeBaseRepository {
    async fn search_nearest(
        &self,
        embedding: Vec<f32>,
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<SimilarityResult>, CoreError> {
        let params = SearchIngredientsParams {
            query_embedding: embedding,
            match_limit: limit,
            match_threshold: min_score,
        };

        let rows: Option<Vec<SimilarityRow>> = self.client.rpc(SEARCH_FUNCTION, &params).await?;

        Ok(rows
            .unwrap_or_default()
            .into_iter()
            .filter_map(SimilarityRow::into_result)
            .collect())
    }

    async fn scan_all(&self) -> Result<Vec<KnowledgeBaseEntry>, CoreError> {
        let rows: Vec<IngredientRow> = self
            .client
            .select(
                INGREDIENTS_TABLE,
                &[("select", "id,name,description,risk_level,embedding".to_string())],
            )
            .await?;

        let total = rows.len();
        let entries: Vec<KnowledgeBaseEntry> =
            rows.into_iter().filter_map(IngredientRow::into_entry).collect();
        debug!(total, usable = entries.len(), "scanned knowledge base");

        Ok(entries)
    }

    async fn lookup_by_ids(
        &self,
        ids: Vec<IngredientId>,
    ) -> Result<Vec<IngredientRef>, CoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let id_list = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let rows: Vec<IngredientNameRow> = self
            .client
            .select(
                INGREDIENTS_TABLE,
                &[
                    ("select", "id,name".to_string()),
                    ("id", format!("in.({})", id_list)),
                ],
            )
            .await?;

        Ok(rows.into_iter().map(IngredientRef::from).collect())
    }

    async fn find_by_name(
        &self,
        fragment: String,
        limit: usize,
    ) -> Result<Vec<IngredientSummary>, CoreError> {
        // PostgREST reserves these in filter values
        let pattern: String = fragment
            .chars()
            .filter(|c| !matches!(c, '*' | ',' | '(' | ')'))
            .collect();
        if pattern.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "name fragment has no searchable characters".to_string(),
            ));
        }

        let rows: Vec<IngredientRow> = self
            .client
            .select(
                INGREDIENTS_TABLE,
                &[
                    ("select", "id,name,description,risk_level".to_string()),
                    ("name", format!("ilike.*{}*", pattern)),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        Ok(rows.into_iter().filter_map(IngredientRow::into_summary).collect())
    }
}

#[cfg(test)]
mod tests {
    use httpmock::{
        Method::{GET, POST},
        MockServer,
    };
    use serde_json::json;

    use super::*;
    use crate::{
        domain::knowledge_base::entities::RiskLevel,
        infrastructure::supabase::repositories::test_client,
    };

    fn repository(server: &MockServer) -> SupabaseKnowledgeBaseRepository {
        SupabaseKnowledgeBaseRepository::new(test_client(server))
    }

    #[tokio::test]
    async fn test_search_nearest_calls_rpc() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/rest/v1/rpc/search_ingredients")
                .json_body_partial(r#"{"match_limit": 3, "match_threshold": 0.1}"#);
            then.status(200).json_body(json!([
                {"id": 1, "name": "Fragrance", "description": "Scent", "risk_level": "High", "similarity": 0.91},
                {"id": 9, "name": "Talc", "description": "Powder", "risk_level": "Unknown", "similarity": 0.5}
            ]));
        });

        let results = repository(&server)
            .search_nearest(vec![0.1, 0.2], 3, 0.1)
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].risk_level, RiskLevel::High);
        mock.assert();
    }

    #[tokio::test]
    async fn test_search_nearest_missing_function_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/rest/v1/rpc/search_ingredients");
            then.status(404)
                .json_body(json!({"code": "PGRST202", "message": "Could not find the function"}));
        });

        let err = repository(&server)
            .search_nearest(vec![0.1], 5, 0.1)
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::ExternalServiceError(_)));
    }

    #[tokio::test]
    async fn test_scan_all_skips_rows_without_embeddings() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/ingredients_library")
                .query_param("select", "id,name,description,risk_level,embedding");
            then.status(200).json_body(json!([
                {"id": 1, "name": "Fragrance", "description": "Scent", "risk_level": "High", "embedding": "[1,0]"},
                {"id": 2, "name": "Cotton", "description": "Fiber", "risk_level": "Low", "embedding": null}
            ]));
        });

        let entries = repository(&server).scan_all().await.unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].embedding, vec![1.0, 0.0]);
    }

    #[tokio::test]
    async fn test_lookup_by_ids_uses_in_filter() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/ingredients_library")
                .query_param("id", "in.(3,1)");
            then.status(200).json_body(json!([
                {"id": 1, "name": "Fragrance"},
                {"id": 3, "name": "Polyester"}
            ]));
        });

        let refs = repository(&server).lookup_by_ids(vec![3, 1]).await.unwrap();

        assert_eq!(refs.len(), 2);
        mock.assert();
    }

    #[tokio::test]
    async fn test_lookup_by_ids_empty_skips_request() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET);
            then.status(500);
        });

        assert!(repository(&server).lookup_by_ids(Vec::new()).await.unwrap().is_empty());
        assert_eq!(mock.hits(), 0);
    }

    #[tokio::test]
    async fn test_find_by_name_uses_ilike() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/ingredients_library")
                .query_param("name", "ilike.*fragr*")
                .query_param("limit", "5");
            then.status(200).json_body(json!([
                {"id": 1, "name": "Fragrance", "description": "Scent", "risk_level": "High"}
            ]));
        });

        let results = repository(&server)
            .find_by_name("fragr".to_string(), 5)
            .await
            .unwrap();

        assert_eq!(results[0].name, "Fragrance");
        mock.assert();
    }

    #[tokio::test]
    async fn test_find_by_name_rejects_reserved_only_fragment() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET);
            then.status(200).json_body(json!([]));
        });

        let err = repository(&server)
            .find_by_name("*(,)".to_string(), 5)
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::InvalidInput(_)));
        assert_eq!(mock.hits(), 0);
    }
}
