use tracing::{debug, error, info, instrument, warn};

use crate::domain::{
    common::{services::Service, with_deadline},
    embedding::EmbeddingClient,
    ingredient_extraction::VisionClient,
    knowledge_base::KnowledgeBaseRepository,
    product::{
        entities::Product,
        helpers::{order_ingredient_names, validate_barcode},
        ports::{ProductCatalog, ProductService},
    },
    risk_assessment::ChatClient,
    scan::entities::ScanError,
    sensitivity::ProfileRepository,
};

impl<E, KB, P, V, L, PC> ProductService for Service<E, KB, P, V, L, PC>
where
    E: EmbeddingClient,
    KB: KnowledgeBaseRepository,
    P: ProfileRepository,
    V: VisionClient,
    L: ChatClient,
    PC: ProductCatalog,
{
    #[instrument(skip(self))]
    async fn lookup_product(&self, barcode: String) -> Result<Option<Product>, ScanError> {
        let barcode = validate_barcode(&barcode)?;

        let record = with_deadline(
            self.config.catalog_timeout,
            "product catalog lookup",
            self.product_catalog.find_by_barcode(barcode.clone()),
        )
        .await
        .map_err(|e| {
            error!(barcode, "Product catalog lookup failed: {}", e);
            ScanError::Catalog(e.to_string())
        })?;

        let Some(record) = record else {
            info!(barcode, "No product found for barcode");
            return Ok(None);
        };

        let ids = record.ingredients.clone().unwrap_or_default();
        let names = if ids.is_empty() {
            Vec::new()
        } else {
            match with_deadline(
                self.config.search_timeout,
                "ingredient name lookup",
                self.knowledge_base.lookup_by_ids(ids.clone()),
            )
            .await
            {
                Ok(resolved) => order_ingredient_names(&ids, resolved),
                Err(e) => {
                    warn!(barcode, "Failed to resolve ingredient names: {}", e);
                    Vec::new()
                }
            }
        };
        debug!(barcode, ingredients = names.len(), "resolved product ingredients");

        Ok(Some(Product::from_record(record, names)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        common::entities::app_errors::CoreError,
        ingredient_extraction::ports::MockVisionClient,
        product::{entities::ProductRecord, ports::MockProductCatalog},
        risk_assessment::ports::MockChatClient,
        sensitivity::ports::MockProfileRepository,
        testing::{InMemoryKnowledgeBase, TestService, sample_entries, test_service_with_catalog},
    };

    fn record(ingredients: Option<Vec<i64>>) -> ProductRecord {
        ProductRecord {
            id: 42,
            brand_name: Some("Acme Pads".to_string()),
            barcode: "012345678901".to_string(),
            ingredients,
            product_type: Some("pad".to_string()),
            coverage_score: Some(0.8),
            research_count: Some(3),
        }
    }

    fn service(kb: InMemoryKnowledgeBase, catalog: MockProductCatalog) -> TestService {
        test_service_with_catalog(
            kb,
            MockProfileRepository::new(),
            MockVisionClient::new(),
            MockChatClient::new(),
            catalog,
        )
    }

    fn catalog_with(found: Option<ProductRecord>) -> MockProductCatalog {
        let mut catalog = MockProductCatalog::new();
        catalog
            .expect_find_by_barcode()
            .withf(|barcode| barcode == "012345678901")
            .times(1)
            .returning(move |_| {
                let found = found.clone();
                Box::pin(async move { Ok(found) })
            });
        catalog
    }

    #[tokio::test]
    async fn test_lookup_resolves_names_in_catalog_order() {
        let service = service(
            InMemoryKnowledgeBase::new(sample_entries()),
            catalog_with(Some(record(Some(vec![3, 99, 1])))),
        );

        let product = service
            .lookup_product(" 012345678901 ".to_string())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(product.brand_name, "Acme Pads");
        assert_eq!(
            product.ingredients,
            vec!["Polyester", "Unknown (ID: 99)", "Fragrance"]
        );
    }

    #[tokio::test]
    async fn test_lookup_name_resolution_failure_is_soft() {
        let service = service(
            InMemoryKnowledgeBase::new(sample_entries()).without_lookup(),
            catalog_with(Some(record(Some(vec![1, 2])))),
        );

        let product = service
            .lookup_product("012345678901".to_string())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(product.id, 42);
        assert!(product.ingredients.is_empty());
    }

    #[tokio::test]
    async fn test_lookup_unknown_barcode_is_none() {
        let service = service(
            InMemoryKnowledgeBase::new(sample_entries()),
            catalog_with(None),
        );

        let product = service
            .lookup_product("012345678901".to_string())
            .await
            .unwrap();

        assert!(product.is_none());
    }

    #[tokio::test]
    async fn test_lookup_rejects_malformed_barcode_without_catalog_call() {
        let mut catalog = MockProductCatalog::new();
        catalog.expect_find_by_barcode().never();
        let service = service(InMemoryKnowledgeBase::new(sample_entries()), catalog);

        let err = service
            .lookup_product("ABC-123".to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, ScanError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_lookup_catalog_failure_is_surfaced() {
        let mut catalog = MockProductCatalog::new();
        catalog.expect_find_by_barcode().returning(|_| {
            Box::pin(async {
                Err(CoreError::ExternalServiceError(
                    "products table unreachable".to_string(),
                ))
            })
        });
        let service = service(InMemoryKnowledgeBase::new(sample_entries()), catalog);

        let err = service
            .lookup_product("012345678901".to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, ScanError::Catalog(_)));
    }

    #[tokio::test]
    async fn test_lookup_missing_brand_and_ingredients() {
        let mut bare = record(None);
        bare.brand_name = None;
        let service = service(
            InMemoryKnowledgeBase::new(sample_entries()),
            catalog_with(Some(bare)),
        );

        let product = service
            .lookup_product("012345678901".to_string())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(product.brand_name, "Unknown Brand");
        assert!(product.ingredients.is_empty());
    }
}
