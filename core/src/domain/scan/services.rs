use tracing::{info, instrument};

use crate::domain::{
    common::services::Service,
    embedding::EmbeddingClient,
    ingredient_extraction::VisionClient,
    knowledge_base::KnowledgeBaseRepository,
    product::{ProductCatalog, ProductService, entities::ProductSummary},
    risk_assessment::{ChatClient, RiskAssessmentService},
    scan::{
        entities::{ScanError, ScanResult, shape_scan_result},
        ports::ScanService,
    },
    sensitivity::ProfileRepository,
};

impl<E, KB, P, V, L, PC> ScanService for Service<E, KB, P, V, L, PC>
where
    E: EmbeddingClient,
    KB: KnowledgeBaseRepository,
    P: ProfileRepository,
    V: VisionClient,
    L: ChatClient,
    PC: ProductCatalog,
{
    #[instrument(skip(self, image), fields(image_size = image.len()))]
    async fn scan_image(&self, image: Vec<u8>, user_id: String) -> Result<ScanResult, ScanError> {
        let result = self.assess_from_image(image, user_id.clone()).await?;
        let scan = shape_scan_result(&user_id, result, None);

        info!(
            scan_id = %scan.scan_id,
            overall_risk_level = %scan.overall_risk_level,
            "scan completed"
        );
        Ok(scan)
    }

    #[instrument(skip(self))]
    async fn assess_barcode(
        &self,
        barcode: String,
        user_id: String,
    ) -> Result<ScanResult, ScanError> {
        let product = self
            .lookup_product(barcode.clone())
            .await?
            .ok_or_else(|| ScanError::ProductNotFound(barcode.trim().to_string()))?;

        info!(
            product_id = product.id,
            brand_name = %product.brand_name,
            ingredients = product.ingredients.len(),
            "assessing catalog product"
        );

        let summary = ProductSummary::from(&product);
        let result = self
            .assess_from_ingredients(product.ingredients, user_id.clone())
            .await?;
        let scan = shape_scan_result(&user_id, result, Some(summary));

        info!(
            scan_id = %scan.scan_id,
            overall_risk_level = %scan.overall_risk_level,
            "barcode assessment completed"
        );
        Ok(scan)
    }
}
