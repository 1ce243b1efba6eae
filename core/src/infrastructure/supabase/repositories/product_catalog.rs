use crate::{
    domain::{
        common::entities::app_errors::CoreError,
        product::{entities::ProductRecord, ports::ProductCatalog},
    },
    infrastructure::supabase::client::SupabaseClient,
};

const PRODUCTS_TABLE: &str = "products";
const PRODUCT_COLUMNS: &str =
    "id,brand_name,barcode,ingredients,product_type,coverage_score,research_count";

#[derive(Debug, Clone)]
pub struct SupabaseProductCatalog {
    pub client: SupabaseClient,
}

impl SupabaseProductCatalog {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

impl ProductCatalog for SupabaseProductCatalog {
    async fn find_by_barcode(&self, barcode: String) -> Result<Option<ProductRecord>, CoreError> {
        let rows: Vec<ProductRecord> = self
            .client
            .select(
                PRODUCTS_TABLE,
                &[
                    ("select", PRODUCT_COLUMNS.to_string()),
                    ("barcode", format!("eq.{}", barcode)),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;

        Ok(rows.into_iter().next())
    }
}
