use std::future::Future;

use crate::domain::{
    common::entities::app_errors::CoreError,
    product::entities::{Product, ProductRecord},
    scan::entities::ScanError,
};

#[cfg_attr(test, mockall::automock)]
pub trait ProductCatalog: Send + Sync {
    fn find_by_barcode(
        &self,
        barcode: String,
    ) -> impl Future<Output = Result<Option<ProductRecord>, CoreError>> + Send;
}

pub trait ProductService: Send + Sync {
    /// `Ok(None)` when the barcode is well-formed but not in the catalog.
    fn lookup_product(
        &self,
        barcode: String,
    ) -> impl Future<Output = Result<Option<Product>, ScanError>> + Send;
}
