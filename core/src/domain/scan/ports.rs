use std::future::Future;

use crate::domain::scan::entities::{ScanError, ScanResult};

pub trait ScanService: Send + Sync {
    fn scan_image(
        &self,
        image: Vec<u8>,
        user_id: String,
    ) -> impl Future<Output = Result<ScanResult, ScanError>> + Send;

    /// Looks the barcode up in the catalog and assesses the product's
    /// ingredient list.
    fn assess_barcode(
        &self,
        barcode: String,
        user_id: String,
    ) -> impl Future<Output = Result<ScanResult, ScanError>> + Send;
}
