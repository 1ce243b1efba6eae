use std::future::Future;

use crate::domain::{
    common::entities::app_errors::CoreError, risk_assessment::entities::RiskAssessmentResult,
    scan::entities::ScanError,
};

/// Generative text model.
#[cfg_attr(test, mockall::automock)]
pub trait ChatClient: Send + Sync {
    fn complete(
        &self,
        system_prompt: String,
        user_prompt: String,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;
}

pub trait RiskAssessmentService: Send + Sync {
    /// Reads the ingredient list off a product image, then assesses it.
    fn assess_from_image(
        &self,
        image: Vec<u8>,
        user_id: String,
    ) -> impl Future<Output = Result<RiskAssessmentResult, ScanError>> + Send;

    /// Assesses an ingredient list that is already known, e.g. from a
    /// catalog product.
    fn assess_from_ingredients(
        &self,
        ingredients: Vec<String>,
        user_id: String,
    ) -> impl Future<Output = Result<RiskAssessmentResult, ScanError>> + Send;
}
