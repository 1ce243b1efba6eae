use std::future::Future;

use crate::domain::{
    common::entities::app_errors::CoreError, sensitivity::entities::RawSensitivities,
};

#[cfg_attr(test, mockall::automock)]
pub trait ProfileRepository: Send + Sync {
    /// `None` when the user has no profile or the profile has no sensitivities.
    fn get_sensitivities(
        &self,
        user_id: String,
    ) -> impl Future<Output = Result<Option<RawSensitivities>, CoreError>> + Send;
}
