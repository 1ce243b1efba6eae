use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::{
    common::with_deadline,
    sensitivity::{entities::is_anonymous, ports::ProfileRepository},
};

/// Resolves a user's declared sensitivities. Never fails: any problem
/// reaching the profile store degrades to an empty list.
pub struct SensitivityAccessor<P> {
    repository: Arc<P>,
    deadline: Duration,
}

impl<P> Clone for SensitivityAccessor<P> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            deadline: self.deadline,
        }
    }
}

impl<P> SensitivityAccessor<P>
where
    P: ProfileRepository,
{
    pub fn new(repository: Arc<P>, deadline: Duration) -> Self {
        Self {
            repository,
            deadline,
        }
    }

    pub async fn get_sensitivities(&self, user_id: &str) -> Vec<String> {
        if is_anonymous(user_id) {
            info!("Anonymous user, skipping sensitivity lookup");
            return Vec::new();
        }

        let user_id = user_id.trim();
        let fetched = with_deadline(
            self.deadline,
            "profile lookup",
            self.repository.get_sensitivities(user_id.to_string()),
        )
        .await;

        match fetched {
            Ok(Some(raw)) => {
                let sensitivities = raw.into_labels();
                debug!(user_id, count = sensitivities.len(), "fetched sensitivities");
                sensitivities
            }
            Ok(None) => {
                warn!(user_id, "No profile found for user");
                Vec::new()
            }
            Err(e) => {
                warn!(user_id, "Failed to fetch user sensitivities: {}", e);
                Vec::new()
            }
        }
    }
}
