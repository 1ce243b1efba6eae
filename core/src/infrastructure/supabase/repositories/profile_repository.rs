use crate::{
    domain::{
        common::entities::app_errors::CoreError,
        sensitivity::{entities::RawSensitivities, ports::ProfileRepository},
    },
    infrastructure::supabase::{client::SupabaseClient, mappers::ProfileRow},
};

const PROFILES_TABLE: &str = "profiles";

#[derive(Debug, Clone)]
pub struct SupabaseProfileRepository {
    pub client: SupabaseClient,
}

impl SupabaseProfileRepository {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

impl ProfileRepository for SupabaseProfileRepository {
    async fn get_sensitivities(
        &self,
        user_id: String,
    ) -> Result<Option<RawSensitivities>, CoreError> {
        let rows: Vec<ProfileRow> = self
            .client
            .select(
                PROFILES_TABLE,
                &[
                    ("select", "sensitivities".to_string()),
                    ("id", format!("eq.{}", user_id)),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;

        Ok(rows.into_iter().next().and_then(|row| row.sensitivities))
    }
}
