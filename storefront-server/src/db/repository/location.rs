//! Store Location Repository

use async_trait::async_trait;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, LocationStore, RepoError, RepoResult};
use crate::db::models::{StoreLocation, StoreLocationCreate};

const LOCATION_TABLE: &str = "location";

#[derive(Clone)]
pub struct LocationRepository {
    base: BaseRepository,
}

impl LocationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a new store location
    pub async fn create(
        &self,
        tenant: &str,
        data: StoreLocationCreate,
    ) -> RepoResult<StoreLocation> {
        let location = StoreLocation {
            id: None,
            tenant: tenant.to_string(),
            name: data.name,
            address: data.address,
            phone: data.phone,
            sort_order: data.sort_order.unwrap_or(0),
            is_active: true,
        };
        let created: Option<StoreLocation> = self
            .base
            .db()
            .create(LOCATION_TABLE)
            .content(location)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create location".to_string()))
    }
}

#[async_trait]
impl LocationStore for LocationRepository {
    async fn list_locations(&self, tenant: &str) -> RepoResult<Vec<StoreLocation>> {
        let locations: Vec<StoreLocation> = self
            .base
            .db()
            .query("SELECT * FROM location WHERE tenant = $tenant AND is_active = true ORDER BY sort_order")
            .bind(("tenant", tenant.to_string()))
            .await?
            .take(0)?;
        Ok(locations)
    }
}
