//! Listing composition service.
//!
//! Merges property rows with their image references, resolving storage paths
//! to public URLs. A listing with no uploaded images gets the single
//! placeholder URL so every consumer can assume at least one image.

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;
use uuid::Uuid;

use hearth_core::defaults::PLACEHOLDER_IMAGE_URL;
use hearth_core::{
    FilterCriteria, ImageRepository, Property, PropertyRepository, PropertyWithImages, Result,
};

use crate::storage::PublicUrlResolver;

/// Composes property rows and image URLs into [`PropertyWithImages`].
#[derive(Clone)]
pub struct ListingService {
    properties: Arc<dyn PropertyRepository>,
    images: Arc<dyn ImageRepository>,
    resolver: PublicUrlResolver,
}

impl ListingService {
    /// Create a new listing service.
    pub fn new(
        properties: Arc<dyn PropertyRepository>,
        images: Arc<dyn ImageRepository>,
        resolver: PublicUrlResolver,
    ) -> Self {
        Self {
            properties,
            images,
            resolver,
        }
    }

    async fn compose(&self, property: Property) -> Result<PropertyWithImages> {
        let image_rows = self.images.list_for_property(property.id).await?;
        let images: Vec<String> = if image_rows.is_empty() {
            vec![PLACEHOLDER_IMAGE_URL.to_string()]
        } else {
            image_rows
                .iter()
                .map(|img| self.resolver.resolve(&img.storage_path))
                .collect()
        };
        Ok(PropertyWithImages { property, images })
    }

    async fn compose_all(&self, properties: Vec<Property>) -> Result<Vec<PropertyWithImages>> {
        let mut listings = Vec::with_capacity(properties.len());
        for property in properties {
            listings.push(self.compose(property).await?);
        }
        Ok(listings)
    }

    /// Listings matching `criteria`, store order preserved.
    pub async fn list(&self, criteria: &FilterCriteria) -> Result<Vec<PropertyWithImages>> {
        let start = Instant::now();
        let properties = self.properties.list(criteria).await?;
        let listings = self.compose_all(properties).await?;

        debug!(
            subsystem = "db",
            component = "listings",
            op = "list",
            result_count = listings.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Composed listings"
        );
        Ok(listings)
    }

    /// A single listing by id.
    pub async fn get(&self, id: Uuid) -> Result<PropertyWithImages> {
        let property = self.properties.get(id).await?;
        self.compose(property).await
    }

    /// Every listing owned by `owner_id`.
    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<PropertyWithImages>> {
        let properties = self.properties.list_by_owner(owner_id).await?;
        self.compose_all(properties).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use hearth_core::seed::{sample_properties, seed_id};
    use hearth_core::{filter, Error, PropertyImage, PropertyInput};
    use std::sync::Mutex;

    /// In-memory property store for service tests.
    struct MemPropertyRepository {
        rows: Mutex<Vec<Property>>,
    }

    impl MemPropertyRepository {
        fn with_sample() -> Self {
            Self {
                rows: Mutex::new(sample_properties()),
            }
        }
    }

    #[async_trait]
    impl PropertyRepository for MemPropertyRepository {
        async fn insert(&self, _owner_id: Uuid, _input: &PropertyInput) -> Result<Uuid> {
            unimplemented!("not exercised by listing tests")
        }

        async fn update(&self, _id: Uuid, _owner_id: Uuid, _input: &PropertyInput) -> Result<()> {
            unimplemented!("not exercised by listing tests")
        }

        async fn delete(&self, id: Uuid, _owner_id: Uuid) -> Result<()> {
            self.rows.lock().unwrap().retain(|p| p.id != id);
            Ok(())
        }

        async fn get(&self, id: Uuid) -> Result<Property> {
            self.rows
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.id == id)
                .cloned()
                .ok_or(Error::PropertyNotFound(id))
        }

        async fn list(&self, criteria: &FilterCriteria) -> Result<Vec<Property>> {
            let mut rows = self.rows.lock().unwrap().clone();
            filter::retain(&mut rows, criteria);
            Ok(rows)
        }

        async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Property>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|p| p.owner_id == owner_id)
                .cloned()
                .collect())
        }

        async fn distinct_features(&self) -> Result<Vec<String>> {
            unimplemented!("not exercised by listing tests")
        }
    }

    /// In-memory image store keyed by property id.
    #[derive(Default)]
    struct MemImageRepository {
        rows: Mutex<Vec<PropertyImage>>,
    }

    impl MemImageRepository {
        fn with_image(property_id: Uuid, path: &str) -> Self {
            let repo = Self::default();
            repo.rows.lock().unwrap().push(PropertyImage {
                id: Uuid::new_v4(),
                property_id,
                storage_path: path.to_string(),
                is_primary: true,
                created_at: Utc::now(),
            });
            repo
        }
    }

    #[async_trait]
    impl ImageRepository for MemImageRepository {
        async fn add(
            &self,
            property_id: Uuid,
            storage_path: &str,
            is_primary: bool,
        ) -> Result<Uuid> {
            let id = Uuid::new_v4();
            self.rows.lock().unwrap().push(PropertyImage {
                id,
                property_id,
                storage_path: storage_path.to_string(),
                is_primary,
                created_at: Utc::now(),
            });
            Ok(id)
        }

        async fn list_for_property(&self, property_id: Uuid) -> Result<Vec<PropertyImage>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|i| i.property_id == property_id)
                .cloned()
                .collect())
        }

        async fn has_primary(&self, property_id: Uuid) -> Result<bool> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .any(|i| i.property_id == property_id && i.is_primary))
        }

        async fn paths_for_property(&self, property_id: Uuid) -> Result<Vec<String>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|i| i.property_id == property_id)
                .map(|i| i.storage_path.clone())
                .collect())
        }
    }

    fn service(images: MemImageRepository) -> (ListingService, Arc<MemPropertyRepository>) {
        let properties = Arc::new(MemPropertyRepository::with_sample());
        let svc = ListingService::new(
            properties.clone(),
            Arc::new(images),
            PublicUrlResolver::new("https://blobs.test/images"),
        );
        (svc, properties)
    }

    #[tokio::test]
    async fn test_listing_without_images_gets_placeholder() {
        let (svc, _) = service(MemImageRepository::default());
        let listing = svc.get(seed_id(1)).await.unwrap();
        assert_eq!(listing.images, vec![PLACEHOLDER_IMAGE_URL.to_string()]);
    }

    #[tokio::test]
    async fn test_listing_images_are_resolved_to_urls() {
        let images = MemImageRepository::with_image(seed_id(2), "owner/prop/kitchen.jpg");
        let (svc, _) = service(images);
        let listing = svc.get(seed_id(2)).await.unwrap();
        assert_eq!(
            listing.images,
            vec!["https://blobs.test/images/owner/prop/kitchen.jpg".to_string()]
        );
    }

    #[tokio::test]
    async fn test_list_applies_criteria_and_preserves_order() {
        let (svc, _) = service(MemImageRepository::default());
        let criteria = FilterCriteria::new().price_between(250_000, 1_000_000);
        let listings = svc.list(&criteria).await.unwrap();
        let ids: Vec<_> = listings.iter().map(|l| l.property.id).collect();
        assert_eq!(
            ids,
            vec![seed_id(1), seed_id(2), seed_id(4), seed_id(5), seed_id(6)]
        );
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_not_found() {
        let (svc, _) = service(MemImageRepository::default());
        let err = svc.get(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::PropertyNotFound(_)));
    }

    #[tokio::test]
    async fn test_deleted_listing_disappears_from_next_fetch() {
        let (svc, properties) = service(MemImageRepository::default());
        let owner = hearth_core::seed::seed_owner();

        let before = svc.list_by_owner(owner).await.unwrap();
        assert_eq!(before.len(), 6);

        properties.delete(seed_id(4), owner).await.unwrap();

        let after = svc.list_by_owner(owner).await.unwrap();
        assert_eq!(after.len(), 5);
        assert!(!after.iter().any(|l| l.property.id == seed_id(4)));

        // Filtered fetches cannot resurrect it either.
        let filtered = svc.list(&FilterCriteria::new()).await.unwrap();
        assert!(!filtered.iter().any(|l| l.property.id == seed_id(4)));
    }
}
