use std::sync::Arc;

use models::errors::ModelError;
use tracing::{info, instrument, warn};

use super::domain::{Contact, ContactFields, ImageUpload};
use super::repository::ContactRepository;
use crate::errors::ServiceError;
use crate::storage::blob_store::BlobStore;

const DUPLICATE_NAME: &str = "Contact name already exists.";
pub const CONTACT_NOT_FOUND: &str = "Contact not found";

/// Contact business service independent of web framework
pub struct ContactService {
    repo: Arc<dyn ContactRepository>,
    blobs: Arc<dyn BlobStore>,
}

impl ContactService {
    pub fn new(repo: Arc<dyn ContactRepository>, blobs: Arc<dyn BlobStore>) -> Self { Self { repo, blobs } }

    /// Every contact in storage order.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Contact>, ServiceError> {
        self.repo
            .list()
            .await
            .map_err(|e| ServiceError::store("Error reading all contacts", e))
    }

    /// Create a contact after checking that its name is not taken.
    ///
    /// The image, when present, is written to the blob store only once the name check
    /// has passed; its reference becomes `image_url`. A duplicate detected by the store
    /// itself (a concurrent create won the race) is still reported as a conflict, and
    /// the already-written image is left in place.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::contact::{ContactService, domain::ContactFields, repository::mock::MockContactRepository};
    /// use service::storage::blob_store::mock::MemoryBlobStore;
    /// let svc = ContactService::new(
    ///     Arc::new(MockContactRepository::with_unique_constraint()),
    ///     Arc::new(MemoryBlobStore::default()),
    /// );
    /// let created = tokio_test::block_on(svc.create(ContactFields::new("Bob", "555", "hi"), None)).unwrap();
    /// assert_eq!(created.image_url, None);
    /// assert!(tokio_test::block_on(svc.create(ContactFields::new("Bob", "556", "again"), None)).is_err());
    /// ```
    #[instrument(skip(self, fields, image), fields(contact_name = ?fields.contact_name, has_image = image.is_some()))]
    pub async fn create(&self, fields: ContactFields, image: Option<ImageUpload>) -> Result<Contact, ServiceError> {
        if let Some(name) = fields.contact_name.as_deref() {
            let existing = self
                .repo
                .find_by_name(name)
                .await
                .map_err(|e| ServiceError::store("Error checking contact name", e))?;
            if existing.is_some() {
                return Err(ServiceError::Conflict(DUPLICATE_NAME.into()));
            }
        }

        let image_url = match image {
            Some(img) => Some(self.blobs.put(&img.file_name, img.bytes).await?),
            None => None,
        };

        let missing = fields.missing();
        let created = self.repo.insert(fields, image_url.clone()).await.map_err(|e| {
            if let Some(orphan) = &image_url {
                warn!(image_url = %orphan, "contact insert failed; uploaded image left orphaned");
            }
            match e {
                ModelError::Duplicate(_) => ServiceError::Conflict(DUPLICATE_NAME.into()),
                other if !missing.is_empty() => {
                    warn!(error = %other, ?missing, "store rejected contact with missing fields");
                    ServiceError::Validation(format!("Error adding contact: missing {}", missing.join(", ")))
                }
                other => ServiceError::store("Error adding contact", other),
            }
        })?;

        info!(contact_id = created.id, contact_name = %created.contact_name, "contact_created");
        Ok(created)
    }

    /// Delete by id. Messages and the stored image of the contact are kept.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let affected = self
            .repo
            .delete(id)
            .await
            .map_err(|e| ServiceError::store("Error deleting contact", e))?;
        if affected == 0 {
            return Err(ServiceError::NotFound(CONTACT_NOT_FOUND.into()));
        }
        info!(contact_id = id, "contact_deleted");
        Ok(())
    }

    /// Overwrite name, phone and note. The name is not re-checked here; a rename onto
    /// an existing name is only caught by the store's unique constraint.
    #[instrument(skip(self, fields))]
    pub async fn update(&self, id: i32, fields: ContactFields) -> Result<(), ServiceError> {
        let affected = self.repo.update(id, fields).await.map_err(|e| match e {
            ModelError::Duplicate(_) => ServiceError::Conflict(DUPLICATE_NAME.into()),
            other => ServiceError::store("Error updating contact", other),
        })?;
        if affected == 0 {
            return Err(ServiceError::NotFound(CONTACT_NOT_FOUND.into()));
        }
        info!(contact_id = id, "contact_updated");
        Ok(())
    }

    /// Case-insensitive substring search on the contact name. No match is an empty list.
    #[instrument(skip(self))]
    pub async fn search_by_name(&self, fragment: &str) -> Result<Vec<Contact>, ServiceError> {
        if fragment.is_empty() {
            return Err(ServiceError::Validation("contact_name is required".into()));
        }
        self.repo
            .search_by_name(fragment)
            .await
            .map_err(|e| ServiceError::store("Error fetching contacts", e))
    }

    /// Image reference of the contact with exactly this name.
    ///
    /// `Ok(None)` means the contact exists without an image; an unknown name is `NotFound`.
    #[instrument(skip(self))]
    pub async fn profile_picture(&self, contact_name: &str) -> Result<Option<String>, ServiceError> {
        self.repo
            .find_image_url(contact_name)
            .await
            .map_err(|e| ServiceError::store("Error fetching Profile Picture", e))?
            .ok_or_else(|| ServiceError::NotFound("Profile picture not found".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::repository::mock::MockContactRepository;
    use crate::storage::blob_store::mock::MemoryBlobStore;

    fn service(repo: Arc<MockContactRepository>, blobs: Arc<MemoryBlobStore>) -> ContactService {
        ContactService::new(repo, blobs)
    }

    fn image(name: &str) -> Option<ImageUpload> {
        Some(ImageUpload { file_name: name.into(), bytes: b"img".to_vec() })
    }

    #[tokio::test]
    async fn duplicate_name_is_conflict_and_keeps_single_row() {
        let repo = Arc::new(MockContactRepository::default());
        let svc = service(repo.clone(), Arc::new(MemoryBlobStore::default()));

        svc.create(ContactFields::new("Alice", "1", "a"), None).await.unwrap();
        let err = svc.create(ContactFields::new("Alice", "2", "b"), None).await.unwrap_err();

        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(err.public_message(), "Contact name already exists.");
        assert_eq!(repo.count_named("Alice"), 1);
    }

    #[tokio::test]
    async fn rejected_duplicate_does_not_store_image() {
        let repo = Arc::new(MockContactRepository::default());
        let blobs = Arc::new(MemoryBlobStore::default());
        let svc = service(repo.clone(), blobs.clone());

        svc.create(ContactFields::new("Alice", "1", "a"), None).await.unwrap();
        let _ = svc.create(ContactFields::new("Alice", "2", "b"), image("x.png")).await;
        assert!(blobs.is_empty());
    }

    #[tokio::test]
    async fn store_level_duplicate_maps_to_conflict() {
        // 模拟并发：检查之后、插入之前另一请求已写入同名联系人
        let repo = Arc::new(MockContactRepository::with_unique_constraint());
        let blobs = Arc::new(MemoryBlobStore::default());

        struct RacingRepo(Arc<MockContactRepository>);
        #[async_trait::async_trait]
        impl ContactRepository for RacingRepo {
            async fn list(&self) -> Result<Vec<Contact>, ModelError> { self.0.list().await }
            async fn find_by_name(&self, _: &str) -> Result<Option<Contact>, ModelError> { Ok(None) }
            async fn insert(&self, f: ContactFields, url: Option<String>) -> Result<Contact, ModelError> { self.0.insert(f, url).await }
            async fn update(&self, id: i32, f: ContactFields) -> Result<u64, ModelError> { self.0.update(id, f).await }
            async fn delete(&self, id: i32) -> Result<u64, ModelError> { self.0.delete(id).await }
            async fn search_by_name(&self, q: &str) -> Result<Vec<Contact>, ModelError> { self.0.search_by_name(q).await }
            async fn find_image_url(&self, n: &str) -> Result<Option<Option<String>>, ModelError> { self.0.find_image_url(n).await }
        }

        repo.seed("Carol");
        let racing = ContactService::new(Arc::new(RacingRepo(repo.clone())), blobs.clone());
        let err = racing.create(ContactFields::new("Carol", "9", "n"), image("c.jpg")).await.unwrap_err();

        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(repo.count_named("Carol"), 1);
        // 图片已写入，保持孤儿状态
        assert_eq!(blobs.len(), 1);
    }

    #[tokio::test]
    async fn image_reference_is_stored_on_contact() {
        let repo = Arc::new(MockContactRepository::default());
        let blobs = Arc::new(MemoryBlobStore::default());
        let svc = service(repo, blobs.clone());

        let created = svc.create(ContactFields::new("Dana", "1", "n"), image("face.png")).await.unwrap();
        let url = created.image_url.expect("image url");
        assert!(url.starts_with("/uploads/") && url.ends_with(".png"));
        assert_eq!(blobs.get(&url).as_deref(), Some(&b"img"[..]));
        assert_eq!(svc.profile_picture("Dana").await.unwrap(), Some(url));
    }

    #[tokio::test]
    async fn blob_failure_aborts_create() {
        let repo = Arc::new(MockContactRepository::default());
        let svc = service(repo.clone(), Arc::new(MemoryBlobStore::failing()));

        let err = svc.create(ContactFields::new("Eve", "1", "n"), image("e.png")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Blob(_)));
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn missing_field_rejected_by_store_is_validation_error() {
        let repo = Arc::new(MockContactRepository::default());
        let svc = service(repo.clone(), Arc::new(MemoryBlobStore::default()));

        let fields = ContactFields { contact_name: Some("Fay".into()), phone_number: None, message: Some("n".into()) };
        let err = svc.create(fields, None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m.contains("phone_number")));
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn delete_and_update_unknown_id_are_not_found() {
        let repo = Arc::new(MockContactRepository::default());
        let svc = service(repo.clone(), Arc::new(MemoryBlobStore::default()));
        svc.create(ContactFields::new("Gus", "1", "n"), None).await.unwrap();

        assert!(matches!(svc.delete(404).await, Err(ServiceError::NotFound(_))));
        assert_eq!(repo.len(), 1);

        let err = svc.update(404, ContactFields::new("X", "2", "m")).await.unwrap_err();
        assert_eq!(err.public_message(), "Contact not found");
        assert_eq!(svc.list().await.unwrap()[0].contact_name, "Gus");
    }

    #[tokio::test]
    async fn update_overwrites_text_but_keeps_image() {
        let repo = Arc::new(MockContactRepository::default());
        let svc = service(repo, Arc::new(MemoryBlobStore::default()));
        let c = svc.create(ContactFields::new("Hal", "1", "n"), image("h.gif")).await.unwrap();

        svc.update(c.id, ContactFields::new("Hank", "2", "m")).await.unwrap();
        let all = svc.list().await.unwrap();
        assert_eq!(all[0].contact_name, "Hank");
        assert_eq!(all[0].phone_number, "2");
        assert_eq!(all[0].image_url, c.image_url);
    }

    #[tokio::test]
    async fn update_does_not_recheck_name_without_store_constraint() {
        let repo = Arc::new(MockContactRepository::default());
        let svc = service(repo.clone(), Arc::new(MemoryBlobStore::default()));
        svc.create(ContactFields::new("Ivy", "1", "n"), None).await.unwrap();
        let jo = svc.create(ContactFields::new("Jo", "2", "n"), None).await.unwrap();

        svc.update(jo.id, ContactFields::new("Ivy", "2", "n")).await.unwrap();
        assert_eq!(repo.count_named("Ivy"), 2);
    }

    #[tokio::test]
    async fn rename_collision_caught_by_store_is_conflict() {
        let repo = Arc::new(MockContactRepository::with_unique_constraint());
        let svc = service(repo, Arc::new(MemoryBlobStore::default()));
        svc.create(ContactFields::new("Ivy", "1", "n"), None).await.unwrap();
        let jo = svc.create(ContactFields::new("Jo", "2", "n"), None).await.unwrap();

        let err = svc.update(jo.id, ContactFields::new("Ivy", "2", "n")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn search_is_case_insensitive_and_empty_on_no_match() {
        let svc = service(Arc::new(MockContactRepository::default()), Arc::new(MemoryBlobStore::default()));
        svc.create(ContactFields::new("Alice", "1", "n"), None).await.unwrap();

        assert_eq!(svc.search_by_name("alice").await.unwrap().len(), 1);
        assert_eq!(svc.search_by_name("ALI").await.unwrap().len(), 1);
        assert!(svc.search_by_name("bob").await.unwrap().is_empty());
        assert!(matches!(svc.search_by_name("").await, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn profile_picture_distinguishes_missing_image_from_missing_contact() {
        let svc = service(Arc::new(MockContactRepository::default()), Arc::new(MemoryBlobStore::default()));
        svc.create(ContactFields::new("Bob", "555", "hi"), None).await.unwrap();

        assert_eq!(svc.profile_picture("Bob").await.unwrap(), None);
        assert!(matches!(svc.profile_picture("Nobody").await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn unavailable_store_is_store_error() {
        let svc = service(Arc::new(MockContactRepository::unavailable()), Arc::new(MemoryBlobStore::default()));
        let err = svc.list().await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(_)));
        assert_eq!(err.public_message(), "Error reading all contacts");
    }
}
