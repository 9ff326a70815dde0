use async_trait::async_trait;
use models::errors::ModelError;
use sea_orm::DatabaseConnection;

use super::domain::{Contact, ContactFields};

/// Repository abstraction for contact persistence.
#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Contact>, ModelError>;
    async fn find_by_name(&self, contact_name: &str) -> Result<Option<Contact>, ModelError>;
    async fn insert(&self, fields: ContactFields, image_url: Option<String>) -> Result<Contact, ModelError>;
    /// Returns rows affected.
    async fn update(&self, id: i32, fields: ContactFields) -> Result<u64, ModelError>;
    /// Returns rows affected.
    async fn delete(&self, id: i32) -> Result<u64, ModelError>;
    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Contact>, ModelError>;
    /// Outer `None`: no such contact. Inner `None`: contact without image.
    async fn find_image_url(&self, contact_name: &str) -> Result<Option<Option<String>>, ModelError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmContactRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl ContactRepository for SeaOrmContactRepository {
    async fn list(&self) -> Result<Vec<Contact>, ModelError> {
        Ok(models::contact::list(&self.db).await?.into_iter().map(Contact::from).collect())
    }

    async fn find_by_name(&self, contact_name: &str) -> Result<Option<Contact>, ModelError> {
        Ok(models::contact::find_by_name(&self.db, contact_name).await?.map(Contact::from))
    }

    async fn insert(&self, fields: ContactFields, image_url: Option<String>) -> Result<Contact, ModelError> {
        let created = models::contact::create(&self.db, fields.contact_name, fields.phone_number, fields.message, image_url).await?;
        Ok(created.into())
    }

    async fn update(&self, id: i32, fields: ContactFields) -> Result<u64, ModelError> {
        models::contact::update_text_fields(&self.db, id, fields.contact_name, fields.phone_number, fields.message).await
    }

    async fn delete(&self, id: i32) -> Result<u64, ModelError> {
        models::contact::delete(&self.db, id).await
    }

    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Contact>, ModelError> {
        Ok(models::contact::search_by_name(&self.db, fragment).await?.into_iter().map(Contact::from).collect())
    }

    async fn find_image_url(&self, contact_name: &str) -> Result<Option<Option<String>>, ModelError> {
        models::contact::find_image_url(&self.db, contact_name).await
    }
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockContactRepository {
        rows: Mutex<Vec<Contact>>,
        next_id: Mutex<i32>,
        /// 模拟唯一约束；关闭后可复现检查与插入之间的竞态
        pub enforce_unique: bool,
        pub unavailable: bool,
    }

    impl MockContactRepository {
        pub fn with_unique_constraint() -> Self { Self { enforce_unique: true, ..Default::default() } }

        pub fn unavailable() -> Self { Self { unavailable: true, ..Default::default() } }

        pub fn count_named(&self, contact_name: &str) -> usize {
            self.rows.lock().unwrap().iter().filter(|c| c.contact_name == contact_name).count()
        }

        pub fn len(&self) -> usize { self.rows.lock().unwrap().len() }

        pub fn is_empty(&self) -> bool { self.len() == 0 }

        /// Insert bypassing any check, as a concurrent writer would.
        pub fn seed(&self, contact_name: &str) -> Contact {
            let mut rows = self.rows.lock().unwrap();
            let mut id = self.next_id.lock().unwrap();
            *id += 1;
            let c = Contact {
                id: *id,
                contact_name: contact_name.to_string(),
                phone_number: "000".into(),
                message: "seeded".into(),
                image_url: None,
            };
            rows.push(c.clone());
            c
        }

        fn check(&self) -> Result<(), ModelError> {
            if self.unavailable {
                return Err(ModelError::Db("connection refused".into()));
            }
            Ok(())
        }
    }

    fn required(value: Option<String>, column: &str) -> Result<String, ModelError> {
        value.ok_or_else(|| ModelError::Db(format!("NOT NULL constraint failed: contact.{column}")))
    }

    #[async_trait]
    impl ContactRepository for MockContactRepository {
        async fn list(&self) -> Result<Vec<Contact>, ModelError> {
            self.check()?;
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn find_by_name(&self, contact_name: &str) -> Result<Option<Contact>, ModelError> {
            self.check()?;
            Ok(self.rows.lock().unwrap().iter().find(|c| c.contact_name == contact_name).cloned())
        }

        async fn insert(&self, fields: ContactFields, image_url: Option<String>) -> Result<Contact, ModelError> {
            self.check()?;
            let contact_name = required(fields.contact_name, "contact_name")?;
            let phone_number = required(fields.phone_number, "phone_number")?;
            let message = required(fields.message, "message")?;
            let mut rows = self.rows.lock().unwrap();
            if self.enforce_unique && rows.iter().any(|c| c.contact_name == contact_name) {
                return Err(ModelError::Duplicate("contact.contact_name".into()));
            }
            let mut id = self.next_id.lock().unwrap();
            *id += 1;
            let c = Contact { id: *id, contact_name, phone_number, message, image_url };
            rows.push(c.clone());
            Ok(c)
        }

        async fn update(&self, id: i32, fields: ContactFields) -> Result<u64, ModelError> {
            self.check()?;
            let mut rows = self.rows.lock().unwrap();
            let Some(pos) = rows.iter().position(|c| c.id == id) else { return Ok(0) };
            let contact_name = required(fields.contact_name, "contact_name")?;
            if self.enforce_unique && rows.iter().any(|c| c.id != id && c.contact_name == contact_name) {
                return Err(ModelError::Duplicate("contact.contact_name".into()));
            }
            let row = &mut rows[pos];
            row.contact_name = contact_name;
            row.phone_number = required(fields.phone_number, "phone_number")?;
            row.message = required(fields.message, "message")?;
            Ok(1)
        }

        async fn delete(&self, id: i32) -> Result<u64, ModelError> {
            self.check()?;
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|c| c.id != id);
            Ok((before - rows.len()) as u64)
        }

        async fn search_by_name(&self, fragment: &str) -> Result<Vec<Contact>, ModelError> {
            self.check()?;
            let needle = fragment.to_lowercase();
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.contact_name.to_lowercase().contains(&needle))
                .cloned()
                .collect())
        }

        async fn find_image_url(&self, contact_name: &str) -> Result<Option<Option<String>>, ModelError> {
            Ok(self.find_by_name(contact_name).await?.map(|c| c.image_url))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn seaorm_repository_round_trip() -> anyhow::Result<()> {
        let repo = SeaOrmContactRepository { db: get_db().await? };

        let created = repo.insert(ContactFields::new("Alice", "555", "note"), Some("/uploads/1.png".into())).await?;
        assert_eq!(repo.list().await?, vec![created.clone()]);
        assert_eq!(repo.find_image_url("Alice").await?, Some(Some("/uploads/1.png".to_string())));

        assert_eq!(repo.update(created.id, ContactFields::new("Alicia", "556", "n2")).await?, 1);
        let renamed = repo.find_by_name("Alicia").await?.expect("renamed row");
        // 更新不触碰图片
        assert_eq!(renamed.image_url.as_deref(), Some("/uploads/1.png"));

        assert_eq!(repo.search_by_name("LIC").await?.len(), 1);
        assert_eq!(repo.delete(created.id).await?, 1);
        assert!(repo.list().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn seaorm_repository_rejects_duplicate_name() -> anyhow::Result<()> {
        let repo = SeaOrmContactRepository { db: get_db().await? };
        repo.insert(ContactFields::new("Bob", "1", "a"), None).await?;
        let err = repo.insert(ContactFields::new("Bob", "2", "b"), None).await.unwrap_err();
        assert!(matches!(err, ModelError::Duplicate(_)));
        Ok(())
    }
}
