//! User record service
//!
//! Sole owner of the user collection. Every operation reads the current
//! document, works on that copy and persists it only on success, so a failed
//! operation never changes the stored collection. Mutations hold the
//! context's write lock for their whole read-modify-write.

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::services::StoreContext;
use crate::types::{User, UserDocument, UserFormData};

/// User record service
pub struct UserService {
    ctx: Arc<StoreContext>,
}

impl UserService {
    /// Create a user service instance
    #[must_use]
    pub fn new(ctx: Arc<StoreContext>) -> Self {
        Self { ctx }
    }

    #[must_use]
    pub fn context(&self) -> &Arc<StoreContext> {
        &self.ctx
    }

    // ===== Queries =====

    /// List all users in insertion order
    pub async fn list_users(&self) -> CoreResult<Vec<User>> {
        Ok(self.ctx.read_document().await?.users)
    }

    /// Get user based on ID
    pub async fn get_user(&self, id: &str) -> CoreResult<Option<User>> {
        let document = self.ctx.read_document().await?;
        Ok(document.find_by_id(id).cloned())
    }

    /// Get user by email, ignoring case
    pub async fn find_user_by_email(&self, email: &str) -> CoreResult<Option<User>> {
        let document = self.ctx.read_document().await?;
        Ok(document.find_by_email(email).cloned())
    }

    // ===== Mutations =====

    /// Create a user with a freshly generated ID
    pub async fn create_user(&self, form: UserFormData) -> CoreResult<User> {
        let _guard = self.ctx.lock_writes().await;
        let mut document = self.ctx.read_document().await?;

        if document.find_by_email(&form.email).is_some() {
            return Err(CoreError::DuplicateEmail(form.email));
        }

        let user = User::from_form(Self::generate_id(&document), form);
        document.users.push(user.clone());
        self.ctx.write_document(&document).await?;

        log::info!("Created user {}", user.id);
        Ok(user)
    }

    /// Replace every field of a user except its ID
    pub async fn update_user(&self, id: &str, form: UserFormData) -> CoreResult<User> {
        let _guard = self.ctx.lock_writes().await;
        let mut document = self.ctx.read_document().await?;

        let pos = document
            .position_by_id(id)
            .ok_or_else(|| CoreError::UserNotFound(id.to_string()))?;

        if let Some(existing) = document.find_by_email(&form.email) {
            if existing.id != id {
                return Err(CoreError::DuplicateEmail(form.email));
            }
        }

        let user = User::from_form(id.to_string(), form);
        document.users[pos] = user.clone();
        self.ctx.write_document(&document).await?;

        log::info!("Updated user {id}");
        Ok(user)
    }

    /// Delete a user
    pub async fn delete_user(&self, id: &str) -> CoreResult<()> {
        let _guard = self.ctx.lock_writes().await;
        let mut document = self.ctx.read_document().await?;

        let pos = document
            .position_by_id(id)
            .ok_or_else(|| CoreError::UserNotFound(id.to_string()))?;

        document.users.remove(pos);
        self.ctx.write_document(&document).await?;

        log::info!("Deleted user {id}");
        Ok(())
    }

    fn generate_id(document: &UserDocument) -> String {
        loop {
            let id = uuid::Uuid::new_v4().to_string();
            if document.find_by_id(&id).is_none() {
                return id;
            }
        }
    }
}
