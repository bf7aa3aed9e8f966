use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::UserService;
use crate::auth::{hash_password, SignUpRequest};
use crate::error::{AppError, AppResult};
use crate::models::{ParticipationView, TaskView, User, UserUpdate};
use crate::repository::UserRepository;
use crate::upload::PhotoUpload;

/// Operations on the caller's own account.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
    bcrypt_cost: u32,
    upload_dir: PathBuf,
}

impl UserManager {
    pub fn new(repo: Arc<dyn UserRepository>, bcrypt_cost: u32, upload_dir: PathBuf) -> Self {
        Self {
            repo,
            bcrypt_cost,
            upload_dir,
        }
    }

    /// Writes the file, then records its name. If the row cannot be updated the new
    /// file is removed again, so the row never names a file that was not written.
    async fn store_photo(&self, mut user: User, photo: PhotoUpload) -> AppResult<User> {
        let path = self.upload_dir.join(&photo.file_name);
        tokio::fs::write(&path, &photo.contents).await.map_err(|err| {
            log::error!("failed to write {}: {}", path.display(), err);
            AppError::InternalServerError("failed to upload file".into())
        })?;

        let updated_at = Utc::now();
        if let Err(err) = self
            .repo
            .update_photo(user.id, &photo.file_name, updated_at)
            .await
        {
            if let Err(cleanup) = tokio::fs::remove_file(&path).await {
                log::warn!("failed to remove {}: {}", path.display(), cleanup);
            }
            return Err(err);
        }

        user.photo = photo.file_name;
        user.updated_at = updated_at;
        Ok(user)
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn get_user(&self, id: i32) -> AppResult<User> {
        self.repo.get_user(id).await
    }

    async fn update_user(&self, id: i32, request: SignUpRequest) -> AppResult<()> {
        request.credentials().check_policy()?;

        let update = UserUpdate {
            password_hash: hash_password(&request.password, self.bcrypt_cost)?,
            firstname: request.firstname,
            lastname: request.lastname,
            email: request.email,
        };
        self.repo.update_user(id, update).await
    }

    async fn delete_user(&self, id: i32) -> AppResult<()> {
        self.repo.delete_user(id).await?;
        log::info!("user {} deactivated", id);
        Ok(())
    }

    async fn restore_user(&self, id: i32) -> AppResult<()> {
        self.repo.restore_user(id).await?;
        log::info!("user {} restored", id);
        Ok(())
    }

    async fn get_projects(&self, user_id: i32) -> AppResult<Vec<ParticipationView>> {
        self.repo.get_projects(user_id).await
    }

    async fn get_tasks(&self, user_id: i32) -> AppResult<Vec<TaskView>> {
        self.repo.get_tasks(user_id).await
    }

    async fn upload_photo(&self, id: i32, photo: PhotoUpload) -> AppResult<User> {
        let user = self.repo.get_user(id).await?;
        self.store_photo(user, photo).await
    }

    async fn change_photo(&self, id: i32, photo: PhotoUpload) -> AppResult<User> {
        let user = self.repo.get_user(id).await?;

        let previous = (!user.photo.is_empty()).then(|| self.upload_dir.join(&user.photo));
        if let Some(previous) = &previous {
            if !tokio::fs::try_exists(previous).await? {
                log::error!("previous photo {} is missing", previous.display());
                return Err(AppError::NotFound("previous photo not found".into()));
            }
        }

        let user = self.store_photo(user, photo).await?;

        // The row already names the new file; only now is the old one dropped.
        if let Some(previous) = previous {
            if let Err(err) = tokio::fs::remove_file(&previous).await {
                log::error!("failed to remove {}: {}", previous.display(), err);
                return Err(match err.kind() {
                    ErrorKind::NotFound => AppError::NotFound("previous photo not found".into()),
                    _ => AppError::from(err),
                });
            }
        }

        Ok(user)
    }
}
