use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::ports::image_storage_port::{ImageKind, ImageStorage, ImageUpload};
use crate::application::ports::user_repository::{ProfileChanges, UserRepository};
use crate::application::use_cases::images;
use crate::application::use_cases::users::get_profile::GetProfile;
use crate::domain::users::user::{self, User};

pub struct UpdateProfile<'a, R, S>
where
    R: UserRepository + ?Sized,
    S: ImageStorage + ?Sized,
{
    pub repo: &'a R,
    pub storage: &'a S,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<ImageUpload>,
}

impl<'a, R, S> UpdateProfile<'a, R, S>
where
    R: UserRepository + ?Sized,
    S: ImageStorage + ?Sized,
{
    pub async fn execute(
        &self,
        actor_id: Uuid,
        target_username: &str,
        req: UpdateProfileRequest,
    ) -> Result<User, AppError> {
        let target = GetProfile { repo: self.repo }
            .execute(target_username)
            .await?;
        if target.id != actor_id {
            return Err(AppError::forbidden("you can only edit your own profile"));
        }

        let mut changes = ProfileChanges {
            name: req.name.as_deref().map(user::normalize_name).transpose()?,
            bio: req.bio.as_deref().map(user::normalize_bio).transpose()?,
            avatar_path: None,
        };
        if let Some(avatar) = req.avatar.as_ref() {
            let stored = images::store_image(self.storage, ImageKind::Avatar, avatar).await?;
            changes.avatar_path = Some(stored.relative_path);
        }

        let updated = match self.repo.update_profile(actor_id, &changes).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                self.discard_new_avatar(&changes).await;
                return Err(AppError::not_found("user not found"));
            }
            Err(err) => {
                self.discard_new_avatar(&changes).await;
                return Err(err.into());
            }
        };

        if changes.avatar_path.is_some() {
            if let Some(old) = target.avatar_path.as_deref() {
                images::discard_image(self.storage, old).await;
            }
        }
        Ok(updated)
    }

    async fn discard_new_avatar(&self, changes: &ProfileChanges) {
        if let Some(path) = changes.avatar_path.as_deref() {
            images::discard_image(self.storage, path).await;
        }
    }
}
