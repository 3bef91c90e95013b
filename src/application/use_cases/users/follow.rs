use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::users::get_profile::GetProfile;
use crate::domain::users::user::User;

pub struct Follow<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct FollowOutcome {
    pub target: User,
    pub following: bool,
}

impl<'a, R: UserRepository + ?Sized> Follow<'a, R> {
    pub async fn follow(&self, actor_id: Uuid, target: &str) -> Result<FollowOutcome, AppError> {
        let target = self.resolve_target(actor_id, target).await?;
        let changed = self.repo.follow(actor_id, target.id).await?;
        self.reload(target, true, changed).await
    }

    pub async fn unfollow(&self, actor_id: Uuid, target: &str) -> Result<FollowOutcome, AppError> {
        let target = self.resolve_target(actor_id, target).await?;
        let changed = self.repo.unfollow(actor_id, target.id).await?;
        self.reload(target, false, changed).await
    }

    async fn resolve_target(&self, actor_id: Uuid, target: &str) -> Result<User, AppError> {
        let target = GetProfile { repo: self.repo }.execute(target).await?;
        if target.id == actor_id {
            return Err(AppError::validation("you cannot follow yourself"));
        }
        Ok(target)
    }

    // Counts changed, so return the fresh profile.
    async fn reload(
        &self,
        target: User,
        following: bool,
        changed: bool,
    ) -> Result<FollowOutcome, AppError> {
        let target = if changed {
            self.repo.find_by_id(target.id).await?.unwrap_or(target)
        } else {
            target
        };
        Ok(FollowOutcome { target, following })
    }
}
