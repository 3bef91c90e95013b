use std::sync::Arc;

use crate::application::ports::image_storage_port::ImageStorage;
use crate::application::ports::tweet_repository::TweetRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::bootstrap::config::Config;
use crate::infrastructure::crypto::session_token::SessionKeys;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

pub struct AppServices {
    user_repo: Arc<dyn UserRepository>,
    tweet_repo: Arc<dyn TweetRepository>,
    image_storage: Arc<dyn ImageStorage>,
    session_keys: SessionKeys,
}

impl AppServices {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        tweet_repo: Arc<dyn TweetRepository>,
        image_storage: Arc<dyn ImageStorage>,
        session_keys: SessionKeys,
    ) -> Self {
        Self {
            user_repo,
            tweet_repo,
            image_storage,
            session_keys,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        self.services.user_repo.clone()
    }

    pub fn tweet_repo(&self) -> Arc<dyn TweetRepository> {
        self.services.tweet_repo.clone()
    }

    pub fn image_storage(&self) -> Arc<dyn ImageStorage> {
        self.services.image_storage.clone()
    }

    pub fn session_keys(&self) -> &SessionKeys {
        &self.services.session_keys
    }
}
