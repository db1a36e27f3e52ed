//! Application state - shared across all handlers.

use std::sync::Arc;

use mindstream_core::StoreError;
use mindstream_core::ports::{
    AccessGate, AdminAuthenticator, Clock, PostNotifier, PostRepository, RateLimiter,
    SystemClock, TokenService, VisitorRegistry,
};
use mindstream_infra::{
    AdminPassword, InMemoryRateLimiter, JsonPostRepository, JsonVisitorRegistry, JwtTokenService,
    WebhookNotifier,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub visitors: Arc<dyn VisitorRegistry>,
    pub gate: Arc<dyn AccessGate>,
    pub tokens: Arc<dyn TokenService>,
    pub admin: Arc<dyn AdminAuthenticator>,
    pub notifier: Option<Arc<dyn PostNotifier>>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    /// Key rate limits on the forwarded client address.
    pub trust_proxy: bool,
}

impl AppState {
    /// Build the application state and create missing data files.
    pub async fn new(config: &AppConfig) -> Result<Self, StoreError> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let posts = JsonPostRepository::new(&config.storage.posts_file, clock.clone());
        posts.init().await?;
        let visitors = JsonVisitorRegistry::new(&config.storage.visitors_file, clock);
        visitors.init().await?;

        tracing::info!(
            posts_file = %config.storage.posts_file.display(),
            visitors_file = %config.storage.visitors_file.display(),
            "Data files ready"
        );

        let jwt = Arc::new(JwtTokenService::new(config.jwt.clone()));

        let notifier: Option<Arc<dyn PostNotifier>> = match WebhookNotifier::from_env() {
            Some(webhook) => {
                tracing::info!(url = %webhook.url(), "Post webhook configured");
                Some(Arc::new(webhook))
            }
            None => None,
        };

        tracing::info!("Application state initialized");

        Ok(Self {
            posts: Arc::new(posts),
            visitors: Arc::new(visitors),
            gate: jwt.clone(),
            tokens: jwt,
            admin: Arc::new(AdminPassword::from_env()),
            notifier,
            rate_limiter: Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone())),
            trust_proxy: config.rate_limit.trust_proxy,
        })
    }
}

#[cfg(test)]
pub mod test_support {
    //! State wired to a temp directory, a manual clock and fixed secrets.

    use std::path::Path;

    use mindstream_core::ports::{ManualClock, TokenService};
    use mindstream_infra::auth::ADMIN_ROLE;
    use mindstream_infra::{JwtConfig, RateLimitConfig};

    use super::*;

    pub const ADMIN_PASSWORD: &str = "correct horse";

    pub struct TestContext {
        pub state: AppState,
        pub clock: Arc<ManualClock>,
        jwt: Arc<JwtTokenService>,
    }

    impl TestContext {
        pub fn admin_token(&self) -> String {
            self.jwt
                .generate_token("admin", vec![ADMIN_ROLE.to_string()])
                .unwrap()
        }

        pub fn token_with_roles(&self, roles: Vec<String>) -> String {
            self.jwt.generate_token("someone", roles).unwrap()
        }
    }

    pub fn context(dir: &Path) -> TestContext {
        context_with_limit(dir, 1000)
    }

    pub fn context_with_limit(dir: &Path, max_requests: u32) -> TestContext {
        let clock = Arc::new(ManualClock::at_millis(1_700_000_000_000));
        let jwt = Arc::new(JwtTokenService::new(JwtConfig {
            secret: "test-secret".to_string(),
            expiration_hours: 1,
            issuer: "test".to_string(),
        }));

        let state = AppState {
            posts: Arc::new(JsonPostRepository::with_seed(
                dir.join("posts.json"),
                Vec::new(),
                clock.clone(),
            )),
            visitors: Arc::new(JsonVisitorRegistry::new(
                dir.join("visitors.json"),
                clock.clone(),
            )),
            gate: jwt.clone(),
            tokens: jwt.clone(),
            admin: Arc::new(AdminPassword::Plain(ADMIN_PASSWORD.to_string())),
            notifier: None,
            rate_limiter: Arc::new(InMemoryRateLimiter::new(RateLimitConfig {
                max_requests,
                window: std::time::Duration::from_secs(60),
                trust_proxy: false,
            })),
            trust_proxy: false,
        };

        TestContext { state, clock, jwt }
    }
}
