//! Application wiring.
//!
//! ```text
//! [Config] -> [SessionStore] <-- token / 401 --> [ApiClient] -> [Services]
//!                  |                                               |
//!                  v                                               v
//!            [Navigator] <-- [AuthFlow] --> [QueryCache] <-- [Console]
//! ```
//!
//! One [`App`] per process. The session store is both the API client's
//! token provider and its 401 observer, so an expired token clears the
//! session before the failing call returns.

use std::sync::Arc;

use stockroom_client::{ApiClient, ApiTransport, Services};
use tracing::info;

use crate::cache::QueryCache;
use crate::config::Config;
use crate::console::Console;
use crate::error::Result;
use crate::notify::Notifier;
use crate::routes::{AuthFlow, Navigator};
use crate::session::{FileSessionStorage, SessionStorage, SessionStore};

#[derive(Clone)]
pub struct App {
    config: Config,
    session: Arc<SessionStore>,
    navigator: Arc<Navigator>,
    console: Console,
    flow: AuthFlow,
    notifier: Notifier,
}

impl App {
    /// Wire the application over HTTP with a file-backed session.
    pub fn new(config: Config) -> Result<Self> {
        let api = ApiClient::http(config.api.transport())?;
        let storage = Arc::new(FileSessionStorage::new(config.session.storage_path.clone()));
        Self::assemble(config, api, storage)
    }

    /// Wire the application over any transport and session storage.
    pub fn with_transport(
        config: Config,
        transport: Arc<dyn ApiTransport>,
        storage: Arc<dyn SessionStorage>,
    ) -> Result<Self> {
        Self::assemble(config, ApiClient::new(transport), storage)
    }

    fn assemble(config: Config, api: ApiClient, storage: Arc<dyn SessionStorage>) -> Result<Self> {
        let workflow = config.workflow.table()?;
        let session = Arc::new(SessionStore::new(storage, &config.session.storage_key));

        let api = api.with_token_provider(session.clone());
        api.subscribe_unauthorized(session.clone());

        let services = Services::new(api);
        let cache = QueryCache::new(&config.cache);
        let notifier = Notifier::default();
        let navigator = Arc::new(Navigator::new(session.clone()));
        let flow = AuthFlow::new(
            session.clone(),
            navigator.clone(),
            services.auth.clone(),
            cache.clone(),
            notifier.clone(),
        );
        let console = Console::new(services, cache, notifier.clone(), workflow);

        Ok(Self {
            config,
            session,
            navigator,
            console,
            flow,
            notifier,
        })
    }

    /// Read the persisted session. Route decisions wait until this has run.
    pub fn start(&self) {
        self.session.hydrate();
        info!(
            base_url = %self.config.api.base_url,
            authenticated = self.session.is_authenticated(),
            "Stockroom started"
        );
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn navigator(&self) -> &Arc<Navigator> {
        &self.navigator
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn auth(&self) -> &AuthFlow {
        &self.flow
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}
