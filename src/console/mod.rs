//! Queries and mutations over the inventory backend.
//!
//! [`Console`] is what the dashboard screens call. Queries go through the
//! [`QueryCache`]; mutations call the backend once, invalidate the keys
//! whose data they changed and report the outcome to the [`Notifier`].

mod catalog;
mod customers;
mod export;
mod orders;
mod products;
mod uploads;

use std::future::Future;
use std::sync::Arc;

use stockroom_client::{Services, TransitionTable};

pub use export::write_export;
pub use catalog::Catalog;
pub use orders::BoardColumn;

use crate::cache::{QueryCache, QueryKey};
use crate::error::Result;
use crate::notify::Notifier;

#[derive(Clone)]
pub struct Console {
    services: Services,
    cache: QueryCache,
    notifier: Notifier,
    workflow: Arc<TransitionTable>,
}

impl Console {
    pub fn new(
        services: Services,
        cache: QueryCache,
        notifier: Notifier,
        workflow: TransitionTable,
    ) -> Self {
        Self {
            services,
            cache,
            notifier,
            workflow: Arc::new(workflow),
        }
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn workflow(&self) -> &TransitionTable {
        &self.workflow
    }

    /// Run a mutation: on success invalidate `keys` and notify `success`; on
    /// failure notify the error. Never retried.
    async fn mutate<T, Fut>(&self, success: &str, keys: &[QueryKey], call: Fut) -> Result<T>
    where
        Fut: Future<Output = stockroom_client::Result<T>>,
    {
        match call.await {
            Ok(value) => {
                self.invalidate_all(keys).await;
                self.notifier.success(success);
                Ok(value)
            }
            Err(err) => {
                self.notifier.error(err.message());
                Err(err.into())
            }
        }
    }

    async fn invalidate_all(&self, keys: &[QueryKey]) {
        for key in keys {
            self.cache.invalidate(key).await;
        }
    }
}
