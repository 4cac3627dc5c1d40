//! Category, brand and attribute screens.
//!
//! The three taxonomies share one shape, so [`Catalog`] serves them all;
//! cache keys and messages take the resource's singular name.

use stockroom_client::model::{Attribute, Brand, Category, Id, ListParams};
use stockroom_client::services::{CatalogResource, CatalogService};

use super::Console;
use crate::cache::keys;
use crate::error::Result;

/// Queries and mutations for one catalog taxonomy.
pub struct Catalog<'a, R> {
    console: &'a Console,
    service: &'a CatalogService<R>,
}

impl Console {
    pub fn categories(&self) -> Catalog<'_, Category> {
        Catalog {
            console: self,
            service: &self.services.categories,
        }
    }

    pub fn brands(&self) -> Catalog<'_, Brand> {
        Catalog {
            console: self,
            service: &self.services.brands,
        }
    }

    pub fn attributes(&self) -> Catalog<'_, Attribute> {
        Catalog {
            console: self,
            service: &self.services.attributes,
        }
    }
}

impl<R> Catalog<'_, R>
where
    R: CatalogResource + Clone + Sync,
{
    pub async fn list(&self, params: &ListParams) -> Result<Vec<R>> {
        let service = self.service;
        self.console
            .cache
            .fetch(keys::catalog_list(R::NAME, params), || service.list(params))
            .await
    }

    pub async fn get(&self, id: Id) -> Result<R> {
        let service = self.service;
        self.console
            .cache
            .fetch(keys::catalog_item(R::NAME, id), || service.get(id))
            .await
    }

    pub async fn create(&self, input: &R::Input) -> Result<R> {
        self.console
            .mutate(
                &message(R::NAME, "created"),
                &[keys::catalog(R::NAME)],
                self.service.create(input),
            )
            .await
    }

    /// Products embed their taxonomy, so product keys are dropped too.
    pub async fn update(&self, id: Id, input: &R::Input) -> Result<R> {
        self.console
            .mutate(
                &message(R::NAME, "updated"),
                &[keys::catalog(R::NAME), keys::product_root(), keys::products()],
                self.service.update(id, input),
            )
            .await
    }

    pub async fn delete(&self, id: Id) -> Result<()> {
        self.console
            .mutate(
                &message(R::NAME, "deleted"),
                &[keys::catalog(R::NAME), keys::product_root(), keys::products()],
                self.service.delete(id),
            )
            .await
    }
}

fn message(name: &str, verb: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => format!("{}{} {verb}", first.to_uppercase(), chars.as_str()),
        None => verb.to_string(),
    }
}
