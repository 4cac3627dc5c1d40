//! Category, brand and attribute endpoints.
//!
//! The three taxonomies share one CRUD shape under `/inventory/product/`,
//! so a single generic service serves all of them.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::ApiClient;
use crate::error::Result;
use crate::model::{
    Attribute, AttributeInput, Brand, BrandInput, Category, CategoryInput, Id, ListParams,
};
use crate::validation::require_non_empty;

/// A taxonomy record served under `/inventory/product/<segment>`.
pub trait CatalogResource: DeserializeOwned + Send + 'static {
    type Input: Serialize + Send + Sync;

    /// Collection path.
    const PATH: &'static str;

    /// Singular name for messages and cache keys.
    const NAME: &'static str;

    fn validate(input: &Self::Input) -> Result<()>;
}

impl CatalogResource for Category {
    type Input = CategoryInput;
    const PATH: &'static str = "/inventory/product/categories";
    const NAME: &'static str = "category";

    fn validate(input: &CategoryInput) -> Result<()> {
        require_non_empty(&input.name, "name")
    }
}

impl CatalogResource for Brand {
    type Input = BrandInput;
    const PATH: &'static str = "/inventory/product/brands";
    const NAME: &'static str = "brand";

    fn validate(input: &BrandInput) -> Result<()> {
        require_non_empty(&input.name, "name")
    }
}

impl CatalogResource for Attribute {
    type Input = AttributeInput;
    const PATH: &'static str = "/inventory/product/attributes";
    const NAME: &'static str = "attribute";

    fn validate(input: &AttributeInput) -> Result<()> {
        require_non_empty(&input.name, "name")?;
        for value in &input.values {
            require_non_empty(value, "attribute value")?;
        }
        Ok(())
    }
}

pub struct CatalogService<R> {
    api: ApiClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for CatalogService<R> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: CatalogResource> CatalogService<R> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            _resource: PhantomData,
        }
    }

    fn item_path(id: Id) -> String {
        format!("{}/{id}", R::PATH)
    }

    pub async fn list(&self, params: &ListParams) -> Result<Vec<R>> {
        self.api.get_with(R::PATH, params.to_query()).await
    }

    pub async fn get(&self, id: Id) -> Result<R> {
        self.api.get(&Self::item_path(id)).await
    }

    pub async fn create(&self, input: &R::Input) -> Result<R> {
        R::validate(input)?;
        self.api.post(R::PATH, input).await
    }

    pub async fn update(&self, id: Id, input: &R::Input) -> Result<R> {
        R::validate(input)?;
        self.api.put(&Self::item_path(id), input).await
    }

    pub async fn delete(&self, id: Id) -> Result<()> {
        self.api.delete(&Self::item_path(id)).await
    }
}

pub type CategoriesService = CatalogService<Category>;
pub type BrandsService = CatalogService<Brand>;
pub type AttributesService = CatalogService<Attribute>;
