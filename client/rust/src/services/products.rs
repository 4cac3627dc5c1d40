//! Product, variant and stock endpoints.

use tracing::info;

use crate::client::ApiClient;
use crate::error::Result;
use crate::model::{
    Id, ListParams, Page, Product, ProductInput, StockAdjustment, StockCount, Variant,
    VariantInput,
};
use crate::validation::{require_non_empty, require_non_negative, require_non_zero};

pub const PRODUCTS_PATH: &str = "/inventory/product";

fn product_path(id: Id) -> String {
    format!("{PRODUCTS_PATH}/{id}")
}

fn variant_path(id: Id) -> String {
    format!("{PRODUCTS_PATH}/variants/{id}")
}

fn check_product(input: &ProductInput) -> Result<()> {
    require_non_empty(&input.name, "name")?;
    require_non_negative(input.price, "price")
}

#[derive(Clone)]
pub struct ProductsService {
    api: ApiClient,
}

impl ProductsService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, params: &ListParams) -> Result<Page<Product>> {
        self.api.get_with(PRODUCTS_PATH, params.to_query()).await
    }

    pub async fn get(&self, id: Id) -> Result<Product> {
        self.api.get(&product_path(id)).await
    }

    pub async fn create(&self, input: &ProductInput) -> Result<Product> {
        check_product(input)?;
        let product: Product = self.api.post(PRODUCTS_PATH, input).await?;
        info!(product_id = product.id, "product created");
        Ok(product)
    }

    pub async fn update(&self, id: Id, input: &ProductInput) -> Result<Product> {
        check_product(input)?;
        self.api.put(&product_path(id), input).await
    }

    pub async fn delete(&self, id: Id) -> Result<()> {
        self.api.delete(&product_path(id)).await
    }

    /// Spreadsheet (xlsx) of the catalog.
    pub async fn export(&self, params: &ListParams) -> Result<Vec<u8>> {
        self.api
            .get_bytes(&format!("{PRODUCTS_PATH}/export"), params.to_query())
            .await
    }

    pub async fn variants(&self, product_id: Id) -> Result<Vec<Variant>> {
        self.api
            .get(&format!("{}/variants", product_path(product_id)))
            .await
    }

    pub async fn create_variant(&self, product_id: Id, input: &VariantInput) -> Result<Variant> {
        if let Some(stock) = input.stock {
            require_non_negative(stock, "stock")?;
        }
        self.api
            .post(&format!("{}/variants", product_path(product_id)), input)
            .await
    }

    pub async fn update_variant(&self, variant_id: Id, input: &VariantInput) -> Result<Variant> {
        self.api.put(&variant_path(variant_id), input).await
    }

    pub async fn delete_variant(&self, variant_id: Id) -> Result<()> {
        self.api.delete(&variant_path(variant_id)).await
    }

    /// Apply a relative stock movement.
    pub async fn adjust_stock(
        &self,
        variant_id: Id,
        adjustment: &StockAdjustment,
    ) -> Result<Variant> {
        require_non_zero(adjustment.quantity, "quantity")?;
        require_non_empty(&adjustment.reason, "reason")?;
        let variant: Variant = self
            .api
            .patch(&format!("{}/stock", variant_path(variant_id)), adjustment)
            .await?;
        info!(
            variant_id,
            delta = adjustment.quantity,
            stock = variant.stock,
            "stock adjusted"
        );
        Ok(variant)
    }

    /// Record a physical count; the backend sets stock to `counted`.
    pub async fn count_stock(&self, variant_id: Id, count: &StockCount) -> Result<Variant> {
        require_non_negative(count.counted, "counted")?;
        self.api
            .post(&format!("{}/stock-count", variant_path(variant_id)), count)
            .await
    }
}
