//! Product, variant and stock queries and mutations.

use std::path::Path;

use stockroom_client::model::{
    Id, ListParams, Page, Product, ProductInput, StockAdjustment, StockCount, Variant,
    VariantInput,
};

use super::Console;
use crate::cache::{keys, QueryKey};
use crate::error::Result;

/// Keys touched by a change to `variant`. Falls back to every product when
/// the backend does not say which product the variant belongs to.
fn variant_keys(variant: &Variant) -> [QueryKey; 2] {
    let product = match variant.product_id {
        Some(id) => keys::product(id),
        None => keys::product_root(),
    };
    [product, keys::products()]
}

impl Console {
    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub async fn products(&self, params: &ListParams) -> Result<Page<Product>> {
        let service = &self.services.products;
        self.cache
            .fetch(keys::products_list(params), || service.list(params))
            .await
    }

    pub async fn product(&self, id: Id) -> Result<Product> {
        let service = &self.services.products;
        self.cache.fetch(keys::product(id), || service.get(id)).await
    }

    pub async fn product_variants(&self, product_id: Id) -> Result<Vec<Variant>> {
        let service = &self.services.products;
        self.cache
            .fetch(keys::product_variants(product_id), || {
                service.variants(product_id)
            })
            .await
    }

    // ------------------------------------------------------------------
    // Products
    // ------------------------------------------------------------------

    pub async fn create_product(&self, input: &ProductInput) -> Result<Product> {
        self.mutate(
            "Product created",
            &[keys::products()],
            self.services.products.create(input),
        )
        .await
    }

    pub async fn update_product(&self, id: Id, input: &ProductInput) -> Result<Product> {
        self.mutate(
            "Product updated",
            &[keys::product(id), keys::products()],
            self.services.products.update(id, input),
        )
        .await
    }

    pub async fn delete_product(&self, id: Id) -> Result<()> {
        self.mutate(
            "Product deleted",
            &[keys::product(id), keys::products()],
            self.services.products.delete(id),
        )
        .await
    }

    /// Save the catalog spreadsheet to `path`. Returns bytes written.
    pub async fn export_products(&self, params: &ListParams, path: &Path) -> Result<u64> {
        self.export_to("Products", self.services.products.export(params), path)
            .await
    }

    // ------------------------------------------------------------------
    // Variants and stock
    // ------------------------------------------------------------------

    pub async fn create_variant(&self, product_id: Id, input: &VariantInput) -> Result<Variant> {
        self.mutate(
            "Variant created",
            &[keys::product(product_id), keys::products()],
            self.services.products.create_variant(product_id, input),
        )
        .await
    }

    pub async fn update_variant(&self, variant_id: Id, input: &VariantInput) -> Result<Variant> {
        self.variant_mutation(
            "Variant updated",
            self.services.products.update_variant(variant_id, input),
        )
        .await
    }

    /// The response carries no variant, so every product key is dropped.
    pub async fn delete_variant(&self, variant_id: Id) -> Result<()> {
        self.mutate(
            "Variant deleted",
            &[keys::product_root(), keys::products()],
            self.services.products.delete_variant(variant_id),
        )
        .await
    }

    pub async fn adjust_stock(
        &self,
        variant_id: Id,
        adjustment: &StockAdjustment,
    ) -> Result<Variant> {
        self.variant_mutation(
            "Stock adjusted",
            self.services.products.adjust_stock(variant_id, adjustment),
        )
        .await
    }

    pub async fn count_stock(&self, variant_id: Id, count: &StockCount) -> Result<Variant> {
        self.variant_mutation(
            "Stock count recorded",
            self.services.products.count_stock(variant_id, count),
        )
        .await
    }

    async fn variant_mutation<Fut>(&self, success: &str, call: Fut) -> Result<Variant>
    where
        Fut: std::future::Future<Output = stockroom_client::Result<Variant>>,
    {
        match call.await {
            Ok(variant) => {
                self.invalidate_all(&variant_keys(&variant)).await;
                self.notifier.success(success);
                Ok(variant)
            }
            Err(err) => {
                self.notifier.error(err.message());
                Err(err.into())
            }
        }
    }
}
