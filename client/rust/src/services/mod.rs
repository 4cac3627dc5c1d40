//! One-to-one wrappers over the REST resources.
//!
//! Services never cache; they validate obviously incomplete input, send the
//! request through a shared [`ApiClient`], and decode the answer.

mod auth;
mod catalog;
mod customers;
mod orders;
mod products;
mod uploads;

pub use auth::{AuthService, LOGIN_PATH};
pub use catalog::{
    AttributesService, BrandsService, CatalogResource, CatalogService, CategoriesService,
};
pub use customers::{CustomersService, CUSTOMERS_PATH};
pub use orders::{OrdersService, ORDERS_PATH};
pub use products::{ProductsService, PRODUCTS_PATH};
pub use uploads::{UploadsService, FILE_FIELD};

use crate::client::ApiClient;

/// Every service over one shared client.
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub orders: OrdersService,
    pub products: ProductsService,
    pub categories: CategoriesService,
    pub brands: BrandsService,
    pub attributes: AttributesService,
    pub customers: CustomersService,
    pub uploads: UploadsService,
}

impl Services {
    pub fn new(api: ApiClient) -> Self {
        Self {
            auth: AuthService::new(api.clone()),
            orders: OrdersService::new(api.clone()),
            products: ProductsService::new(api.clone()),
            categories: CategoriesService::new(api.clone()),
            brands: BrandsService::new(api.clone()),
            attributes: AttributesService::new(api.clone()),
            customers: CustomersService::new(api.clone()),
            uploads: UploadsService::new(api),
        }
    }
}
