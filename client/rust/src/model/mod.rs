//! Wire records for the inventory API.
//!
//! Records are plain data with optional fields; the backend owns every
//! invariant except the order status workflow (see [`crate::status`]).

mod auth;
mod catalog;
mod common;
mod customer;
mod order;
mod product;
mod upload;

pub use auth::{LoginRequest, LoginResponse, User};
pub use catalog::{Attribute, AttributeInput, Brand, BrandInput, Category, CategoryInput};
pub use common::{Id, ListParams, Page};
pub use customer::{Customer, CustomerAction, CustomerStatus};
pub use order::{
    AssignOrder, BulkPrint, BulkPrintResult, CreateOrder, NewNote, Order, OrderCustomer,
    OrderFilter, OrderItem, OrderNote, ShippingInfo, StatusUpdate, UpdateOrder,
};
pub use product::{
    Product, ProductInput, StockAdjustment, StockCount, Variant, VariantAttribute, VariantInput,
};
pub use upload::{DeleteImage, DeleteImages, ImageOptions, ImageVariant, UploadedImage};
