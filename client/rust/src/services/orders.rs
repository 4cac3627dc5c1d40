//! Order endpoints, including the status workflow and notes.

use tracing::info;

use crate::client::ApiClient;
use crate::error::Result;
use crate::model::{
    AssignOrder, BulkPrint, BulkPrintResult, CreateOrder, Id, NewNote, Order, OrderFilter,
    OrderNote, Page, ShippingInfo, StatusUpdate, UpdateOrder,
};
use crate::status::OrderStatus;
use crate::validation::{require_any, require_non_empty, require_positive};

pub const ORDERS_PATH: &str = "/inventory/orders";

fn order_path(id: Id) -> String {
    format!("{ORDERS_PATH}/{id}")
}

#[derive(Clone)]
pub struct OrdersService {
    api: ApiClient,
}

impl OrdersService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, filter: &OrderFilter) -> Result<Page<Order>> {
        self.api.get_with(ORDERS_PATH, filter.to_query()).await
    }

    pub async fn get(&self, id: Id) -> Result<Order> {
        self.api.get(&order_path(id)).await
    }

    pub async fn create(&self, order: &CreateOrder) -> Result<Order> {
        require_any(&order.items, "items")?;
        for item in &order.items {
            require_positive(item.quantity, "quantity")?;
        }
        let created: Order = self.api.post(ORDERS_PATH, order).await?;
        info!(order_id = created.id, "order created");
        Ok(created)
    }

    /// Full replacement.
    pub async fn update(&self, id: Id, order: &UpdateOrder) -> Result<Order> {
        self.api.put(&order_path(id), order).await
    }

    /// Partial update; only the fields set on `order` are sent.
    pub async fn patch(&self, id: Id, order: &UpdateOrder) -> Result<Order> {
        self.api.patch(&order_path(id), order).await
    }

    pub async fn delete(&self, id: Id) -> Result<()> {
        self.api.delete(&order_path(id)).await
    }

    /// Ask the backend to move the order to `status`.
    ///
    /// No local transition check happens here; callers that hold the
    /// current status consult the transition table first.
    pub async fn update_status(&self, id: Id, status: OrderStatus) -> Result<Order> {
        let order: Order = self
            .api
            .patch(&format!("{}/status", order_path(id)), &StatusUpdate { status })
            .await?;
        info!(order_id = id, status = %order.status, "order status updated");
        Ok(order)
    }

    pub async fn assign(&self, id: Id, user_id: Id) -> Result<Order> {
        self.api
            .patch(&format!("{}/assign", order_path(id)), &AssignOrder { user_id })
            .await
    }

    pub async fn update_shipping(&self, id: Id, shipping: &ShippingInfo) -> Result<Order> {
        self.api
            .patch(&format!("{}/shipping", order_path(id)), shipping)
            .await
    }

    pub async fn bulk_print(&self, order_ids: &[Id]) -> Result<BulkPrintResult> {
        require_any(order_ids, "order ids")?;
        self.api
            .post(
                &format!("{ORDERS_PATH}/bulk-print"),
                &BulkPrint {
                    order_ids: order_ids.to_vec(),
                },
            )
            .await
    }

    pub async fn notes(&self, id: Id) -> Result<Vec<OrderNote>> {
        self.api.get(&format!("{}/notes", order_path(id))).await
    }

    pub async fn add_note(&self, id: Id, body: &str) -> Result<OrderNote> {
        require_non_empty(body, "note")?;
        self.api
            .post(
                &format!("{}/notes", order_path(id)),
                &NewNote {
                    body: body.trim().to_string(),
                },
            )
            .await
    }

    pub async fn delete_note(&self, id: Id, note_id: Id) -> Result<()> {
        self.api
            .delete(&format!("{}/notes/{note_id}", order_path(id)))
            .await
    }

    /// Spreadsheet (xlsx) of the orders matching `filter`.
    pub async fn export(&self, filter: &OrderFilter) -> Result<Vec<u8>> {
        self.api
            .get_bytes(&format!("{ORDERS_PATH}/export"), filter.to_query())
            .await
    }
}
