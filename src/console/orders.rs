//! Order queries and mutations, including the status workflow.

use std::path::Path;

use stockroom_client::model::{
    BulkPrintResult, CreateOrder, Id, ListParams, Order, OrderFilter, OrderNote, Page,
    ShippingInfo, UpdateOrder,
};
use stockroom_client::OrderStatus;
use tracing::{debug, warn};

use super::Console;
use crate::cache::keys;
use crate::error::Result;

/// One Kanban column: a status and the orders currently in it.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardColumn {
    pub status: OrderStatus,
    pub orders: Vec<Order>,
}

impl Console {
    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub async fn orders(&self, filter: &OrderFilter) -> Result<Page<Order>> {
        let service = &self.services.orders;
        self.cache
            .fetch(keys::orders_list(filter), || service.list(filter))
            .await
    }

    pub async fn order(&self, id: Id) -> Result<Order> {
        let service = &self.services.orders;
        self.cache.fetch(keys::order(id), || service.get(id)).await
    }

    pub async fn order_notes(&self, id: Id) -> Result<Vec<OrderNote>> {
        let service = &self.services.orders;
        self.cache
            .fetch(keys::order_notes(id), || service.notes(id))
            .await
    }

    /// Orders of one list page grouped into the Kanban columns, in workflow
    /// order. Every column is present, possibly empty.
    pub async fn order_board(&self, params: &ListParams) -> Result<Vec<BoardColumn>> {
        let filter = OrderFilter {
            list: params.clone(),
            ..Default::default()
        };
        let page = self.orders(&filter).await?;
        Ok(group_by_column(page.data))
    }

    /// Statuses the order may move to next.
    pub async fn order_transitions(&self, id: Id) -> Result<Vec<OrderStatus>> {
        let order = self.order(id).await?;
        Ok(self.workflow.transitions(order.status).to_vec())
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    pub async fn create_order(&self, order: &CreateOrder) -> Result<Order> {
        self.mutate(
            "Order created",
            &[keys::orders()],
            self.services.orders.create(order),
        )
        .await
    }

    /// Replace an order (`PUT`).
    pub async fn update_order(&self, id: Id, order: &UpdateOrder) -> Result<Order> {
        self.mutate(
            "Order updated",
            &[keys::order(id), keys::orders()],
            self.services.orders.update(id, order),
        )
        .await
    }

    /// Change some fields of an order (`PATCH`).
    pub async fn patch_order(&self, id: Id, order: &UpdateOrder) -> Result<Order> {
        self.mutate(
            "Order updated",
            &[keys::order(id), keys::orders()],
            self.services.orders.patch(id, order),
        )
        .await
    }

    pub async fn delete_order(&self, id: Id) -> Result<()> {
        self.mutate(
            "Order deleted",
            &[keys::order(id), keys::orders()],
            self.services.orders.delete(id),
        )
        .await
    }

    /// Move an order to `to`.
    ///
    /// Refused locally when the transition table does not offer `to` from
    /// the order's current status. The cached order shows the new status
    /// while the request is in flight and is restored if the backend
    /// rejects it.
    pub async fn update_order_status(&self, id: Id, to: OrderStatus) -> Result<Order> {
        let key = keys::order(id);
        let previous = self.order(id).await?;

        if let Err(err) = self.workflow.check(previous.status, to) {
            self.notifier.error(err.message());
            return Err(err.into());
        }

        let mut optimistic = previous.clone();
        optimistic.status = to;
        self.cache.set(key.clone(), optimistic).await;
        debug!(order_id = id, from = %previous.status, to = %to, "Optimistic status applied");

        match self.services.orders.update_status(id, to).await {
            Ok(order) => {
                self.invalidate_all(&[key, keys::orders()]).await;
                self.notifier.success(format!(
                    "Order {} moved to {}",
                    order.reference(),
                    to.label()
                ));
                Ok(order)
            }
            Err(err) => {
                warn!(
                    order_id = id,
                    from = %previous.status,
                    to = %to,
                    error = %err,
                    "Status update rejected, rolling back"
                );
                self.cache.set(key, previous).await;
                self.cache.invalidate(&keys::orders()).await;
                self.notifier.error(err.message());
                Err(err.into())
            }
        }
    }

    /// Move an order along its primary edge (NEW -> PRINT, ... , MISSING -> NEW).
    pub async fn advance_order(&self, id: Id) -> Result<Order> {
        let order = self.order(id).await?;
        match order.status.primary_next() {
            Some(next) if self.workflow.can_transition(order.status, next) => {
                self.update_order_status(id, next).await
            }
            _ => {
                let message = format!("Order {} has no next step", order.reference());
                self.notifier.error(message.clone());
                Err(stockroom_client::ClientError::InvalidArgument(message).into())
            }
        }
    }

    pub async fn assign_order(&self, id: Id, user_id: Id) -> Result<Order> {
        self.mutate(
            "Order assigned",
            &[keys::order(id), keys::orders()],
            self.services.orders.assign(id, user_id),
        )
        .await
    }

    pub async fn update_shipping(&self, id: Id, shipping: &ShippingInfo) -> Result<Order> {
        self.mutate(
            "Shipping details saved",
            &[keys::order(id), keys::orders()],
            self.services.orders.update_shipping(id, shipping),
        )
        .await
    }

    /// Print several orders at once. The backend may move them to PRINT.
    pub async fn bulk_print(&self, ids: &[Id]) -> Result<BulkPrintResult> {
        let mut affected: Vec<_> = ids.iter().map(|id| keys::order(*id)).collect();
        affected.push(keys::orders());
        let message = format!("{} orders sent to print", ids.len());
        self.mutate(&message, &affected, self.services.orders.bulk_print(ids))
            .await
    }

    pub async fn add_order_note(&self, id: Id, body: &str) -> Result<OrderNote> {
        self.mutate(
            "Note added",
            &[keys::order(id)],
            self.services.orders.add_note(id, body),
        )
        .await
    }

    pub async fn delete_order_note(&self, id: Id, note_id: Id) -> Result<()> {
        self.mutate(
            "Note deleted",
            &[keys::order(id)],
            self.services.orders.delete_note(id, note_id),
        )
        .await
    }

    /// Save the spreadsheet of matching orders to `path`. Returns bytes written.
    pub async fn export_orders(&self, filter: &OrderFilter, path: &Path) -> Result<u64> {
        self.export_to("Orders", self.services.orders.export(filter), path)
            .await
    }
}

fn group_by_column(orders: Vec<Order>) -> Vec<BoardColumn> {
    let mut columns: Vec<BoardColumn> = OrderStatus::kanban_columns()
        .iter()
        .map(|status| BoardColumn {
            status: *status,
            orders: Vec::new(),
        })
        .collect();
    for order in orders {
        if let Some(column) = columns.iter_mut().find(|c| c.status == order.status) {
            column.orders.push(order);
        }
    }
    columns
}
