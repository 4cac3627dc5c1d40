//! Customer accounts.

use stockroom_client::model::{Customer, CustomerAction, Id, ListParams, Page};

use super::Console;
use crate::cache::keys;
use crate::error::Result;

impl Console {
    pub async fn customers(&self, params: &ListParams) -> Result<Page<Customer>> {
        let service = &self.services.customers;
        self.cache
            .fetch(keys::customers_list(params), || service.list(params))
            .await
    }

    pub async fn customer(&self, id: Id) -> Result<Customer> {
        let service = &self.services.customers;
        self.cache.fetch(keys::customer(id), || service.get(id)).await
    }

    /// Activate, deactivate or block a customer. Actions the current status
    /// does not offer are refused before any request is sent.
    pub async fn change_customer_status(
        &self,
        id: Id,
        action: CustomerAction,
    ) -> Result<Customer> {
        let customer = self.customer(id).await?;
        let message = format!(
            "{} is now {}",
            customer.name,
            action.resulting_status().to_string().to_lowercase()
        );
        self.mutate(
            &message,
            &[keys::customer(id), keys::customers()],
            self.services.customers.change_status(&customer, action),
        )
        .await
    }
}
