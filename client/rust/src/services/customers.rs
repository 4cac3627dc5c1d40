//! Customer administration endpoints.

use tracing::info;

use crate::client::ApiClient;
use crate::error::{ClientError, Result};
use crate::model::{Customer, CustomerAction, Id, ListParams, Page};

pub const CUSTOMERS_PATH: &str = "/admin-shop/customers";

#[derive(Clone)]
pub struct CustomersService {
    api: ApiClient,
}

impl CustomersService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, params: &ListParams) -> Result<Page<Customer>> {
        self.api.get_with(CUSTOMERS_PATH, params.to_query()).await
    }

    pub async fn get(&self, id: Id) -> Result<Customer> {
        self.api.get(&format!("{CUSTOMERS_PATH}/{id}")).await
    }

    /// Apply a status action, refusing actions the current status does not offer.
    pub async fn change_status(
        &self,
        customer: &Customer,
        action: CustomerAction,
    ) -> Result<Customer> {
        if !customer.status.allows(action) {
            return Err(ClientError::InvalidArgument(format!(
                "cannot {} a customer that is {}",
                action.path_segment(),
                customer.status
            )));
        }
        let updated: Customer = self
            .api
            .patch(
                &format!("{CUSTOMERS_PATH}/{}/{}", customer.id, action.path_segment()),
                &serde_json::json!({}),
            )
            .await?;
        info!(customer_id = customer.id, status = %updated.status, "customer status changed");
        Ok(updated)
    }
}
