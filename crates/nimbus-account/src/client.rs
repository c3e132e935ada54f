//! Asynchronous account service object.

use crate::models::{
    Account, AccountEnvelope, BillingHistoryEntry, BillingHistoryEnvelope, BillingListParams,
    CreateUserRequest, Organization, OrganizationsEnvelope, User, UserEnvelope, UserListParams,
    UsersEnvelope,
};
use crate::Result;
use nimbus_core::id::UserId;
use nimbus_core::pagination::Meta;
use nimbus_core::Client;
use reqwest::Method;

/// Service object for account, user, billing and organization operations.
///
/// Holds a clone of the shared [`Client`]; all clones of one client share
/// configuration and pacing state.
#[derive(Clone)]
pub struct AccountClient {
    core: Client,
}

impl AccountClient {
    /// Wrap the shared transport core.
    #[must_use]
    pub const fn new(core: Client) -> Self {
        Self { core }
    }

    /// Fetch the authenticated account.
    pub async fn get_account(&self) -> Result<Account> {
        let request = self.core.request(Method::GET, "/v2/account")?;
        let envelope: AccountEnvelope = self.core.execute(request).await?.into_value()?;
        Ok(envelope.account)
    }

    /// List sub-users.
    pub async fn list_users(&self, params: &UserListParams) -> Result<(Vec<User>, Meta)> {
        let mut request = self.core.request(Method::GET, "/v2/users")?;
        let query = params.to_query();
        if !query.is_empty() {
            request.set_query(query.as_pairs());
        }

        let response = self.core.execute::<UsersEnvelope>(request).await?;
        Ok(match response.value {
            Some(envelope) => (envelope.users, envelope.meta),
            None => (Vec::new(), Meta::default()),
        })
    }

    /// Fetch a single sub-user.
    pub async fn get_user(&self, id: UserId) -> Result<User> {
        let path = format!("/v2/users/{id}");
        let request = self.core.request(Method::GET, &path)?;
        let envelope: UserEnvelope = self.core.execute(request).await?.into_value()?;
        Ok(envelope.user)
    }

    /// Create a sub-user.
    pub async fn create_user(&self, payload: &CreateUserRequest) -> Result<User> {
        let request = self.core.request_json(Method::POST, "/v2/users", payload)?;
        let envelope: UserEnvelope = self.core.execute(request).await?.into_value()?;
        Ok(envelope.user)
    }

    /// Delete a sub-user. The response body is empty and never decoded.
    pub async fn delete_user(&self, id: UserId) -> Result<()> {
        let path = format!("/v2/users/{id}");
        let request = self.core.request(Method::DELETE, &path)?;
        self.core.execute_empty(request).await?;
        Ok(())
    }

    /// List billing history entries.
    pub async fn billing_history(
        &self,
        params: &BillingListParams,
    ) -> Result<(Vec<BillingHistoryEntry>, Meta)> {
        let mut request = self.core.request(Method::GET, "/v2/billing/history")?;
        let query = params.to_query();
        if !query.is_empty() {
            request.set_query(query.as_pairs());
        }

        let response = self.core.execute::<BillingHistoryEnvelope>(request).await?;
        Ok(match response.value {
            Some(envelope) => (envelope.billing_history, envelope.meta),
            None => (Vec::new(), Meta::default()),
        })
    }

    /// List organizations the account belongs to.
    pub async fn list_organizations(&self) -> Result<(Vec<Organization>, Meta)> {
        let request = self.core.request(Method::GET, "/v2/organizations")?;
        let response = self.core.execute::<OrganizationsEnvelope>(request).await?;
        Ok(match response.value {
            Some(envelope) => (envelope.organizations, envelope.meta),
            None => (Vec::new(), Meta::default()),
        })
    }
}
