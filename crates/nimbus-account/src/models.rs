//! Account models shared by the client and its tests.

use chrono::{DateTime, Utc};
use nimbus_core::id::{OrganizationId, UserId};
use nimbus_core::pagination::Meta;
use nimbus_core::query::QueryParams;
use serde::{Deserialize, Serialize};

/// The authenticated account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    /// Account display name.
    pub name: String,
    /// Billing e-mail address.
    pub email: String,
    /// Current balance in USD.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    /// Charges accrued since the last invoice, in USD.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_charges: Option<f64>,
    /// Timestamp of the most recent payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_payment_date: Option<DateTime<Utc>>,
}

/// A sub-user of the account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login e-mail address.
    pub email: String,
    /// Whether the user may use the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_enabled: Option<bool>,
    /// Access control entries granted to the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acls: Option<Vec<String>>,
}

/// Payload for creating a sub-user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateUserRequest {
    /// Display name.
    pub name: String,
    /// Login e-mail address.
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Whether the user may use the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_enabled: Option<bool>,
    /// Access control entries to grant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acls: Option<Vec<String>>,
}

/// Pagination parameters for user listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserListParams {
    /// Page size.
    pub per_page: Option<u32>,
    /// Opaque pagination cursor.
    pub cursor: Option<String>,
}

impl UserListParams {
    /// Assemble the query parameters for this filter.
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push_pagination(self.per_page, self.cursor.as_deref());
        params
    }
}

/// One line of the billing history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BillingHistoryEntry {
    /// Entry identifier.
    pub id: i64,
    /// Entry kind (`invoice`, `payment`, `credit`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Amount in USD; negative for payments.
    pub amount: f64,
    /// Account balance after this entry, in USD.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    /// Entry timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

/// Pagination parameters for billing history listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BillingListParams {
    /// Page size.
    pub per_page: Option<u32>,
    /// Opaque pagination cursor.
    pub cursor: Option<String>,
}

impl BillingListParams {
    /// Assemble the query parameters for this filter.
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push_pagination(self.per_page, self.cursor.as_deref());
        params
    }
}

/// An organization the account belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Organization {
    /// Organization identifier.
    pub id: OrganizationId,
    /// Display name.
    pub name: String,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<DateTime<Utc>>,
}

/// Wire envelope for the account endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AccountEnvelope {
    pub account: Account,
}

/// Wire envelope for user listings.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UsersEnvelope {
    #[serde(default)]
    pub users: Vec<User>,
    pub meta: Meta,
}

/// Wire envelope for a single user.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UserEnvelope {
    pub user: User,
}

/// Wire envelope for billing history listings.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BillingHistoryEnvelope {
    #[serde(default)]
    pub billing_history: Vec<BillingHistoryEntry>,
    pub meta: Meta,
}

/// Wire envelope for organization listings.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OrganizationsEnvelope {
    #[serde(default)]
    pub organizations: Vec<Organization>,
    pub meta: Meta,
}
