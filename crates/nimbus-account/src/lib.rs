//! Account resource handlers for the Nimbus cloud API.
//!
//! Provides typed structures and an asynchronous service object for the
//! account itself, sub-users, billing history and organizations, built on
//! the shared `nimbus-core` transport.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::AccountClient;
pub use models::{
    Account, BillingHistoryEntry, BillingListParams, CreateUserRequest, Organization, User,
    UserListParams,
};

/// Convenient result alias that reuses the shared Nimbus error type.
pub type Result<T> = nimbus_core::Result<T>;
