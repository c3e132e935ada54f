//! Compute resource handlers for the Nimbus cloud API.
//!
//! Provides typed structures and an asynchronous service object for
//! instances, backups, operating systems and plans, built on the shared
//! `nimbus-core` transport.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::ComputeClient;
pub use models::{
    Backup, BackupListParams, CreateInstanceRequest, Instance, InstanceListParams,
    OperatingSystem, Plan, UpdateInstanceRequest,
};

/// Convenient result alias that reuses the shared Nimbus error type.
pub type Result<T> = nimbus_core::Result<T>;
