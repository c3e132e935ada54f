//! Asynchronous compute service object.

use crate::models::{
    Backup, BackupListParams, BackupsEnvelope, CreateInstanceRequest, Instance, InstanceEnvelope,
    InstanceListParams, InstancesEnvelope, OperatingSystem, Plan, PlansEnvelope,
    UpdateInstanceRequest,
};
use crate::Result;
use nimbus_core::id::InstanceId;
use nimbus_core::pagination::Meta;
use nimbus_core::response::keyed_records;
use nimbus_core::Client;
use reqwest::Method;
use std::collections::BTreeMap;

/// Service object for instance, backup, OS and plan operations.
///
/// Holds a clone of the shared [`Client`]; all clones of one client share
/// configuration and pacing state.
#[derive(Clone)]
pub struct ComputeClient {
    core: Client,
}

impl ComputeClient {
    /// Wrap the shared transport core.
    #[must_use]
    pub const fn new(core: Client) -> Self {
        Self { core }
    }

    /// List instances matching the given filters.
    ///
    /// Returns the page of instances together with the pagination metadata.
    pub async fn list_instances(
        &self,
        params: &InstanceListParams,
    ) -> Result<(Vec<Instance>, Meta)> {
        let mut request = self.core.request(Method::GET, "/v2/instances")?;
        let query = params.to_query();
        if !query.is_empty() {
            request.set_query(query.as_pairs());
        }

        let response = self.core.execute::<InstancesEnvelope>(request).await?;
        Ok(match response.value {
            Some(envelope) => (envelope.instances, envelope.meta),
            None => (Vec::new(), Meta::default()),
        })
    }

    /// Fetch a single instance.
    pub async fn get_instance(&self, id: InstanceId) -> Result<Instance> {
        let path = format!("/v2/instances/{id}");
        let request = self.core.request(Method::GET, &path)?;
        let envelope: InstanceEnvelope = self.core.execute(request).await?.into_value()?;
        Ok(envelope.instance)
    }

    /// Provision a new instance.
    pub async fn create_instance(&self, payload: &CreateInstanceRequest) -> Result<Instance> {
        let request = self
            .core
            .request_json(Method::POST, "/v2/instances", payload)?;
        let envelope: InstanceEnvelope = self.core.execute(request).await?.into_value()?;
        Ok(envelope.instance)
    }

    /// Update an instance's properties.
    pub async fn update_instance(
        &self,
        id: InstanceId,
        payload: &UpdateInstanceRequest,
    ) -> Result<Instance> {
        let path = format!("/v2/instances/{id}");
        let request = self.core.request_json(Method::PATCH, &path, payload)?;
        let envelope: InstanceEnvelope = self.core.execute(request).await?.into_value()?;
        Ok(envelope.instance)
    }

    /// Destroy an instance. The response body is empty and never decoded.
    pub async fn delete_instance(&self, id: InstanceId) -> Result<()> {
        let path = format!("/v2/instances/{id}");
        let request = self.core.request(Method::DELETE, &path)?;
        self.core.execute_empty(request).await?;
        Ok(())
    }

    /// Start a stopped instance (legacy form-encoded endpoint).
    pub async fn start_instance(&self, id: InstanceId) -> Result<()> {
        self.legacy_server_action("start", id).await
    }

    /// Reboot a running instance (legacy form-encoded endpoint).
    pub async fn reboot_instance(&self, id: InstanceId) -> Result<()> {
        self.legacy_server_action("reboot", id).await
    }

    async fn legacy_server_action(&self, action: &str, id: InstanceId) -> Result<()> {
        let path = format!("/v1/server/{action}");
        let server_id = id.to_string();
        let request =
            self.core
                .request_form(Method::POST, &path, &[("server_id", server_id.as_str())])?;
        self.core.execute_empty(request).await?;
        Ok(())
    }

    /// List backups matching the given filters.
    pub async fn list_backups(&self, params: &BackupListParams) -> Result<(Vec<Backup>, Meta)> {
        let mut request = self.core.request(Method::GET, "/v2/backups")?;
        let query = params.to_query();
        if !query.is_empty() {
            request.set_query(query.as_pairs());
        }

        let response = self.core.execute::<BackupsEnvelope>(request).await?;
        Ok(match response.value {
            Some(envelope) => (envelope.backups, envelope.meta),
            None => (Vec::new(), Meta::default()),
        })
    }

    /// List the operating system catalog.
    ///
    /// The legacy endpoint answers a JSON object keyed by OS id rather than
    /// an array; records come back in ascending key order.
    pub async fn list_operating_systems(&self) -> Result<Vec<OperatingSystem>> {
        let request = self.core.request(Method::GET, "/v1/os/list")?;
        let response = self
            .core
            .execute::<BTreeMap<String, OperatingSystem>>(request)
            .await?;
        Ok(response.value.map(keyed_records).unwrap_or_default())
    }

    /// List provisioning plans.
    pub async fn list_plans(&self) -> Result<(Vec<Plan>, Meta)> {
        let request = self.core.request(Method::GET, "/v2/plans")?;
        let response = self.core.execute::<PlansEnvelope>(request).await?;
        Ok(match response.value {
            Some(envelope) => (envelope.plans, envelope.meta),
            None => (Vec::new(), Meta::default()),
        })
    }
}
