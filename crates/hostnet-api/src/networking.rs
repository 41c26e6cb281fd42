// Standard switch and portgroup endpoints
//
// Everything lives under `/api/esx/hosts/{host}/networking/vswitches`.
// Security policies are patched through a dedicated `security` sub-path
// on both switches and portgroups.

use tracing::debug;
use url::Url;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    PortgroupCreateSpec, PortgroupInfo, PortgroupUpdateSpec, SecurityPolicy, TaskId,
    VswitchCreateSpec, VswitchInfo,
};

impl ApiClient {
    fn vswitches_url(&self, host: &str, tail: &[&str]) -> Result<Url, Error> {
        let mut segments = vec!["esx", "hosts", host, "networking", "vswitches"];
        segments.extend_from_slice(tail);
        self.endpoint(&segments)
    }

    // ── Switches ─────────────────────────────────────────────────────

    /// List standard switches on a host.
    ///
    /// `GET /api/esx/hosts/{host}/networking/vswitches`
    pub async fn list_vswitches(&self, host: &str) -> Result<Vec<VswitchInfo>, Error> {
        let url = self.vswitches_url(host, &[])?;
        debug!(host, "listing vswitches");
        self.get(url).await
    }

    /// Fetch one switch by name; `None` when the host has no such switch.
    ///
    /// `GET /api/esx/hosts/{host}/networking/vswitches/{name}`
    pub async fn get_vswitch(&self, host: &str, name: &str) -> Result<Option<VswitchInfo>, Error> {
        let url = self.vswitches_url(host, &[name])?;
        debug!(host, vswitch = name, "fetching vswitch");
        self.get_optional(url).await
    }

    /// Create a standard switch.
    ///
    /// `POST /api/esx/hosts/{host}/networking/vswitches`
    pub async fn create_vswitch(&self, host: &str, spec: &VswitchCreateSpec) -> Result<(), Error> {
        let url = self.vswitches_url(host, &[])?;
        debug!(host, vswitch = %spec.name, num_ports = spec.num_ports, mtu = spec.mtu, "creating vswitch");
        self.post(url, Some(spec)).await
    }

    /// Replace a switch's security policy.
    ///
    /// `PATCH /api/esx/hosts/{host}/networking/vswitches/{name}/security`
    pub async fn update_vswitch_security(
        &self,
        host: &str,
        name: &str,
        policy: &SecurityPolicy,
    ) -> Result<(), Error> {
        let url = self.vswitches_url(host, &[name, "security"])?;
        debug!(host, vswitch = name, "updating vswitch security");
        self.patch(url, policy).await
    }

    // ── Portgroups ───────────────────────────────────────────────────

    /// List portgroups on a switch.
    ///
    /// `GET /api/esx/hosts/{host}/networking/vswitches/{vswitch}/portgroups`
    pub async fn list_portgroups(&self, host: &str, vswitch: &str) -> Result<Vec<PortgroupInfo>, Error> {
        let url = self.vswitches_url(host, &[vswitch, "portgroups"])?;
        debug!(host, vswitch, "listing portgroups");
        self.get(url).await
    }

    /// Create a portgroup on a switch.
    ///
    /// `POST /api/esx/hosts/{host}/networking/vswitches/{vswitch}/portgroups`
    pub async fn create_portgroup(
        &self,
        host: &str,
        vswitch: &str,
        spec: &PortgroupCreateSpec,
    ) -> Result<(), Error> {
        let url = self.vswitches_url(host, &[vswitch, "portgroups"])?;
        debug!(host, vswitch, portgroup = %spec.name, vlan = spec.vlan_id, "creating portgroup");
        self.post(url, Some(spec)).await
    }

    /// Replace a portgroup's security policy, inherited flags included.
    ///
    /// `PATCH .../portgroups/{portgroup}/security`
    pub async fn update_portgroup_security(
        &self,
        host: &str,
        vswitch: &str,
        portgroup: &str,
        policy: &SecurityPolicy,
    ) -> Result<(), Error> {
        let url = self.vswitches_url(host, &[vswitch, "portgroups", portgroup, "security"])?;
        debug!(host, vswitch, portgroup, "updating portgroup security");
        self.patch(url, policy).await
    }

    /// Change a portgroup's VLAN ID and wait for the change to complete.
    ///
    /// `PATCH .../portgroups/{portgroup}`
    pub async fn update_portgroup_vlan(
        &self,
        host: &str,
        vswitch: &str,
        portgroup: &str,
        vlan_id: u16,
    ) -> Result<(), Error> {
        let url = self.vswitches_url(host, &[vswitch, "portgroups", portgroup])?;
        debug!(host, vswitch, portgroup, vlan = vlan_id, "updating portgroup VLAN");
        self.patch(url, &PortgroupUpdateSpec { vlan_id }).await
    }

    /// Change a portgroup's VLAN ID as a server-side task and return the
    /// task id without waiting for it.
    ///
    /// `PATCH .../portgroups/{portgroup}?vmw-task=true`
    pub async fn start_portgroup_vlan_task(
        &self,
        host: &str,
        vswitch: &str,
        portgroup: &str,
        vlan_id: u16,
    ) -> Result<TaskId, Error> {
        let mut url = self.vswitches_url(host, &[vswitch, "portgroups", portgroup])?;
        url.query_pairs_mut().append_pair("vmw-task", "true");
        debug!(host, vswitch, portgroup, vlan = vlan_id, "starting portgroup VLAN task");
        self.patch_json(url, &PortgroupUpdateSpec { vlan_id }).await
    }
}
