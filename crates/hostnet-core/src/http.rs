// ── HTTP-backed session ──
//
// Implements the session seam over `hostnet_api::ApiClient`. Every API
// error is tagged with the server it came from on the way out.

use tracing::{debug, info};
use url::Url;

use hostnet_api::{ApiClient, PortgroupCreateSpec, TransportConfig, VswitchCreateSpec};

use crate::error::CoreError;
use crate::model::{Credentials, GuestVm, Host, Portgroup, SecurityPolicy, VirtualSwitch, VlanId};
use crate::session::{Completion, Connector, ManagementSession};

/// Opens HTTPS sessions with a shared transport configuration.
#[derive(Debug, Clone, Default)]
pub struct HttpConnector {
    transport: TransportConfig,
}

impl HttpConnector {
    pub fn new(transport: TransportConfig) -> Self {
        Self { transport }
    }
}

/// Turn a bare host name or address into an endpoint URL. Explicit
/// `http://` / `https://` URLs are kept as given.
pub fn endpoint_url(server: &str) -> Result<Url, CoreError> {
    let server = server.trim();
    let raw = if server.contains("://") {
        server.to_owned()
    } else {
        format!("https://{server}")
    };
    Url::parse(&raw).map_err(|e| CoreError::InvalidInput {
        message: format!("invalid server address '{server}': {e}"),
    })
}

impl Connector for HttpConnector {
    type Session = HttpSession;

    async fn connect(&self, server: &str, credentials: &Credentials) -> Result<HttpSession, CoreError> {
        let url = endpoint_url(server)?;
        debug!(%url, user = %credentials.username, "connecting");

        let client =
            ApiClient::new(url, &self.transport).map_err(|e| CoreError::from_api(e, server))?;
        client
            .login(&credentials.username, &credentials.password)
            .await
            .map_err(|e| CoreError::from_api(e, server))?;

        info!(server, "connected");
        Ok(HttpSession {
            server: server.to_owned(),
            client,
        })
    }
}

/// A logged-in session over HTTP.
pub struct HttpSession {
    server: String,
    client: ApiClient,
}

impl HttpSession {
    fn wrap(&self, err: hostnet_api::Error) -> CoreError {
        CoreError::from_api(err, &self.server)
    }
}

impl ManagementSession for HttpSession {
    fn server(&self) -> &str {
        &self.server
    }

    async fn find_hosts(&self, name: &str) -> Result<Vec<Host>, CoreError> {
        let hosts = self
            .client
            .find_hosts_by_name(name)
            .await
            .map_err(|e| self.wrap(e))?;
        Ok(hosts.into_iter().map(Host::from).collect())
    }

    async fn list_hosts(&self) -> Result<Vec<Host>, CoreError> {
        let hosts = self.client.list_hosts().await.map_err(|e| self.wrap(e))?;
        Ok(hosts.into_iter().map(Host::from).collect())
    }

    async fn cluster_hosts(&self, cluster: &str) -> Result<Vec<Host>, CoreError> {
        let clusters = self
            .client
            .find_clusters_by_name(cluster)
            .await
            .map_err(|e| self.wrap(e))?;
        let Some(found) = clusters.into_iter().find(|c| c.name == cluster) else {
            return Err(CoreError::ClusterNotFound {
                name: cluster.to_owned(),
            });
        };
        let hosts = self
            .client
            .list_cluster_hosts(&found.cluster)
            .await
            .map_err(|e| self.wrap(e))?;
        Ok(hosts.into_iter().map(Host::from).collect())
    }

    async fn virtual_switch(&self, host: &Host, name: &str) -> Result<Option<VirtualSwitch>, CoreError> {
        let vswitch = self
            .client
            .get_vswitch(&host.id, name)
            .await
            .map_err(|e| self.wrap(e))?;
        Ok(vswitch.map(VirtualSwitch::from))
    }

    async fn create_virtual_switch(
        &self,
        host: &Host,
        name: &str,
        num_ports: u32,
        mtu: u32,
    ) -> Result<(), CoreError> {
        let spec = VswitchCreateSpec {
            name: name.to_owned(),
            num_ports,
            mtu,
        };
        self.client
            .create_vswitch(&host.id, &spec)
            .await
            .map_err(|e| self.wrap(e))
    }

    async fn set_switch_security(
        &self,
        host: &Host,
        switch: &str,
        policy: &SecurityPolicy,
    ) -> Result<(), CoreError> {
        self.client
            .update_vswitch_security(&host.id, switch, &policy.into())
            .await
            .map_err(|e| self.wrap(e))
    }

    async fn portgroups(&self, host: &Host, switch: &str) -> Result<Vec<Portgroup>, CoreError> {
        let portgroups = self
            .client
            .list_portgroups(&host.id, switch)
            .await
            .map_err(|e| self.wrap(e))?;
        Ok(portgroups.into_iter().map(Portgroup::from).collect())
    }

    async fn create_portgroup(
        &self,
        host: &Host,
        switch: &str,
        name: &str,
        vlan: VlanId,
    ) -> Result<(), CoreError> {
        let spec = PortgroupCreateSpec {
            name: name.to_owned(),
            vlan_id: vlan.get(),
        };
        self.client
            .create_portgroup(&host.id, switch, &spec)
            .await
            .map_err(|e| self.wrap(e))
    }

    async fn set_portgroup_security(
        &self,
        host: &Host,
        switch: &str,
        portgroup: &str,
        policy: &SecurityPolicy,
    ) -> Result<(), CoreError> {
        self.client
            .update_portgroup_security(&host.id, switch, portgroup, &policy.into())
            .await
            .map_err(|e| self.wrap(e))
    }

    async fn set_portgroup_vlan(
        &self,
        host: &Host,
        switch: &str,
        portgroup: &str,
        vlan: VlanId,
        completion: Completion,
    ) -> Result<Option<String>, CoreError> {
        match completion {
            Completion::Wait => {
                self.client
                    .update_portgroup_vlan(&host.id, switch, portgroup, vlan.get())
                    .await
                    .map_err(|e| self.wrap(e))?;
                Ok(None)
            }
            Completion::Detach => {
                let task = self
                    .client
                    .start_portgroup_vlan_task(&host.id, switch, portgroup, vlan.get())
                    .await
                    .map_err(|e| self.wrap(e))?;
                Ok(Some(task.0))
            }
        }
    }

    async fn running_vms(&self, host: &Host) -> Result<Vec<GuestVm>, CoreError> {
        let vms = self
            .client
            .list_running_vms(&host.id)
            .await
            .map_err(|e| self.wrap(e))?;
        Ok(vms.into_iter().map(GuestVm::from).collect())
    }

    async fn shutdown_guest(&self, vm: &GuestVm) -> Result<(), CoreError> {
        self.client
            .shutdown_guest(&vm.id)
            .await
            .map_err(|e| self.wrap(e))
    }

    async fn disconnect(self) -> Result<(), CoreError> {
        let result = self.client.logout().await.map_err(|e| self.wrap(e));
        debug!(server = %self.server, "disconnected");
        result
    }
}
