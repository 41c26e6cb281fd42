// Inventory endpoints: hosts and clusters
//
// `GET /api/vcenter/host` and `GET /api/vcenter/cluster`, with the
// `names` / `clusters` filters the server supports. A standalone host
// answers the host listing with a single entry describing itself.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{ClusterSummary, HostSummary};

impl ApiClient {
    /// List every host visible to this endpoint.
    ///
    /// `GET /api/vcenter/host`
    pub async fn list_hosts(&self) -> Result<Vec<HostSummary>, Error> {
        let url = self.endpoint(&["vcenter", "host"])?;
        debug!("listing hosts");
        self.get(url).await
    }

    /// List hosts whose name is exactly `name`.
    ///
    /// `GET /api/vcenter/host?names={name}`
    pub async fn find_hosts_by_name(&self, name: &str) -> Result<Vec<HostSummary>, Error> {
        let mut url = self.endpoint(&["vcenter", "host"])?;
        url.query_pairs_mut().append_pair("names", name);
        debug!(name, "looking up host by name");
        self.get(url).await
    }

    /// List the hosts that belong to a cluster.
    ///
    /// `GET /api/vcenter/host?clusters={cluster}`
    pub async fn list_cluster_hosts(&self, cluster: &str) -> Result<Vec<HostSummary>, Error> {
        let mut url = self.endpoint(&["vcenter", "host"])?;
        url.query_pairs_mut().append_pair("clusters", cluster);
        debug!(cluster, "listing cluster hosts");
        self.get(url).await
    }

    /// List clusters whose name is exactly `name`.
    ///
    /// `GET /api/vcenter/cluster?names={name}`
    pub async fn find_clusters_by_name(&self, name: &str) -> Result<Vec<ClusterSummary>, Error> {
        let mut url = self.endpoint(&["vcenter", "cluster"])?;
        url.query_pairs_mut().append_pair("names", name);
        debug!(name, "looking up cluster by name");
        self.get(url).await
    }
}
