// Guest VM endpoints
//
// Listing powered-on VMs of a host and requesting guest OS shutdown.
// Shutdown requests return as soon as the request is accepted; the
// guest powers off on its own schedule.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::VmSummary;

impl ApiClient {
    /// List powered-on VMs running on `host`.
    ///
    /// `GET /api/vcenter/vm?hosts={host}&power_states=POWERED_ON`
    pub async fn list_running_vms(&self, host: &str) -> Result<Vec<VmSummary>, Error> {
        let mut url = self.endpoint(&["vcenter", "vm"])?;
        url.query_pairs_mut()
            .append_pair("hosts", host)
            .append_pair("power_states", "POWERED_ON");
        debug!(host, "listing running VMs");
        self.get(url).await
    }

    /// Ask the guest OS of `vm` to shut down. Does not wait for power-off.
    ///
    /// `POST /api/vcenter/vm/{vm}/guest/power?action=shutdown`
    pub async fn shutdown_guest(&self, vm: &str) -> Result<(), Error> {
        let mut url = self.endpoint(&["vcenter", "vm", vm, "guest", "power"])?;
        url.query_pairs_mut().append_pair("action", "shutdown");
        debug!(vm, "requesting guest shutdown");
        self.post(url, None::<&()>).await
    }
}
