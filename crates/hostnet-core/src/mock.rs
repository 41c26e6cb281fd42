//! In-memory management backend for tests.
//!
//! A [`Fabric`] holds hosts, clusters and their switches behind a shared
//! lock. Sessions opened on a manager see every host; sessions opened on a
//! host address see only that host. Every call is appended to a log so
//! tests can assert on what was (and was not) touched.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::CoreError;
use crate::model::{
    ConnectionState, Credentials, GuestVm, Host, Portgroup, SecurityPolicy, VirtualSwitch, VlanId,
};
use crate::session::{Completion, Connector, ManagementSession};

const MUTATING_OPS: [&str; 6] = [
    "create_switch",
    "switch_security",
    "create_portgroup",
    "portgroup_security",
    "set_vlan",
    "shutdown",
];

#[derive(Default)]
struct State {
    managers: HashSet<String>,
    hosts: Vec<MockHost>,
    clusters: HashMap<String, Vec<String>>,
    unreachable: HashSet<String>,
    failures: Vec<(String, Option<u16>)>,
    calls: Vec<String>,
    tasks: u32,
}

struct MockHost {
    host: Host,
    switches: Vec<MockSwitch>,
    vms: Vec<GuestVm>,
}

struct MockSwitch {
    switch: VirtualSwitch,
    portgroups: Vec<Portgroup>,
}

impl State {
    fn host_mut(&mut self, id: &str) -> &mut MockHost {
        self.hosts
            .iter_mut()
            .find(|h| h.host.id == id)
            .unwrap_or_else(|| panic!("unknown mock host {id}"))
    }

    fn switch_mut(&mut self, host_id: &str, name: &str) -> Option<&mut MockSwitch> {
        self.host_mut(host_id)
            .switches
            .iter_mut()
            .find(|s| s.switch.name == name)
    }
}

#[derive(Clone, Default)]
pub(crate) struct Fabric {
    state: Arc<Mutex<State>>,
}

impl Fabric {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("fabric lock poisoned")
    }

    // ── Setup ────────────────────────────────────────────────────────

    pub fn add_manager(&self, server: &str) {
        self.lock().managers.insert(server.to_owned());
    }

    pub fn add_host(&self, id: &str, name: &str) {
        self.lock().hosts.push(MockHost {
            host: Host {
                id: id.to_owned(),
                name: name.to_owned(),
                state: ConnectionState::Connected,
            },
            switches: Vec::new(),
            vms: Vec::new(),
        });
    }

    pub fn set_state(&self, host_id: &str, state: ConnectionState) {
        self.lock().host_mut(host_id).host.state = state;
    }

    pub fn add_cluster(&self, name: &str, host_ids: &[&str]) {
        self.lock().clusters.insert(
            name.to_owned(),
            host_ids.iter().map(|id| (*id).to_owned()).collect(),
        );
    }

    pub fn add_switch(&self, host_id: &str, switch: VirtualSwitch) {
        self.lock().host_mut(host_id).switches.push(MockSwitch {
            switch,
            portgroups: Vec::new(),
        });
    }

    pub fn add_portgroup(&self, host_id: &str, switch: &str, portgroup: Portgroup) {
        self.lock()
            .switch_mut(host_id, switch)
            .expect("mock switch exists")
            .portgroups
            .push(portgroup);
    }

    pub fn add_vm(&self, host_id: &str, vm_id: &str, name: &str) {
        self.lock().host_mut(host_id).vms.push(GuestVm {
            id: vm_id.to_owned(),
            name: name.to_owned(),
        });
    }

    pub fn set_unreachable(&self, server: &str) {
        self.lock().unreachable.insert(server.to_owned());
    }

    /// Make every call whose log line starts with `prefix` fail with a
    /// connection error.
    pub fn fail_on(&self, prefix: &str) {
        self.lock().failures.push((prefix.to_owned(), None));
    }

    /// Like [`fail_on`](Self::fail_on), but the call is rejected by the
    /// server with HTTP `status`.
    pub fn fail_with_status(&self, prefix: &str, status: u16) {
        self.lock().failures.push((prefix.to_owned(), Some(status)));
    }

    pub fn connector(&self) -> MockConnector {
        MockConnector {
            fabric: self.clone(),
        }
    }

    /// A session on `server` without going through `connect`.
    pub fn session(&self, server: &str) -> MockSession {
        MockSession {
            fabric: self.clone(),
            server: server.to_owned(),
        }
    }

    // ── Inspection ───────────────────────────────────────────────────

    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| MUTATING_OPS.iter().any(|op| c.starts_with(op)))
            .collect()
    }

    pub fn switch(&self, host_id: &str, name: &str) -> Option<VirtualSwitch> {
        self.lock()
            .switch_mut(host_id, name)
            .map(|s| s.switch.clone())
    }

    pub fn portgroups(&self, host_id: &str, switch: &str) -> Vec<Portgroup> {
        self.lock()
            .switch_mut(host_id, switch)
            .map(|s| s.portgroups.clone())
            .unwrap_or_default()
    }

    pub fn running_vm_ids(&self, host_id: &str) -> Vec<String> {
        self.lock()
            .host_mut(host_id)
            .vms
            .iter()
            .map(|vm| vm.id.clone())
            .collect()
    }
}

// ── Connector ────────────────────────────────────────────────────────

pub(crate) struct MockConnector {
    fabric: Fabric,
}

impl Connector for MockConnector {
    type Session = MockSession;

    async fn connect(&self, server: &str, _credentials: &Credentials) -> Result<MockSession, CoreError> {
        let mut state = self.fabric.lock();
        state.calls.push(format!("connect {server}"));

        let known = state.managers.contains(server) || state.hosts.iter().any(|h| h.host.name == server);
        if state.unreachable.contains(server) || !known {
            return Err(CoreError::ConnectionFailed {
                server: server.to_owned(),
                reason: "connection refused".into(),
            });
        }
        drop(state);
        Ok(self.fabric.session(server))
    }
}

// ── Session ──────────────────────────────────────────────────────────

pub(crate) struct MockSession {
    fabric: Fabric,
    server: String,
}

impl MockSession {
    /// Log the call and apply failure injection.
    fn record(&self, state: &mut State, call: String) -> Result<(), CoreError> {
        let failure = state
            .failures
            .iter()
            .find(|(prefix, _)| call.starts_with(prefix.as_str()))
            .map(|(_, status)| *status);
        state.calls.push(call);
        match failure {
            None => Ok(()),
            Some(None) => Err(CoreError::ConnectionFailed {
                server: self.server.clone(),
                reason: "injected failure".into(),
            }),
            Some(Some(status)) => Err(CoreError::Api {
                server: self.server.clone(),
                message: format!("injected HTTP {status}"),
                status: Some(status),
            }),
        }
    }

    fn visible_hosts(&self, state: &State) -> Vec<Host> {
        let manager = state.managers.contains(&self.server);
        state
            .hosts
            .iter()
            .filter(|h| manager || h.host.name == self.server)
            .map(|h| h.host.clone())
            .collect()
    }
}

impl ManagementSession for MockSession {
    fn server(&self) -> &str {
        &self.server
    }

    async fn find_hosts(&self, name: &str) -> Result<Vec<Host>, CoreError> {
        let mut state = self.fabric.lock();
        self.record(&mut state, format!("find_hosts {name}"))?;
        Ok(self
            .visible_hosts(&state)
            .into_iter()
            .filter(|h| h.name == name)
            .collect())
    }

    async fn list_hosts(&self) -> Result<Vec<Host>, CoreError> {
        let mut state = self.fabric.lock();
        self.record(&mut state, "list_hosts".into())?;
        Ok(self.visible_hosts(&state))
    }

    async fn cluster_hosts(&self, cluster: &str) -> Result<Vec<Host>, CoreError> {
        let mut state = self.fabric.lock();
        self.record(&mut state, format!("cluster_hosts {cluster}"))?;
        let ids = state
            .clusters
            .get(cluster)
            .cloned()
            .ok_or_else(|| CoreError::ClusterNotFound {
                name: cluster.to_owned(),
            })?;
        Ok(state
            .hosts
            .iter()
            .filter(|h| ids.contains(&h.host.id))
            .map(|h| h.host.clone())
            .collect())
    }

    async fn virtual_switch(&self, host: &Host, name: &str) -> Result<Option<VirtualSwitch>, CoreError> {
        let mut state = self.fabric.lock();
        self.record(&mut state, format!("get_switch {} {name}", host.id))?;
        Ok(state.switch_mut(&host.id, name).map(|s| s.switch.clone()))
    }

    async fn create_virtual_switch(
        &self,
        host: &Host,
        name: &str,
        num_ports: u32,
        mtu: u32,
    ) -> Result<(), CoreError> {
        let mut state = self.fabric.lock();
        self.record(&mut state, format!("create_switch {} {name}", host.id))?;
        if state.switch_mut(&host.id, name).is_some() {
            return Err(CoreError::Api {
                server: self.server.clone(),
                message: format!("ALREADY_EXISTS: {name}"),
                status: Some(400),
            });
        }
        state.host_mut(&host.id).switches.push(MockSwitch {
            switch: VirtualSwitch {
                name: name.to_owned(),
                num_ports,
                mtu,
                security: SecurityPolicy::default(),
            },
            portgroups: Vec::new(),
        });
        Ok(())
    }

    async fn set_switch_security(
        &self,
        host: &Host,
        switch: &str,
        policy: &SecurityPolicy,
    ) -> Result<(), CoreError> {
        let mut state = self.fabric.lock();
        self.record(&mut state, format!("switch_security {} {switch}", host.id))?;
        let target = state.switch_mut(&host.id, switch).ok_or_else(|| CoreError::SwitchNotFound {
            host: host.name.clone(),
            name: switch.to_owned(),
        })?;
        target.switch.security = *policy;
        Ok(())
    }

    async fn portgroups(&self, host: &Host, switch: &str) -> Result<Vec<Portgroup>, CoreError> {
        let mut state = self.fabric.lock();
        self.record(&mut state, format!("portgroups {} {switch}", host.id))?;
        state
            .switch_mut(&host.id, switch)
            .map(|s| s.portgroups.clone())
            .ok_or_else(|| CoreError::SwitchNotFound {
                host: host.name.clone(),
                name: switch.to_owned(),
            })
    }

    async fn create_portgroup(
        &self,
        host: &Host,
        switch: &str,
        name: &str,
        vlan: VlanId,
    ) -> Result<(), CoreError> {
        let mut state = self.fabric.lock();
        self.record(&mut state, format!("create_portgroup {} {switch} {name}", host.id))?;
        let server = self.server.clone();
        let target = state.switch_mut(&host.id, switch).ok_or_else(|| CoreError::SwitchNotFound {
            host: host.name.clone(),
            name: switch.to_owned(),
        })?;
        if target.portgroups.iter().any(|p| p.name == name) {
            return Err(CoreError::Api {
                server,
                message: format!("ALREADY_EXISTS: {name}"),
                status: Some(400),
            });
        }
        target.portgroups.push(Portgroup {
            name: name.to_owned(),
            vlan,
            security: SecurityPolicy::default(),
        });
        Ok(())
    }

    async fn set_portgroup_security(
        &self,
        host: &Host,
        switch: &str,
        portgroup: &str,
        policy: &SecurityPolicy,
    ) -> Result<(), CoreError> {
        let mut state = self.fabric.lock();
        self.record(
            &mut state,
            format!("portgroup_security {} {switch} {portgroup}", host.id),
        )?;
        let pg = find_portgroup(&mut state, &self.server, host, switch, portgroup)?;
        pg.security = *policy;
        Ok(())
    }

    async fn set_portgroup_vlan(
        &self,
        host: &Host,
        switch: &str,
        portgroup: &str,
        vlan: VlanId,
        completion: Completion,
    ) -> Result<Option<String>, CoreError> {
        let mode = match completion {
            Completion::Wait => "wait",
            Completion::Detach => "detach",
        };
        let mut state = self.fabric.lock();
        self.record(
            &mut state,
            format!("set_vlan {} {switch} {portgroup} {vlan} {mode}", host.id),
        )?;
        let pg = find_portgroup(&mut state, &self.server, host, switch, portgroup)?;
        pg.vlan = vlan;
        match completion {
            Completion::Wait => Ok(None),
            Completion::Detach => {
                state.tasks += 1;
                Ok(Some(format!("task-{}", state.tasks)))
            }
        }
    }

    async fn running_vms(&self, host: &Host) -> Result<Vec<GuestVm>, CoreError> {
        let mut state = self.fabric.lock();
        self.record(&mut state, format!("running_vms {}", host.id))?;
        Ok(state.host_mut(&host.id).vms.clone())
    }

    async fn shutdown_guest(&self, vm: &GuestVm) -> Result<(), CoreError> {
        let mut state = self.fabric.lock();
        self.record(&mut state, format!("shutdown {}", vm.id))?;
        for host in &mut state.hosts {
            host.vms.retain(|v| v.id != vm.id);
        }
        Ok(())
    }

    async fn disconnect(self) -> Result<(), CoreError> {
        let mut state = self.fabric.lock();
        self.record(&mut state, format!("disconnect {}", self.server))
    }
}

fn find_portgroup<'a>(
    state: &'a mut State,
    server: &str,
    host: &Host,
    switch: &str,
    portgroup: &str,
) -> Result<&'a mut Portgroup, CoreError> {
    state
        .switch_mut(&host.id, switch)
        .and_then(|s| s.portgroups.iter_mut().find(|p| p.name == portgroup))
        .ok_or_else(|| CoreError::Api {
            server: server.to_owned(),
            message: format!("NOT_FOUND: portgroup {portgroup}"),
            status: Some(404),
        })
}
