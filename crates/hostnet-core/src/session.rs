//! The management-API seam.
//!
//! Procedures are written against [`ManagementSession`] and [`Connector`]
//! rather than against `hostnet_api` directly. [`crate::http`] provides the
//! HTTP implementation; tests use an in-memory one.

use std::future::Future;

use crate::error::CoreError;
use crate::model::{Credentials, GuestVm, Host, Portgroup, SecurityPolicy, VirtualSwitch, VlanId};

/// Whether a mutating call should wait for the server to finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Block until the change is applied.
    Wait,
    /// Start the change as a server-side task and return immediately.
    Detach,
}

/// An authenticated session against one management endpoint (a manager
/// such as vCenter, or a standalone host).
pub trait ManagementSession: Send + Sync {
    /// Address this session is connected to.
    fn server(&self) -> &str;

    /// Hosts whose name is exactly `name`.
    fn find_hosts(&self, name: &str) -> impl Future<Output = Result<Vec<Host>, CoreError>> + Send;

    /// Every host visible through this endpoint.
    fn list_hosts(&self) -> impl Future<Output = Result<Vec<Host>, CoreError>> + Send;

    /// Hosts of the named cluster. Fails with `ClusterNotFound` if no such
    /// cluster exists.
    fn cluster_hosts(
        &self,
        cluster: &str,
    ) -> impl Future<Output = Result<Vec<Host>, CoreError>> + Send;

    /// The named standard switch on `host`, if present.
    fn virtual_switch(
        &self,
        host: &Host,
        name: &str,
    ) -> impl Future<Output = Result<Option<VirtualSwitch>, CoreError>> + Send;

    fn create_virtual_switch(
        &self,
        host: &Host,
        name: &str,
        num_ports: u32,
        mtu: u32,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn set_switch_security(
        &self,
        host: &Host,
        switch: &str,
        policy: &SecurityPolicy,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn portgroups(
        &self,
        host: &Host,
        switch: &str,
    ) -> impl Future<Output = Result<Vec<Portgroup>, CoreError>> + Send;

    fn create_portgroup(
        &self,
        host: &Host,
        switch: &str,
        name: &str,
        vlan: VlanId,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn set_portgroup_security(
        &self,
        host: &Host,
        switch: &str,
        portgroup: &str,
        policy: &SecurityPolicy,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Change a portgroup's VLAN. With [`Completion::Detach`] the returned
    /// value is the id of the task that was started.
    fn set_portgroup_vlan(
        &self,
        host: &Host,
        switch: &str,
        portgroup: &str,
        vlan: VlanId,
        completion: Completion,
    ) -> impl Future<Output = Result<Option<String>, CoreError>> + Send;

    /// Powered-on guests of `host`.
    fn running_vms(&self, host: &Host)
    -> impl Future<Output = Result<Vec<GuestVm>, CoreError>> + Send;

    /// Request a guest OS shutdown without waiting for power-off.
    fn shutdown_guest(&self, vm: &GuestVm) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// End the session.
    fn disconnect(self) -> impl Future<Output = Result<(), CoreError>> + Send
    where
        Self: Sized;
}

/// Opens sessions against management endpoints.
pub trait Connector: Send + Sync {
    type Session: ManagementSession;

    fn connect(
        &self,
        server: &str,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Self::Session, CoreError>> + Send;
}
