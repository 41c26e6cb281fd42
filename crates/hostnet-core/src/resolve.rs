//! Host lookup by name.

use tracing::debug;

use crate::error::CoreError;
use crate::model::Host;
use crate::session::ManagementSession;

/// How a user-supplied host name is matched against the inventory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HostMatch {
    /// The inventory name must equal the given name.
    #[default]
    Exact,
    /// The inventory name must start with the given name (`name*`). An
    /// exact hit wins over longer matches; otherwise more than one match
    /// is an error.
    Prefix,
}

/// Resolve `name` to exactly one connected host.
pub async fn resolve_host<S: ManagementSession>(
    session: &S,
    name: &str,
    mode: HostMatch,
) -> Result<Host, CoreError> {
    let candidates = match mode {
        HostMatch::Exact => session.find_hosts(name).await?,
        HostMatch::Prefix => session
            .list_hosts()
            .await?
            .into_iter()
            .filter(|h| h.name.starts_with(name))
            .collect(),
    };
    debug!(name, ?mode, matches = candidates.len(), "resolved host candidates");

    let host = pick_one(name, candidates)?;
    if !host.is_connected() {
        return Err(CoreError::HostUnavailable {
            name: host.name,
            state: host.state.to_string(),
        });
    }
    Ok(host)
}

fn pick_one(name: &str, mut candidates: Vec<Host>) -> Result<Host, CoreError> {
    if let Some(pos) = candidates.iter().position(|h| h.name == name) {
        return Ok(candidates.swap_remove(pos));
    }
    match candidates.len() {
        0 => Err(CoreError::HostNotFound {
            name: name.to_owned(),
        }),
        1 => Ok(candidates.remove(0)),
        _ => Err(CoreError::AmbiguousHost {
            pattern: name.to_owned(),
            matches: candidates.into_iter().map(|h| h.name).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::mock::Fabric;
    use crate::model::ConnectionState;

    fn fabric() -> Fabric {
        let fabric = Fabric::default();
        fabric.add_manager("vc01");
        fabric.add_host("host-1", "esx1.lab");
        fabric.add_host("host-10", "esx10.lab");
        fabric.add_host("host-11", "esx11.lab");
        fabric.add_host("host-20", "esx20.lab");
        fabric
    }

    #[tokio::test]
    async fn exact_match_ignores_longer_names() {
        let fabric = fabric();
        let session = fabric.session("vc01");

        let host = resolve_host(&session, "esx1.lab", HostMatch::Exact).await.expect("found");
        assert_eq!(host.id, "host-1");

        let err = resolve_host(&session, "esx1", HostMatch::Exact).await.expect_err("missing");
        assert_eq!(err.kind(), ErrorKind::ObjectNotFound);
    }

    #[tokio::test]
    async fn prefix_match_picks_unique_host() {
        let fabric = fabric();
        let session = fabric.session("vc01");

        let host = resolve_host(&session, "esx2", HostMatch::Prefix).await.expect("found");
        assert_eq!(host.id, "host-20");
    }

    #[tokio::test]
    async fn prefix_match_refuses_to_guess() {
        let fabric = fabric();
        let session = fabric.session("vc01");

        let err = resolve_host(&session, "esx1", HostMatch::Prefix)
            .await
            .expect_err("ambiguous");
        match err {
            CoreError::AmbiguousHost { matches, .. } => {
                assert_eq!(matches, vec!["esx1.lab", "esx10.lab", "esx11.lab"]);
            }
            other => panic!("expected AmbiguousHost, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn prefix_match_prefers_exact_name() {
        let fabric = fabric();
        let session = fabric.session("vc01");

        let host = resolve_host(&session, "esx1.lab", HostMatch::Prefix).await.expect("found");
        assert_eq!(host.id, "host-1");
    }

    #[tokio::test]
    async fn disconnected_host_is_unavailable() {
        let fabric = fabric();
        fabric.set_state("host-20", ConnectionState::NotResponding);
        let session = fabric.session("vc01");

        let err = resolve_host(&session, "esx20.lab", HostMatch::Exact)
            .await
            .expect_err("unavailable");
        assert_eq!(err.kind(), ErrorKind::ConnectionFailed);
    }
}
