#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hostnet_api::models::HostConnectionState;
use hostnet_api::{ApiClient, Error, PortgroupCreateSpec, VswitchCreateSpec};

const TOKEN: &str = "b1a7e0c2d4";

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

/// Start a server and log the client in with a fixed token.
async fn logged_in() -> (MockServer, ApiClient) {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/session"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!(TOKEN)))
        .mount(&server)
        .await;

    let password = SecretString::from("VMware1!".to_string());
    client.login("root", &password).await.unwrap();
    (server, client)
}

fn networking_path(suffix: &str) -> String {
    format!("/api/esx/hosts/host-12/networking/vswitches{suffix}")
}

// ── Session tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_login_sends_basic_auth_and_stores_token() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/session"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!(TOKEN)))
        .expect(1)
        .mount(&server)
        .await;

    let password = SecretString::from("VMware1!".to_string());
    client.login("administrator@vsphere.local", &password).await.unwrap();

    assert!(client.has_session());
}

#[tokio::test]
async fn test_login_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/session"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let password = SecretString::from("wrong".to_string());
    let result = client.login("root", &password).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
    assert!(!client.has_session());
}

#[tokio::test]
async fn test_login_on_endpoint_without_api() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/session"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let password = SecretString::from("VMware1!".to_string());
    let result = client.login("root", &password).await;

    assert!(
        matches!(result, Err(Error::ApiUnavailable { .. })),
        "expected ApiUnavailable, got: {result:?}"
    );
}

#[tokio::test]
async fn test_logout_clears_session() {
    let (server, client) = logged_in().await;

    Mock::given(method("DELETE"))
        .and(path("/api/session"))
        .and(header("vmware-api-session-id", TOKEN))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.logout().await.unwrap();
    assert!(!client.has_session());
}

#[tokio::test]
async fn test_call_before_login_is_refused() {
    let (_server, client) = setup().await;

    let result = client.list_hosts().await;
    assert!(matches!(result, Err(Error::NotLoggedIn)), "got: {result:?}");
}

// ── Inventory tests ─────────────────────────────────────────────────

#[tokio::test]
async fn test_find_hosts_by_name() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/api/vcenter/host"))
        .and(query_param("names", "esx01.lab.local"))
        .and(header("vmware-api-session-id", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "host": "host-12",
            "name": "esx01.lab.local",
            "connection_state": "CONNECTED",
            "power_state": "POWERED_ON"
        }])))
        .mount(&server)
        .await;

    let hosts = client.find_hosts_by_name("esx01.lab.local").await.unwrap();

    assert_eq!(hosts.len(), 1);
    assert_eq!(hosts[0].host, "host-12");
    assert_eq!(hosts[0].connection_state, HostConnectionState::Connected);
}

#[tokio::test]
async fn test_cluster_hosts() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/api/vcenter/cluster"))
        .and(query_param("names", "Prod"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "cluster": "domain-c8", "name": "Prod" }])),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/vcenter/host"))
        .and(query_param("clusters", "domain-c8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "host": "host-12", "name": "esx01" },
            { "host": "host-13", "name": "esx02", "connection_state": "NOT_RESPONDING" }
        ])))
        .mount(&server)
        .await;

    let clusters = client.find_clusters_by_name("Prod").await.unwrap();
    let hosts = client.list_cluster_hosts(&clusters[0].cluster).await.unwrap();

    assert_eq!(hosts.len(), 2);
    assert_eq!(hosts[1].connection_state, HostConnectionState::NotResponding);
}

// ── Networking tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_get_missing_vswitch_is_none() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path(networking_path("/vSwitch1")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error_type": "NOT_FOUND",
            "messages": [{ "id": "vswitch.not_found", "default_message": "vSwitch1 not found" }]
        })))
        .mount(&server)
        .await;

    let vswitch = client.get_vswitch("host-12", "vSwitch1").await.unwrap();
    assert!(vswitch.is_none());
}

#[tokio::test]
async fn test_list_vswitches() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path(networking_path("")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "name": "vSwitch0",
            "num_ports": 128,
            "mtu": 1500,
            "security": {
                "allow_promiscuous": { "value": false },
                "forged_transmits": { "value": true },
                "mac_changes": { "value": true }
            }
        }])))
        .mount(&server)
        .await;

    let switches = client.list_vswitches("host-12").await.unwrap();

    assert_eq!(switches.len(), 1);
    assert_eq!(switches[0].num_ports, 128);
    assert!(switches[0].security.forged_transmits.value);
    assert!(!switches[0].security.allow_promiscuous.value);
}

#[tokio::test]
async fn test_create_vswitch_body() {
    let (server, client) = logged_in().await;

    Mock::given(method("POST"))
        .and(path(networking_path("")))
        .and(body_json(json!({ "name": "vSwitch1", "num_ports": 256, "mtu": 9000 })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let spec = VswitchCreateSpec {
        name: "vSwitch1".into(),
        num_ports: 256,
        mtu: 9000,
    };
    client.create_vswitch("host-12", &spec).await.unwrap();
}

#[tokio::test]
async fn test_create_portgroup_body() {
    let (server, client) = logged_in().await;

    Mock::given(method("POST"))
        .and(path(networking_path("/vSwitch1/portgroups")))
        .and(body_json(json!({ "name": "VM Network 20", "vlan_id": 20 })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let spec = PortgroupCreateSpec {
        name: "VM Network 20".into(),
        vlan_id: 20,
    };
    client.create_portgroup("host-12", "vSwitch1", &spec).await.unwrap();
}

#[tokio::test]
async fn test_update_vlan_waits_on_plain_patch() {
    let (server, client) = logged_in().await;

    Mock::given(method("PATCH"))
        .and(path(networking_path("/vSwitch0/portgroups/VM%20Network")))
        .and(body_json(json!({ "vlan_id": 30 })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client
        .update_portgroup_vlan("host-12", "vSwitch0", "VM Network", 30)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_vlan_task_returns_task_id() {
    let (server, client) = logged_in().await;

    Mock::given(method("PATCH"))
        .and(path(networking_path("/vSwitch0/portgroups/Management%20Network")))
        .and(query_param("vmw-task", "true"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!("task-481")))
        .expect(1)
        .mount(&server)
        .await;

    let task = client
        .start_portgroup_vlan_task("host-12", "vSwitch0", "Management Network", 30)
        .await
        .unwrap();
    assert_eq!(task.to_string(), "task-481");
}

#[tokio::test]
async fn test_api_error_envelope() {
    let (server, client) = logged_in().await;

    Mock::given(method("PATCH"))
        .and(path(networking_path("/vSwitch0/security")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error_type": "INVALID_ARGUMENT",
            "messages": [{ "id": "security.invalid", "default_message": "policy rejected" }]
        })))
        .mount(&server)
        .await;

    let result = client
        .update_vswitch_security("host-12", "vSwitch0", &hostnet_api::SecurityPolicy::default())
        .await;

    match result {
        Err(Error::Api { status, ref error_type, ref message }) => {
            assert_eq!(status, 400);
            assert_eq!(error_type, "INVALID_ARGUMENT");
            assert_eq!(message, "policy rejected");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

// ── VM tests ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_running_vms_and_shutdown() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/api/vcenter/vm"))
        .and(query_param("hosts", "ha-host"))
        .and(query_param("power_states", "POWERED_ON"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "vm": "vm-42", "name": "web01", "power_state": "POWERED_ON" }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/vcenter/vm/vm-42/guest/power"))
        .and(query_param("action", "shutdown"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let vms = client.list_running_vms("ha-host").await.unwrap();
    assert_eq!(vms.len(), 1);
    client.shutdown_guest(&vms[0].vm).await.unwrap();
}

// ── Transport classification ────────────────────────────────────────

#[tokio::test]
async fn test_slow_endpoint_is_a_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/session"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!(TOKEN))
                .set_delay(std::time::Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_millis(100))
        .build()
        .unwrap();
    let client = ApiClient::with_client(http, Url::parse(&server.uri()).unwrap());

    let password = SecretString::from("VMware1!".to_string());
    let err = client.login("root", &password).await.unwrap_err();
    assert!(err.is_timeout(), "got {err:?}");
    assert!(err.is_connection());
}

#[tokio::test]
async fn test_closed_port_is_a_connection_error() {
    // Bind then drop a listener so the port is known to be closed.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let base = Url::parse(&format!("http://127.0.0.1:{port}")).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base);

    let password = SecretString::from("VMware1!".to_string());
    let err = client.login("root", &password).await.unwrap_err();
    assert!(err.is_connection(), "got {err:?}");
    assert!(!err.is_timeout());
}
