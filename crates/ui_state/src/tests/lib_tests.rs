use super::*;
use axum::{
    http::{HeaderMap, Uri},
    Router,
};
use chrono::{DateTime, Utc};
use client_core::{ApiClient, OversightApi};
use serde_json::json;
use std::sync::Mutex;
use tokio::{net::TcpListener, sync::oneshot};

struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    fn at(raw: &str) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(raw.parse().expect("timestamp")),
        })
    }

    fn set(&self, raw: &str) {
        *self.now.lock().expect("clock lock") = raw.parse().expect("timestamp");
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }
}

fn store() -> UiStore {
    UiStore::new(DemoIdentity::default())
}

fn ts(raw: &str) -> DateTime<Utc> {
    raw.parse().expect("timestamp")
}

#[test]
fn evidence_drawer_open_then_close_clears_event_id() {
    let store = store();

    store.open_evidence_drawer("e-1");
    let drawer = store.snapshot().overlays.evidence_drawer;
    assert!(drawer.open);
    assert_eq!(drawer.event_id, Some(EventId::from("e-1")));

    store.close_evidence_drawer();
    assert_eq!(store.snapshot().overlays.evidence_drawer, EvidenceDrawer::default());
}

#[test]
fn second_open_panel_overwrites_instead_of_merging() {
    let store = store();

    store.open_panel(PanelType::Tenant, "t1", None);
    store.open_panel(PanelType::Property, "p1", Some(json!({"x": 1})));

    let panel = store.snapshot().overlays.panel;
    assert!(panel.open);
    assert_eq!(panel.panel_type, Some(PanelType::Property));
    assert_eq!(panel.entity_id.as_deref(), Some("p1"));
    assert_eq!(panel.tile_data, Some(json!({"x": 1})));
}

#[test]
fn reopening_panel_without_tile_data_drops_previous_payload() {
    let store = store();

    store.open_panel(PanelType::Priority, "tile-1", Some(json!({"priority": 1})));
    store.open_panel(PanelType::Tenant, "t1", None);

    assert_eq!(store.snapshot().overlays.panel.tile_data, None);
}

#[test]
fn close_panel_resets_every_panel_field() {
    let store = store();
    store.open_panel(PanelType::Cluster, "c1", Some(json!({"segment": "retail"})));

    store.close_panel();

    assert_eq!(store.snapshot().overlays.panel, PanelState::default());
}

#[test]
fn overlay_kinds_do_not_interfere_with_each_other() {
    let store = store();

    store.open_evidence_drawer("e-1");
    store.open_tenant_scope_sheet("t-9");
    store.open_panel(PanelType::Tenant, "t-9", None);
    store.open_coverage_drawer();
    store.close_evidence_drawer();
    store.open_run_details_modal();
    store.close_coverage_drawer();
    store.toggle_command_palette();
    store.close_tenant_scope_sheet();
    store.open_evidence_drawer("e-2");

    let overlays = store.snapshot().overlays;
    assert_eq!(overlays.evidence_drawer, EvidenceDrawer::opened(EventId::from("e-2")));
    assert_eq!(overlays.tenant_scope_sheet, TenantScopeSheet::default());
    assert_eq!(
        overlays.panel,
        PanelState::opened(PanelType::Tenant, "t-9".into(), None)
    );
    assert!(!overlays.coverage_drawer_open);
    assert!(overlays.run_details_modal_open);
    assert!(overlays.command_palette_open);
}

#[test]
fn several_modal_overlays_may_be_open_at_once() {
    let store = store();

    store.open_coverage_drawer();
    store.open_run_details_modal();

    assert_eq!(
        store.open_overlays(),
        vec![OverlayKind::CoverageDrawer, OverlayKind::RunDetailsModal]
    );
}

#[test]
fn command_palette_toggle_parity() {
    let store = store();

    for _ in 0..4 {
        store.toggle_command_palette();
    }
    assert!(!store.snapshot().overlays.command_palette_open);

    for _ in 0..3 {
        store.toggle_command_palette();
    }
    assert!(store.snapshot().overlays.command_palette_open);
}

#[test]
fn toggle_event_expanded_round_trips_and_switches() {
    let store = store();

    store.toggle_event_expanded("e-1");
    store.toggle_event_expanded("e-1");
    assert_eq!(store.snapshot().overlays.expanded_event_id, None);

    store.toggle_event_expanded("e-1");
    store.toggle_event_expanded("e-2");
    assert_eq!(
        store.snapshot().overlays.expanded_event_id,
        Some(EventId::from("e-2"))
    );
}

#[test]
fn initial_monitoring_uses_injected_clock() {
    let clock = ManualClock::at("2024-06-03T12:00:00Z");
    let store = UiStore::with_clock(DemoIdentity::default(), clock);

    let monitoring = store.snapshot().monitoring;
    assert_eq!(monitoring.status, MonitoringStatus::Active);
    assert_eq!(monitoring.last_scan_time, ts("2024-06-03T11:58:00Z"));
    assert_eq!(monitoring.next_scheduled_scan, ts("2024-06-03T12:58:00Z"));
}

#[test]
fn start_and_complete_scan_with_pinned_clock() {
    let clock = ManualClock::at("2024-06-03T12:00:00Z");
    let store = UiStore::with_clock(DemoIdentity::default(), clock.clone());

    store.toggle_monitoring();
    store.update_scan_progress(55);
    store.start_scan();
    let monitoring = store.snapshot().monitoring;
    assert_eq!(monitoring.status, MonitoringStatus::Scanning);
    assert_eq!(monitoring.progress, 0);

    clock.set("2024-06-03T12:10:00Z");
    store.complete_scan();
    let monitoring = store.snapshot().monitoring;
    assert_eq!(monitoring.status, MonitoringStatus::Active);
    assert_eq!(monitoring.progress, 100);
    assert_eq!(monitoring.last_scan_time, ts("2024-06-03T12:10:00Z"));
    assert_eq!(monitoring.next_scheduled_scan, ts("2024-06-03T13:10:00Z"));
}

#[test]
fn monitoring_setters_assign_directly() {
    let store = store();

    store.set_scan_frequency(ScanFrequency::Daily);
    store.set_monitoring_status(MonitoringStatus::Paused);
    store.toggle_monitoring();

    let monitoring = store.snapshot().monitoring;
    assert_eq!(monitoring.frequency, ScanFrequency::Daily);
    assert_eq!(monitoring.status, MonitoringStatus::Active);
}

#[test]
fn update_scan_progress_does_not_require_scanning() {
    let store = store();
    store.update_scan_progress(30);

    let monitoring = store.snapshot().monitoring;
    assert_eq!(monitoring.status, MonitoringStatus::Active);
    assert_eq!(monitoring.progress, 30);
}

#[test]
fn stores_are_isolated_from_each_other() {
    let first = store();
    let second = store();

    first.open_coverage_drawer();
    first.set_role(DemoRole::Am);

    assert!(!second.snapshot().overlays.coverage_drawer_open);
    assert_eq!(second.role(), DemoRole::Exec);
}

#[test]
fn set_role_updates_identity_and_state_together() {
    let store = store();

    store.set_role(DemoRole::Am);
    assert_eq!(store.caller().role, DemoRole::Am);
    assert_eq!(store.snapshot().role, DemoRole::Am);
    assert_eq!(store.caller().user, "Demo User");

    store.set_role_and_user(DemoRole::Exec, "Jordan");
    assert_eq!(store.caller().user, "Jordan");
    assert_eq!(store.role(), DemoRole::Exec);
}

#[test]
fn empty_display_name_keeps_previous_user() {
    let store = UiStore::new(DemoIdentity::new(DemoRole::Exec, "Jordan"));

    store.set_role_and_user(DemoRole::Am, "");

    let caller = store.caller();
    assert_eq!(caller.role, DemoRole::Am);
    assert_eq!(caller.user, "Jordan");
}

#[tokio::test]
async fn identity_handed_to_clients_follows_store_role() {
    let store = store();
    let identity = store.identity();

    store.set_role_and_user(DemoRole::Am, "Pat");
    let headers = identity.identity_headers().await.expect("headers");

    assert_eq!(store.snapshot().role, store.role());
    assert_eq!(
        headers.get("x-demo-role").and_then(|v| v.to_str().ok()),
        Some(store.snapshot().role.as_str())
    );
    assert_eq!(
        headers.get("x-demo-user").and_then(|v| v.to_str().ok()),
        Some("Pat")
    );
}

#[tokio::test]
async fn subscribers_see_each_transition_whole() {
    let store = store();
    let mut rx = store.subscribe();

    store.open_panel(PanelType::Property, "p1", None);
    rx.changed().await.expect("changed");

    let seen = rx.borrow_and_update().overlays.panel.clone();
    assert!(seen.open);
    assert_eq!(seen.entity_id.as_deref(), Some("p1"));
    assert_eq!(seen.panel_type, Some(PanelType::Property));
}

#[tokio::test]
async fn simulated_scan_runs_to_completion() {
    let clock = ManualClock::at("2024-06-03T12:00:00Z");
    let store = UiStore::with_clock(DemoIdentity::default(), clock);

    store.simulate_scan(Duration::from_millis(1)).await;

    let monitoring = store.snapshot().monitoring;
    assert_eq!(monitoring.status, MonitoringStatus::Active);
    assert_eq!(monitoring.progress, 100);
    assert_eq!(monitoring.next_scheduled_scan, ts("2024-06-03T13:00:00Z"));
}

#[tokio::test]
async fn simulated_scan_stops_when_paused_midway() {
    let store = Arc::new(store());
    let mut rx = store.subscribe();

    let runner = tokio::spawn({
        let store = Arc::clone(&store);
        async move { store.simulate_scan(Duration::from_millis(5)).await }
    });

    rx.wait_for(|state| state.monitoring.progress >= 10)
        .await
        .expect("progress");
    store.set_monitoring_status(MonitoringStatus::Paused);
    runner.await.expect("runner");

    let monitoring = store.snapshot().monitoring;
    assert_eq!(monitoring.status, MonitoringStatus::Paused);
    assert!(monitoring.progress < 100);
}

async fn spawn_delaying_api(
    seen_roles: Arc<tokio::sync::Mutex<Vec<String>>>,
    first_arrived: oneshot::Sender<()>,
) -> url::Url {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let first_arrived = Arc::new(tokio::sync::Mutex::new(Some(first_arrived)));
    let app = Router::new().fallback(move |_uri: Uri, headers: HeaderMap| {
        let seen_roles = Arc::clone(&seen_roles);
        let first_arrived = Arc::clone(&first_arrived);
        async move {
            let role = headers
                .get("x-demo-role")
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default()
                .to_string();
            seen_roles.lock().await.push(role);
            if let Some(tx) = first_arrived.lock().await.take() {
                let _ = tx.send(());
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
            "[]"
        }
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    url::Url::parse(&format!("http://{addr}")).expect("url")
}

#[tokio::test]
async fn role_switch_affects_next_request_but_not_in_flight_one() {
    let seen_roles = Arc::new(tokio::sync::Mutex::new(Vec::new()));
    let (first_tx, first_rx) = oneshot::channel();
    let base = spawn_delaying_api(Arc::clone(&seen_roles), first_tx).await;

    let store = store();
    let client = ApiClient::new(base, store.identity());

    let in_flight = tokio::spawn({
        let client = client.clone();
        async move { client.get_tenants(None).await }
    });
    first_rx.await.expect("first request arrived");

    store.set_role(DemoRole::Am);
    client.get_tenants(None).await.expect("second request");
    in_flight
        .await
        .expect("join")
        .expect("first request completes after the switch");

    let seen = seen_roles.lock().await.clone();
    assert_eq!(seen, vec!["exec".to_string(), "am".to_string()]);
}
