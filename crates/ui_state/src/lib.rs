//! Single source of truth for transient UI surfaces, the demo caller
//! identity, and the simulated monitoring block.

use std::{sync::Arc, time::Duration};

use client_core::{CallerIdentity, DemoIdentity, IdentityProvider};
use serde::Serialize;
use serde_json::Value;
use shared::domain::{DemoRole, EventId, MonitoringStatus, PanelType, ScanFrequency, TenantId};
use tokio::sync::watch;
use tracing::{debug, info};

pub mod monitoring;
pub mod overlay;

pub use monitoring::{format_relative_time, Clock, MonitoringState, SystemClock};
pub use overlay::{EvidenceDrawer, OverlayKind, Overlays, PanelState, TenantScopeSheet};

/// Progress added per tick by [`UiStore::simulate_scan`].
pub const SIMULATED_SCAN_STEP: u8 = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiState {
    pub role: DemoRole,
    pub overlays: Overlays,
    pub monitoring: MonitoringState,
}

/// Owns every piece of shared UI state. Each mutator is a single
/// `send_modify`, so subscribers never observe a half-applied transition.
///
/// The store owns the demo identity outright. Request builders only get a
/// read-only [`IdentityProvider`] view, so the role in [`UiState`] and the
/// headers on the wire always agree.
///
/// Opening one overlay kind never closes another; callers decide which
/// surfaces may coexist.
pub struct UiStore {
    state: watch::Sender<UiState>,
    identity: Arc<DemoIdentity>,
    clock: Arc<dyn Clock>,
}

impl UiStore {
    pub fn new(identity: DemoIdentity) -> Self {
        Self::with_clock(identity, Arc::new(SystemClock))
    }

    pub fn with_clock(identity: DemoIdentity, clock: Arc<dyn Clock>) -> Self {
        let identity = Arc::new(identity);
        let state = UiState {
            role: identity.role(),
            overlays: Overlays::default(),
            monitoring: MonitoringState::initial(clock.now()),
        };
        let (state, _) = watch::channel(state);
        Self {
            state,
            identity,
            clock,
        }
    }

    pub fn snapshot(&self) -> UiState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.state.subscribe()
    }

    /// Header source for an `ApiClient`; role changes still go through the store.
    pub fn identity(&self) -> Arc<dyn IdentityProvider> {
        self.identity.clone()
    }

    pub fn caller(&self) -> CallerIdentity {
        self.identity.current()
    }

    pub fn open_overlays(&self) -> Vec<OverlayKind> {
        self.state.borrow().overlays.open_kinds()
    }

    fn update(&self, op: &'static str, f: impl FnOnce(&mut UiState)) {
        self.state.send_modify(f);
        debug!(op, "ui: state updated");
    }

    // Role context

    pub fn role(&self) -> DemoRole {
        self.identity.role()
    }

    pub fn set_role(&self, role: DemoRole) {
        self.identity.set_role(role, None);
        self.update("set_role", |state| state.role = role);
    }

    pub fn set_role_and_user(&self, role: DemoRole, user: impl Into<String>) {
        self.identity.set_role(role, Some(user.into()));
        self.update("set_role", |state| state.role = role);
    }

    // Evidence drawer

    pub fn open_evidence_drawer(&self, event_id: impl Into<EventId>) {
        let drawer = EvidenceDrawer::opened(event_id.into());
        self.update("open_evidence_drawer", |state| {
            state.overlays.evidence_drawer = drawer
        });
    }

    pub fn close_evidence_drawer(&self) {
        self.update("close_evidence_drawer", |state| {
            state.overlays.evidence_drawer = EvidenceDrawer::default()
        });
    }

    // Side panel

    pub fn open_panel(
        &self,
        panel_type: PanelType,
        entity_id: impl Into<String>,
        tile_data: Option<Value>,
    ) {
        let panel = PanelState::opened(panel_type, entity_id.into(), tile_data);
        self.update("open_panel", |state| state.overlays.panel = panel);
    }

    pub fn close_panel(&self) {
        self.update("close_panel", |state| {
            state.overlays.panel = PanelState::default()
        });
    }

    // Coverage drawer

    pub fn open_coverage_drawer(&self) {
        self.update("open_coverage_drawer", |state| {
            state.overlays.coverage_drawer_open = true
        });
    }

    pub fn close_coverage_drawer(&self) {
        self.update("close_coverage_drawer", |state| {
            state.overlays.coverage_drawer_open = false
        });
    }

    // Tenant scope sheet

    pub fn open_tenant_scope_sheet(&self, tenant_id: impl Into<TenantId>) {
        let sheet = TenantScopeSheet::opened(tenant_id.into());
        self.update("open_tenant_scope_sheet", |state| {
            state.overlays.tenant_scope_sheet = sheet
        });
    }

    pub fn close_tenant_scope_sheet(&self) {
        self.update("close_tenant_scope_sheet", |state| {
            state.overlays.tenant_scope_sheet = TenantScopeSheet::default()
        });
    }

    // Command palette and run details

    pub fn toggle_command_palette(&self) {
        self.update("toggle_command_palette", |state| {
            state.overlays.command_palette_open = !state.overlays.command_palette_open
        });
    }

    pub fn open_run_details_modal(&self) {
        self.update("open_run_details_modal", |state| {
            state.overlays.run_details_modal_open = true
        });
    }

    pub fn close_run_details_modal(&self) {
        self.update("close_run_details_modal", |state| {
            state.overlays.run_details_modal_open = false
        });
    }

    // Inline expansion

    pub fn toggle_event_expanded(&self, event_id: impl Into<EventId>) {
        let event_id = event_id.into();
        self.update("toggle_event_expanded", |state| {
            state.overlays.toggle_expanded(event_id)
        });
    }

    // Monitoring

    pub fn set_monitoring_status(&self, status: MonitoringStatus) {
        self.update("set_monitoring_status", |state| {
            state.monitoring.status = status
        });
    }

    pub fn set_scan_frequency(&self, frequency: ScanFrequency) {
        self.update("set_scan_frequency", |state| {
            state.monitoring.frequency = frequency
        });
    }

    pub fn toggle_monitoring(&self) {
        self.update("toggle_monitoring", |state| state.monitoring.toggle());
    }

    pub fn start_scan(&self) {
        self.update("start_scan", |state| state.monitoring.start_scan());
        info!("monitoring: scan started");
    }

    pub fn complete_scan(&self) {
        let now = self.clock.now();
        self.update("complete_scan", |state| state.monitoring.complete_scan(now));
        info!(completed_at = %now, "monitoring: scan completed");
    }

    /// Does not check that a scan is running.
    pub fn update_scan_progress(&self, progress: u8) {
        self.update("update_scan_progress", |state| {
            state.monitoring.set_progress(progress)
        });
    }

    /// Starts a scan and advances it by [`SIMULATED_SCAN_STEP`] every `tick`
    /// until it completes. Stops early, without completing, if something
    /// else moves the status away from scanning.
    pub async fn simulate_scan(&self, tick: Duration) {
        self.start_scan();
        let mut interval = tokio::time::interval(tick.max(Duration::from_millis(1)));
        interval.tick().await;

        loop {
            interval.tick().await;
            let monitoring = self.state.borrow().monitoring.clone();
            if !monitoring.is_scanning() {
                debug!("monitoring: simulated scan interrupted");
                return;
            }
            let progress = monitoring.progress.saturating_add(SIMULATED_SCAN_STEP);
            self.update_scan_progress(progress);
            if progress >= monitoring::MAX_PROGRESS {
                self.complete_scan();
                return;
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
