//! Overlay surfaces and their keyed open/closed state.
//!
//! Each surface is one value; opening or closing replaces the whole value so
//! the flag and its keys can never disagree.

use serde::Serialize;
use serde_json::Value;
use shared::domain::{EventId, PanelType, TenantId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayKind {
    EvidenceDrawer,
    Panel,
    CoverageDrawer,
    TenantScopeSheet,
    CommandPalette,
    RunDetailsModal,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EvidenceDrawer {
    pub open: bool,
    pub event_id: Option<EventId>,
}

impl EvidenceDrawer {
    pub fn opened(event_id: EventId) -> Self {
        Self {
            open: true,
            event_id: Some(event_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PanelState {
    pub open: bool,
    pub panel_type: Option<PanelType>,
    pub entity_id: Option<String>,
    /// Opaque tile payload handed through to the panel renderer.
    pub tile_data: Option<Value>,
}

impl PanelState {
    pub fn opened(panel_type: PanelType, entity_id: String, tile_data: Option<Value>) -> Self {
        Self {
            open: true,
            panel_type: Some(panel_type),
            entity_id: Some(entity_id),
            tile_data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TenantScopeSheet {
    pub open: bool,
    pub tenant_id: Option<TenantId>,
}

impl TenantScopeSheet {
    pub fn opened(tenant_id: TenantId) -> Self {
        Self {
            open: true,
            tenant_id: Some(tenant_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Overlays {
    pub evidence_drawer: EvidenceDrawer,
    pub panel: PanelState,
    pub coverage_drawer_open: bool,
    pub tenant_scope_sheet: TenantScopeSheet,
    pub command_palette_open: bool,
    pub run_details_modal_open: bool,
    /// At most one event is expanded inline at a time.
    pub expanded_event_id: Option<EventId>,
}

impl Overlays {
    /// Modal-class surfaces currently marked open, in a fixed order.
    pub fn open_kinds(&self) -> Vec<OverlayKind> {
        [
            (OverlayKind::EvidenceDrawer, self.evidence_drawer.open),
            (OverlayKind::Panel, self.panel.open),
            (OverlayKind::CoverageDrawer, self.coverage_drawer_open),
            (OverlayKind::TenantScopeSheet, self.tenant_scope_sheet.open),
            (OverlayKind::CommandPalette, self.command_palette_open),
            (OverlayKind::RunDetailsModal, self.run_details_modal_open),
        ]
        .into_iter()
        .filter_map(|(kind, open)| open.then_some(kind))
        .collect()
    }

    pub fn toggle_expanded(&mut self, event_id: EventId) {
        self.expanded_event_id = match self.expanded_event_id.take() {
            Some(current) if current == event_id => None,
            _ => Some(event_id),
        };
    }

    pub fn is_expanded(&self, event_id: &EventId) -> bool {
        self.expanded_event_id.as_ref() == Some(event_id)
    }
}

#[cfg(test)]
#[path = "tests/overlay_tests.rs"]
mod tests;
