use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    EntityType, EventId, EventType, EvidenceId, PropertyId, SourceType, TenantId, TenantStatus,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cik: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    pub entity_type: EntityType,
    pub status: TenantStatus,
    pub property_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_event: Option<EventSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: PropertyId,
    pub name: String,
    pub city: String,
    pub state: String,
    pub asset_class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub tenant_count: u32,
    pub events_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub tenant_id: TenantId,
    pub tenant_name: String,
    pub event_type: EventType,
    pub event_date: String,
    pub headline: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<EventMemo>,
    pub evidence_count: u32,
    #[serde(default)]
    pub properties: Vec<PropertyBadge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub id: EventId,
    pub event_type: EventType,
    pub headline: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMemo {
    pub what_was_disclosed: String,
    #[serde(default)]
    pub key_details: Vec<MemoDetail>,
    #[serde(default)]
    pub context: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why_it_matters: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_actions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub what_to_watch: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoDetail {
    pub fact: String,
    pub citation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    pub id: EvidenceId,
    pub event_id: EventId,
    pub source_type: SourceType,
    pub title: String,
    pub publisher: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyBadge {
    pub id: PropertyId,
    pub name: String,
}

// Executive layer, only populated for the exec role.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioVerdict {
    pub direction: String,
    pub magnitude: String,
    pub statement: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeBullet {
    /// 1 = requires discussion, 2 = monitor, 3 = FYI.
    pub priority: u8,
    pub text: String,
    #[serde(default)]
    pub supporting_tenant_ids: Vec<TenantId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcentrationInsight {
    pub text: String,
    #[serde(default)]
    pub affected_property_ids: Vec<PropertyId>,
    #[serde(default)]
    pub affected_tenant_ids: Vec<TenantId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusCounts {
    pub critical: u32,
    pub watch: u32,
    pub stable: u32,
    pub improving: u32,
}

impl StatusCounts {
    pub fn total(&self) -> u32 {
        self.critical + self.watch + self.stable + self.improving
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChanges {
    #[serde(default)]
    pub to_watch_or_critical: Vec<StatusChangeItem>,
    #[serde(default)]
    pub to_improving: Vec<StatusChangeItem>,
    pub unchanged: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeItem {
    pub tenant_id: TenantId,
    pub tenant_name: String,
    pub previous_status: TenantStatus,
    pub new_status: TenantStatus,
    pub event_id: EventId,
    pub event_headline: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageStatement {
    pub tenants_monitored: u32,
    pub tenants_with_disclosures: u32,
    #[serde(default)]
    pub sources: Vec<String>,
    pub as_of_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub tenants_reviewed: u32,
    pub tenants_surfaced: u32,
    pub last_review_time: String,
    pub new_since_last_review: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityTile {
    pub id: String,
    pub priority: u8,
    pub statement: String,
    pub affected_tenant_count: u32,
    pub affected_property_count: u32,
    #[serde(default)]
    pub primary_tenant_ids: Vec<TenantId>,
    #[serde(default)]
    pub primary_property_ids: Vec<PropertyId>,
    pub is_new: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterTile {
    pub id: String,
    pub statement: String,
    #[serde(default)]
    pub affected_tenant_ids: Vec<TenantId>,
    #[serde(default)]
    pub affected_property_ids: Vec<PropertyId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaDirection {
    Up,
    Down,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostureTile {
    pub status: TenantStatus,
    pub count: u32,
    pub delta: i32,
    pub delta_direction: DeltaDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyAttentionItem {
    pub id: PropertyId,
    pub name: String,
    pub city: String,
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub status: TenantStatus,
    pub issues_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionItem {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub related_tenant_ids: Vec<TenantId>,
    #[serde(default)]
    pub related_property_ids: Vec<PropertyId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BriefResponse {
    pub id: String,
    pub as_of_date: NaiveDate,
    pub headline: String,
    pub updated_at: String,
    pub status_counts: StatusCounts,
    pub status_changes: StatusChanges,
    #[serde(default)]
    pub recent_events: Vec<Event>,
    pub coverage: CoverageStatement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio_verdict: Option<PortfolioVerdict>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative_bullets: Option<Vec<NarrativeBullet>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concentration_insights: Option<Vec<ConcentrationInsight>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec_questions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_stats: Option<ReviewStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_tiles: Option<Vec<PriorityTile>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posture_tiles: Option<Vec<PostureTile>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_tiles: Option<Vec<ClusterTile>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties_attention: Option<Vec<PropertyAttentionItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<QuestionItem>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantDetailResponse {
    pub tenant: Tenant,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDetailResponse {
    pub event: Event,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub tenants: Vec<Tenant>,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl SearchResponse {
    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty() && self.properties.is_empty()
    }
}

/// Liveness report served outside the versioned API root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub database: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
