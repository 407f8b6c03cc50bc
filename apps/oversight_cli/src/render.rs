//! Text rendering for accessor payloads.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use client_core::ClientError;
use shared::protocol::{
    BriefResponse, EventDetailResponse, Evidence, HealthStatus, Property, SearchResponse, Tenant,
    TenantDetailResponse,
};
use ui_state::{format_relative_time, MonitoringState};

pub fn brief(brief: &BriefResponse) -> String {
    let mut out = String::new();
    let counts = &brief.status_counts;
    let _ = writeln!(out, "{} (as of {})", brief.headline, brief.as_of_date);
    let _ = writeln!(
        out,
        "critical {}  watch {}  stable {}  improving {}",
        counts.critical, counts.watch, counts.stable, counts.improving
    );

    let changes = &brief.status_changes;
    for change in &changes.to_watch_or_critical {
        let _ = writeln!(
            out,
            "  ▼ {}: {} -> {} ({})",
            change.tenant_name, change.previous_status, change.new_status, change.event_headline
        );
    }
    for change in &changes.to_improving {
        let _ = writeln!(
            out,
            "  ▲ {}: {} -> {} ({})",
            change.tenant_name, change.previous_status, change.new_status, change.event_headline
        );
    }
    let _ = writeln!(out, "  {} unchanged", changes.unchanged);

    if let Some(verdict) = &brief.portfolio_verdict {
        let _ = writeln!(out, "verdict: {}", verdict.statement);
    }
    for event in &brief.recent_events {
        let _ = writeln!(
            out,
            "  [{}] {} - {}",
            event.event_date, event.tenant_name, event.headline
        );
    }

    let coverage = &brief.coverage;
    let _ = write!(
        out,
        "coverage: {} tenants monitored, {} with disclosures",
        coverage.tenants_monitored, coverage.tenants_with_disclosures
    );
    if !coverage.sources.is_empty() {
        let _ = write!(out, " ({})", coverage.sources.join(", "));
    }
    out
}

pub fn tenant_line(tenant: &Tenant) -> String {
    let mut line = format!("{:<10} {:<9} {}", tenant.id, tenant.status, tenant.name);
    if let Some(ticker) = &tenant.ticker {
        let _ = write!(line, " ({ticker})");
    }
    let _ = write!(line, " - {} properties", tenant.property_count);
    line
}

pub fn tenants(tenants: &[Tenant]) -> String {
    if tenants.is_empty() {
        return "no tenants".to_string();
    }
    tenants.iter().map(tenant_line).collect::<Vec<_>>().join("\n")
}

pub fn tenant_detail(detail: &TenantDetailResponse) -> String {
    let mut out = tenant_line(&detail.tenant);
    if let Some(industry) = &detail.tenant.industry {
        let _ = write!(out, "\nindustry: {industry}");
    }
    let _ = write!(out, "\nproperties:");
    for property in &detail.properties {
        let _ = write!(out, "\n  {}", property_line(property));
    }
    let _ = write!(out, "\nevents:");
    for event in &detail.events {
        let _ = write!(out, "\n  [{}] {}", event.event_date, event.headline);
    }
    out
}

pub fn event_detail(detail: &EventDetailResponse) -> String {
    let event = &detail.event;
    let mut out = format!(
        "{} - {}\n{}\n{}",
        event.event_date, event.tenant_name, event.headline, event.summary
    );
    if let Some(memo) = &event.memo {
        let _ = write!(out, "\ndisclosed: {}", memo.what_was_disclosed);
        for detail in &memo.key_details {
            let _ = write!(out, "\n  - {} [{}]", detail.fact, detail.citation);
        }
        if let Some(why) = &memo.why_it_matters {
            let _ = write!(out, "\nwhy it matters: {why}");
        }
    }
    if !detail.evidence.is_empty() {
        let _ = write!(out, "\n{}", evidence(&detail.evidence));
    }
    out
}

pub fn evidence(items: &[Evidence]) -> String {
    if items.is_empty() {
        return "no evidence".to_string();
    }
    items
        .iter()
        .map(|item| {
            let mut line = format!("{} | {} | {}", item.date, item.publisher, item.title);
            if let Some(page) = &item.page_reference {
                let _ = write!(line, " (p. {page})");
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn property_line(property: &Property) -> String {
    format!(
        "{:<10} {} - {}, {} ({}, {} tenants, {} events)",
        property.id,
        property.name,
        property.city,
        property.state,
        property.asset_class,
        property.tenant_count,
        property.events_count
    )
}

pub fn properties(properties: &[Property]) -> String {
    if properties.is_empty() {
        return "no properties".to_string();
    }
    properties
        .iter()
        .map(property_line)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn search(results: &SearchResponse) -> String {
    if results.is_empty() {
        return "no matches".to_string();
    }
    let mut sections = Vec::new();
    if !results.tenants.is_empty() {
        sections.push(format!("tenants:\n{}", tenants(&results.tenants)));
    }
    if !results.properties.is_empty() {
        sections.push(format!("properties:\n{}", properties(&results.properties)));
    }
    sections.join("\n")
}

pub fn health(health: &HealthStatus) -> String {
    format!("api {} (database {})", health.status, health.database)
}

pub fn monitoring(state: &MonitoringState, now: DateTime<Utc>) -> String {
    let mut out = format!("monitoring {} ({})", state.status, state.frequency.label());
    if state.is_scanning() {
        let _ = write!(out, " {}%", state.progress);
    }
    let _ = write!(
        out,
        " - last scan {}, next {}",
        format_relative_time(state.last_scan_time, now),
        format_relative_time(state.next_scheduled_scan, now)
    );
    out
}

/// One-line explanation of a failed request suitable for the terminal.
pub fn describe_failure(err: &ClientError, api_url: &str) -> String {
    match err {
        ClientError::Transport(_) => {
            format!("Could not reach the oversight API at {api_url}; check API_URL/network and retry.")
        }
        ClientError::Http(api_error) => match api_error.message() {
            Some(message) => format!("API returned {}: {message}", api_error.status),
            None => format!("API returned {}", api_error.status),
        },
        ClientError::Decode(_) => "API returned a malformed response body.".to_string(),
        ClientError::Cancelled => "Request cancelled.".to_string(),
        other => format!("Request could not be built: {other}"),
    }
}

/// Request failures get [`describe_failure`]; anything local is printed with its context chain.
pub fn describe_error(err: &anyhow::Error, api_url: &str) -> String {
    match err.downcast_ref::<ClientError>() {
        Some(client_err) => describe_failure(client_err, api_url),
        None => format!("Error: {err:#}"),
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
