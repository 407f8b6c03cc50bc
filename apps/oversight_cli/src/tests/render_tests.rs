use super::*;
use serde_json::json;
use shared::error::ApiError;

fn tenant(id: &str, status: &str, ticker: Option<&str>) -> Tenant {
    serde_json::from_value(json!({
        "id": id,
        "name": "Acme Retail",
        "ticker": ticker,
        "entityType": "public",
        "status": status,
        "propertyCount": 3
    }))
    .expect("tenant fixture")
}

fn property() -> Property {
    serde_json::from_value(json!({
        "id": "p-1",
        "name": "Harbor Point",
        "city": "Austin",
        "state": "TX",
        "assetClass": "Retail",
        "tenantCount": 4,
        "eventsCount": 2
    }))
    .expect("property fixture")
}

fn brief_fixture() -> BriefResponse {
    serde_json::from_value(json!({
        "id": "b-1",
        "asOfDate": "2024-06-03",
        "headline": "Two tenants moved to watch",
        "updatedAt": "2024-06-03T08:00:00Z",
        "statusCounts": { "critical": 1, "watch": 2, "stable": 10, "improving": 1 },
        "statusChanges": {
            "toWatchOrCritical": [{
                "tenantId": "t-1",
                "tenantName": "Acme Retail",
                "previousStatus": "stable",
                "newStatus": "watch",
                "eventId": "e-1",
                "eventHeadline": "Missed coupon"
            }],
            "toImproving": [],
            "unchanged": 11
        },
        "recentEvents": [],
        "coverage": {
            "tenantsMonitored": 14,
            "tenantsWithDisclosures": 3,
            "sources": ["SEC EDGAR", "News"],
            "asOfDate": "2024-06-03"
        }
    }))
    .expect("brief fixture")
}

#[test]
fn brief_lists_counts_changes_and_coverage() {
    let text = brief(&brief_fixture());

    assert!(text.starts_with("Two tenants moved to watch (as of 2024-06-03)"));
    assert!(text.contains("critical 1  watch 2  stable 10  improving 1"));
    assert!(text.contains("▼ Acme Retail: stable -> watch (Missed coupon)"));
    assert!(text.contains("11 unchanged"));
    assert!(text.ends_with("14 tenants monitored, 3 with disclosures (SEC EDGAR, News)"));
}

#[test]
fn tenant_line_pads_columns_and_shows_ticker_when_present() {
    let line = tenant_line(&tenant("t-1", "watch", Some("ACME")));
    assert_eq!(line, "t-1        watch     Acme Retail (ACME) - 3 properties");

    let private = tenant_line(&tenant("t-2", "stable", None));
    assert!(!private.contains('('));
}

#[test]
fn empty_collections_render_placeholders() {
    assert_eq!(tenants(&[]), "no tenants");
    assert_eq!(properties(&[]), "no properties");
    assert_eq!(evidence(&[]), "no evidence");
    assert_eq!(search(&SearchResponse::default()), "no matches");
}

#[test]
fn search_only_prints_non_empty_sections() {
    let results = SearchResponse {
        tenants: Vec::new(),
        properties: vec![property()],
    };

    let text = search(&results);
    assert!(text.starts_with("properties:\n"));
    assert!(text.contains("Harbor Point - Austin, TX (Retail, 4 tenants, 2 events)"));
    assert!(!text.contains("tenants:\n"));
}

#[test]
fn monitoring_shows_progress_only_while_scanning() {
    let now: DateTime<Utc> = "2024-06-03T12:00:00Z".parse().expect("timestamp");
    let mut state = MonitoringState::initial(now);

    assert_eq!(
        monitoring(&state, now),
        "monitoring active (Hourly) - last scan 2m ago, next 58m"
    );

    state.start_scan();
    state.set_progress(45);
    assert!(monitoring(&state, now).starts_with("monitoring scanning (Hourly) 45%"));
}

#[test]
fn failure_descriptions_follow_error_kind() {
    let http = ClientError::Http(ApiError::new(404, json!({"detail": "Tenant not found"})));
    assert_eq!(
        describe_failure(&http, "http://localhost:8000/"),
        "API returned 404: Tenant not found"
    );

    let bare = ClientError::Http(ApiError::new(502, json!({})));
    assert_eq!(describe_failure(&bare, "http://localhost:8000/"), "API returned 502");

    let cancelled = describe_failure(&ClientError::Cancelled, "http://localhost:8000/");
    assert_eq!(cancelled, "Request cancelled.");

    let decode = ClientError::Decode(
        serde_json::from_str::<serde_json::Value>("{").expect_err("malformed"),
    );
    assert!(describe_failure(&decode, "http://localhost:8000/").contains("malformed"));
}
