use std::{process::ExitCode, time::Duration};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use client_core::{ApiClient, CancelToken, ClientError, ClientResult, DemoIdentity, OversightApi};
use serde::Serialize;
use shared::{
    domain::MonitoringStatus,
    protocol::{BriefResponse, Tenant},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use ui_state::UiStore;

mod cli;
mod render;

use cli::{Args, Command};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut settings = client_core::load_settings();
    args.apply_to(&mut settings);

    if args.command == Command::Settings {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(ExitCode::SUCCESS);
    }

    let store = UiStore::new(DemoIdentity::new(
        settings.demo_role,
        settings.demo_user.clone(),
    ));

    let cancel = CancelToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received, cancelling");
                cancel.cancel();
            }
        }
    });

    let client =
        ApiClient::from_settings(&settings, store.identity())?.with_cancel(cancel.clone());
    info!(
        api_url = %client.base_url(),
        role = %store.role(),
        "oversight: client ready"
    );

    match execute(&args.command, &client, &store, &cancel, args.json).await {
        Ok(output) => {
            println!("{output}");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}", render::describe_error(&err, client.base_url().as_str()));
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Runs one command and returns what should be printed on stdout.
async fn execute(
    command: &Command,
    api: &dyn OversightApi,
    store: &UiStore,
    cancel: &CancelToken,
    json: bool,
) -> Result<String> {
    match command {
        Command::Brief { as_of } => {
            let brief = api.get_brief(*as_of).await?;
            emit(&brief, json, |brief| {
                format!("[{}]\n{}", store.role().label(), render::brief(brief))
            })
        }
        Command::Overview => {
            let (brief, tenants) = futures::try_join!(api.get_brief(None), api.get_tenants(None))?;
            let overview = Overview {
                brief: &brief,
                tenants: &tenants,
            };
            emit(&overview, json, |overview| {
                format!(
                    "[{}]\n{}\n\n{}",
                    store.role().label(),
                    render::brief(overview.brief),
                    render::tenants(overview.tenants)
                )
            })
        }
        Command::Tenants { status } => {
            let tenants = api.get_tenants(*status).await?;
            emit(&tenants, json, |tenants| render::tenants(tenants))
        }
        Command::Tenant { id } => {
            let detail = api.get_tenant(id).await?;
            store.open_tenant_scope_sheet(id.clone());
            emit(&detail, json, render::tenant_detail)
        }
        Command::Event { id, evidence } => {
            store.open_evidence_drawer(id.clone());
            if *evidence {
                let items = api.get_event_evidence(id).await?;
                emit(&items, json, |items| render::evidence(items))
            } else {
                let detail = api.get_event(id).await?;
                emit(&detail, json, render::event_detail)
            }
        }
        Command::Properties => {
            let properties = api.get_properties().await?;
            emit(&properties, json, |properties| render::properties(properties))
        }
        Command::Property { id } => {
            let property = api.get_property(id).await?;
            emit(&property, json, render::property_line)
        }
        Command::Search { query } => {
            let results = api.search(query).await?;
            emit(&results, json, render::search)
        }
        Command::Health => {
            let health = api.health().await?;
            emit(&health, json, render::health)
        }
        Command::Scan { tick_ms, frequency } => {
            if let Some(frequency) = frequency {
                store.set_scan_frequency(*frequency);
            }
            run_scan(store, cancel, Duration::from_millis(*tick_ms)).await?;
            let monitoring = store.snapshot().monitoring;
            emit(&monitoring, json, |monitoring| {
                render::monitoring(monitoring, Utc::now())
            })
        }
        Command::Settings => Ok(String::new()),
    }
}

#[derive(Serialize)]
struct Overview<'a> {
    brief: &'a BriefResponse,
    tenants: &'a [Tenant],
}

fn emit<T: Serialize + ?Sized>(
    value: &T,
    json: bool,
    text: impl FnOnce(&T) -> String,
) -> Result<String> {
    if json {
        serde_json::to_string_pretty(value).context("failed to encode output as JSON")
    } else {
        Ok(text(value))
    }
}

/// Drives the simulated scan, reporting progress on stderr.
async fn run_scan(store: &UiStore, cancel: &CancelToken, tick: Duration) -> ClientResult<()> {
    let mut rx = store.subscribe();
    let scan = store.simulate_scan(tick);
    tokio::pin!(scan);

    loop {
        tokio::select! {
            _ = &mut scan => return Ok(()),
            _ = cancel.cancelled() => {
                store.set_monitoring_status(MonitoringStatus::Paused);
                return Err(ClientError::Cancelled);
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let monitoring = rx.borrow_and_update().monitoring.clone();
                if monitoring.is_scanning() {
                    eprintln!("scanning... {}%", monitoring.progress);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
