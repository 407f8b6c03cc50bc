use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use client_core::ClientSettings;
use shared::domain::{DemoRole, EventId, PropertyId, ScanFrequency, TenantId, TenantStatus};

#[derive(Parser, Debug)]
#[command(name = "oversight", about = "Tenant credit oversight client")]
pub struct Args {
    /// Upstream API origin; `/api/v1` is appended automatically.
    #[arg(long, global = true)]
    pub api_url: Option<String>,
    #[arg(long, global = true)]
    pub role: Option<DemoRole>,
    #[arg(long, global = true)]
    pub user: Option<String>,
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,
    /// Print raw JSON payloads instead of text summaries.
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Daily portfolio brief.
    Brief {
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Brief plus tenant list, fetched concurrently.
    Overview,
    Tenants {
        #[arg(long)]
        status: Option<TenantStatus>,
    },
    Tenant {
        id: TenantId,
    },
    Event {
        id: EventId,
        /// Fetch the evidence list instead of the event detail.
        #[arg(long)]
        evidence: bool,
    },
    Properties,
    Property {
        id: PropertyId,
    },
    Search {
        query: String,
    },
    Health,
    /// Run the simulated monitoring scan and report progress.
    Scan {
        #[arg(long, default_value_t = 200)]
        tick_ms: u64,
        #[arg(long)]
        frequency: Option<ScanFrequency>,
    },
    /// Print the effective client settings.
    Settings,
}

impl Args {
    /// CLI flags win over file and environment settings.
    pub fn apply_to(&self, settings: &mut ClientSettings) {
        if let Some(api_url) = &self.api_url {
            settings.api_url = api_url.clone();
        }
        if let Some(role) = self.role {
            settings.demo_role = role;
        }
        if let Some(user) = &self.user {
            settings.demo_user = user.clone();
        }
        if let Some(timeout) = self.timeout_secs {
            settings.request_timeout_secs = timeout;
        }
    }
}
