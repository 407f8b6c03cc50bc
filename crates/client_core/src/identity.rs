use std::sync::RwLock;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use shared::domain::DemoRole;
use tracing::info;

use crate::error::{ClientError, ClientResult};

pub const ROLE_HEADER: &str = "x-demo-role";
pub const USER_HEADER: &str = "x-demo-user";
pub const DEFAULT_DEMO_USER: &str = "Demo User";

/// Supplies the caller identity headers for each outbound request.
///
/// Called once per request, immediately before dispatch, so implementations
/// must return the identity that is current at that moment.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn identity_headers(&self) -> ClientResult<HeaderMap>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub role: DemoRole,
    pub user: String,
}

impl Default for CallerIdentity {
    fn default() -> Self {
        Self {
            role: DemoRole::default(),
            user: DEFAULT_DEMO_USER.to_string(),
        }
    }
}

/// In-memory demo persona switcher.
#[derive(Debug, Default)]
pub struct DemoIdentity {
    current: RwLock<CallerIdentity>,
}

impl DemoIdentity {
    pub fn new(role: DemoRole, user: impl Into<String>) -> Self {
        Self {
            current: RwLock::new(CallerIdentity {
                role,
                user: user.into(),
            }),
        }
    }

    /// Switches persona. The display name only changes when a non-empty one is given.
    pub fn set_role(&self, role: DemoRole, user: Option<String>) {
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.role = role;
        if let Some(user) = user.filter(|user| !user.is_empty()) {
            guard.user = user;
        }
        info!(role = role.as_str(), user = %guard.user, "identity: demo role switched");
    }

    pub fn role(&self) -> DemoRole {
        self.current().role
    }

    pub fn current(&self) -> CallerIdentity {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl IdentityProvider for DemoIdentity {
    async fn identity_headers(&self) -> ClientResult<HeaderMap> {
        let identity = self.current();
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(ROLE_HEADER),
            HeaderValue::from_static(identity.role.as_str()),
        );
        headers.insert(
            HeaderName::from_static(USER_HEADER),
            header_value(USER_HEADER, &identity.user)?,
        );
        Ok(headers)
    }
}

/// Sends no identity headers at all.
pub struct AnonymousIdentity;

#[async_trait]
impl IdentityProvider for AnonymousIdentity {
    async fn identity_headers(&self) -> ClientResult<HeaderMap> {
        Ok(HeaderMap::new())
    }
}

pub(crate) fn header_value(name: &str, value: &str) -> ClientResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|err| ClientError::InvalidHeader {
        name: name.to_string(),
        reason: err.to_string(),
    })
}
