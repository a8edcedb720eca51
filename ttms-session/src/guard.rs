//! Route-transition guard.
//!
//! Each navigation is evaluated on its own: the verdict is re-derived from storage and the
//! remote service, and nothing carries over to the next transition.
use crate::controller::SessionController;
use crate::cookie::CookieJar;
use crate::record::SessionRecord;
use crate::routes::RouteTable;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use ttms_common::store::Store;
use ttms_http::HttpClient;

/// Session state of a single transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    /// The verdict has not resolved. Treated as unauthenticated.
    Unknown,
    Authenticated(SessionRecord),
    Unauthenticated,
}

impl From<Option<SessionRecord>> for GuardState {
    fn from(verdict: Option<SessionRecord>) -> Self {
        match verdict {
            Some(session) => Self::Authenticated(session),
            None => Self::Unauthenticated,
        }
    }
}

/// Outcome of a guarded navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Navigation {
    /// Render `path`. `session` is the verdict that allowed it, if any.
    Proceed { path: String, session: Option<SessionRecord> },
    /// Abandon `from` and navigate to `to` instead.
    Redirect { from: String, to: String },
    /// A newer navigation started while this one was validating. The host must ignore it.
    Superseded { path: String },
}

impl Navigation {
    /// Where the host should end up, unless the navigation was superseded.
    pub fn destination(&self) -> Option<&str> {
        match self {
            Self::Proceed { path, .. } => Some(path),
            Self::Redirect { to, .. } => Some(to),
            Self::Superseded { .. } => None,
        }
    }
}

/// Decide a transition to `requested` given a resolved session state.
///
/// `requested` is followed through the table's static redirects first. The login path is
/// decided before its `requires_auth` flag, so it stays reachable without a session even if
/// the table marks it protected.
pub fn decide(routes: &RouteTable, requested: &str, state: GuardState) -> Navigation {
    let target = routes.resolve(requested);
    let session = match state {
        GuardState::Authenticated(session) => Some(session),
        GuardState::Unknown | GuardState::Unauthenticated => None,
    };
    if routes.is_login(target) {
        return match session {
            Some(_) => Navigation::Redirect {
                from: requested.into(),
                to: routes.landing_path().into(),
            },
            None => Navigation::Proceed { path: target.into(), session: None },
        };
    }
    if routes.requires_auth(target) && session.is_none() {
        return Navigation::Redirect { from: requested.into(), to: routes.login_path().into() };
    }
    Navigation::Proceed { path: target.into(), session }
}

/// Intercepts route transitions and redirects according to the current session verdict.
///
/// When navigations overlap, only the most recently started one is honored; earlier ones
/// resolve to [`Navigation::Superseded`] once their verdict settles.
pub struct NavigationGuard<S, C, T> {
    controller: Arc<SessionController<S, C, T>>,
    routes: RouteTable,
    generation: AtomicU64,
}

impl<S, C, T> NavigationGuard<S, C, T>
where
    S: Store<String, String> + Send + Sync,
    C: CookieJar + Send + Sync,
    T: HttpClient + Send + Sync,
{
    pub fn new(controller: Arc<SessionController<S, C, T>>, routes: RouteTable) -> Self {
        Self { controller, routes, generation: AtomicU64::new(0) }
    }
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }
    pub fn controller(&self) -> &Arc<SessionController<S, C, T>> {
        &self.controller
    }
    /// Evaluate a transition to `path`, waiting for the remote verdict.
    pub async fn navigate(&self, path: &str) -> Navigation {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let state = GuardState::from(self.controller.get_current_validated().await);
        if self.generation.load(Ordering::SeqCst) != ticket {
            tracing::debug!(path, "navigation superseded");
            return Navigation::Superseded { path: path.into() };
        }
        let navigation = decide(&self.routes, path, state);
        tracing::debug!(?navigation, "navigation decided");
        navigation
    }
}
