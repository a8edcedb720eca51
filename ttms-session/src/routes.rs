//! The static route table consulted by the navigation guard.
use serde::{Deserialize, Serialize};

pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_LANDING_PATH: &str = "/main";

/// Upper bound on chained static redirects, so a misconfigured cycle terminates.
const MAX_REDIRECTS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub path: String,
    pub requires_auth: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl Route {
    pub fn public(path: impl Into<String>) -> Self {
        Self { path: path.into(), requires_auth: false, redirect: None }
    }
    pub fn protected(path: impl Into<String>) -> Self {
        Self { path: path.into(), requires_auth: true, redirect: None }
    }
    /// A static alias, followed before any guard decision.
    pub fn redirect(path: impl Into<String>, to: impl Into<String>) -> Self {
        Self { path: path.into(), requires_auth: false, redirect: Some(to.into()) }
    }
}

/// Ordered routes plus the designated login and landing paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    routes: Vec<Route>,
    login_path: String,
    landing_path: String,
}

impl RouteTable {
    /// An empty table. Every path is protected until declared otherwise.
    pub fn new(login_path: impl Into<String>, landing_path: impl Into<String>) -> Self {
        Self { routes: Vec::new(), login_path: login_path.into(), landing_path: landing_path.into() }
    }
    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
    pub fn login_path(&self) -> &str {
        &self.login_path
    }
    pub fn landing_path(&self) -> &str {
        &self.landing_path
    }
    /// The first route declared for `path`, ignoring query, fragment and a trailing slash.
    pub fn find(&self, path: &str) -> Option<&Route> {
        let path = normalize(path);
        self.routes.iter().find(|route| normalize(&route.path) == path)
    }
    /// Follow static redirects from `path`.
    pub fn resolve<'a>(&'a self, path: &'a str) -> &'a str {
        let mut current = path;
        for _ in 0..MAX_REDIRECTS {
            match self.find(current).and_then(|route| route.redirect.as_deref()) {
                Some(to) => current = to,
                None => break,
            }
        }
        current
    }
    /// Whether `path` needs a validated session. Undeclared paths do.
    pub fn requires_auth(&self, path: &str) -> bool {
        self.find(path).map_or(true, |route| route.requires_auth)
    }
    pub fn is_login(&self, path: &str) -> bool {
        normalize(path) == normalize(&self.login_path)
    }
}

impl Default for RouteTable {
    /// The timetable application's views. Everything except the login screen is protected.
    fn default() -> Self {
        Self::new(DEFAULT_LOGIN_PATH, DEFAULT_LANDING_PATH)
            .route(Route::redirect("/", DEFAULT_LOGIN_PATH))
            .route(Route::public(DEFAULT_LOGIN_PATH))
            .route(Route::protected(DEFAULT_LANDING_PATH))
            .route(Route::protected("/timetable"))
            .route(Route::protected("/ruang"))
            .route(Route::protected("/subjek"))
            .route(Route::protected("/pensyarah"))
            .route(Route::protected("/pelajar"))
            .route(Route::protected("/kurikulum"))
    }
}

fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}
