//! Static route table.

use serde::Serialize;

/// The page a route renders. Stands in for the template reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageKind {
    Landing,
    Login,
    Register,
    Dashboard,
    Result,
    ResultDetail,
    History,
    Article,
    ArticleDetail,
}

impl PageKind {
    /// Name of the custom element the page is mounted as.
    pub fn element_name(&self) -> &'static str {
        match self {
            PageKind::Landing => "landing-page",
            PageKind::Login => "login-page",
            PageKind::Register => "register-page",
            PageKind::Dashboard => "dashboard-page",
            PageKind::Result => "result-page",
            PageKind::ResultDetail => "result-detail-page",
            PageKind::History => "history-page",
            PageKind::Article => "article-page",
            PageKind::ArticleDetail => "article-detail-page",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Route {
    pub path: &'static str,
    pub page: PageKind,
    pub title: &'static str,
    pub requires_auth: bool,
}

impl Route {
    const fn new(path: &'static str, page: PageKind, title: &'static str, requires_auth: bool) -> Self {
        Self {
            path,
            page,
            title,
            requires_auth,
        }
    }
}

/// Paths only reachable while signed out. A signed-in user is sent to the dashboard.
pub const UNAUTHENTICATED_ONLY_PATHS: [&str; 3] = ["/", "/login", "/register"];

pub const ROOT_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

const ROUTES: [Route; 9] = [
    Route::new("/", PageKind::Landing, "Landing Page", false),
    Route::new("/login", PageKind::Login, "Login Page", false),
    Route::new("/register", PageKind::Register, "Register Page", false),
    Route::new("/dashboard", PageKind::Dashboard, "Dashboard Page", true),
    Route::new("/result", PageKind::Result, "Result Page", true),
    Route::new("/result-detail", PageKind::ResultDetail, "Result Detail Page", true),
    Route::new("/history", PageKind::History, "History Page", true),
    Route::new("/article", PageKind::Article, "Article Page", true),
    Route::new("/article-detail", PageKind::ArticleDetail, "Article Detail Page", true),
];

/// Immutable mapping from path to [`Route`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteTable;

impl RouteTable {
    pub fn new() -> Self {
        Self
    }

    pub fn routes(&self) -> &'static [Route] {
        &ROUTES
    }

    /// Exact lookup, `None` on miss.
    pub fn get(&self, path: &str) -> Option<&'static Route> {
        ROUTES.iter().find(|route| route.path == path)
    }

    /// Lookup that falls back to the root route on miss.
    pub fn resolve(&self, path: &str) -> &'static Route {
        self.get(path).unwrap_or(&ROUTES[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_path() {
        let route = RouteTable::new().resolve("/history");
        assert_eq!(route.page, PageKind::History);
        assert!(route.requires_auth);
    }

    #[test]
    fn test_resolve_falls_back_to_root() {
        let route = RouteTable::new().resolve("/does-not-exist");
        assert_eq!(route.path, "/");
        assert_eq!(route.page, PageKind::Landing);
        assert!(!route.requires_auth);
    }

    #[test]
    fn test_only_public_pages_skip_auth() {
        let public: Vec<_> = RouteTable::new()
            .routes()
            .iter()
            .filter(|r| !r.requires_auth)
            .map(|r| r.path)
            .collect();
        assert_eq!(public, UNAUTHENTICATED_ONLY_PATHS.to_vec());
    }
}
