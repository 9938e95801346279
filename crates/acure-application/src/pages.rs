//! Page controllers.
//!
//! One variant per page kind. Each renders a [`PageView`]: the data the UI
//! layer needs to draw the page. Failures become an error view carrying a
//! user-facing message and a way back, never a panic.

use acure_core::AcureError;
use acure_core::route::{DASHBOARD_PATH, PageKind, QueryMap};
use acure_core::scan::ScanRecord;
use acure_core::session::Session;
use serde::Serialize;

use crate::articles::{ARTICLES, Article, find_article};
use crate::auth_usecase::AuthUseCase;
use crate::history::{HistoryPage, HistoryQuery};
use crate::scan_usecase::ScanUseCase;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "kebab-case")]
pub enum PageView {
    Landing,
    Login,
    Register,
    Dashboard {
        user: Option<Session>,
        recent_scans: Vec<ScanRecord>,
    },
    Result {
        scan: ScanRecord,
    },
    ResultDetail {
        scan: ScanRecord,
    },
    History {
        query: HistoryQuery,
        page: HistoryPage,
    },
    Article {
        articles: &'static [Article],
    },
    ArticleDetail {
        article: &'static Article,
    },
    Error {
        message: String,
        back_to: &'static str,
    },
}

impl PageView {
    fn error(err: &AcureError, back_to: &'static str) -> Self {
        PageView::Error {
            message: err.user_message(),
            back_to,
        }
    }
}

/// Collaborators a page controller may call.
pub struct PageContext {
    pub auth: AuthUseCase,
    pub scans: ScanUseCase,
}

const RECENT_SCANS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageController {
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

impl From<PageKind> for PageController {
    fn from(kind: PageKind) -> Self {
        match kind {
            PageKind::Landing => PageController::Landing,
            PageKind::Login => PageController::Login,
            PageKind::Register => PageController::Register,
            PageKind::Dashboard => PageController::Dashboard,
            PageKind::Result => PageController::Result,
            PageKind::ResultDetail => PageController::ResultDetail,
            PageKind::History => PageController::History,
            PageKind::Article => PageController::Article,
            PageKind::ArticleDetail => PageController::ArticleDetail,
        }
    }
}

fn required<'a>(params: &'a QueryMap, key: &str, message: &str) -> Result<&'a str, AcureError> {
    params
        .get(key)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AcureError::validation(message))
}

impl PageController {
    pub async fn render(&self, ctx: &PageContext, params: &QueryMap) -> PageView {
        match self {
            PageController::Landing => PageView::Landing,
            PageController::Login => PageView::Login,
            PageController::Register => PageView::Register,
            PageController::Dashboard => {
                let recent_scans = ctx.scans.cached().unwrap_or_else(|e| {
                    tracing::warn!("Could not read cached scans: {}", e);
                    Vec::new()
                });
                PageView::Dashboard {
                    user: ctx.auth.current_session(),
                    recent_scans: recent_scans.into_iter().take(RECENT_SCANS).collect(),
                }
            }
            PageController::Result => {
                let loaded = required(params, "scanId", "No scan ID provided")
                    .and_then(|id| ctx.scans.load_result(id));
                match loaded {
                    Ok(scan) => PageView::Result { scan },
                    Err(e) => {
                        tracing::error!("Failed to load scan result: {}", e);
                        PageView::error(&e, DASHBOARD_PATH)
                    }
                }
            }
            PageController::ResultDetail => {
                let id = match required(params, "scanId", "No scan ID provided") {
                    Ok(id) => id,
                    Err(e) => return PageView::error(&e, "/history"),
                };
                match ctx.scans.load_detail(id).await {
                    Ok(scan) => PageView::ResultDetail { scan },
                    Err(e) => {
                        tracing::error!("Failed to load scan {}: {}", id, e);
                        PageView::error(&e, "/history")
                    }
                }
            }
            PageController::History => {
                let query = history_query(params);
                match ctx.scans.history().await {
                    Ok(scans) => PageView::History {
                        page: query.apply(&scans),
                        query,
                    },
                    Err(e) => {
                        tracing::error!("Failed to load scan history: {}", e);
                        PageView::error(&e, DASHBOARD_PATH)
                    }
                }
            }
            PageController::Article => PageView::Article {
                articles: &ARTICLES,
            },
            PageController::ArticleDetail => {
                let slug = params.get("slug").unwrap_or_default();
                match find_article(slug) {
                    Some(article) => PageView::ArticleDetail { article },
                    None => PageView::error(&AcureError::not_found("article", slug), "/article"),
                }
            }
        }
    }
}

/// Reads `filter`, `sort` and `page` from the query, defaulting what is
/// missing or unreadable.
pub fn history_query(params: &QueryMap) -> HistoryQuery {
    let defaults = HistoryQuery::default();
    HistoryQuery {
        filter: params
            .get("filter")
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .unwrap_or(defaults.filter),
        sort: params
            .get("sort")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.sort),
        page: params
            .get("page")
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.page),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistorySort;
    use acure_core::route::parse_location;

    #[test]
    fn test_history_query_from_params() {
        let params = parse_location("#/history?filter=cyst&sort=confidence&page=2").query;
        let query = history_query(&params);
        assert_eq!(query.filter, "cyst");
        assert_eq!(query.sort, HistorySort::Confidence);
        assert_eq!(query.page, 2);

        let defaults = history_query(&parse_location("#/history?sort=bogus&page=x").query);
        assert_eq!(defaults, HistoryQuery::default());
    }

    #[test]
    fn test_history_view_serializes_with_view_tag() {
        let view = PageView::History {
            query: HistoryQuery::default(),
            page: HistoryQuery::default().apply(&[]),
        };
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["view"], "history");
        assert_eq!(value["page"]["page"], 1);
        assert_eq!(value["query"]["filter"], "all");
    }

    #[test]
    fn test_every_page_kind_has_a_controller() {
        assert_eq!(PageController::from(PageKind::ArticleDetail), PageController::ArticleDetail);
        assert_eq!(PageController::from(PageKind::Landing), PageController::Landing);
    }
}
