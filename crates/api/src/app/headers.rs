//! Response headers shared by the movies routes.
//!
//! - alert headers (`X-<app>-alert`, `X-<app>-params`) announce mutations
//! - pagination headers (`X-Total-Count`, `Link`) describe list pages

use axum::http::header::{HeaderName, InvalidHeaderName, LINK};
use axum::http::{HeaderMap, HeaderValue};

use cinedex_core::{MovieId, Pageable};

pub const TOTAL_COUNT: &str = "x-total-count";

const ENTITY_NAME: &str = "movies";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alert {
    Created,
    Updated,
    Deleted,
}

impl Alert {
    fn as_str(&self) -> &'static str {
        match self {
            Alert::Created => "created",
            Alert::Updated => "updated",
            Alert::Deleted => "deleted",
        }
    }
}

/// Alert header names derived from the application name.
#[derive(Debug, Clone)]
pub struct AlertHeaders {
    app_name: String,
    alert: HeaderName,
    params: HeaderName,
}

impl AlertHeaders {
    pub fn new(app_name: &str) -> Result<Self, InvalidHeaderName> {
        Ok(Self {
            app_name: app_name.to_string(),
            alert: HeaderName::from_bytes(format!("x-{app_name}-alert").as_bytes())?,
            params: HeaderName::from_bytes(format!("x-{app_name}-params").as_bytes())?,
        })
    }

    pub fn for_entity(&self, alert: Alert, id: MovieId) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let message = format!("{}.{ENTITY_NAME}.{}", self.app_name, alert.as_str());
        if let Ok(value) = HeaderValue::from_str(&message) {
            headers.insert(self.alert.clone(), value);
        }
        headers.insert(self.params.clone(), HeaderValue::from(id.get()));
        headers
    }
}

/// `X-Total-Count` plus RFC 5988 `Link` entries (`next`, `prev`, `last`, `first`).
///
/// `path` is the request path; `query` its raw query string. Every query
/// parameter except `page`/`size` is carried over to the links unchanged.
pub fn pagination(path: &str, query: Option<&str>, pageable: &Pageable, total: u64) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(HeaderName::from_static(TOTAL_COUNT), HeaderValue::from(total));

    let kept: Vec<&str> = query
        .unwrap_or_default()
        .split('&')
        .filter(|segment| !segment.is_empty())
        .filter(|segment| {
            let key = segment.split('=').next().unwrap_or_default();
            key != "page" && key != "size"
        })
        .collect();
    let link = |page: u64, rel: &str| {
        let mut params = kept.join("&");
        if !params.is_empty() {
            params.push('&');
        }
        format!("<{path}?{params}page={page}&size={}>; rel=\"{rel}\"", pageable.size)
    };

    let page = u64::from(pageable.page);
    let last = pageable.total_pages(total) - 1;
    let mut links = Vec::new();
    if page < last {
        links.push(link(page + 1, "next"));
    }
    if page > 0 {
        links.push(link(page - 1, "prev"));
    }
    links.push(link(last, "last"));
    links.push(link(0, "first"));

    if let Ok(value) = HeaderValue::from_str(&links.join(",")) {
        headers.insert(LINK, value);
    }
    headers
}
