//! Route table of the movies module and the router that activates pages.
//!
//! | path        | page   |
//! |-------------|--------|
//! | ``          | list   |
//! | `{id}/view` | detail |
//! | `new`       | create |
//! | `{id}/edit` | edit   |

use std::fmt;
use std::sync::Arc;

use crate::error::ClientResult;
use crate::events::EventBus;
use crate::guard::{RouteGuard, DEFAULT_AUTHORITY};
use crate::navigation::{Navigator, ACCESS_DENIED_PAGE, NOT_FOUND_PAGE};
use crate::resolver::{MovieResolver, Resolution};
use crate::service::MovieTransport;
use crate::views::{MovieDetailView, MovieListView, MovieUpdateView};

const ROUTE_AUTHORITIES: &[&str] = &[DEFAULT_AUTHORITY];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieRoute {
    List,
    View(String),
    New,
    Edit(String),
}

impl MovieRoute {
    /// Parse a path relative to the module root; `None` when nothing matches.
    pub fn parse(path: &str) -> Option<Self> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Some(MovieRoute::List),
            ["new"] => Some(MovieRoute::New),
            [id, "view"] => Some(MovieRoute::View(id.to_string())),
            [id, "edit"] => Some(MovieRoute::Edit(id.to_string())),
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            MovieRoute::List => String::new(),
            MovieRoute::View(id) => format!("{id}/view"),
            MovieRoute::New => "new".to_string(),
            MovieRoute::Edit(id) => format!("{id}/edit"),
        }
    }

    /// The `id` route parameter the resolver receives.
    pub fn id_param(&self) -> Option<&str> {
        match self {
            MovieRoute::View(id) | MovieRoute::Edit(id) => Some(id),
            MovieRoute::List | MovieRoute::New => None,
        }
    }

    pub fn required_authorities(&self) -> &'static [&'static str] {
        ROUTE_AUTHORITIES
    }
}

/// An activated page.
pub enum Page {
    List(MovieListView),
    Detail(MovieDetailView),
    Update(MovieUpdateView),
    NotFound,
    AccessDenied,
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Page::List(_) => "List",
            Page::Detail(_) => "Detail",
            Page::Update(_) => "Update",
            Page::NotFound => "NotFound",
            Page::AccessDenied => "AccessDenied",
        };
        f.write_str(name)
    }
}

pub struct MovieRouter {
    transport: Arc<dyn MovieTransport>,
    navigator: Arc<dyn Navigator>,
    guard: Arc<dyn RouteGuard>,
    events: EventBus,
    resolver: MovieResolver,
}

impl MovieRouter {
    pub fn new(
        transport: Arc<dyn MovieTransport>,
        navigator: Arc<dyn Navigator>,
        guard: Arc<dyn RouteGuard>,
        events: EventBus,
    ) -> Self {
        let resolver = MovieResolver::new(transport.clone(), navigator.clone());
        Self {
            transport,
            navigator,
            guard,
            events,
            resolver,
        }
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Guard, resolve and activate the page at `path`.
    ///
    /// The list page comes back loaded.
    pub async fn navigate(&self, path: &str) -> ClientResult<Page> {
        let Some(route) = MovieRoute::parse(path) else {
            tracing::info!(path, "no movies route matches");
            self.navigator.navigate(NOT_FOUND_PAGE);
            return Ok(Page::NotFound);
        };

        if !self.guard.can_activate(route.required_authorities()) {
            tracing::warn!(path, "access to movies route denied");
            self.navigator.navigate(ACCESS_DENIED_PAGE);
            return Ok(Page::AccessDenied);
        }

        if route == MovieRoute::List {
            let mut view = MovieListView::new(self.transport.clone(), self.events.clone());
            view.load().await?;
            self.navigator.navigate(&route.path());
            return Ok(Page::List(view));
        }

        // A page enters history only once its data resolved.
        let resolution = self.resolver.resolve(route.id_param()).await?;
        if resolution == Resolution::NotFound {
            return Ok(Page::NotFound);
        }
        self.navigator.navigate(&route.path());

        Ok(match route {
            MovieRoute::View(_) => Page::Detail(MovieDetailView::new(resolution, self.navigator.clone())),
            _ => Page::Update(MovieUpdateView::new(
                self.transport.clone(),
                self.navigator.clone(),
                resolution,
            )),
        })
    }
}
