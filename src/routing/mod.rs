//! Resource routing.
//!
//! ```text
//! (method, path)
//!     → path.rs (normalize, split into segments)
//!     → RouteTable::lookup (linear scan in registration order)
//!     → Matched { action, params } | MethodNotAllowedForPath | NoRouteMatched
//! ```
//!
//! The table is built once per process and never mutated, so lookups need no
//! synchronization.

mod path;
mod table;

use std::fmt;

use axum::http::Method;
use thiserror::Error;

use self::path::Segment;

pub(crate) use table::{routes, ITEMS_PATH};

/// CRUD actions a resource can expose, declared in expansion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum CrudAction {
    Index,
    Create,
    Update,
    Destroy,
}

impl CrudAction {
    pub(crate) const ALL: [CrudAction; 4] =
        [CrudAction::Index, CrudAction::Create, CrudAction::Update, CrudAction::Destroy];
}

/// The operation a route resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Action {
    SiteIndex,
    Items(CrudAction),
    Healthz,
    Metrics,
}

impl Action {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::SiteIndex => "site.index",
            Self::Items(CrudAction::Index) => "items.index",
            Self::Items(CrudAction::Create) => "items.create",
            Self::Items(CrudAction::Update) => "items.update",
            Self::Items(CrudAction::Destroy) => "items.destroy",
            Self::Healthz => "system.healthz",
            Self::Metrics => "system.metrics",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum RouteTableError {
    #[error("invalid route pattern: {0}")]
    InvalidPattern(String),
    #[error("duplicate route {method} {pattern}")]
    DuplicateRoute { method: Method, pattern: String },
}

/// A single (method, pattern, action) entry.
#[derive(Debug, Clone)]
pub(crate) struct Route {
    method: Method,
    pattern: String,
    segments: Vec<Segment>,
    action: Action,
}

impl Route {
    pub(crate) fn method(&self) -> &Method {
        &self.method
    }

    pub(crate) fn pattern(&self) -> &str {
        &self.pattern
    }

    pub(crate) fn action(&self) -> Action {
        self.action
    }

    fn accepts(&self, method: &Method) -> bool {
        self.method == *method || (*method == Method::HEAD && self.method == Method::GET)
    }

    fn capture(&self, segments: &[&str]) -> Option<PathParams> {
        if self.segments.len() != segments.len() {
            return None;
        }

        let mut params = PathParams::default();
        for (expected, actual) in self.segments.iter().zip(segments) {
            match expected {
                Segment::Literal(literal) if literal == actual => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => params.push(name, actual),
            }
        }
        Some(params)
    }

    /// Two routes collide when every position is either the same literal or a
    /// placeholder on both sides.
    fn same_shape(&self, other: &Route) -> bool {
        self.segments.len() == other.segments.len()
            && self.segments.iter().zip(&other.segments).all(|pair| match pair {
                (Segment::Literal(a), Segment::Literal(b)) => a == b,
                (Segment::Param(_), Segment::Param(_)) => true,
                _ => false,
            })
    }
}

/// Path parameters captured from placeholder segments, in pattern order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PathParams {
    entries: Vec<(String, String)>,
}

impl PathParams {
    fn push(&mut self, name: &str, value: &str) {
        self.entries.push((name.to_string(), value.to_string()));
    }

    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.entries.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }
}

/// Methods accepted by a path, sorted and de-duplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AllowedMethods {
    methods: Vec<Method>,
}

impl AllowedMethods {
    /// Adds `HEAD` whenever `GET` is present.
    fn new(mut methods: Vec<Method>) -> Self {
        if methods.contains(&Method::GET) && !methods.contains(&Method::HEAD) {
            methods.push(Method::HEAD);
        }
        methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        methods.dedup();
        Self { methods }
    }

    /// Value for the `Allow` response header.
    pub(crate) fn header_value(&self) -> String {
        self.methods.iter().map(Method::as_str).collect::<Vec<_>>().join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MatchResult {
    Matched { action: Action, params: PathParams },
    MethodNotAllowedForPath { allowed: AllowedMethods },
    NoRouteMatched,
}

impl MatchResult {
    /// Short label for logs and metrics.
    pub(crate) fn outcome(&self) -> &'static str {
        match self {
            Self::Matched { action, .. } => action.as_str(),
            Self::MethodNotAllowedForPath { .. } => "method_not_allowed",
            Self::NoRouteMatched => "no_route",
        }
    }
}

/// Ordered, immutable route table.
#[derive(Debug, Clone)]
pub(crate) struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub(crate) fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    pub(crate) fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Resolve a request. The first route whose pattern and method both match
    /// wins; `HEAD` is served by `GET` routes. A token that is not a valid
    /// HTTP method never matches, but a known path still reports its allowed
    /// methods.
    pub(crate) fn lookup(&self, method: &str, path: &str) -> MatchResult {
        let method = Method::from_bytes(method.as_bytes()).ok();
        let Some(segments) = path::normalize(path) else {
            return MatchResult::NoRouteMatched;
        };

        let mut allowed = Vec::new();
        for route in &self.routes {
            let Some(params) = route.capture(&segments) else {
                continue;
            };

            if method.as_ref().is_some_and(|method| route.accepts(method)) {
                return MatchResult::Matched { action: route.action, params };
            }
            allowed.push(route.method.clone());
        }

        if allowed.is_empty() {
            MatchResult::NoRouteMatched
        } else {
            MatchResult::MethodNotAllowedForPath { allowed: AllowedMethods::new(allowed) }
        }
    }
}

/// Collects routes in registration order and checks them on `build`.
#[derive(Debug, Default)]
pub(crate) struct RouteTableBuilder {
    entries: Vec<(Method, String, Action)>,
}

impl RouteTableBuilder {
    pub(crate) fn route(mut self, method: Method, pattern: &str, action: Action) -> Self {
        self.entries.push((method, pattern.to_string(), action));
        self
    }

    /// Register the CRUD routes of a resource mounted at `base`, e.g.
    /// `/api/v1/items`. Routes are added in `CrudAction::ALL` order no matter
    /// how `only` is ordered; `update` answers both PATCH and PUT.
    pub(crate) fn resources(
        mut self,
        base: &str,
        only: &[CrudAction],
        action: fn(CrudAction) -> Action,
    ) -> Self {
        let base = base.trim_end_matches('/');
        let member = format!("{base}/:id");

        for crud in CrudAction::ALL.into_iter().filter(|crud| only.contains(crud)) {
            match crud {
                CrudAction::Index => self = self.route(Method::GET, base, action(crud)),
                CrudAction::Create => self = self.route(Method::POST, base, action(crud)),
                CrudAction::Update => {
                    self = self
                        .route(Method::PATCH, &member, action(crud))
                        .route(Method::PUT, &member, action(crud));
                }
                CrudAction::Destroy => self = self.route(Method::DELETE, &member, action(crud)),
            }
        }
        self
    }

    pub(crate) fn build(self) -> Result<RouteTable, RouteTableError> {
        let mut routes: Vec<Route> = Vec::with_capacity(self.entries.len());

        for (method, pattern, action) in self.entries {
            let segments = path::compile_pattern(&pattern)
                .ok_or_else(|| RouteTableError::InvalidPattern(pattern.clone()))?;
            let route = Route { method, pattern, segments, action };

            if routes
                .iter()
                .any(|existing| existing.method == route.method && existing.same_shape(&route))
            {
                return Err(RouteTableError::DuplicateRoute {
                    method: route.method,
                    pattern: route.pattern,
                });
            }
            routes.push(route);
        }

        Ok(RouteTable { routes })
    }
}
