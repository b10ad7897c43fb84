//! Router core module - registration and the resolve hot path.

use http::Method;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::entry::{OperationDescriptor, RoutingEntry};
use super::path::{build_route_path, canonical_path};
use super::trie::{PathTrie, MAX_INLINE_SEGMENTS};
use crate::cache::TargetCache;
use crate::config::RouterConfig;
use crate::declaration::{
    Controller, ControllerDecl, ControllerType, DeclarationProvider, HttpVerb,
};
use crate::error::RouterError;

/// Owned URL parameters captured from leftover segments.
pub type ParamVec = SmallVec<[String; MAX_INLINE_SEGMENTS]>;

/// Controller type and operation a request resolves to.
#[derive(Debug, Clone)]
pub struct RouteTarget {
    pub controller: ControllerType,
    pub operation: Arc<OperationDescriptor>,
}

/// Result of matching a path and verb, before any instance is involved.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub target: RouteTarget,
    /// Leftover segments, in request order. These are the positional URL
    /// parameters of the operation; binding them is up to the caller.
    pub url_params: ParamVec,
}

/// A fully resolved call target: the shared controller instance plus the
/// operation to run on it.
#[derive(Clone)]
pub struct ResolvedRoute {
    pub instance: Arc<dyn Controller>,
    pub target: RouteTarget,
    pub url_params: ParamVec,
}

impl ResolvedRoute {
    #[must_use]
    pub fn operation(&self) -> &OperationDescriptor {
        &self.target.operation
    }
}

impl std::fmt::Debug for ResolvedRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedRoute")
            .field("target", &self.target)
            .field("url_params", &self.url_params)
            .finish_non_exhaustive()
    }
}

/// One row of the routing table, as listed by [`Router::routes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    pub path: String,
    pub verb: HttpVerb,
    pub controller: &'static str,
    pub operation: String,
    pub url_params: usize,
}

/// Builds the routing trie, one registration pass per controller.
#[derive(Debug)]
pub struct RouterBuilder {
    config: RouterConfig,
    trie: PathTrie<RoutingEntry>,
    operations: usize,
}

impl RouterBuilder {
    #[must_use]
    pub fn new(config: RouterConfig) -> Self {
        Self {
            trie: PathTrie::new(config.separator),
            config,
            operations: 0,
        }
    }

    /// Register every operation of `decl`.
    ///
    /// Operations of the controller sharing a full path are merged into one
    /// routing entry. A full path that already carries an entry from an
    /// earlier registration is a `DuplicateRoute`. On any error nothing of
    /// `decl` is registered.
    pub fn register(&mut self, decl: &ControllerDecl) -> Result<&mut Self, RouterError> {
        let separator = self.config.separator;
        let controller = decl.controller.name();
        let mut entries: Vec<(String, RoutingEntry)> = Vec::new();

        for op in &decl.operations {
            let descriptor = Arc::new(OperationDescriptor::from_decl(controller, op)?);
            let path = canonical_path(&build_route_path(&decl.address, &op.address, separator), separator);

            let idx = match entries.iter().position(|(p, _)| *p == path) {
                Some(idx) => idx,
                None => {
                    entries.push((path, RoutingEntry::new(decl.controller.clone())));
                    entries.len() - 1
                }
            };
            let (path, entry) = &mut entries[idx];
            entry.bind(path, &op.verbs, &descriptor)?;

            debug!(
                controller = controller,
                operation = %op.name,
                path = %path,
                verbs = ?op.verbs,
                url_params = descriptor.url_param_count(),
                "Operation registered"
            );
        }

        // All or nothing: no path of this controller is inserted if one is taken.
        if let Some((path, _)) = entries.iter().find(|(path, _)| self.trie.get(path).is_some()) {
            return Err(RouterError::DuplicateRoute {
                path: path.clone(),
                verb: None,
            });
        }
        for (path, entry) in entries {
            self.trie.register_data(&path, entry)?;
        }
        self.operations += decl.operations.len();
        Ok(self)
    }

    /// Register every declaration of `provider`.
    pub fn register_all<P>(&mut self, provider: &P) -> anyhow::Result<&mut Self>
    where
        P: DeclarationProvider + ?Sized,
    {
        for decl in provider.declarations()? {
            self.register(&decl)?;
        }
        Ok(self)
    }

    /// Freeze the trie. No route can be added afterwards.
    #[must_use]
    pub fn build(self) -> Router {
        let router = Router {
            trie: self.trie,
            cache: TargetCache::new(),
            config: self.config,
        };

        let routes = router.routes();
        let routes_summary: Vec<String> = routes
            .iter()
            .take(10)
            .map(|r| format!("{} {} -> {}::{}", r.verb, r.path, r.controller, r.operation))
            .collect();
        info!(
            routes_count = routes.len(),
            paths_count = router.trie.len(),
            operations_count = self.operations,
            context_path = %router.config.context_path,
            routes_summary = ?routes_summary,
            "Routing table loaded"
        );
        router
    }
}

/// Resolves request paths and verbs to controller operations.
///
/// Immutable once built: `resolve` only reads the trie and touches the
/// [`TargetCache`], so a `Router` can be shared across threads behind an
/// `Arc`.
#[derive(Debug)]
pub struct Router {
    trie: PathTrie<RoutingEntry>,
    cache: TargetCache,
    config: RouterConfig,
}

impl Router {
    #[must_use]
    pub fn builder(config: RouterConfig) -> RouterBuilder {
        RouterBuilder::new(config)
    }

    /// Router with the default configuration over `decls`.
    pub fn new<'a>(decls: impl IntoIterator<Item = &'a ControllerDecl>) -> Result<Self, RouterError> {
        let mut builder = RouterBuilder::new(RouterConfig::default());
        for decl in decls {
            builder.register(decl)?;
        }
        Ok(builder.build())
    }

    pub fn from_provider<P>(provider: &P, config: RouterConfig) -> anyhow::Result<Self>
    where
        P: DeclarationProvider + ?Sized,
    {
        let mut builder = RouterBuilder::new(config);
        builder.register_all(provider)?;
        Ok(builder.build())
    }

    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    #[must_use]
    pub fn cache(&self) -> &TargetCache {
        &self.cache
    }

    /// Match `path` and `verb` to a controller operation without creating
    /// the controller.
    pub fn match_route(&self, path: &str, verb: HttpVerb) -> Result<RouteMatch, RouterError> {
        let (entry, url_params) = self.lookup(path)?;
        self.check_operation(path, entry, verb, url_params)
    }

    /// Resolve `path` and `verb` to the shared controller instance and the
    /// operation to run.
    pub fn resolve(&self, path: &str, verb: HttpVerb) -> Result<ResolvedRoute, RouterError> {
        debug!(path = %path, verb = %verb, "Route resolve attempt");
        let matched = self.match_route(path, verb)?;
        self.instantiate(matched)
    }

    /// [`Router::resolve`] for an [`http::Method`]. A method without a
    /// routable verb on an existing route is `VerbNotAllowed`.
    pub fn resolve_method(&self, method: &Method, path: &str) -> Result<ResolvedRoute, RouterError> {
        debug!(path = %path, method = %method, "Route resolve attempt");
        let (entry, url_params) = self.lookup(path)?;
        let verb = HttpVerb::try_from(method).map_err(|_| {
            warn!(path = %path, method = %method, "Unsupported method");
            RouterError::VerbNotAllowed {
                path: path.to_string(),
                verb: method.as_str().to_string(),
                allowed: entry.verbs(),
            }
        })?;
        let matched = self.check_operation(path, entry, verb, url_params)?;
        self.instantiate(matched)
    }

    /// Create every registered controller now, surfacing instantiation
    /// failures before traffic is served.
    pub fn warm_up(&self) -> Result<usize, RouterError> {
        let entries = self.trie.entries();
        self.cache
            .warm_up(entries.iter().map(|(_, entry)| entry.controller()))
    }

    /// Routing table, sorted by path then verb.
    #[must_use]
    pub fn routes(&self) -> Vec<RouteInfo> {
        let mut routes = Vec::new();
        for (path, entry) in self.trie.entries() {
            for verb in entry.verbs() {
                if let Some(op) = entry.operation_for(verb) {
                    routes.push(RouteInfo {
                        path: path.clone(),
                        verb,
                        controller: entry.controller().name(),
                        operation: op.name().to_string(),
                        url_params: op.url_param_count(),
                    });
                }
            }
        }
        routes
    }

    /// Print all registered routes to stdout.
    pub fn dump_routes(&self) {
        let routes = self.routes();
        println!(
            "[routes] context_path={} count={}",
            self.config.context_path,
            routes.len()
        );
        for route in routes {
            println!(
                "[route] {} /{} -> {}::{} (url params: {})",
                route.verb, route.path, route.controller, route.operation, route.url_params
            );
        }
    }

    fn lookup(&self, path: &str) -> Result<(&RoutingEntry, ParamVec), RouterError> {
        let matched = self.trie.try_to_resolve(path);
        let Some(entry) = matched.data() else {
            warn!(path = %path, consumed = matched.consumed, "No route matched");
            return Err(RouterError::RouteNotFound {
                path: path.to_string(),
            });
        };

        let url_params = matched
            .leftover
            .iter()
            .map(|segment| {
                if self.config.preserve_param_case {
                    (*segment).to_string()
                } else {
                    segment.to_lowercase()
                }
            })
            .collect();
        Ok((entry, url_params))
    }

    fn check_operation(
        &self,
        path: &str,
        entry: &RoutingEntry,
        verb: HttpVerb,
        url_params: ParamVec,
    ) -> Result<RouteMatch, RouterError> {
        let Some(operation) = entry.operation_for(verb) else {
            warn!(path = %path, verb = %verb, allowed = ?entry.verbs(), "Verb not allowed");
            return Err(RouterError::VerbNotAllowed {
                path: path.to_string(),
                verb: verb.to_string(),
                allowed: entry.verbs(),
            });
        };

        if operation.url_param_count() != url_params.len() {
            warn!(
                path = %path,
                verb = %verb,
                operation = operation.name(),
                expected = operation.url_param_count(),
                actual = url_params.len(),
                "Leftover segments do not fit the operation"
            );
            return Err(RouterError::UnresolvableUrl {
                path: path.to_string(),
                expected: operation.url_param_count(),
                actual: url_params.len(),
            });
        }

        debug!(
            path = %path,
            verb = %verb,
            controller = entry.controller().name(),
            operation = operation.name(),
            url_params = ?url_params,
            "Route matched"
        );
        Ok(RouteMatch {
            target: RouteTarget {
                controller: entry.controller().clone(),
                operation: Arc::clone(operation),
            },
            url_params,
        })
    }

    fn instantiate(&self, matched: RouteMatch) -> Result<ResolvedRoute, RouterError> {
        let instance = self.cache.get_or_create(&matched.target.controller)?;
        Ok(ResolvedRoute {
            instance,
            target: matched.target,
            url_params: matched.url_params,
        })
    }
}
