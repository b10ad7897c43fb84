#![allow(clippy::unwrap_used, clippy::expect_used)]

use htf_router::controllers::{self, PetController, UserController};
use htf_router::declaration::{
    Controller, ControllerDecl, ControllerType, DeclarationProvider, HttpVerb, OperationDecl,
    ParamRole, Respondable, ResultContract, StaticRegistry,
};
use htf_router::dispatcher::{CallArgs, HandlerResponse};
use htf_router::router::{Router, RouterBuilder};
use htf_router::{RouterConfig, RouterError};
use http::{Method, StatusCode};

fn router() -> Router {
    Router::new(&controllers::declarations()).expect("sample controllers register")
}

fn assert_route(router: &Router, verb: HttpVerb, path: &str, operation: &str, params: &[&str]) {
    let resolved = router
        .resolve(path, verb)
        .unwrap_or_else(|e| panic!("{verb} {path}: {e}"));
    assert_eq!(resolved.operation().name(), operation, "{verb} {path}");
    assert_eq!(resolved.url_params.as_slice(), params, "{verb} {path}");
}

#[test]
fn test_sample_routes() {
    let router = router();
    assert_route(&router, HttpVerb::Get, "/user/list", "list", &[]);
    assert_route(&router, HttpVerb::Get, "/user/get/42", "get", &["42"]);
    assert_route(&router, HttpVerb::Get, "/pet", "list", &[]);
    assert_route(&router, HttpVerb::Post, "/pet", "add", &[]);
    assert_route(&router, HttpVerb::Delete, "/pet/7", "remove", &["7"]);
    assert_route(&router, HttpVerb::Get, "/pet/find/7", "find", &["7"]);
}

#[test]
fn test_error_kinds_and_status() {
    let router = router();

    let err = router.resolve("/user/get", HttpVerb::Get).unwrap_err();
    assert!(matches!(err, RouterError::UnresolvableUrl { .. }));
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

    let err = router.resolve("/user/list", HttpVerb::Post).unwrap_err();
    assert!(matches!(err, RouterError::VerbNotAllowed { .. }));
    assert_eq!(err.status_code(), StatusCode::METHOD_NOT_ALLOWED);

    let err = router.resolve("/ghost/x", HttpVerb::Get).unwrap_err();
    assert!(matches!(err, RouterError::RouteNotFound { .. }));
    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
}

#[test]
fn test_merged_verbs_keep_their_own_param_counts() {
    let router = router();
    // GET pet takes no url parameter, DELETE pet takes one
    assert!(matches!(
        router.resolve("/pet/7", HttpVerb::Get),
        Err(RouterError::UnresolvableUrl { expected: 0, actual: 1, .. })
    ));
    assert!(matches!(
        router.resolve("/pet", HttpVerb::Delete),
        Err(RouterError::UnresolvableUrl { expected: 1, actual: 0, .. })
    ));
    assert!(matches!(
        router.resolve("/pet", HttpVerb::Put),
        Err(RouterError::VerbNotAllowed { .. })
    ));
}

#[test]
fn test_literal_child_wins_over_param() {
    let router = router();
    // "find" is a literal child of "pet", so it is never taken as a pet id
    match router.resolve("/pet/find", HttpVerb::Delete).unwrap_err() {
        RouterError::VerbNotAllowed { path, allowed, .. } => {
            assert_eq!(path, "/pet/find");
            assert_eq!(allowed, vec![HttpVerb::Get]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_resolve_method() {
    let router = router();
    let resolved = router.resolve_method(&Method::DELETE, "/pet/3").unwrap();
    assert_eq!(resolved.operation().name(), "remove");
    assert_eq!(resolved.target.controller, ControllerType::of::<PetController>());

    match router.resolve_method(&Method::OPTIONS, "/pet").unwrap_err() {
        RouterError::VerbNotAllowed { allowed, .. } => {
            assert_eq!(allowed, vec![HttpVerb::Delete, HttpVerb::Get, HttpVerb::Post]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_from_provider_with_config() {
    let config = RouterConfig {
        separator: ':',
        ..RouterConfig::default()
    };
    let router = Router::from_provider(&controllers::registry(), config).unwrap();
    assert_route(&router, HttpVerb::Get, "user:get:42", "get", &["42"]);
    assert!(router.resolve("/user/get/42", HttpVerb::Get).is_err());
}

#[test]
fn test_registration_is_case_insensitive() {
    let decl = ControllerDecl::new(ControllerType::of::<UserController>(), "/Accounts/")
        .operation(OperationDecl::new("list").at("/ListAll").verb(HttpVerb::Get));
    let router = Router::new(&[decl]).unwrap();
    assert_route(&router, HttpVerb::Get, "accounts/listall", "list", &[]);
    assert_route(&router, HttpVerb::Get, "ACCOUNTS/LISTALL", "list", &[]);
    assert_eq!(router.routes()[0].path, "accounts/listall");
}

struct Plain;

impl Controller for Plain {
    fn invoke(&self, _operation: &str, _args: CallArgs) -> anyhow::Result<Box<dyn Respondable>> {
        Ok(Box::new(HandlerResponse::json(200, serde_json::Value::Null)))
    }
}

#[test]
fn test_non_respondable_result_rejected() {
    let decl = ControllerDecl::new(ControllerType::with_factory::<Plain>(|| Ok(Plain)), "plain")
        .operation(
            OperationDecl::new("text")
                .verb(HttpVerb::Get)
                .returns(ResultContract::plain::<String>()),
        );
    let err = Router::new(&[decl]).unwrap_err();
    assert!(err.is_registration_error());
    assert!(matches!(err, RouterError::InvalidDeclaration { ref operation, .. } if operation == "text"));
}

#[test]
fn test_duplicate_across_controllers() {
    let mut registry = StaticRegistry::new();
    registry.register(UserController::declaration()).register(
        ControllerDecl::new(ControllerType::with_factory::<Plain>(|| Ok(Plain)), "user")
            .operation(OperationDecl::new("other").at("get").verb(HttpVerb::Put)),
    );
    assert_eq!(registry.len(), 2);

    let err = Router::from_provider(&registry, RouterConfig::default()).unwrap_err();
    let err = err.downcast::<RouterError>().unwrap();
    assert!(matches!(err, RouterError::DuplicateRoute { ref path, verb: None } if path == "user/get"));
}

struct FailingProvider;

impl DeclarationProvider for FailingProvider {
    fn declarations(&self) -> anyhow::Result<Vec<ControllerDecl>> {
        anyhow::bail!("plugin directory missing")
    }
}

#[test]
fn test_provider_failure_propagates() {
    let mut builder = RouterBuilder::new(RouterConfig::default());
    let err = builder.register_all(&FailingProvider).unwrap_err();
    assert!(err.to_string().contains("plugin directory missing"));
}

#[test]
fn test_routes_listing_is_sorted() {
    let router = router();
    let rows: Vec<(String, HttpVerb, &str)> = router
        .routes()
        .into_iter()
        .map(|r| (r.path, r.verb, r.controller))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("pet".to_string(), HttpVerb::Delete, "PetController"),
            ("pet".to_string(), HttpVerb::Get, "PetController"),
            ("pet".to_string(), HttpVerb::Post, "PetController"),
            ("pet/find".to_string(), HttpVerb::Get, "PetController"),
            ("user/get".to_string(), HttpVerb::Get, "UserController"),
            ("user/list".to_string(), HttpVerb::Get, "UserController"),
        ]
    );
}

#[test]
fn test_param_declaration_roles_do_not_count_as_url_params() {
    let decl = ControllerDecl::new(ControllerType::of::<UserController>(), "search")
        .operation(
            OperationDecl::new("find")
                .verb(HttpVerb::Get)
                .param(ParamRole::FromQuery("q".into()))
                .param(ParamRole::Other),
        );
    let router = Router::new(&[decl]).unwrap();
    assert_route(&router, HttpVerb::Get, "/search", "find", &[]);
    assert!(router.resolve("/search/x", HttpVerb::Get).is_err());
}
