use axum::{
    http::{header, Method},
    middleware,
    routing::{delete, get, post, put, MethodRouter},
    Router,
};
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::debug;

use crate::auth::{self, require_admin, require_token};
use crate::employee;
use crate::shared::AppState;
use crate::user;

/// Deadline applied to every request
///
/// A request that runs past it is answered with 408 and an empty body; the
/// connection is not dropped.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A single interceptor: inspects the request and either rejects it or passes it on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    RequireToken,
    RequireAdmin,
}

/// Access level declared by each route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Admin,
}

impl Access {
    /// Interceptors in the order they see the request
    pub fn guards(self) -> &'static [Guard] {
        match self {
            Access::Public => &[],
            Access::Authenticated => &[Guard::RequireToken],
            Access::Admin => &[Guard::RequireToken, Guard::RequireAdmin],
        }
    }
}

/// The HTTP surface: path, method-bound handler, access level
pub fn route_table() -> Vec<(&'static str, MethodRouter<AppState>, Access)> {
    vec![
        ("/login", post(auth::login), Access::Public),
        ("/employee", get(employee::get_employee), Access::Authenticated),
        ("/employees", get(employee::list_employees), Access::Authenticated),
        ("/add_employee", post(employee::create_employee), Access::Admin),
        ("/delete_employee", delete(employee::delete_employee), Access::Admin),
        ("/update_employee", post(employee::update_employee), Access::Admin),
        ("/user", get(user::get_user), Access::Admin),
        ("/users", get(user::list_users), Access::Admin),
        ("/add_user", post(user::create_user), Access::Admin),
        ("/delete_user", delete(user::delete_user), Access::Admin),
        ("/update_user", put(user::update_user), Access::Admin),
    ]
}

/// Wraps an endpoint in its guards. Layers nest outward, so the first guard is applied last.
/// Route layers only see requests whose method matched; a wrong method gets 405 unguarded.
fn guarded(
    endpoint: MethodRouter<AppState>,
    access: Access,
    state: &AppState,
) -> MethodRouter<AppState> {
    access
        .guards()
        .iter()
        .rev()
        .fold(endpoint, |endpoint, guard| match guard {
            Guard::RequireToken => endpoint.route_layer(middleware::from_fn_with_state(
                state.clone(),
                require_token,
            )),
            Guard::RequireAdmin => endpoint.route_layer(middleware::from_fn(require_admin)),
        })
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Builds the application router with every route, interceptor and serving layer
pub fn build_router(state: AppState) -> Router {
    let router = route_table()
        .into_iter()
        .fold(Router::new(), |router, (path, endpoint, access)| {
            debug!(path, ?access, "Registering route");
            router.route(path, guarded(endpoint, access, &state))
        });

    router
        .layer(cors_layer())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
