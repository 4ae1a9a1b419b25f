use crate::auth::{self, middleware::require_role};
use crate::handlers;
use crate::middleware::add_security_headers;
use crate::models::user::Role;
use crate::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Builds the application router. The session layer is added by the caller
/// so the server and the tests can pick their own store.
pub fn build_router(app_state: AppState) -> Router {
    // Editor-only routes; viewers are bounced to the project list
    let editor_routes = Router::new()
        .route(
            "/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route("/users/block/{id}", post(handlers::block_user))
        .route("/users/unblock/{id}", post(handlers::unblock_user))
        .route("/users/delete/{id}", post(handlers::delete_user))
        .route_layer(middleware::from_fn_with_state(Role::Editor, require_role));

    let protected_routes = Router::new()
        .route("/", get(handlers::list_projects))
        .route("/obras/add", post(handlers::add_project))
        .route("/gastos/{obra_id}", get(handlers::view_expenses))
        .route("/gastos/add/{obra_id}", post(handlers::add_expense))
        .route(
            "/gastos/delete/{obra_id}/{gasto_id}",
            post(handlers::delete_expense),
        )
        .route("/graficos", get(handlers::charts_page))
        .route("/api/gastos_tipos", get(handlers::category_totals))
        .route("/export/excel/{obra_id}", get(handlers::export_excel))
        .route("/export/pdf/{obra_id}", get(handlers::export_pdf))
        .route("/mensagens", get(handlers::chat_page))
        .route("/ws/chat", get(handlers::chat_socket))
        .route("/logout", get(auth::handlers::logout_handler))
        .merge(editor_routes)
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth::middleware::require_auth,
        ));

    let public_routes = Router::new()
        .route(
            "/login",
            get(auth::handlers::login_page).post(auth::handlers::login_handler),
        )
        .route(
            "/register",
            get(auth::handlers::register_page).post(auth::handlers::register_handler),
        )
        .route_layer(middleware::from_fn(
            auth::middleware::redirect_if_authenticated,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .nest_service("/static", ServeDir::new("static"))
        .layer(middleware::from_fn(add_security_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
