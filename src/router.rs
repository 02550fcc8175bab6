use crate::auth::authenticate;
use crate::handlers::{
    competitions::{create_competition, delete_competition, get_competition, get_competitions},
    contact::send_contact,
    health::health_check,
    pronostics::{
        create_pronostic, delete_pronostic, get_pronostic, get_pronostics, update_pronostic,
    },
    sessions::{login, logout},
    sports::{create_sport, delete_sport, get_sport, get_sports},
    subscriptions::{cancel_subscription, create_subscription, get_subscriptions},
    tickets::{create_ticket, delete_ticket, get_ticket, get_tickets, update_ticket},
    users::{
        change_email, change_password, create_user, delete_current_user, get_current_user,
        get_user, get_users,
    },
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Users
        .route("/api/v1/users", post(create_user).get(get_users))
        .route(
            "/api/v1/users/me",
            get(get_current_user).delete(delete_current_user),
        )
        .route("/api/v1/users/:user_id", get(get_user))
        .route("/api/v1/users/change_password", post(change_password))
        .route("/api/v1/users/change_email", post(change_email))
        // Sessions
        .route("/api/v1/login", post(login))
        .route("/api/v1/logout", post(logout))
        // Subscriptions
        .route("/api/v1/subscription", post(create_subscription))
        .route("/api/v1/users/subscription", get(get_subscriptions))
        .route(
            "/api/v1/users/subscription/:subscription_id",
            axum::routing::delete(cancel_subscription),
        )
        // Tickets and pronostics
        .route("/api/v1/tickets", post(create_ticket).get(get_tickets))
        .route(
            "/api/v1/tickets/:ticket_id",
            get(get_ticket).put(update_ticket).delete(delete_ticket),
        )
        .route("/api/v1/pronostics", post(create_pronostic).get(get_pronostics))
        .route(
            "/api/v1/pronostics/:pronostic_id",
            get(get_pronostic)
                .put(update_pronostic)
                .delete(delete_pronostic),
        )
        // Catalog
        .route("/api/v1/sports", post(create_sport).get(get_sports))
        .route("/api/v1/sports/:sport_id", get(get_sport).delete(delete_sport))
        .route(
            "/api/v1/competitions",
            post(create_competition).get(get_competitions),
        )
        .route(
            "/api/v1/competitions/:competition_id",
            get(get_competition).delete(delete_competition),
        )
        // Contact form
        .route("/api/v1/contact", post(send_contact))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Bearer token resolution runs before every handler
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
