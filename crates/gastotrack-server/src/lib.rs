//! GastoTrack Web Server
//!
//! Axum-based REST API for the GastoTrack expense tracker.
//!
//! - JSON API under `/api` (expenses CRUD, statistics, filters, budgets)
//! - App info and health endpoints at the root
//! - Restrictive CORS policy, opt-in origins
//! - Spanish error envelope `{error, mensaje?, sugerencia?, errores?}`
//!   with sanitized internal errors (full detail only in logs)

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info};

use gastotrack_core::db::Database;

mod handlers;

/// Default page size for expense listings
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum pagination limit
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    pub db: Database,
}

/// Create the application router
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    let state = Arc::new(AppState { db });

    let api_routes = Router::new()
        // Expenses
        .route(
            "/gastos",
            get(handlers::list_expenses).post(handlers::create_expense),
        )
        .route("/gastos/estadisticas", get(handlers::get_statistics))
        .route("/gastos/filtrar", axum::routing::post(handlers::filter_expenses))
        .route(
            "/gastos/:id",
            get(handlers::get_expense)
                .put(handlers::update_expense)
                .delete(handlers::delete_expense),
        )
        // Categories
        .route("/categorias", get(handlers::list_categories))
        // Filter helpers
        .route("/filtros/rangos", get(handlers::suggested_ranges))
        // Budgets
        .route(
            "/presupuestos",
            get(handlers::list_budgets).post(handlers::create_budget),
        )
        .route("/presupuestos/alertas", get(handlers::budget_alerts))
        .route(
            "/presupuestos/:categoria/progreso",
            get(handlers::budget_progress),
        );

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE])
    };

    let mut app = Router::new()
        .route("/", get(handlers::app_info))
        .route("/health", get(handlers::health))
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ));

    // Serve static front-end files if a directory was provided, otherwise
    // answer unknown routes with the JSON not-found envelope
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    } else {
        app = app.fallback(handler_not_found);
    }

    app
}

/// Fallback for unknown routes
async fn handler_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": "Endpoint no encontrado",
            "mensaje": "La ruta solicitada no existe en esta API",
            "sugerencia": "Revisa la documentación en GET /"
        })),
    )
        .into_response()
}

/// Start the server
pub async fn serve(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    let app = create_router(db, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error with proper HTTP status codes and the Spanish JSON
/// error envelope used across the API.
pub struct AppError {
    status: StatusCode,
    error: String,
    message: Option<String>,
    suggestion: Option<String>,
    /// Field-level validation messages (`errores` on the wire)
    errors: Option<Vec<String>>,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: msg.to_string(),
            message: None,
            suggestion: None,
            errors: None,
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: msg.to_string(),
            message: None,
            suggestion: None,
            errors: None,
            internal: None,
        }
    }

    /// Validation failure carrying the field-level messages
    pub fn validation(errors: Vec<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: "Datos inválidos".to_string(),
            message: None,
            suggestion: None,
            errors: Some(errors),
            internal: None,
        }
    }

    /// Malformed or missing request body
    pub fn invalid_body() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: "Solicitud incorrecta".to_string(),
            message: Some("Los datos enviados no son válidos".to_string()),
            suggestion: Some("Revisa el formato JSON y los campos requeridos".to_string()),
            errors: None,
            internal: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.suggestion = Some(suggestion.to_string());
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let mut body = serde_json::Map::new();
        body.insert("error".to_string(), serde_json::json!(self.error));
        if let Some(message) = self.message {
            body.insert("mensaje".to_string(), serde_json::json!(message));
        }
        if let Some(suggestion) = self.suggestion {
            body.insert("sugerencia".to_string(), serde_json::json!(suggestion));
        }
        if let Some(errors) = self.errors {
            body.insert("errores".to_string(), serde_json::json!(errors));
        }

        (self.status, Json(serde_json::Value::Object(body))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            error: "Error interno del servidor".to_string(),
            message: Some("Ocurrió un error inesperado".to_string()),
            suggestion: Some("Contacta al administrador si el problema persiste".to_string()),
            errors: None,
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;
