//! Monthly budget handlers

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use gastotrack_core::models::Category;

use crate::{AppError, AppState};

use super::parse_number;

#[derive(Debug, Deserialize)]
struct BudgetInput {
    #[serde(rename = "categoria")]
    category: Option<String>,
    #[serde(rename = "limite_mensual")]
    monthly_limit: Option<serde_json::Value>,
}

/// GET /api/presupuestos
///
/// Current-month progress for every budgeted category plus active alerts.
pub async fn list_budgets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let today = chrono::Local::now().date_naive();

    let mut progress = Vec::new();
    for category in Category::ALL {
        if let Some(p) = state.db.budget_progress(category, today)? {
            progress.push(p);
        }
    }

    let alerts = state.db.budget_alerts(today)?;

    Ok(Json(json!({
        "presupuestos": progress,
        "alertas": alerts,
    })))
}

/// POST /api/presupuestos
pub async fn create_budget(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    if body.is_empty() {
        return Err(AppError::bad_request("No se enviaron datos"));
    }
    let input: BudgetInput =
        serde_json::from_slice(&body).map_err(|_| AppError::invalid_body())?;

    let mut errors = Vec::new();

    let category = match input.category.as_deref().filter(|s| !s.is_empty()) {
        None => {
            errors.push("La categoría es obligatoria".to_string());
            None
        }
        Some(name) => match name.parse::<Category>() {
            Ok(c) => Some(c),
            Err(_) => {
                errors.push(format!(
                    "La categoría debe ser una de: {}",
                    Category::allowed_list()
                ));
                None
            }
        },
    };

    let limit = match &input.monthly_limit {
        None => {
            errors.push("El límite mensual es obligatorio".to_string());
            None
        }
        Some(value) => match parse_number(value) {
            None => {
                errors.push("El límite mensual debe ser un número válido".to_string());
                None
            }
            Some(n) if n <= 0.0 => {
                errors.push("El límite mensual debe ser mayor a 0".to_string());
                None
            }
            Some(n) => Some(n),
        },
    };

    let (category, limit) = match (category, limit) {
        (Some(c), Some(l)) if errors.is_empty() => (c, l),
        _ => return Err(AppError::validation(errors)),
    };

    let today = chrono::Local::now().date_naive();
    let budget = state.db.create_budget(category, limit, today)?;
    info!(category = %category, limit, "Budget created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "mensaje": format!("Presupuesto para {} creado exitosamente", category),
            "presupuesto": budget,
        })),
    ))
}

/// GET /api/presupuestos/:categoria/progreso
pub async fn budget_progress(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let category = category.parse::<Category>().map_err(|_| {
        AppError::bad_request(&format!(
            "Categoría inválida. Debe ser una de: {}",
            Category::allowed_list()
        ))
    })?;

    let today = chrono::Local::now().date_naive();

    // No budget at all for the month, distinct from a fully unspent one
    let progress = state
        .db
        .budget_progress(category, today)?
        .ok_or_else(|| AppError::not_found("No hay presupuesto para esta categoría"))?;

    Ok(Json(json!({ "progreso": progress })))
}

/// GET /api/presupuestos/alertas
pub async fn budget_alerts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let alerts = state.db.budget_alerts(chrono::Local::now().date_naive())?;
    Ok(Json(json!({ "alertas": alerts })))
}
