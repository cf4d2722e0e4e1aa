//! Advanced filtering endpoints
//!
//! The filter endpoint keeps its own `{success, ...}` response shape,
//! separate from the error envelope used by the CRUD routes.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use gastotrack_core::models::{parse_date, Category};
use gastotrack_core::stats::{self, suggested_ranges as ranges_for};
use gastotrack_core::ExpenseFilter;

use crate::AppState;

use super::parse_number;

#[derive(Debug, Default, Deserialize)]
pub struct FilterRequest {
    #[serde(rename = "fecha_inicio")]
    date_from: Option<String>,
    #[serde(rename = "fecha_fin")]
    date_to: Option<String>,
    #[serde(rename = "categorias")]
    categories: Option<Vec<String>>,
    #[serde(rename = "origen")]
    origin: Option<String>,
    #[serde(rename = "monto_min")]
    amount_min: Option<serde_json::Value>,
    #[serde(rename = "monto_max")]
    amount_max: Option<serde_json::Value>,
    #[serde(rename = "busqueda")]
    search: Option<String>,
}

/// POST /api/gastos/filtrar
pub async fn filter_expenses(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    match run_filter(&state, &body) {
        Ok(response) => response,
        Err(message) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": message })),
        )
            .into_response(),
    }
}

fn run_filter(state: &AppState, body: &Bytes) -> Result<Response, String> {
    let request: FilterRequest = if body.is_empty() {
        FilterRequest::default()
    } else {
        serde_json::from_slice(body).map_err(|_| "Los filtros enviados no son válidos".to_string())?
    };

    let date_from = parse_filter_date(request.date_from.as_deref(), "fecha_inicio")?;
    let date_to = parse_filter_date(request.date_to.as_deref(), "fecha_fin")?;

    let categories = match &request.categories {
        None => None,
        Some(names) if names.is_empty() => None,
        Some(names) => {
            let mut parsed = Vec::with_capacity(names.len());
            for name in names {
                parsed.push(name.parse::<Category>().map_err(|_| {
                    format!(
                        "Categoría inválida: {}. Debe ser una de: {}",
                        name,
                        Category::allowed_list()
                    )
                })?);
            }
            Some(parsed)
        }
    };

    let amount_min = parse_filter_amount(request.amount_min.as_ref(), "monto_min")?;
    let amount_max = parse_filter_amount(request.amount_max.as_ref(), "monto_max")?;

    let filter = ExpenseFilter::new()
        .date_from(date_from)
        .date_to(date_to)
        .categories(categories.as_deref())
        .origin(request.origin.as_deref().filter(|s| !s.is_empty()))
        .search(request.search.as_deref().filter(|s| !s.is_empty()))
        .amount_min(amount_min)
        .amount_max(amount_max);

    let expenses = state
        .db
        .filter_expenses(filter)
        .map_err(|e| format!("Error al filtrar gastos: {}", e))?;
    let summary = stats::summarize(&expenses);
    let total = expenses.len();

    Ok(Json(json!({
        "success": true,
        "gastos": expenses,
        "estadisticas": summary,
        "total_resultados": total,
    }))
    .into_response())
}

/// GET /api/filtros/rangos
pub async fn suggested_ranges() -> Json<serde_json::Value> {
    let ranges = ranges_for(chrono::Local::now().date_naive());
    Json(json!({ "rangos": ranges }))
}

fn parse_filter_date(
    raw: Option<&str>,
    field: &str,
) -> Result<Option<chrono::NaiveDate>, String> {
    match raw.filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(text) => parse_date(text)
            .map(Some)
            .ok_or_else(|| format!("{} debe tener formato DD-MM-YYYY", field)),
    }
}

fn parse_filter_amount(
    raw: Option<&serde_json::Value>,
    field: &str,
) -> Result<Option<f64>, String> {
    match raw {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(value) => parse_number(value)
            .map(Some)
            .ok_or_else(|| format!("{} debe ser un número válido", field)),
    }
}
