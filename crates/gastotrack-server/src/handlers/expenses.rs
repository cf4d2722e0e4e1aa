//! Expense CRUD, listing and statistics handlers

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use gastotrack_core::models::{parse_date, Category, Expense, ExpenseInput};

use crate::{AppError, AppState, DEFAULT_PAGE_SIZE, MAX_PAGE_LIMIT};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "pagina")]
    page: Option<i64>,
    #[serde(rename = "limite")]
    limit: Option<i64>,
    #[serde(rename = "categoria")]
    category: Option<String>,
    #[serde(rename = "fecha_desde")]
    date_from: Option<String>,
    #[serde(rename = "fecha_hasta")]
    date_to: Option<String>,
}

#[derive(Debug, Serialize)]
struct Pagination {
    #[serde(rename = "pagina_actual")]
    current_page: i64,
    #[serde(rename = "total_paginas")]
    total_pages: i64,
    #[serde(rename = "total_gastos")]
    total_expenses: i64,
    #[serde(rename = "limite")]
    limit: i64,
    #[serde(rename = "tiene_anterior")]
    has_previous: bool,
    #[serde(rename = "tiene_siguiente")]
    has_next: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ListResponse {
    #[serde(rename = "gastos")]
    expenses: Vec<Expense>,
    #[serde(rename = "paginacion")]
    pagination: Pagination,
    #[serde(rename = "filtros_aplicados")]
    applied_filters: serde_json::Value,
}

/// GET /api/gastos
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_LIMIT);

    let category = match query.category.as_deref().filter(|s| !s.is_empty()) {
        None => None,
        Some(name) => Some(name.parse::<Category>().map_err(|_| {
            AppError::bad_request(&format!(
                "Categoría inválida. Debe ser una de: {}",
                Category::allowed_list()
            ))
        })?),
    };

    let date_from = parse_query_date(query.date_from.as_deref())?;
    let date_to = parse_query_date(query.date_to.as_deref())?;

    let (expenses, total) = state
        .db
        .list_expenses(page, limit, category, date_from, date_to)?;

    let total_pages = if total == 0 { 0 } else { (total + limit - 1) / limit };

    Ok(Json(ListResponse {
        expenses,
        pagination: Pagination {
            current_page: page,
            total_pages,
            total_expenses: total,
            limit,
            has_previous: page > 1,
            has_next: page < total_pages,
        },
        applied_filters: json!({
            "categoria": query.category,
            "fecha_desde": query.date_from,
            "fecha_hasta": query.date_to,
        }),
    }))
}

/// GET /api/gastos/:id
pub async fn get_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = parse_id(&id)?;

    let expense = state
        .db
        .get_expense(id)?
        .ok_or_else(|| AppError::not_found("Gasto no encontrado"))?;

    Ok(Json(json!({ "gasto": expense })))
}

/// POST /api/gastos
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let input = parse_body(&body)?;

    let new = input
        .validate(chrono::Local::now().date_naive())
        .map_err(AppError::validation)?;

    let expense = state.db.insert_expense(&new)?;
    info!(id = expense.id, "Expense created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "mensaje": "Gasto creado exitosamente",
            "gasto": expense,
        })),
    ))
}

/// PUT /api/gastos/:id
pub async fn update_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = parse_id(&id)?;
    let input = parse_body(&body)?;

    let existing = state
        .db
        .get_expense(id)?
        .ok_or_else(|| AppError::not_found("Gasto no encontrado"))?;

    // Fields absent from the request keep their stored values
    let new = input
        .merged_with(&existing)
        .validate(chrono::Local::now().date_naive())
        .map_err(AppError::validation)?;

    let expense = state
        .db
        .update_expense(id, &new)?
        .ok_or_else(|| AppError::not_found("Gasto no encontrado"))?;
    info!(id = expense.id, "Expense updated");

    Ok(Json(json!({
        "mensaje": "Gasto actualizado exitosamente",
        "gasto": expense,
    })))
}

/// DELETE /api/gastos/:id
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = parse_id(&id)?;

    let removed = state
        .db
        .delete_expense(id)?
        .ok_or_else(|| AppError::not_found("Gasto no encontrado"))?;
    info!(id = removed.id, "Expense deleted");

    Ok(Json(json!({
        "mensaje": "Gasto eliminado exitosamente",
        "gasto_eliminado": removed,
    })))
}

/// GET /api/gastos/estadisticas
pub async fn get_statistics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let summary = state.db.overall_summary()?;
    let breakdown = state.db.category_breakdown()?;

    Ok(Json(json!({
        "resumen": summary,
        "por_categoria": breakdown,
    })))
}

/// GET /api/categorias
pub async fn list_categories() -> Json<serde_json::Value> {
    let categories: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
    Json(json!({ "categorias": categories }))
}

/// Path ids must be integers; anything else is a malformed request, not a
/// missing record
fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| AppError::bad_request("Identificador de gasto inválido"))
}

fn parse_body(body: &Bytes) -> Result<ExpenseInput, AppError> {
    if body.is_empty() {
        return Err(AppError::bad_request("No se enviaron datos"));
    }
    serde_json::from_slice(body).map_err(|_| AppError::invalid_body())
}

fn parse_query_date(raw: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match raw.filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(text) => parse_date(text).map(Some).ok_or_else(|| {
            AppError::bad_request("La fecha debe tener formato DD-MM-YYYY (ej: 25-12-2025)")
        }),
    }
}
