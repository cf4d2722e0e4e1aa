//! API integration tests

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use gastotrack_core::db::Database;
use gastotrack_core::models::{format_date, Category, NewExpense};

use crate::{create_router, ServerConfig};

fn test_app() -> (Router, Database) {
    let db = Database::in_memory().unwrap();
    let app = create_router(db.clone(), None, ServerConfig::default());
    (app, db)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = match body {
        Some(value) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn seed(db: &Database, description: &str, amount: f64, category: Category, date: &str) {
    db.insert_expense(&NewExpense {
        description: description.to_string(),
        amount,
        category,
        origin: None,
        date: date.to_string(),
    })
    .unwrap();
}

#[tokio::test]
async fn test_health() {
    let (app, _db) = test_app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["estado"], "saludable");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_app_info_lists_endpoints() {
    let (app, _db) = test_app();
    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["aplicacion"], "GastoTrack API");
    assert!(body["endpoints"]["gastos"].is_object());
}

#[tokio::test]
async fn test_unknown_route_envelope() {
    let (app, _db) = test_app();
    let (status, body) = send(&app, Method::GET, "/api/no-existe", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Endpoint no encontrado");
    assert!(body["sugerencia"].is_string());
}

#[tokio::test]
async fn test_create_and_get_round_trip() {
    let (app, _db) = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/gastos",
        Some(json!({
            "descripcion": "Almuerzo en restaurante",
            "monto": 25.50,
            "categoria": "Alimentación",
            "fecha": "15-01-2025",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["mensaje"], "Gasto creado exitosamente");
    let id = body["gasto"]["id"].as_i64().unwrap();

    let (status, body) = send(&app, Method::GET, &format!("/api/gastos/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["gasto"]["descripcion"], "Almuerzo en restaurante");
    assert_eq!(body["gasto"]["monto"], 25.50);
    assert_eq!(body["gasto"]["fecha"], "15-01-2025");
}

#[tokio::test]
async fn test_create_accepts_amount_as_string() {
    let (app, _db) = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/gastos",
        Some(json!({
            "descripcion": "Taxi al centro",
            "monto": "12.75",
            "categoria": "Transporte",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["gasto"]["monto"], 12.75);
}

#[tokio::test]
async fn test_create_validation_errors() {
    let (app, _db) = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/gastos",
        Some(json!({
            "descripcion": "ab",
            "monto": 10.0,
            "categoria": "Alimentación",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Datos inválidos");
    let errors = body["errores"].as_array().unwrap();
    assert!(errors.iter().any(|e| e.as_str().unwrap().contains("al menos 3")));
}

#[tokio::test]
async fn test_create_empty_body() {
    let (app, _db) = test_app();
    let (status, body) = send(&app, Method::POST, "/api/gastos", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No se enviaron datos");
}

#[tokio::test]
async fn test_get_malformed_id_is_bad_request() {
    let (app, _db) = test_app();
    let (status, body) = send(&app, Method::GET, "/api/gastos/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Identificador de gasto inválido");
}

#[tokio::test]
async fn test_get_unknown_id_is_not_found() {
    let (app, _db) = test_app();
    let (status, body) = send(&app, Method::GET, "/api/gastos/9999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Gasto no encontrado");
}

#[tokio::test]
async fn test_list_pagination_flags() {
    let (app, db) = test_app();
    for day in 1..=3 {
        seed(
            &db,
            &format!("Gasto {}", day),
            10.0,
            Category::Other,
            &format!("{:02}-01-2025", day),
        );
    }

    let (status, body) = send(&app, Method::GET, "/api/gastos?limite=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["gastos"].as_array().unwrap().len(), 2);
    let pagination = &body["paginacion"];
    assert_eq!(pagination["pagina_actual"], 1);
    assert_eq!(pagination["total_paginas"], 2);
    assert_eq!(pagination["total_gastos"], 3);
    assert_eq!(pagination["limite"], 2);
    assert_eq!(pagination["tiene_anterior"], false);
    assert_eq!(pagination["tiene_siguiente"], true);

    let (_, body) = send(&app, Method::GET, "/api/gastos?limite=2&pagina=2", None).await;
    assert_eq!(body["gastos"].as_array().unwrap().len(), 1);
    assert_eq!(body["paginacion"]["tiene_anterior"], true);
    assert_eq!(body["paginacion"]["tiene_siguiente"], false);
}

#[tokio::test]
async fn test_list_filters_by_category_and_dates() {
    let (app, db) = test_app();
    seed(&db, "Pan", 3.0, Category::Food, "15-01-2025");
    seed(&db, "Bus", 2.0, Category::Transport, "10-01-2025");
    seed(&db, "Cine", 8.0, Category::Entertainment, "10-02-2025");

    let uri = "/api/gastos?categoria=Alimentaci%C3%B3n";
    let (status, body) = send(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["paginacion"]["total_gastos"], 1);
    assert_eq!(body["gastos"][0]["descripcion"], "Pan");
    assert_eq!(body["filtros_aplicados"]["categoria"], "Alimentación");

    let uri = "/api/gastos?fecha_desde=01-01-2025&fecha_hasta=31-01-2025";
    let (_, body) = send(&app, Method::GET, uri, None).await;
    assert_eq!(body["paginacion"]["total_gastos"], 2);
}

#[tokio::test]
async fn test_list_rejects_unknown_category() {
    let (app, _db) = test_app();
    let (status, body) = send(&app, Method::GET, "/api/gastos?categoria=Viajes", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Categoría inválida"));
}

#[tokio::test]
async fn test_update_keeps_missing_fields() {
    let (app, db) = test_app();
    seed(&db, "Cena familiar", 30.0, Category::Food, "10-01-2025");
    let id = db.list_expenses(1, 10, None, None, None).unwrap().0[0].id;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/gastos/{}", id),
        Some(json!({ "monto": 45.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mensaje"], "Gasto actualizado exitosamente");
    assert_eq!(body["gasto"]["descripcion"], "Cena familiar");
    assert_eq!(body["gasto"]["monto"], 45.0);
    assert_eq!(body["gasto"]["fecha"], "10-01-2025");
}

#[tokio::test]
async fn test_update_unknown_id() {
    let (app, _db) = test_app();
    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/gastos/9999",
        Some(json!({ "monto": 45.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_twice() {
    let (app, db) = test_app();
    seed(&db, "Suscripción", 9.99, Category::Services, "01-01-2025");
    let id = db.list_expenses(1, 10, None, None, None).unwrap().0[0].id;

    let uri = format!("/api/gastos/{}", id);
    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mensaje"], "Gasto eliminado exitosamente");
    assert_eq!(body["gasto_eliminado"]["descripcion"], "Suscripción");

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_statistics() {
    let (app, db) = test_app();
    seed(&db, "Pan", 30.0, Category::Food, "10-01-2025");
    seed(&db, "Bus", 70.0, Category::Transport, "12-01-2025");

    let (status, body) = send(&app, Method::GET, "/api/gastos/estadisticas", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resumen"]["total"], 100.0);
    assert_eq!(body["resumen"]["cantidad"], 2);

    let breakdown = body["por_categoria"].as_array().unwrap();
    assert_eq!(breakdown.len(), Category::ALL.len());
    let food = breakdown
        .iter()
        .find(|b| b["categoria"] == "Alimentación")
        .unwrap();
    assert_eq!(food["porcentaje"], 30.0);
    assert!(food["color"].as_str().unwrap().starts_with('#'));
}

#[tokio::test]
async fn test_list_categories() {
    let (app, _db) = test_app();
    let (status, body) = send(&app, Method::GET, "/api/categorias", None).await;
    assert_eq!(status, StatusCode::OK);
    let categories = body["categorias"].as_array().unwrap();
    assert_eq!(categories.len(), 9);
    assert!(categories.iter().any(|c| c == "Alimentación"));
}

#[tokio::test]
async fn test_filter_endpoint() {
    let (app, db) = test_app();
    seed(&db, "Supermercado central", 80.0, Category::Food, "10-01-2025");
    seed(&db, "Farmacia", 25.0, Category::Health, "12-01-2025");
    seed(&db, "Cine", 8.0, Category::Entertainment, "20-02-2025");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/gastos/filtrar",
        Some(json!({
            "fecha_inicio": "01-01-2025",
            "fecha_fin": "31-01-2025",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["total_resultados"], 2);
    assert_eq!(body["estadisticas"]["total"], 105.0);
    assert_eq!(body["estadisticas"]["cantidad"], 2);

    // Search plus amount bounds
    let (_, body) = send(
        &app,
        Method::POST,
        "/api/gastos/filtrar",
        Some(json!({ "busqueda": "SUPERMERCADO", "monto_min": 50 })),
    )
    .await;
    assert_eq!(body["total_resultados"], 1);
    assert_eq!(body["gastos"][0]["descripcion"], "Supermercado central");
}

#[tokio::test]
async fn test_filter_endpoint_rejects_bad_input() {
    let (app, _db) = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/gastos/filtrar",
        Some(json!({ "fecha_inicio": "2025-01-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("fecha_inicio"));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/gastos/filtrar",
        Some(json!({ "monto_min": "mucho" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("monto_min"));
}

#[tokio::test]
async fn test_suggested_ranges() {
    let (app, _db) = test_app();
    let (status, body) = send(&app, Method::GET, "/api/filtros/rangos", None).await;
    assert_eq!(status, StatusCode::OK);
    let ranges = &body["rangos"];
    for key in ["hoy", "esta_semana", "este_mes", "ultimos_7_dias", "ultimos_30_dias"] {
        assert!(ranges[key]["inicio"].is_string(), "missing range {}", key);
        assert!(ranges[key]["fin"].is_string());
        assert!(ranges[key]["label"].is_string());
    }
}

#[tokio::test]
async fn test_budget_lifecycle() {
    let (app, db) = test_app();
    let today = chrono::Local::now().date_naive();

    // No budget yet
    let uri = "/api/presupuestos/Alimentaci%C3%B3n/progreso";
    let (status, body) = send(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No hay presupuesto para esta categoría");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/presupuestos",
        Some(json!({ "categoria": "Alimentación", "limite_mensual": 100.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["presupuesto"]["limite_mensual"], 100.0);
    assert_eq!(body["presupuesto"]["activo"], true);

    // Spend inside the current month
    seed(&db, "Mercado", 85.0, Category::Food, &format_date(today));

    let (status, body) = send(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["progreso"]["gastado"], 85.0);
    assert_eq!(body["progreso"]["porcentaje_usado"], 85.0);
    assert_eq!(body["progreso"]["estado"], "alerta");

    let (status, body) = send(&app, Method::GET, "/api/presupuestos", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["presupuestos"].as_array().unwrap().len(), 1);
    let alerts = body["alertas"].as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["tipo"], "warning");

    let (status, body) = send(&app, Method::GET, "/api/presupuestos/alertas", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["alertas"][0]["categoria"], "Alimentación");
}

#[tokio::test]
async fn test_create_budget_validation() {
    let (app, _db) = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/presupuestos",
        Some(json!({ "categoria": "Viajes", "limite_mensual": -5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["errores"].as_array().unwrap();
    assert_eq!(errors.len(), 2);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/presupuestos",
        Some(json!({ "categoria": "Hogar" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_budget_progress_unknown_category() {
    let (app, _db) = test_app();
    let (status, body) = send(&app, Method::GET, "/api/presupuestos/Viajes/progreso", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Categoría inválida"));
}
