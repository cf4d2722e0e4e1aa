//! App info and health endpoints

use axum::Json;
use serde_json::json;

/// GET / - API overview and route index
pub async fn app_info() -> Json<serde_json::Value> {
    Json(json!({
        "aplicacion": "GastoTrack API",
        "version": env!("CARGO_PKG_VERSION"),
        "descripcion": "API REST para el seguimiento de gastos personales",
        "endpoints": {
            "gastos": {
                "GET /api/gastos": "Listar gastos con paginación y filtros",
                "POST /api/gastos": "Crear un gasto",
                "GET /api/gastos/:id": "Obtener un gasto",
                "PUT /api/gastos/:id": "Actualizar un gasto",
                "DELETE /api/gastos/:id": "Eliminar un gasto",
                "GET /api/gastos/estadisticas": "Resumen y desglose por categoría",
                "POST /api/gastos/filtrar": "Filtrado avanzado con estadísticas"
            },
            "categorias": {
                "GET /api/categorias": "Categorías permitidas"
            },
            "filtros": {
                "GET /api/filtros/rangos": "Rangos de fechas sugeridos"
            },
            "presupuestos": {
                "GET /api/presupuestos": "Progreso y alertas de presupuestos",
                "POST /api/presupuestos": "Crear un presupuesto mensual",
                "GET /api/presupuestos/:categoria/progreso": "Progreso de una categoría",
                "GET /api/presupuestos/alertas": "Categorías sobre el umbral de alerta"
            },
            "salud": {
                "GET /health": "Estado del servicio"
            }
        }
    }))
}

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "estado": "saludable",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
