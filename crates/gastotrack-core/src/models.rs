//! Domain models for GastoTrack
//!
//! Rust identifiers are English; the wire format keeps the Spanish field
//! names of the public API (`descripcion`, `monto`, `categoria`, ...) via
//! serde renames.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Textual date format used on the wire and in storage
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Parse a `DD-MM-YYYY` date string
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// Format a date as zero-padded `DD-MM-YYYY`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Fixed expense categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Alimentación")]
    Food,
    #[serde(rename = "Transporte")]
    Transport,
    #[serde(rename = "Entretenimiento")]
    Entertainment,
    #[serde(rename = "Salud")]
    Health,
    #[serde(rename = "Educación")]
    Education,
    #[serde(rename = "Servicios")]
    Services,
    #[serde(rename = "Ropa")]
    Clothing,
    #[serde(rename = "Hogar")]
    Home,
    #[serde(rename = "Otros")]
    Other,
}

impl Category {
    /// Every allowed category, in display order
    pub const ALL: [Category; 9] = [
        Self::Food,
        Self::Transport,
        Self::Entertainment,
        Self::Health,
        Self::Education,
        Self::Services,
        Self::Clothing,
        Self::Home,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Alimentación",
            Self::Transport => "Transporte",
            Self::Entertainment => "Entretenimiento",
            Self::Health => "Salud",
            Self::Education => "Educación",
            Self::Services => "Servicios",
            Self::Clothing => "Ropa",
            Self::Home => "Hogar",
            Self::Other => "Otros",
        }
    }

    /// Fixed display color used by the category breakdown chart
    pub fn color(&self) -> &'static str {
        match self {
            Self::Food => "#ff6384",
            Self::Transport => "#36a2eb",
            Self::Entertainment => "#ffce56",
            Self::Health => "#4bc0c0",
            Self::Education => "#9966ff",
            Self::Services => "#ff9f40",
            Self::Clothing => "#c9cbcf",
            Self::Home => "#8bc34a",
            Self::Other => "#9e9e9e",
        }
    }

    /// Comma-separated list of all category names, used in validation messages
    pub fn allowed_list() -> String {
        Self::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|c| c.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored expense record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "monto")]
    pub amount: f64,
    #[serde(rename = "categoria")]
    pub category: Category,
    /// Free-text source/payment-method tag
    #[serde(rename = "origen", skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Calendar date in zero-padded `DD-MM-YYYY` form
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "fecha_creacion")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "fecha_actualizacion")]
    pub updated_at: DateTime<Utc>,
}

/// A validated expense ready for insertion
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub description: String,
    pub amount: f64,
    pub category: Category,
    pub origin: Option<String>,
    /// Normalized `DD-MM-YYYY`
    pub date: String,
}

/// Untrusted expense input as received from a request body or form.
///
/// Every field is optional so missing and invalid values can be reported
/// separately; `monto` accepts either a JSON number or a numeric string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseInput {
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    #[serde(rename = "monto")]
    pub amount: Option<serde_json::Value>,
    #[serde(rename = "categoria")]
    pub category: Option<String>,
    #[serde(rename = "origen")]
    pub origin: Option<String>,
    #[serde(rename = "fecha")]
    pub date: Option<String>,
}

const MAX_AMOUNT: f64 = 999_999.99;

impl ExpenseInput {
    /// Validate and normalize the input.
    ///
    /// Returns either a `NewExpense` or a non-empty ordered list of
    /// user-facing messages; all fields are checked so errors accumulate
    /// instead of short-circuiting on the first failure. `default_date` is
    /// used when no `fecha` was supplied.
    pub fn validate(
        &self,
        default_date: NaiveDate,
    ) -> std::result::Result<NewExpense, Vec<String>> {
        let mut errors = Vec::new();

        let description = self.description.as_deref().map(str::trim).unwrap_or("");
        if description.is_empty() {
            errors.push("La descripción es obligatoria".to_string());
        } else if description.chars().count() < 3 {
            errors.push("La descripción debe tener al menos 3 caracteres".to_string());
        } else if description.chars().count() > 100 {
            errors.push("La descripción no puede tener más de 100 caracteres".to_string());
        }

        let amount = match &self.amount {
            None => {
                errors.push("El monto es obligatorio".to_string());
                None
            }
            Some(value) => match parse_amount(value) {
                None => {
                    errors.push("El monto debe ser un número válido".to_string());
                    None
                }
                Some(n) if n <= 0.0 => {
                    errors.push("El monto debe ser mayor a 0".to_string());
                    None
                }
                Some(n) if n > MAX_AMOUNT => {
                    errors.push("El monto es demasiado grande".to_string());
                    None
                }
                Some(n) => Some(n),
            },
        };

        let category = match self.category.as_deref() {
            None | Some("") => {
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

        let date = match self.date.as_deref() {
            None | Some("") => format_date(default_date),
            Some(text) => match parse_date(text) {
                Some(parsed) => format_date(parsed),
                None => {
                    errors
                        .push("La fecha debe tener formato DD-MM-YYYY (ej: 25-12-2025)".to_string());
                    String::new()
                }
            },
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewExpense {
            description: description.to_string(),
            // Unwraps cannot fail here: a None amount/category always pushed an error
            amount: amount.unwrap_or_default(),
            category: category.unwrap_or(Category::Other),
            origin: self
                .origin
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            date,
        })
    }

    /// Fill fields missing from this input with values from an existing
    /// record, for update semantics where unsupplied fields keep their
    /// stored values.
    pub fn merged_with(&self, existing: &Expense) -> ExpenseInput {
        ExpenseInput {
            description: self
                .description
                .clone()
                .or_else(|| Some(existing.description.clone())),
            amount: self
                .amount
                .clone()
                .or_else(|| serde_json::Number::from_f64(existing.amount).map(Into::into)),
            category: self
                .category
                .clone()
                .or_else(|| Some(existing.category.as_str().to_string())),
            origin: self.origin.clone().or_else(|| existing.origin.clone()),
            date: self.date.clone().or_else(|| Some(existing.date.clone())),
        }
    }
}

fn parse_amount(value: &serde_json::Value) -> Option<f64> {
    let n = match value {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// A monthly spending limit for a category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    #[serde(rename = "categoria")]
    pub category: Category,
    #[serde(rename = "limite_mensual")]
    pub monthly_limit: f64,
    #[serde(rename = "mes")]
    pub month: u32,
    #[serde(rename = "año")]
    pub year: i32,
    #[serde(rename = "activo")]
    pub active: bool,
    #[serde(rename = "fecha_creacion")]
    pub created_at: DateTime<Utc>,
}

/// Budget usage tier, derived from percent of the monthly limit spent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    Excedido,
    Alerta,
    Moderado,
    Seguro,
}

impl BudgetStatus {
    /// Fixed thresholds: >=100 exceeded, >=80 alert, >=60 moderate, else safe
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 100.0 {
            Self::Excedido
        } else if percent >= 80.0 {
            Self::Alerta
        } else if percent >= 60.0 {
            Self::Moderado
        } else {
            Self::Seguro
        }
    }
}

/// Month-to-date progress against a category budget
#[derive(Debug, Clone, Serialize)]
pub struct BudgetProgress {
    #[serde(rename = "categoria")]
    pub category: Category,
    #[serde(rename = "limite")]
    pub limit: f64,
    #[serde(rename = "gastado")]
    pub spent: f64,
    /// May go negative once the limit is exceeded
    #[serde(rename = "restante")]
    pub remaining: f64,
    #[serde(rename = "porcentaje_usado")]
    pub percent_used: f64,
    #[serde(rename = "estado")]
    pub status: BudgetStatus,
}

/// Severity of a budget alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    /// 80-99% of the limit used
    Warning,
    /// Limit reached or exceeded
    Danger,
}

/// A category at or above the alert threshold
#[derive(Debug, Clone, Serialize)]
pub struct BudgetAlert {
    #[serde(rename = "categoria")]
    pub category: Category,
    #[serde(rename = "porcentaje")]
    pub percent: f64,
    #[serde(rename = "tipo")]
    pub level: AlertLevel,
}
