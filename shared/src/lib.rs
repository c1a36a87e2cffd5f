use serde::{Deserialize, Serialize};
use std::fmt;

/// A booking linking a customer, a service and a resource over a time span.
///
/// Field names follow the backend's wire format (Spanish identifiers); the
/// Rust names are the English equivalents. Timestamps stay strings at this
/// layer: they are ISO-8601-like wall-clock values whose local components
/// the calendar engine extracts itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    /// ID of the customer this reservation belongs to
    #[serde(rename = "cliente_id")]
    pub customer_id: i64,
    /// ID of the booked service
    #[serde(rename = "servicio_id")]
    pub service_id: i64,
    /// ID of the booked resource (room, equipment, ...)
    #[serde(rename = "recurso_id")]
    pub resource_id: i64,
    /// Start timestamp, e.g. "2024-03-15T09:30:00"
    #[serde(rename = "fecha_hora_inicio")]
    pub starts_at: String,
    /// End timestamp; always after `starts_at` (enforced by the booking form)
    #[serde(rename = "fecha_hora_fin")]
    pub ends_at: String,
    #[serde(rename = "estado")]
    pub status: ReservationStatus,
}

/// Lifecycle state of a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationStatus {
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "confirmada")]
    Confirmed,
    #[serde(rename = "cancelada")]
    Cancelled,
    #[serde(rename = "completada")]
    Completed,
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReservationStatus::Pending => "pendiente",
            ReservationStatus::Confirmed => "confirmada",
            ReservationStatus::Cancelled => "cancelada",
            ReservationStatus::Completed => "completada",
        };
        write!(f, "{}", label)
    }
}

/// A bookable service offered by the business
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    /// Default duration used when composing a booking window
    #[serde(rename = "duracion_minutos")]
    pub duration_minutes: i64,
    #[serde(rename = "precio_base")]
    pub base_price: f64,
}

/// A bookable resource (room, court, equipment unit)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "disponible")]
    pub available: bool,
}

/// A customer record; the client only uses it for display-name resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
}

/// One bookable time slot returned by the availability endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableSlot {
    /// Slot start as "HH:MM"
    #[serde(rename = "inicio")]
    pub start: String,
    /// Slot end as "HH:MM"
    #[serde(rename = "fin")]
    pub end: String,
    #[serde(rename = "disponible")]
    pub available: bool,
    #[serde(rename = "precio")]
    pub price: Option<f64>,
    #[serde(rename = "motivo_no_disponible")]
    pub unavailable_reason: Option<String>,
}

/// Availability of one calendar date, as reported by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityDay {
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "slots_disponibles", default)]
    pub slots: Vec<AvailableSlot>,
}

/// Request body for the dynamic price calculation endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuoteRequest {
    #[serde(rename = "servicio_id")]
    pub service_id: i64,
    #[serde(rename = "recurso_id")]
    pub resource_id: i64,
    #[serde(rename = "fecha_hora_inicio")]
    pub starts_at: String,
    #[serde(rename = "fecha_hora_fin")]
    pub ends_at: String,
    /// Number of participants, at least 1
    #[serde(rename = "participantes")]
    pub participants: u32,
    #[serde(rename = "cliente_id")]
    pub customer_id: Option<i64>,
    /// Customer category the rule engine may key on, e.g. "regular" or "vip"
    #[serde(rename = "tipo_cliente")]
    pub customer_kind: Option<String>,
}

/// One pricing rule the backend applied while computing a quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedRule {
    #[serde(rename = "regla_id")]
    pub rule_id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    /// Rule category, e.g. "hora_pico" or "anticipacion"
    #[serde(rename = "tipo_regla")]
    pub rule_kind: String,
    /// How the modifier is expressed: "porcentaje" or "monto_fijo"
    #[serde(rename = "tipo_modificador")]
    pub modifier_kind: String,
    #[serde(rename = "valor_modificador")]
    pub modifier_value: f64,
    /// Discount amount this rule contributed (0 for surcharges)
    #[serde(rename = "descuento", default)]
    pub discount: f64,
    /// Surcharge amount this rule contributed (0 for discounts)
    #[serde(rename = "recargo", default)]
    pub surcharge: f64,
    /// Running price after this rule was applied
    #[serde(rename = "precio_resultado")]
    pub resulting_price: f64,
}

/// Price breakdown returned by the remote rule engine.
///
/// The client never recomputes any of these figures; it only renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    #[serde(rename = "precio_base")]
    pub base_price: f64,
    #[serde(rename = "precio_final")]
    pub final_price: f64,
    #[serde(rename = "descuento_total", default)]
    pub total_discount: f64,
    #[serde(rename = "recargo_total", default)]
    pub total_surcharge: f64,
    #[serde(rename = "ahorro_total", default)]
    pub total_savings: f64,
    #[serde(rename = "reglas_aplicadas", default)]
    pub applied_rules: Vec<AppliedRule>,
}
