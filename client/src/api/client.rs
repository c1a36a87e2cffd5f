//! # API Client Module
//!
//! Thin async HTTP client for the booking backend. Every method maps to one
//! backend endpoint and decodes straight into the `shared` wire DTOs; no
//! business logic lives here.
//!
//! There is no retry and no cancellation of in-flight requests: if two
//! reloads race, the last response to resolve wins.

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use shared::{
    AvailabilityDay, Customer, PriceQuote, PriceQuoteRequest, Reservation, Resource, Service,
};

/// Environment variable overriding the backend base URL
pub const API_URL_ENV_VAR: &str = "BOOKING_API_URL";

const DEFAULT_API_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
    },
    #[error("could not decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

/// HTTP client for the booking backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Build a client from `BOOKING_API_URL`, falling back to the local
    /// development default
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(API_URL_ENV_VAR).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("GET {} {:?}", url, query);

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status,
            });
        }

        response.json().await.map_err(|source| ApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status,
            });
        }

        response.json().await.map_err(|source| ApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    /// Connectivity check against the backend
    pub async fn health(&self) -> Result<(), ApiError> {
        let _: serde_json::Value = self.get_json("/health", &[]).await?;
        Ok(())
    }

    /// Fetch the full reservation list for the calendar
    pub async fn list_reservations(&self) -> Result<Vec<Reservation>, ApiError> {
        self.get_json("/reservas/listar", &[]).await
    }

    /// Fetch the service catalog (display names, durations, base prices)
    pub async fn list_services(&self) -> Result<Vec<Service>, ApiError> {
        self.get_json("/servicios/", &[]).await
    }

    /// Fetch the resource catalog
    pub async fn list_resources(&self) -> Result<Vec<Resource>, ApiError> {
        self.get_json("/recursos/", &[]).await
    }

    /// Fetch the customer list, used only for display-name resolution
    pub async fn list_customers(&self) -> Result<Vec<Customer>, ApiError> {
        self.get_json("/clientes/", &[]).await
    }

    /// Query availability for one date with optional service/resource/hour
    /// narrowing
    pub async fn availability(
        &self,
        date: &str,
        service_id: Option<i64>,
        resource_id: Option<i64>,
        hour: Option<u32>,
    ) -> Result<AvailabilityDay, ApiError> {
        let mut query: Vec<(&str, String)> = vec![("fecha", date.to_string())];
        if let Some(service_id) = service_id {
            query.push(("servicio_id", service_id.to_string()));
        }
        if let Some(resource_id) = resource_id {
            query.push(("recurso_id", resource_id.to_string()));
        }
        if let Some(hour) = hour {
            query.push(("hora", hour.to_string()));
        }

        self.get_json("/reservas/disponibilidad/avanzada", &query).await
    }

    /// Cheaper per-date probe used while generating alternative-date
    /// suggestions
    pub async fn availability_probe(
        &self,
        date: &str,
        service_id: Option<i64>,
        resource_id: Option<i64>,
    ) -> Result<AvailabilityDay, ApiError> {
        let mut query: Vec<(&str, String)> = vec![("fecha", date.to_string())];
        if let Some(service_id) = service_id {
            query.push(("servicio_id", service_id.to_string()));
        }
        if let Some(resource_id) = resource_id {
            query.push(("recurso_id", resource_id.to_string()));
        }

        self.get_json("/reservas/disponibilidad", &query).await
    }

    /// Ask the remote rule engine for a price breakdown
    pub async fn calculate_price(
        &self,
        request: &PriceQuoteRequest,
    ) -> Result<PriceQuote, ApiError> {
        self.post_json("/precios-dinamicos/calcular", request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8000/api/");
        assert_eq!(client.base_url(), "http://localhost:8000/api");
    }
}
