//! # Application Wrapper
//!
//! The single stateful boundary between a UI and the pure calendar engine.
//! Holds the API client, the one `CalendarState` instance, the lookup
//! caches used for display-name resolution, and the visible error message.
//!
//! UI events arrive as named [`Command`] intents through [`dispatch`];
//! everything a toolkit needs to render comes back out as plain data
//! (grids, titles, suggestions, price breakdowns).
//!
//! [`dispatch`]: BookingCalendarApp::dispatch

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use log::{error, info, warn};

use shared::{AvailableSlot, Customer, PriceQuote, PriceQuoteRequest, Reservation, Resource, Service};

use crate::api::ApiClient;
use crate::domain::availability::{alternative_dates, days_between, SlotSuggestion};
use crate::domain::calendar::{
    day_grid, month_grid, parse_local_timestamp, view_title, week_grid, DayGrid, MonthGrid,
    WeekGrid,
};
use crate::state::{CalendarState, ViewMode};

/// Named intents the UI layer can send to the calendar
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Move the focus date by one unit of the current view mode
    Navigate(i32),
    GoToToday,
    SetViewMode(ViewMode),
    /// Replace both filters; grids recompute from the in-memory snapshot
    ApplyFilters {
        service_id: Option<i64>,
        resource_id: Option<i64>,
    },
    /// Reload the reservation snapshot from the backend
    Refresh,
}

/// Outcome of an availability search
#[derive(Debug, Clone, PartialEq)]
pub enum AvailabilityOutcome {
    /// The requested date has free slots
    Available(Vec<AvailableSlot>),
    /// The requested date is fully booked; nearby alternatives, closest
    /// first (empty when nothing nearby is free either)
    Suggestions(Vec<SlotSuggestion>),
}

/// Main application struct for the booking calendar client
pub struct BookingCalendarApp {
    api: ApiClient,
    pub calendar: CalendarState,

    // Lookup caches for display-name resolution and filter population
    pub services: Vec<Service>,
    pub resources: Vec<Resource>,
    pub customers: Vec<Customer>,

    /// Visible error shown in place of the grid after a failed reload
    pub error_message: Option<String>,
}

impl BookingCalendarApp {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            calendar: CalendarState::new(Local::now().date_naive()),
            services: Vec::new(),
            resources: Vec::new(),
            customers: Vec::new(),
            error_message: None,
        }
    }

    /// Load lookup lists and the initial reservation snapshot.
    ///
    /// Lookup failures only degrade display names, so they are logged and
    /// tolerated; a reservation failure surfaces through `error_message`.
    pub async fn load_initial_data(&mut self) {
        info!("🚀 loading initial data from {}", self.api.base_url());

        match self.api.list_services().await {
            Ok(services) => self.services = services,
            Err(e) => warn!("could not load services: {}", e),
        }
        match self.api.list_resources().await {
            Ok(resources) => self.resources = resources,
            Err(e) => warn!("could not load resources: {}", e),
        }
        match self.api.list_customers().await {
            Ok(customers) => self.customers = customers,
            Err(e) => warn!("could not load customers: {}", e),
        }

        self.refresh_reservations().await;
    }

    /// Reload the reservation snapshot wholesale.
    ///
    /// Fail-clean: once a reload is initiated, a failure leaves an empty
    /// snapshot and a visible error, never a stale grid.
    pub async fn refresh_reservations(&mut self) {
        match self.api.list_reservations().await {
            Ok(reservations) => {
                self.calendar.replace_reservations(reservations);
                self.error_message = None;
            }
            Err(e) => {
                error!("❌ error loading reservations: {}", e);
                self.calendar.replace_reservations(Vec::new());
                self.error_message = Some(format!("Could not load reservations: {}", e));
            }
        }
    }

    /// Handle a named intent: perform the action, then announce the new
    /// view. Notification hooks attach at the announce step.
    pub async fn dispatch(&mut self, command: Command) {
        match command {
            Command::Navigate(direction) => self.calendar.navigate(direction),
            Command::GoToToday => self.calendar.go_to_today(Local::now().date_naive()),
            Command::SetViewMode(view_mode) => self.calendar.set_view_mode(view_mode),
            Command::ApplyFilters {
                service_id,
                resource_id,
            } => self.calendar.apply_filters(service_id, resource_id),
            Command::Refresh => self.refresh_reservations().await,
        }

        info!("showing {}", self.title());
    }

    /// Title for the current view
    pub fn title(&self) -> String {
        view_title(self.calendar.view_mode, self.calendar.focus_date)
    }

    pub fn month_view(&self) -> MonthGrid {
        month_grid(
            self.calendar.focus_date,
            Local::now().date_naive(),
            &self.calendar.reservations,
            &self.calendar.filters,
        )
    }

    pub fn week_view(&self) -> WeekGrid {
        week_grid(
            self.calendar.focus_date,
            Local::now().date_naive(),
            &self.calendar.reservations,
            &self.calendar.filters,
        )
    }

    pub fn day_view(&self) -> DayGrid {
        day_grid(
            self.calendar.focus_date,
            Local::now().date_naive(),
            &self.calendar.reservations,
            &self.calendar.filters,
        )
    }

    pub fn resolve_service_name(&self, service_id: i64) -> String {
        self.services
            .iter()
            .find(|service| service.id == service_id)
            .map(|service| service.name.clone())
            .unwrap_or_else(|| format!("Service {}", service_id))
    }

    pub fn resolve_resource_name(&self, resource_id: i64) -> String {
        self.resources
            .iter()
            .find(|resource| resource.id == resource_id)
            .map(|resource| resource.name.clone())
            .unwrap_or_else(|| format!("Resource {}", resource_id))
    }

    pub fn resolve_customer_name(&self, customer_id: i64) -> String {
        self.customers
            .iter()
            .find(|customer| customer.id == customer_id)
            .map(|customer| customer.name.clone())
            .unwrap_or_else(|| format!("Customer {}", customer_id))
    }

    /// One-line label for a reservation chip
    pub fn reservation_label(&self, reservation: &Reservation) -> String {
        format!(
            "#{} {} - {} [{}]",
            reservation.id,
            self.resolve_customer_name(reservation.customer_id),
            self.resolve_service_name(reservation.service_id),
            reservation.status
        )
    }

    /// Search availability for a date; when it is fully booked, probe the
    /// nearby alternatives and return them sorted by distance
    pub async fn find_available_slots(
        &self,
        date: NaiveDate,
        hour: Option<u32>,
        service_id: Option<i64>,
        resource_id: Option<i64>,
    ) -> Result<AvailabilityOutcome> {
        let day = self
            .api
            .availability(&date.to_string(), service_id, resource_id, hour)
            .await
            .context("availability search failed")?;

        let free: Vec<AvailableSlot> = day.slots.into_iter().filter(|slot| slot.available).collect();
        if !free.is_empty() {
            return Ok(AvailabilityOutcome::Available(free));
        }

        info!("no availability on {}, probing nearby dates", date);
        let mut suggestions = Vec::new();
        for alternative in alternative_dates(date) {
            match self
                .api
                .availability_probe(&alternative.to_string(), service_id, resource_id)
                .await
            {
                Ok(probe) => {
                    let slots: Vec<AvailableSlot> =
                        probe.slots.into_iter().filter(|slot| slot.available).collect();
                    if !slots.is_empty() {
                        suggestions.push(SlotSuggestion {
                            date: alternative,
                            slots,
                            days_from_requested: days_between(date, alternative),
                        });
                    }
                }
                Err(e) => warn!("availability probe for {} failed: {}", alternative, e),
            }
        }

        suggestions.sort_by_key(|suggestion| suggestion.days_from_requested);
        Ok(AvailabilityOutcome::Suggestions(suggestions))
    }

    /// Compose and send a price-quote request; the rule evaluation itself
    /// happens backend-side, the client only validates the window
    pub async fn quote_price(&self, request: PriceQuoteRequest) -> Result<PriceQuote> {
        if request.participants < 1 {
            bail!("participants must be at least 1");
        }
        let starts = parse_local_timestamp(&request.starts_at)
            .with_context(|| format!("invalid start timestamp {:?}", request.starts_at))?;
        let ends = parse_local_timestamp(&request.ends_at)
            .with_context(|| format!("invalid end timestamp {:?}", request.ends_at))?;
        if ends <= starts {
            bail!("the booking window must end after it starts");
        }

        let quote = self
            .api
            .calculate_price(&request)
            .await
            .context("price calculation failed")?;

        info!(
            "💰 quoted base {:.2} -> final {:.2} ({} rules applied)",
            quote.base_price,
            quote.final_price,
            quote.applied_rules.len()
        );
        Ok(quote)
    }
}
