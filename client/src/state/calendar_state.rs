//! # Calendar State Module
//!
//! The client-local calendar state: focus date, view mode, filters and the
//! in-memory reservation snapshot.
//!
//! ## Responsibilities:
//! - Navigation (previous/next/today) in units of the current view mode
//! - Filter management (service/resource, AND-combined)
//! - Wholesale replacement of the reservation snapshot
//!
//! Navigation and filtering never touch the network; callers refresh the
//! snapshot explicitly after any fetch-affecting action.

use chrono::{Duration, Months, NaiveDate};
use log::{info, warn};
use shared::Reservation;

/// Rendering granularity of the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Monthly,
    Weekly,
    Daily,
}

impl ViewMode {
    /// Parse a view-mode string from the outside world (CLI flag, saved
    /// preference). Unknown values produce a diagnostic and `None`; callers
    /// keep their current mode.
    pub fn parse(raw: &str) -> Option<ViewMode> {
        match raw.to_ascii_lowercase().as_str() {
            "monthly" | "month" | "mensual" => Some(ViewMode::Monthly),
            "weekly" | "week" | "semanal" => Some(ViewMode::Weekly),
            "daily" | "day" | "diaria" => Some(ViewMode::Daily),
            other => {
                warn!("unknown calendar view mode {:?}, ignoring", other);
                None
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Monthly => "monthly",
            ViewMode::Weekly => "weekly",
            ViewMode::Daily => "daily",
        }
    }
}

/// Service/resource filters applied to every grid computation.
///
/// Both filters are AND-combined; an absent filter always passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalendarFilters {
    pub service_id: Option<i64>,
    pub resource_id: Option<i64>,
}

impl CalendarFilters {
    pub fn matches(&self, reservation: &Reservation) -> bool {
        if let Some(service_id) = self.service_id {
            if reservation.service_id != service_id {
                return false;
            }
        }
        if let Some(resource_id) = self.resource_id {
            if reservation.resource_id != resource_id {
                return false;
            }
        }
        true
    }
}

/// Calendar state for navigation and display
#[derive(Debug, Clone)]
pub struct CalendarState {
    /// Date anchoring the visible month/week/day
    pub focus_date: NaiveDate,
    pub view_mode: ViewMode,
    pub filters: CalendarFilters,
    /// Read-mostly snapshot of the backend's reservations; replaced
    /// wholesale on refresh, never patched incrementally
    pub reservations: Vec<Reservation>,
}

impl CalendarState {
    /// Create calendar state focused on the given date, in monthly view
    pub fn new(today: NaiveDate) -> Self {
        Self {
            focus_date: today,
            view_mode: ViewMode::Monthly,
            filters: CalendarFilters::default(),
            reservations: Vec::new(),
        }
    }

    /// Advance (+1) or retreat (-1) the focus date by one unit of the
    /// current view mode.
    ///
    /// Monthly navigation uses calendar-month increments, so stepping from
    /// Jan 31 lands on the last day of February instead of rolling into
    /// March.
    pub fn navigate(&mut self, direction: i32) {
        let steps = direction.unsigned_abs();
        self.focus_date = match self.view_mode {
            ViewMode::Monthly => {
                let months = Months::new(steps);
                if direction >= 0 {
                    self.focus_date.checked_add_months(months)
                } else {
                    self.focus_date.checked_sub_months(months)
                }
                .unwrap_or(self.focus_date)
            }
            ViewMode::Weekly => self.focus_date + Duration::days(7 * direction as i64),
            ViewMode::Daily => self.focus_date + Duration::days(direction as i64),
        };
        info!(
            "📅 navigated {} to {} ({})",
            if direction >= 0 { "forward" } else { "back" },
            self.focus_date,
            self.view_mode.label()
        );
    }

    /// Move the focus date back to today, keeping the view mode
    pub fn go_to_today(&mut self, today: NaiveDate) {
        self.focus_date = today;
        info!("📅 calendar moved to today ({})", today);
    }

    pub fn set_view_mode(&mut self, view_mode: ViewMode) {
        self.view_mode = view_mode;
    }

    /// Replace the filters; grids recompute from the existing snapshot,
    /// no refetch happens here
    pub fn apply_filters(&mut self, service_id: Option<i64>, resource_id: Option<i64>) {
        self.filters = CalendarFilters {
            service_id,
            resource_id,
        };
    }

    /// Swap in a freshly fetched snapshot
    pub fn replace_reservations(&mut self, reservations: Vec<Reservation>) {
        info!("📅 {} reservations loaded into the calendar", reservations.len());
        self.reservations = reservations;
    }
}
