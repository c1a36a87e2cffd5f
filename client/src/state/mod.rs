//! Client-local state management.

mod calendar_state;

pub use calendar_state::{CalendarFilters, CalendarState, ViewMode};
