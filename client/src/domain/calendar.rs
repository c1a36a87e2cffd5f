//! # Calendar Grid Engine
//!
//! Pure transformation from a reservation snapshot to render-ready calendar
//! grids. All date math works on the *local calendar components* of the
//! backend's wall-clock timestamps; nothing here converts through UTC.
//!
//! ## Responsibilities:
//! - Week/month boundary computation (weeks always start on Monday)
//! - Month grid generation (fixed 6 weeks x 7 days)
//! - Week/day grids over the fixed 08:00-20:00 display window
//! - Bucketing reservations into day cells and hour slots
//! - View titles for the navigation header
//!
//! The grids returned here carry no styling or toolkit types; any rendering
//! layer that understands the cell/row structures can display them.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use log::warn;
use shared::Reservation;

use crate::state::{CalendarFilters, ViewMode};

/// First hour shown in the weekly and daily views
pub const DISPLAY_START_HOUR: u32 = 8;
/// Last hour shown in the weekly and daily views (inclusive)
pub const DISPLAY_END_HOUR: u32 = 20;

/// Number of hour rows in the weekly and daily views
pub const DISPLAY_HOUR_ROWS: usize = (DISPLAY_END_HOUR - DISPLAY_START_HOUR + 1) as usize;

/// Number of day cells in a month grid (6 weeks x 7 days)
pub const MONTH_GRID_CELLS: usize = 42;

/// One day cell of the month grid
#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    pub date: NaiveDate,
    /// Whether the cell belongs to the focus month (as opposed to the
    /// leading/trailing days that pad the grid to full weeks)
    pub in_focus_month: bool,
    pub is_today: bool,
    /// Empty cells inside the focus month are offered as booking targets;
    /// padding cells never are
    pub available: bool,
    /// Reservations starting on this local date, ordered by start time
    pub reservations: Vec<Reservation>,
}

/// A month view: 42 consecutive day cells starting on the Monday on or
/// before the first of the focus month
#[derive(Debug, Clone, PartialEq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub cells: Vec<DayCell>,
}

impl MonthGrid {
    /// The grid split into its 6 week rows
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(7)
    }
}

/// One (day, hour) bucket of the weekly or daily view
#[derive(Debug, Clone, PartialEq)]
pub struct HourSlot {
    pub date: NaiveDate,
    /// Local hour of day this slot covers
    pub hour: u32,
    pub is_today: bool,
    pub available: bool,
    pub reservations: Vec<Reservation>,
}

/// One hour row of the weekly view: seven slots, Monday through Sunday
#[derive(Debug, Clone, PartialEq)]
pub struct HourRow {
    pub hour: u32,
    pub slots: Vec<HourSlot>,
}

/// A week view: hour rows 08:00-20:00 over the week containing the focus date
#[derive(Debug, Clone, PartialEq)]
pub struct WeekGrid {
    pub week_start: NaiveDate,
    pub rows: Vec<HourRow>,
}

/// A day view: hour slots 08:00-20:00 for the focus date only
#[derive(Debug, Clone, PartialEq)]
pub struct DayGrid {
    pub date: NaiveDate,
    pub rows: Vec<HourSlot>,
}

/// Get the Monday on or before the given date.
///
/// The underlying weekday numbering starts at Sunday, so the offset to
/// subtract is 6 for Sunday and `weekday - 1` otherwise.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let weekday = date.weekday().num_days_from_sunday();
    let days_back = if weekday == 0 { 6 } else { weekday - 1 };
    date - Duration::days(days_back as i64)
}

/// Get the first day of the month containing `date`
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// Parse a backend timestamp into its literal wall-clock components.
///
/// Accepts "2024-03-15T09:30:00" style strings, with an optional fractional
/// second or trailing UTC offset which is ignored rather than applied: the
/// calendar buckets by the timestamp as written, not by any normalized
/// instant. Returns `None` for anything unparseable.
pub fn parse_local_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let (date_part, time_part) = raw.split_once(['T', ' '])?;
    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;

    // Cut fractional seconds and any offset suffix ("09:30:00.123-04:00")
    let clean = match time_part.find(['+', '-', 'Z', '.']) {
        Some(index) => &time_part[..index],
        None => time_part,
    };
    let time = NaiveTime::parse_from_str(clean, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(clean, "%H:%M"))
        .ok()?;

    Some(NaiveDateTime::new(date, time))
}

/// Filter the snapshot and pair each reservation with its parsed local start.
///
/// Reservations with unparseable start timestamps are dropped here with a
/// warning, once per grid computation. The result is ordered by start time.
fn filtered_starts<'a>(
    reservations: &'a [Reservation],
    filters: &CalendarFilters,
) -> Vec<(&'a Reservation, NaiveDateTime)> {
    let mut indexed: Vec<(&Reservation, NaiveDateTime)> = reservations
        .iter()
        .filter(|reservation| filters.matches(reservation))
        .filter_map(|reservation| match parse_local_timestamp(&reservation.starts_at) {
            Some(start) => Some((reservation, start)),
            None => {
                warn!(
                    "skipping reservation {} with unparseable start timestamp {:?}",
                    reservation.id, reservation.starts_at
                );
                None
            }
        })
        .collect();

    indexed.sort_by_key(|(_, start)| *start);
    indexed
}

/// Compute the month grid for the month containing `focus`
pub fn month_grid(
    focus: NaiveDate,
    today: NaiveDate,
    reservations: &[Reservation],
    filters: &CalendarFilters,
) -> MonthGrid {
    let grid_start = start_of_week(first_of_month(focus));
    let indexed = filtered_starts(reservations, filters);

    let cells = (0..MONTH_GRID_CELLS as i64)
        .map(|offset| {
            let date = grid_start + Duration::days(offset);
            let day_reservations: Vec<Reservation> = indexed
                .iter()
                .filter(|(_, start)| start.date() == date)
                .map(|(reservation, _)| (*reservation).clone())
                .collect();

            let in_focus_month = date.year() == focus.year() && date.month() == focus.month();
            DayCell {
                date,
                in_focus_month,
                is_today: date == today,
                available: in_focus_month && day_reservations.is_empty(),
                reservations: day_reservations,
            }
        })
        .collect();

    MonthGrid {
        year: focus.year(),
        month: focus.month(),
        cells,
    }
}

fn hour_slot(
    date: NaiveDate,
    hour: u32,
    today: NaiveDate,
    indexed: &[(&Reservation, NaiveDateTime)],
) -> HourSlot {
    let slot_reservations: Vec<Reservation> = indexed
        .iter()
        .filter(|(_, start)| start.date() == date && start.hour() == hour)
        .map(|(reservation, _)| (*reservation).clone())
        .collect();

    HourSlot {
        date,
        hour,
        is_today: date == today,
        available: slot_reservations.is_empty(),
        reservations: slot_reservations,
    }
}

/// Compute the week grid for the week containing `focus`.
///
/// Reservations starting outside 08:00-20:00 do not appear in any row.
pub fn week_grid(
    focus: NaiveDate,
    today: NaiveDate,
    reservations: &[Reservation],
    filters: &CalendarFilters,
) -> WeekGrid {
    let week_start = start_of_week(focus);
    let indexed = filtered_starts(reservations, filters);

    let rows = (DISPLAY_START_HOUR..=DISPLAY_END_HOUR)
        .map(|hour| {
            let slots = (0..7)
                .map(|day| hour_slot(week_start + Duration::days(day), hour, today, &indexed))
                .collect();
            HourRow { hour, slots }
        })
        .collect();

    WeekGrid { week_start, rows }
}

/// Compute the day grid for the focus date
pub fn day_grid(
    focus: NaiveDate,
    today: NaiveDate,
    reservations: &[Reservation],
    filters: &CalendarFilters,
) -> DayGrid {
    let indexed = filtered_starts(reservations, filters);

    let rows = (DISPLAY_START_HOUR..=DISPLAY_END_HOUR)
        .map(|hour| hour_slot(focus, hour, today, &indexed))
        .collect();

    DayGrid { date: focus, rows }
}

/// Title for the navigation header of the current view
pub fn view_title(view_mode: ViewMode, focus: NaiveDate) -> String {
    match view_mode {
        ViewMode::Monthly => format!("{} {}", month_name(focus.month()), focus.year()),
        ViewMode::Weekly => {
            let start = start_of_week(focus);
            let end = start + Duration::days(6);
            format!(
                "{} {} - {} {} {}",
                start.day(),
                short_month_name(start.month()),
                end.day(),
                short_month_name(end.month()),
                end.year()
            )
        }
        ViewMode::Daily => format!(
            "{}, {} {} {}",
            weekday_name(focus),
            focus.day(),
            month_name(focus.month()),
            focus.year()
        ),
    }
}

/// Human-readable name for a month number
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Invalid Month",
    }
}

fn short_month_name(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "???",
    }
}

fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday().num_days_from_sunday() {
        0 => "Sunday",
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        _ => "Saturday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ReservationStatus;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn test_reservation(id: i64, starts_at: &str, ends_at: &str) -> Reservation {
        Reservation {
            id,
            customer_id: 1,
            service_id: 10,
            resource_id: 20,
            starts_at: starts_at.to_string(),
            ends_at: ends_at.to_string(),
            status: ReservationStatus::Confirmed,
        }
    }

    #[test]
    fn test_start_of_week_lands_on_monday() {
        // One date per weekday around 2024-03-15 (a Friday)
        for day in 11..=17 {
            let result = start_of_week(date(2024, 3, day));
            assert_eq!(result, date(2024, 3, 11), "for 2024-03-{:02}", day);
            assert_eq!(result.weekday().num_days_from_sunday(), 1);
        }
    }

    #[test]
    fn test_start_of_week_sunday_goes_back_six_days() {
        // Sunday is day 0 in the underlying numbering; the offset must be 6
        assert_eq!(start_of_week(date(2024, 3, 17)), date(2024, 3, 11));
        assert_eq!(start_of_week(date(2024, 3, 10)), date(2024, 3, 4));
    }

    #[test]
    fn test_start_of_week_within_seven_days() {
        let mut current = date(2024, 1, 1);
        for _ in 0..400 {
            let monday = start_of_week(current);
            let distance = (current - monday).num_days();
            assert!((0..7).contains(&distance), "distance {} for {}", distance, current);
            current += Duration::days(1);
        }
    }

    #[test]
    fn test_month_grid_has_42_consecutive_cells() {
        let grid = month_grid(date(2024, 3, 15), date(2024, 3, 1), &[], &CalendarFilters::default());

        assert_eq!(grid.cells.len(), MONTH_GRID_CELLS);
        for pair in grid.cells.windows(2) {
            assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
        }
    }

    #[test]
    fn test_month_grid_march_2024_span() {
        // 2024-03-01 is a Friday, so the grid starts the preceding Monday
        let grid = month_grid(date(2024, 3, 15), date(2024, 1, 1), &[], &CalendarFilters::default());

        assert_eq!(grid.cells.first().unwrap().date, date(2024, 2, 26));
        // 42 Monday-aligned cells always end on a Sunday
        assert_eq!(grid.cells.last().unwrap().date, date(2024, 4, 7));

        let focus_cell = grid.cells.iter().find(|c| c.date == date(2024, 3, 15)).unwrap();
        assert!(focus_cell.in_focus_month);
        assert!(!focus_cell.is_today);
    }

    #[test]
    fn test_month_grid_marks_today_only_when_it_matches() {
        let grid = month_grid(
            date(2024, 3, 15),
            date(2024, 3, 15),
            &[],
            &CalendarFilters::default(),
        );

        let today_cells: Vec<&DayCell> = grid.cells.iter().filter(|c| c.is_today).collect();
        assert_eq!(today_cells.len(), 1);
        assert_eq!(today_cells[0].date, date(2024, 3, 15));
    }

    #[test]
    fn test_reservation_appears_in_exactly_one_cell() {
        let reservations = vec![test_reservation(
            1,
            "2024-03-15T09:30:00",
            "2024-03-15T10:30:00",
        )];
        let grid = month_grid(
            date(2024, 3, 15),
            date(2024, 1, 1),
            &reservations,
            &CalendarFilters::default(),
        );

        let holding: Vec<&DayCell> = grid.cells.iter().filter(|c| !c.reservations.is_empty()).collect();
        assert_eq!(holding.len(), 1);
        assert_eq!(holding[0].date, date(2024, 3, 15));
        assert!(!holding[0].available);
    }

    #[test]
    fn test_reservation_outside_span_appears_nowhere() {
        let reservations = vec![test_reservation(
            1,
            "2024-06-15T09:30:00",
            "2024-06-15T10:30:00",
        )];
        let grid = month_grid(
            date(2024, 3, 15),
            date(2024, 1, 1),
            &reservations,
            &CalendarFilters::default(),
        );

        assert!(grid.cells.iter().all(|c| c.reservations.is_empty()));
    }

    #[test]
    fn test_padding_cells_never_offer_availability() {
        let grid = month_grid(date(2024, 3, 15), date(2024, 1, 1), &[], &CalendarFilters::default());

        for cell in &grid.cells {
            if cell.in_focus_month {
                assert!(cell.available, "empty focus-month cell {} should be bookable", cell.date);
            } else {
                assert!(!cell.available, "padding cell {} must not be bookable", cell.date);
            }
        }
    }

    #[test]
    fn test_cell_reservations_ordered_by_start_time() {
        let reservations = vec![
            test_reservation(1, "2024-03-15T14:00:00", "2024-03-15T15:00:00"),
            test_reservation(2, "2024-03-15T09:00:00", "2024-03-15T10:00:00"),
        ];
        let grid = month_grid(
            date(2024, 3, 15),
            date(2024, 1, 1),
            &reservations,
            &CalendarFilters::default(),
        );

        let cell = grid.cells.iter().find(|c| c.date == date(2024, 3, 15)).unwrap();
        let ids: Vec<i64> = cell.reservations.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_week_grid_buckets_by_local_hour() {
        let reservations = vec![test_reservation(
            1,
            "2024-03-15T09:30:00",
            "2024-03-15T10:30:00",
        )];
        let grid = week_grid(
            date(2024, 3, 15),
            date(2024, 1, 1),
            &reservations,
            &CalendarFilters::default(),
        );

        assert_eq!(grid.week_start, date(2024, 3, 11));
        assert_eq!(grid.rows.len(), DISPLAY_HOUR_ROWS);

        let row_9 = grid.rows.iter().find(|row| row.hour == 9).unwrap();
        let friday = &row_9.slots[4];
        assert_eq!(friday.date, date(2024, 3, 15));
        assert_eq!(friday.reservations.len(), 1);
        assert!(!friday.available);

        // No other slot in the whole grid holds it
        let total: usize = grid
            .rows
            .iter()
            .flat_map(|row| row.slots.iter())
            .map(|slot| slot.reservations.len())
            .sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn test_display_window_boundaries_are_inclusive() {
        let reservations = vec![
            test_reservation(1, "2024-03-15T08:00:00", "2024-03-15T09:00:00"),
            test_reservation(2, "2024-03-15T20:15:00", "2024-03-15T21:00:00"),
        ];
        let grid = day_grid(
            date(2024, 3, 15),
            date(2024, 1, 1),
            &reservations,
            &CalendarFilters::default(),
        );

        assert_eq!(grid.rows.first().unwrap().hour, DISPLAY_START_HOUR);
        assert_eq!(grid.rows.last().unwrap().hour, DISPLAY_END_HOUR);
        assert_eq!(grid.rows.first().unwrap().reservations.len(), 1);
        assert_eq!(grid.rows.last().unwrap().reservations.len(), 1);
    }

    #[test]
    fn test_reservation_outside_display_window_is_dropped() {
        // Starting at 21:00 falls outside the 08:00-20:00 window
        let reservations = vec![test_reservation(
            1,
            "2024-03-15T21:00:00",
            "2024-03-15T22:00:00",
        )];
        let grid = day_grid(
            date(2024, 3, 15),
            date(2024, 1, 1),
            &reservations,
            &CalendarFilters::default(),
        );

        assert!(grid.rows.iter().all(|slot| slot.reservations.is_empty()));
    }

    #[test]
    fn test_malformed_timestamp_is_excluded_not_fatal() {
        let reservations = vec![
            test_reservation(1, "not-a-timestamp", "also-bad"),
            test_reservation(2, "2024-03-15T09:30:00", "2024-03-15T10:30:00"),
        ];
        let grid = month_grid(
            date(2024, 3, 15),
            date(2024, 1, 1),
            &reservations,
            &CalendarFilters::default(),
        );

        let cell = grid.cells.iter().find(|c| c.date == date(2024, 3, 15)).unwrap();
        assert_eq!(cell.reservations.len(), 1);
        assert_eq!(cell.reservations[0].id, 2);
    }

    #[test]
    fn test_parse_local_timestamp_variants() {
        let expected = NaiveDateTime::new(
            date(2024, 3, 15),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        );

        assert_eq!(parse_local_timestamp("2024-03-15T09:30:00"), Some(expected));
        assert_eq!(parse_local_timestamp("2024-03-15 09:30:00"), Some(expected));
        assert_eq!(parse_local_timestamp("2024-03-15T09:30"), Some(expected));
        // Offsets and fractions are cut, never applied
        assert_eq!(parse_local_timestamp("2024-03-15T09:30:00-04:00"), Some(expected));
        assert_eq!(parse_local_timestamp("2024-03-15T09:30:00.250Z"), Some(expected));

        assert_eq!(parse_local_timestamp("garbage"), None);
        assert_eq!(parse_local_timestamp("2024-03-15"), None);
        assert_eq!(parse_local_timestamp("2024-13-40T09:30:00"), None);
    }

    #[test]
    fn test_filters_narrow_the_grid() {
        let mut by_service = test_reservation(1, "2024-03-15T09:00:00", "2024-03-15T10:00:00");
        by_service.service_id = 10;
        let mut other_service = test_reservation(2, "2024-03-15T11:00:00", "2024-03-15T12:00:00");
        other_service.service_id = 99;

        let reservations = vec![by_service, other_service];
        let filters = CalendarFilters {
            service_id: Some(10),
            resource_id: None,
        };
        let grid = month_grid(date(2024, 3, 15), date(2024, 1, 1), &reservations, &filters);

        let cell = grid.cells.iter().find(|c| c.date == date(2024, 3, 15)).unwrap();
        assert_eq!(cell.reservations.len(), 1);
        assert_eq!(cell.reservations[0].id, 1);
    }

    #[test]
    fn test_view_titles() {
        assert_eq!(view_title(ViewMode::Monthly, date(2024, 3, 15)), "March 2024");
        assert_eq!(view_title(ViewMode::Weekly, date(2024, 3, 15)), "11 Mar - 17 Mar 2024");
        assert_eq!(
            view_title(ViewMode::Daily, date(2024, 3, 15)),
            "Friday, 15 March 2024"
        );
    }

    #[test]
    fn test_weekly_title_across_month_boundary() {
        assert_eq!(view_title(ViewMode::Weekly, date(2024, 2, 28)), "26 Feb - 3 Mar 2024");
    }
}
