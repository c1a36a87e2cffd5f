use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::info;

use booking_calendar_client::api::ApiClient;
use booking_calendar_client::app::{BookingCalendarApp, Command};
use booking_calendar_client::render;
use booking_calendar_client::state::ViewMode;
use shared::PriceQuoteRequest;

#[derive(Parser)]
#[command(name = "booking-calendar", about = "Calendar client for the booking backend")]
struct Cli {
    /// Backend base URL (overrides BOOKING_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the reservation calendar
    Grid {
        /// View mode: monthly, weekly or daily
        #[arg(long, default_value = "monthly")]
        view: String,
        /// Focus date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Only show reservations for this service
        #[arg(long)]
        service: Option<i64>,
        /// Only show reservations for this resource
        #[arg(long)]
        resource: Option<i64>,
    },
    /// Search availability for a date, suggesting alternatives when booked out
    Slots {
        #[arg(long)]
        date: NaiveDate,
        /// Restrict the search to one hour of the day
        #[arg(long)]
        hour: Option<u32>,
        #[arg(long)]
        service: Option<i64>,
        #[arg(long)]
        resource: Option<i64>,
    },
    /// Ask the pricing engine for a quote
    Quote {
        #[arg(long)]
        service: i64,
        #[arg(long)]
        resource: i64,
        /// Booking start, e.g. 2024-03-15T09:30:00
        #[arg(long)]
        start: String,
        /// Booking end; must be after the start
        #[arg(long)]
        end: String,
        #[arg(long, default_value_t = 1)]
        participants: u32,
        #[arg(long)]
        customer: Option<i64>,
        /// Customer category the rule engine may key on
        #[arg(long, default_value = "regular")]
        customer_kind: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let api = match cli.api_url {
        Some(url) => ApiClient::new(url),
        None => ApiClient::from_env(),
    };
    info!("using backend at {}", api.base_url());

    let mut app = BookingCalendarApp::new(api);

    match cli.command {
        Commands::Grid {
            view,
            date,
            service,
            resource,
        } => {
            let view_mode = ViewMode::parse(&view).ok_or_else(|| {
                anyhow!("unknown view mode {:?} (expected monthly, weekly or daily)", view)
            })?;

            app.load_initial_data().await;
            if let Some(message) = app.error_message.clone() {
                return Err(anyhow!(message));
            }

            if let Some(date) = date {
                app.calendar.focus_date = date;
            }
            app.dispatch(Command::SetViewMode(view_mode)).await;
            app.dispatch(Command::ApplyFilters {
                service_id: service,
                resource_id: resource,
            })
            .await;

            let title = app.title();
            let text = match view_mode {
                ViewMode::Monthly => render::month_to_text(&app.month_view(), &title),
                ViewMode::Weekly => render::week_to_text(&app.week_view(), &title),
                ViewMode::Daily => {
                    render::day_to_text(&app.day_view(), &title, |r| app.reservation_label(r))
                }
            };
            print!("{}", text);
        }

        Commands::Slots {
            date,
            hour,
            service,
            resource,
        } => {
            let outcome = app.find_available_slots(date, hour, service, resource).await?;
            print!("{}", render::availability_to_text(&outcome, &date.to_string()));
        }

        Commands::Quote {
            service,
            resource,
            start,
            end,
            participants,
            customer,
            customer_kind,
        } => {
            let quote = app
                .quote_price(PriceQuoteRequest {
                    service_id: service,
                    resource_id: resource,
                    starts_at: start,
                    ends_at: end,
                    participants,
                    customer_id: customer,
                    customer_kind: Some(customer_kind),
                })
                .await?;
            print!("{}", render::quote_to_text(&quote));
        }
    }

    Ok(())
}
