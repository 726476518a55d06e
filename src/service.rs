use chrono::Local;
use reqwest::Client;
use resend_rs::Resend;
use tracing::{error, info};

use crate::helpers::series::{DEFAULT_HISTORY_LIMIT, ExtractOutcome, WeeklyChange};
use crate::helpers::{chart, email, series, sheets};

/// Configuration for the tracker service
#[derive(Clone)]
pub struct TrackerConfig {
    pub spreadsheet_id: String,
    pub email_address: String,
}

/// The main tracker service that handles spreadsheet extraction, chart
/// rendering, email sending, and the next-day row insertion
#[derive(Clone)]
pub struct TrackerService {
    pub sheets_client: Client,
    pub resend: Resend,
    pub config: TrackerConfig,
}

impl TrackerService {
    /// Create a new tracker service instance
    pub fn new(sheets_client: Client, resend: Resend, config: TrackerConfig) -> Self {
        info!("Creating new TrackerService instance");
        Self {
            sheets_client,
            resend,
            config,
        }
    }

    /// Run one pass: fetch rows, build the report, send it, then append the
    /// next-day entry row. Each step runs strictly after the previous one;
    /// the first transport failure ends the run.
    pub async fn process_run(&self) -> anyhow::Result<()> {
        info!(
            "Processing run for spreadsheet: {}",
            self.config.spreadsheet_id
        );

        let records = sheets::fetch_rows(&self.sheets_client, &self.config.spreadsheet_id).await?;
        let weekday = Local::now().format("%A").to_string();

        let (body, attachment) = match series::extract(&records, DEFAULT_HISTORY_LIMIT)? {
            ExtractOutcome::NoData => {
                info!("No historical rows; composing motivational message");
                (
                    format!("Happy {weekday}. Get a streak going so you can see a trend."),
                    None,
                )
            }
            ExtractOutcome::Report(weight_series) => {
                info!(
                    "Extracted series with {} entries",
                    weight_series.entries().len()
                );

                let body = match weight_series.weekly_change() {
                    WeeklyChange::Value(change) => {
                        format!("Happy {weekday}. Your weekly average change is {change}")
                    }
                    WeeklyChange::InsufficientData => {
                        format!("Happy {weekday}. Not enough data points to get a weekly diff.")
                    }
                };

                let png = chart::render_trend_chart(&weight_series)?;
                (body, Some(png))
            }
        };

        match email::send_progress_email(
            &self.resend,
            &self.config.email_address,
            &body,
            attachment,
        )
        .await
        {
            Ok(response) => info!("Email sent successfully with ID: {}", response.id),
            Err(e) => {
                error!("Error sending email: {}", e);
                return Err(e.into());
            }
        }

        sheets::insert_next_day_row(&self.sheets_client, &self.config.spreadsheet_id).await?;

        info!("Run completed");
        Ok(())
    }
}
