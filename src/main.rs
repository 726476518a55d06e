use anyhow::Context;
use resend_rs::Resend;
use tracing::info;

use weight_tracker_util::{
    helpers::sheets,
    service::{TrackerConfig, TrackerService},
};

const SPREADSHEET_ID: &str = "weight_measurements_kg";
const CREDENTIALS_PATH: &str = "credentials.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    info!("Starting weight tracker run");

    let email_address = std::env::var("EMAIL_USER").context("EMAIL_USER must be set")?;
    let email_secret = std::env::var("EMAIL_PASS").context("EMAIL_PASS must be set")?;

    let sheets_client = sheets::sheets_client_init(CREDENTIALS_PATH)?;
    let resend = Resend::new(&email_secret);

    let config = TrackerConfig {
        spreadsheet_id: SPREADSHEET_ID.to_string(),
        email_address,
    };

    let service = TrackerService::new(sheets_client, resend, config);
    service.process_run().await?;

    Ok(())
}
