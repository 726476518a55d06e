use std::fs;

use anyhow::Context;
use reqwest::{Client, Response, header};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::helpers::dates::following_date;
use crate::models::sheets::{SheetRecord, ValueRange};

const API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const ENTRY_RANGE: &str = "Sheet1!A:B";
const INSERT_RANGE: &str = "Sheet1!A2:B2";

/// Service-account credential file contents. The access token is provisioned
/// out of band; this tool only installs it on the client.
#[derive(Deserialize)]
struct SheetsCredentials {
    token: String,
}

pub fn sheets_client_init(credentials_path: &str) -> anyhow::Result<Client> {
    info!("Initializing Sheets client from {}", credentials_path);

    let raw = fs::read_to_string(credentials_path)
        .with_context(|| format!("failed to read credential file {credentials_path}"))?;
    let credentials: SheetsCredentials =
        serde_json::from_str(&raw).context("failed to parse credential file")?;

    let mut auth_value =
        header::HeaderValue::from_str(format!("Bearer {}", credentials.token).as_str())
            .context("failed to create Authorization header value")?;
    auth_value.set_sensitive(true);

    let mut headers = header::HeaderMap::new();
    headers.insert(header::AUTHORIZATION, auth_value);
    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );

    info!("Building Sheets client with headers");
    let client = Client::builder()
        .default_headers(headers)
        .build()
        .context("failed to build Sheets client")?;

    info!("Sheets client initialized successfully");
    Ok(client)
}

pub async fn fetch_rows(client: &Client, spreadsheet_id: &str) -> anyhow::Result<Vec<SheetRecord>> {
    let url = format!("{API_BASE}/{spreadsheet_id}/values/{ENTRY_RANGE}");
    info!("Fetching rows from spreadsheet: {}", spreadsheet_id);

    let response = client
        .get(&url)
        .send()
        .await
        .context("failed to send request to Sheets API")?;
    let response = ensure_success(response).await?;

    let text = response.text().await.context("failed to read response body")?;
    info!("Successfully received response from Sheets API");

    let value_range: ValueRange = serde_json::from_str(&text).map_err(|e| {
        error!("Failed to parse Sheets response: {}", e);
        error!("Raw response: {}", text);
        anyhow::anyhow!("failed to parse Sheets response: {e}")
    })?;

    let records = value_range.into_records();
    info!("Successfully parsed {} spreadsheet rows", records.len());
    Ok(records)
}

/// Opens row 2 and writes tomorrow's date with an empty weight cell, keeping
/// the newest entry immediately below the header. Physical ordering in the
/// sheet is newest-first, independent of the ascending sort used for
/// analysis.
pub async fn insert_next_day_row(client: &Client, spreadsheet_id: &str) -> anyhow::Result<()> {
    let next_date = following_date(None, 1, "%d/%m/%y");
    info!("Inserting next-day row for {}", next_date);

    let insert_body = json!({
        "requests": [{
            "insertDimension": {
                "range": {
                    "sheetId": 0,
                    "dimension": "ROWS",
                    "startIndex": 1,
                    "endIndex": 2
                },
                "inheritFromBefore": false
            }
        }]
    });

    let url = format!("{API_BASE}/{spreadsheet_id}:batchUpdate");
    let response = client
        .post(&url)
        .body(insert_body.to_string())
        .send()
        .await
        .context("failed to send insertDimension request")?;
    ensure_success(response).await?;

    let values_body = json!({ "values": [[next_date, ""]] });
    let url = format!("{API_BASE}/{spreadsheet_id}/values/{INSERT_RANGE}?valueInputOption=RAW");
    let response = client
        .put(&url)
        .body(values_body.to_string())
        .send()
        .await
        .context("failed to send row values request")?;
    ensure_success(response).await?;

    info!("Next-day row inserted at index 2");
    Ok(())
}

async fn ensure_success(response: Response) -> anyhow::Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    error!("Sheets API returned error status {}: {}", status, error_text);
    anyhow::bail!("Sheets API returned status {status}: {error_text}")
}
