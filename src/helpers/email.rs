use resend_rs::{
    Resend,
    types::{Attachment, CreateEmailBaseOptions, CreateEmailResponse},
};
use tracing::{error, info};

pub const PROGRESS_SUBJECT: &str = "Check out your progress!";
const ATTACHMENT_NAME: &str = "Progress";

/// Sends the progress summary to the configured mail identity (both sender
/// and recipient), attaching the rendered chart when one exists.
pub async fn send_progress_email(
    resend: &Resend,
    address: &str,
    body: &str,
    chart_png: Option<Vec<u8>>,
) -> Result<CreateEmailResponse, resend_rs::Error> {
    let to = [address];

    info!("Preparing to send email with subject: {}", PROGRESS_SUBJECT);

    let mut email = CreateEmailBaseOptions::new(address, to, PROGRESS_SUBJECT).with_text(body);

    if let Some(png) = chart_png {
        info!("Chart attachment size: {} bytes", png.len());
        email = email.with_attachment(
            Attachment::from_content(png)
                .with_filename(ATTACHMENT_NAME)
                .with_content_type("image/png"),
        );
    }

    let result = resend.emails.send(email).await;
    match &result {
        Ok(response) => info!("Progress email sent successfully with ID: {}", response.id),
        Err(e) => error!("Failed to send progress email: {}", e),
    }

    result
}
