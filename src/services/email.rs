use anyhow::{Context, Result};
use lettre::message::{header, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;

pub async fn send_verification_email(smtp: &SmtpConfig, email: &str, code: &str) -> Result<()> {
    let html_body = format!(
        r#"
    <div style="background-color:#6b7280;padding:50px 0">
        <div style="max-width:500px;margin:0 auto;background:#f3f4f6;padding:40px;border-radius:8px;text-align:center;font-family:Arial,sans-serif;">
            <h1 style="color:#000">Verify Your Email</h1>
            <p style="margin:20px 0;font-size:16px;color:#333">
                Use this code to verify your new account
            </p>
            <h2 style="font-size:40px;letter-spacing:5px;color:green;margin:30px 0">{}</h2>
            <p style="color:#333">The code expires in 15 minutes.<br>
            <a style="color:#3b82f6;text-decoration:none;">{}</a>
        </div>
    </div>
    "#,
        code, email
    );

    let message = Message::builder()
        .from(smtp.email.parse().context("Invalid sender address")?)
        .to(email.parse().context("Invalid recipient address")?)
        .subject("Verify your email")
        .multipart(
            MultiPart::alternative()
                .singlepart(SinglePart::plain(format!(
                    "Your verification code is: {}. It expires in 15 minutes.",
                    code
                )))
                .singlepart(
                    SinglePart::builder()
                        .header(header::ContentType::TEXT_HTML)
                        .body(html_body),
                ),
        )
        .context("Failed to build email message")?;

    let creds = Credentials::new(smtp.email.clone(), smtp.password.clone());

    let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.server)
        .context("Invalid SMTP relay")?
        .port(smtp.port)
        .credentials(creds)
        .build();

    mailer.send(message).await.context("Failed to send email")?;

    Ok(())
}
