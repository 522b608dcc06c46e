use crate::models::messages::Message;
use anyhow::bail;
use async_trait::async_trait;
use chrono::Local;
use serde::Serialize;
use std::time::Duration;

pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait MailRelay: Send + Sync {
    /// Display name used in the `From` header and the email signature.
    fn sender_name(&self) -> &str;
    async fn send(&self, email: &OutgoingEmail) -> anyhow::Result<()>;
}

/// Transactional mail provider reached over its JSON HTTP API.
pub struct HttpMailRelay {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
    sender_name: String,
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: String,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

impl HttpMailRelay {
    pub fn new(
        api_url: String,
        api_key: String,
        from: String,
        sender_name: String,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url,
            api_key,
            from,
            sender_name,
        })
    }
}

#[async_trait]
impl MailRelay for HttpMailRelay {
    fn sender_name(&self) -> &str {
        &self.sender_name
    }

    async fn send(&self, email: &OutgoingEmail) -> anyhow::Result<()> {
        let request = SendEmailRequest {
            from: format!("{} <{}>", self.sender_name, self.from),
            to: [email.to.as_str()],
            subject: &email.subject,
            html: &email.html,
        };
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("mail provider responded with {status}: {body}");
        }
        Ok(())
    }
}

pub fn compose_reply(message: &Message, response: &str, sender_name: &str) -> OutgoingEmail {
    let sender_name = escape_html(sender_name);
    let name = escape_html(&message.name);
    let subject = escape_html(&message.subject);
    let response = escape_html(response);
    let received_at = message
        .created_at
        .with_timezone(&Local)
        .format("%d/%m/%Y %H:%M");

    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; background: #f5f7fa; padding: 20px;">
  <div style="background: #1a1d29; padding: 30px; border-radius: 10px; margin-bottom: 20px;">
    <h2 style="color: #ff6b35; margin: 0;">{sender_name}</h2>
    <p style="color: #ffffff; margin: 10px 0 0;">Reply to your message</p>
  </div>
  <div style="background: #ffffff; padding: 30px; border-radius: 10px;">
    <p style="color: #333;">Hello <strong>{name}</strong>,</p>
    <p style="color: #666;">Thank you for your message about <strong>"{subject}"</strong>.</p>
    <div style="background: #f5f7fa; padding: 20px; border-left: 4px solid #ff6b35; margin: 20px 0;">
      <p style="color: #333; margin: 0; white-space: pre-wrap;">{response}</p>
    </div>
    <p style="color: #666; margin-top: 30px;">Kind regards,<br><strong style="color: #ff6b35;">{sender_name}</strong></p>
  </div>
  <div style="text-align: center; margin-top: 20px; color: #999; font-size: 12px;">
    <p>This email replies to your message of {received_at}.</p>
  </div>
</div>"#
    );

    OutgoingEmail {
        to: message.email.clone(),
        subject: format!("Re: {}", message.subject),
        html,
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
