use std::time::Duration;

use serde_json::json;
use tracing::info;

use super::DeliveryError;
use crate::config::SlackConfig;

const MESSAGE_TITLE: &str = "Kubernetes Cluster Status Report";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// POSTs the report to the configured webhook as a single mrkdwn section.
pub async fn send(report: &str, settings: &SlackConfig) -> Result<(), DeliveryError> {
    let payload = json!({
        "text": MESSAGE_TITLE,
        "blocks": [
            {
                "type": "section",
                "text": {
                    "type": "mrkdwn",
                    "text": report,
                }
            }
        ]
    });

    let http = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?;
    let response = http.post(&settings.webhook_url).json(&payload).send().await?;

    let status = response.status();
    if status.as_u16() != 200 {
        let body = response.text().await.unwrap_or_default();
        return Err(DeliveryError::WebhookStatus {
            status: status.as_u16(),
            body,
        });
    }

    info!("report posted to slack webhook");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    // One-shot loopback HTTP responder; the pack carries no mock-server
    // crate, and a canned response is all the webhook contract needs.
    async fn serve_once(response: &'static str) -> std::net::SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 8192];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        addr
    }

    #[tokio::test]
    async fn non_200_response_carries_status_and_body() {
        let addr = serve_once(
            "HTTP/1.1 500 Internal Server Error\r\ncontent-length: 12\r\nconnection: close\r\n\r\nwebhook down",
        )
        .await;
        let settings = SlackConfig {
            webhook_url: format!("http://{addr}"),
        };

        let err = send("REPORT", &settings).await.unwrap_err();
        let text = err.to_string();
        assert!(text.contains("500"), "{text}");
        assert!(text.contains("webhook down"), "{text}");
    }

    #[tokio::test]
    async fn ok_response_succeeds() {
        let addr = serve_once(
            "HTTP/1.1 200 OK\r\ncontent-length: 2\r\nconnection: close\r\n\r\nok",
        )
        .await;
        let settings = SlackConfig {
            webhook_url: format!("http://{addr}"),
        };

        send("REPORT", &settings).await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_webhook_is_a_transport_error() {
        // Bind then drop so the port is very likely closed.
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };
        let settings = SlackConfig {
            webhook_url: format!("http://{addr}"),
        };

        let err = send("REPORT", &settings).await.unwrap_err();
        assert!(matches!(err, DeliveryError::Webhook(_)));
    }
}
