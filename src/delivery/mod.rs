pub mod console;
pub mod email;
pub mod slack;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::Config;

pub use console::Console;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DeliveryMode {
    Email,
    Slack,
    Output,
    File,
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("config has no `email` section")]
    EmailNotConfigured,
    #[error("config has no `slack` section")]
    SlackNotConfigured,
    #[error("email address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("building email message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("smtp session: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("posting to slack webhook: {0}")]
    Webhook(#[from] reqwest::Error),
    #[error("slack webhook returned {status}: {body}")]
    WebhookStatus { status: u16, body: String },
    #[error("writing report to {}: {}", path.display(), source)]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Routes the finished report to exactly one channel. Each channel is
/// attempted once; there are no retries and no fallback channels.
pub async fn dispatch(
    report: &str,
    mode: DeliveryMode,
    config: &Config,
    console: &Console,
    file_path: Option<&Path>,
) -> Result<(), DeliveryError> {
    match mode {
        DeliveryMode::Output => {
            console.print_report(report);
            Ok(())
        }
        DeliveryMode::Email => {
            let settings = config
                .email
                .as_ref()
                .ok_or(DeliveryError::EmailNotConfigured)?;
            email::send(report, settings)
        }
        DeliveryMode::Slack => {
            let settings = config
                .slack
                .as_ref()
                .ok_or(DeliveryError::SlackNotConfigured)?;
            slack::send(report, settings).await
        }
        DeliveryMode::File => match file_path {
            Some(path) => {
                std::fs::write(path, report).map_err(|source| DeliveryError::Write {
                    path: path.to_path_buf(),
                    source,
                })?;
                info!("report written to {}", path.display());
                Ok(())
            }
            // A missing path is a usage error, not an execution failure.
            None => {
                console.warn("file path must be provided when mode is `file`");
                Ok(())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{KubernetesConfig, OpenAiConfig};

    fn bare_config() -> Config {
        Config {
            openai: OpenAiConfig {
                kind: "openai".to_string(),
                api_key: "sk-test".to_string(),
                model: "gpt-4o".to_string(),
                azure_endpoint: None,
                azure_apiversion: None,
            },
            kubernetes: KubernetesConfig {
                kubeconfig: PathBuf::from("/tmp/kubeconfig"),
            },
            email: None,
            slack: None,
        }
    }

    #[tokio::test]
    async fn output_mode_only_renders() {
        let config = bare_config();
        let console = Console::new();

        dispatch("REPORT", DeliveryMode::Output, &config, &console, None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn file_mode_without_path_warns_and_writes_nothing() {
        let config = bare_config();
        let console = Console::new();
        let dir = tempfile::tempdir().unwrap();

        dispatch("REPORT", DeliveryMode::File, &config, &console, None)
            .await
            .unwrap();

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn file_mode_writes_the_report_verbatim() {
        let config = bare_config();
        let console = Console::new();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");

        dispatch(
            "# Report\n\nall good",
            DeliveryMode::File,
            &config,
            &console,
            Some(&path),
        )
        .await
        .unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "# Report\n\nall good"
        );
    }

    #[tokio::test]
    async fn file_mode_surfaces_write_failures() {
        let config = bare_config();
        let console = Console::new();
        let path = Path::new("/nonexistent-dir/report.md");

        let err = dispatch("REPORT", DeliveryMode::File, &config, &console, Some(path))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent-dir/report.md"));
    }

    #[tokio::test]
    async fn email_mode_without_settings_fails() {
        let config = bare_config();
        let console = Console::new();

        let err = dispatch("REPORT", DeliveryMode::Email, &config, &console, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DeliveryError::EmailNotConfigured));
    }

    #[tokio::test]
    async fn slack_mode_without_settings_fails() {
        let config = bare_config();
        let console = Console::new();

        let err = dispatch("REPORT", DeliveryMode::Slack, &config, &console, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DeliveryError::SlackNotConfigured));
    }
}
