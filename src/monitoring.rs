use log::info;
use serde::Serialize;
use uuid::Uuid;

use crate::api::models::error::APIError;

/// Client for the external monitor service that polls trading accounts and
/// detects rule violations. Detection itself lives entirely on that side,
/// this backend only drives the start/stop lifecycle and ingests reports.
#[derive(Clone)]
pub struct MonitorClient {
    base_url: Option<String>,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct StartMonitoringRequest<'a> {
    challenge_id: &'a Uuid,
    account_number: &'a str,
    server: &'a str,
}

impl MonitorClient {
    pub fn new(base_url: Option<String>) -> MonitorClient {
        MonitorClient {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    fn base_url(&self) -> Result<&String, APIError> {
        self.base_url.as_ref().ok_or(APIError::MonitoringError {
            description: "monitor service is not configured".to_owned(),
        })
    }

    pub async fn start_monitoring(
        &self,
        challenge_id: &Uuid,
        account_number: &str,
        server: &str,
    ) -> Result<(), APIError> {
        let base_url = self.base_url()?;
        let response = self
            .client
            .post(&format!("{}/monitors", base_url))
            .json(&StartMonitoringRequest {
                challenge_id,
                account_number,
                server,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(APIError::MonitoringError {
                description: format!("monitor service answered {}", response.status()),
            });
        }

        info!("monitoring started for challenge {}", challenge_id);

        Ok(())
    }

    pub async fn stop_monitoring(&self, challenge_id: &Uuid) -> Result<(), APIError> {
        let base_url = self.base_url()?;
        let response = self
            .client
            .post(&format!("{}/monitors/{}/stop", base_url, challenge_id))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(APIError::MonitoringError {
                description: format!("monitor service answered {}", response.status()),
            });
        }

        info!("monitoring stopped for challenge {}", challenge_id);

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[actix_rt::test]
    async fn test_unconfigured_client_fails_soft() -> () {
        let client = MonitorClient::new(None);
        let challenge_id = Uuid::new_v4();

        let result = client
            .start_monitoring(&challenge_id, "10012345", "Fund8r-Demo")
            .await;

        match result {
            Err(APIError::MonitoringError { description }) => {
                assert_eq!(description, "monitor service is not configured")
            }
            _ => panic!("expected a monitoring error"),
        }

        let result = client.stop_monitoring(&challenge_id).await;
        assert_eq!(result.is_err(), true);
    }
}
