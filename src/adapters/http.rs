use crate::domain::model::{PairStatus, UpdateStatus, ValidatedRequest, VerifiedRequest};
use crate::domain::ports::{ConfigProvider, RemoteUpdater, RemoteVerifier};
use crate::utils::error::{Result, TransportError};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;

/// JSON body of the update call.
#[derive(Debug, Serialize)]
struct UpdatePayload<'a> {
    #[serde(rename = "POSBARCODE")]
    parcel_code: &'a str,
    #[serde(rename = "POSPORTABLE")]
    phone: &'a str,
    #[serde(rename = "DISP_DU")]
    start_time: &'a str,
    #[serde(rename = "DISP_AU")]
    end_time: &'a str,
}

/// Talks to the parcel web service. Implements both remote ports; clones share
/// one connection pool.
#[derive(Debug, Clone)]
pub struct HttpParcelService {
    client: Client,
    lookup_url: String,
    update_url: String,
    not_found_sentinel: String,
    success_sentinel: String,
    exists_sentinel: Option<String>,
}

impl HttpParcelService {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            lookup_url: config.lookup_url().to_string(),
            update_url: config.update_url().to_string(),
            not_found_sentinel: config.not_found_sentinel().to_string(),
            success_sentinel: config.success_sentinel().to_string(),
            exists_sentinel: config.exists_sentinel().map(str::to_string),
        })
    }

    async fn read_body(response: Response) -> std::result::Result<String, TransportError> {
        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(TransportError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        Ok(normalize_body(&text))
    }
}

/// The service answers either plain text or a JSON string; both compare the same.
pub fn normalize_body(raw: &str) -> String {
    let trimmed = raw.trim();
    match serde_json::from_str::<String>(trimmed) {
        Ok(inner) => inner.trim().to_string(),
        Err(_) => trimmed.to_string(),
    }
}

#[async_trait]
impl RemoteVerifier for HttpParcelService {
    async fn verify(
        &self,
        request: &ValidatedRequest,
    ) -> std::result::Result<PairStatus, TransportError> {
        tracing::debug!(
            "Looking up parcel {} at {}",
            request.parcel_code(),
            self.lookup_url
        );

        let response = self
            .client
            .get(&self.lookup_url)
            .query(&[
                ("POSBARCODE", request.parcel_code()),
                ("POSPORTABLE", request.phone()),
            ])
            .send()
            .await?;
        let body = Self::read_body(response).await?;

        if body == self.not_found_sentinel {
            return Ok(PairStatus::NotFound);
        }

        match &self.exists_sentinel {
            Some(expected) if body != *expected => {
                tracing::warn!("Lookup answered with unknown value: {:?}", body);
                Err(TransportError::UnexpectedBody { body })
            }
            _ => Ok(PairStatus::Exists),
        }
    }
}

#[async_trait]
impl RemoteUpdater for HttpParcelService {
    async fn update(
        &self,
        request: &VerifiedRequest,
    ) -> std::result::Result<UpdateStatus, TransportError> {
        let request = request.validated();
        let payload = UpdatePayload {
            parcel_code: request.parcel_code(),
            phone: request.phone(),
            start_time: request.start_time(),
            end_time: request.end_time(),
        };
        tracing::debug!("Posting availability update to {}: {:?}", self.update_url, payload);

        let response = self
            .client
            .post(&self.update_url)
            .json(&payload)
            .send()
            .await?;
        let body = Self::read_body(response).await?;

        if body == self.success_sentinel {
            Ok(UpdateStatus::Applied)
        } else {
            Ok(UpdateStatus::Rejected(body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::TomlConfig;
    use crate::domain::model::AvailabilityRequest;
    use crate::utils::validation::validate_request;
    use httpmock::prelude::*;

    fn service_for(server: &MockServer, exists: Option<&str>) -> HttpParcelService {
        let mut config = TomlConfig::default();
        config.service.lookup_url = server.url("/tracking_position_STG");
        config.service.update_url = server.url("/update_availability_STG");
        config.service.sentinels.exists = exists.map(str::to_string);
        HttpParcelService::new(&config).unwrap()
    }

    fn validated() -> ValidatedRequest {
        let request = AvailabilityRequest::default()
            .with_parcel_code("123456789012")
            .with_phone("06123456")
            .with_start_time("08:00")
            .with_end_time("12:00");
        validate_request(&request).unwrap()
    }

    #[test]
    fn test_normalize_body() {
        assert_eq!(normalize_body("inexistant"), "inexistant");
        assert_eq!(normalize_body("  success\n"), "success");
        assert_eq!(normalize_body("\"inexistant\""), "inexistant");
        assert_eq!(normalize_body("{\"id\": 3}"), "{\"id\": 3}");
    }

    #[tokio::test]
    async fn test_lookup_sends_query_parameters() {
        let server = MockServer::start();
        let lookup = server.mock(|when, then| {
            when.method(GET)
                .path("/tracking_position_STG")
                .query_param("POSBARCODE", "123456789012")
                .query_param("POSPORTABLE", "06123456");
            then.status(200).body("[{\"POSBARCODE\":\"123456789012\"}]");
        });

        let service = service_for(&server, None);
        let status = service.verify(&validated()).await.unwrap();

        lookup.assert();
        assert_eq!(status, PairStatus::Exists);
    }

    #[tokio::test]
    async fn test_lookup_not_found_sentinel() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/tracking_position_STG");
            then.status(200).json_body(serde_json::json!("inexistant"));
        });

        let service = service_for(&server, None);
        let status = service.verify(&validated()).await.unwrap();

        assert_eq!(status, PairStatus::NotFound);
    }

    #[tokio::test]
    async fn test_lookup_server_error_is_transport_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/tracking_position_STG");
            then.status(500);
        });

        let service = service_for(&server, None);
        let result = service.verify(&validated()).await;

        assert!(matches!(
            result,
            Err(TransportError::UnexpectedStatus { status: 500 })
        ));
    }

    #[tokio::test]
    async fn test_strict_lookup_rejects_unknown_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/tracking_position_STG");
            then.status(200).body("<html>maintenance</html>");
        });

        let service = service_for(&server, Some("existant"));
        let result = service.verify(&validated()).await;

        assert!(matches!(result, Err(TransportError::UnexpectedBody { .. })));
    }

    #[tokio::test]
    async fn test_strict_lookup_accepts_exists_sentinel() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/tracking_position_STG");
            then.status(200).body("existant");
        });

        let service = service_for(&server, Some("existant"));
        let status = service.verify(&validated()).await.unwrap();

        assert_eq!(status, PairStatus::Exists);
    }

    #[tokio::test]
    async fn test_update_posts_json_body() {
        let server = MockServer::start();
        let update = server.mock(|when, then| {
            when.method(POST)
                .path("/update_availability_STG")
                .json_body(serde_json::json!({
                    "POSBARCODE": "123456789012",
                    "POSPORTABLE": "06123456",
                    "DISP_DU": "08:00",
                    "DISP_AU": "12:00"
                }));
            then.status(200).body("success");
        });

        let service = service_for(&server, None);
        let verified = VerifiedRequest::new(validated());
        let status = service.update(&verified).await.unwrap();

        update.assert();
        assert_eq!(status, UpdateStatus::Applied);
    }

    #[tokio::test]
    async fn test_update_other_body_is_rejected() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/update_availability_STG");
            then.status(200).body("error");
        });

        let service = service_for(&server, None);
        let verified = VerifiedRequest::new(validated());
        let status = service.update(&verified).await.unwrap();

        assert_eq!(status, UpdateStatus::Rejected("error".to_string()));
    }
}
