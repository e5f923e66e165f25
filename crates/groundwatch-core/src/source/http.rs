//! HTTP contact source

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::RawContact;

use super::ContactSource;

/// Fetches the contact document from a fixed URL with a single GET
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    /// Create a source for `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl ContactSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<RawContact>> {
        debug!(url = %self.url, "fetching contact document");

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let contacts: Vec<RawContact> = serde_json::from_str(&body)?;
        debug!(contacts = contacts.len(), "contact document fetched");
        Ok(contacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn contact_body() -> serde_json::Value {
        serde_json::json!([{
            "_id": "65f1",
            "contactId": "c-101",
            "contactStatus": "active",
            "contactName": 101,
            "contactGround": "WALLOPS",
            "contactSatellite": "AQUA",
            "contactEquipment": "ANT-1",
            "contactState": "executing",
            "contactStep": "AOS",
            "contactDetail": "Pass over Wallops",
            "contactBeginTimestamp": 1_700_000_000,
            "contactEndTimestamp": 1_700_000_600,
            "contactLatitude": 37.94,
            "contactLongitude": -75.46,
            "contactAzimuth": 110.5,
            "contactElevation": 52.0,
            "contactResolution": "",
            "contactResolutionStatus": "open",
            "alerts": []
        }])
    }

    #[tokio::test]
    async fn fetches_and_decodes_the_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/contacts.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(contact_body()))
            .mount(&server)
            .await;

        let source = HttpSource::new(format!("{}/contacts.json", server.uri()));
        let contacts = source.fetch().await.unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].contact_satellite, "AQUA");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let source = HttpSource::new(format!("{}/contacts.json", server.uri()));
        match source.fetch().await {
            Err(Error::Status(503)) => {}
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"not": "a list"}"#))
            .mount(&server)
            .await;

        let source = HttpSource::new(format!("{}/contacts.json", server.uri()));
        assert!(matches!(source.fetch().await, Err(Error::Malformed(_))));
    }
}
