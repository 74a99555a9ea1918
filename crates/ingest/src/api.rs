//! Dog API client and record types.

use breedbox_config::IngestConfig;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::IngestError;

/// A weight or height as the API reports it, in both unit systems.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measurement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imperial: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
}

/// One breed as returned by the API. Everything except `id` and `name`
/// is optional in practice, whatever the docs claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreedRecord {
    pub id: i64,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed_group: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bred_for: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub life_span: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperament: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_image_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Measurement>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Measurement>,
}

/// HTTP client for the breed listing endpoint.
pub struct DogApiClient {
    url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl DogApiClient {
    pub fn from_config(config: &IngestConfig) -> Self {
        Self {
            url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(config.fetch_timeout_secs))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Fetch the full breed list. The endpoint works without a key but
    /// sends richer data with one.
    pub async fn fetch(&self) -> Result<Vec<BreedRecord>, IngestError> {
        let mut request = self.client.get(&self.url);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| IngestError::Fetch(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IngestError::Fetch(format!("status {status}: {body}")));
        }

        let records: Vec<BreedRecord> = response
            .json()
            .await
            .map_err(|e| IngestError::Payload(format!("not a breed list: {e}")))?;

        info!(count = records.len(), "Fetched breed records");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
    {
        "id": 1,
        "name": "Affenpinscher",
        "bred_for": "Small rodent hunting, lapdog",
        "breed_group": "Toy",
        "life_span": "10 - 12 years",
        "temperament": "Stubborn, Curious, Playful",
        "origin": "Germany, France",
        "reference_image_id": "BJa4kxc4X",
        "weight": { "imperial": "6 - 13", "metric": "3 - 6" },
        "height": { "imperial": "9 - 11.5", "metric": "23 - 29" },
        "image": { "url": "https://cdn2.thedogapi.com/images/BJa4kxc4X.jpg" }
    }
    "#;

    #[test]
    fn parses_a_full_record_ignoring_unknown_fields() {
        let record: BreedRecord = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(record.id, 1);
        assert_eq!(record.name, "Affenpinscher");
        assert_eq!(record.breed_group.as_deref(), Some("Toy"));
        assert_eq!(record.weight.as_ref().unwrap().metric.as_deref(), Some("3 - 6"));
        assert_eq!(record.height.as_ref().unwrap().imperial.as_deref(), Some("9 - 11.5"));
    }

    #[test]
    fn parses_a_minimal_record() {
        let record: BreedRecord = serde_json::from_str(r#"{"id": 42, "name": "Mystery"}"#).unwrap();
        assert_eq!(record.id, 42);
        assert!(record.breed_group.is_none());
        assert!(record.weight.is_none());
    }

    #[test]
    fn absent_fields_are_skipped_when_serializing() {
        let record: BreedRecord = serde_json::from_str(r#"{"id": 42, "name": "Mystery"}"#).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("breed_group"));
        assert!(!json.contains("weight"));
    }
}
