use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use farewell_config::RemoteConfig;
use farewell_core::{CollectionKind, SyncError};
use serde_json::{Map, Value, json};
use tracing::{debug, info};

use crate::Collection;

const HEADER_MASTER_KEY: &str = "X-Master-Key";
const HEADER_VERSIONING: &str = "X-Bin-Versioning";
const HEADER_BIN_NAME: &str = "X-Bin-Name";
const HEADER_BIN_PRIVATE: &str = "X-Bin-Private";

/// Client for a JSONBin-style document store.
///
/// One document (the bin) holds both collections as arrays under their
/// field names. Responses wrap the document in a `record` envelope.
#[derive(Debug)]
pub struct JsonBinClient {
    base_url: String,
    bin_id: String,
    api_key: String,
    client: reqwest::Client,
}

impl JsonBinClient {
    pub fn new(
        base_url: impl Into<String>,
        bin_id: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bin_id: bin_id.into().trim().to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    pub fn from_config(config: &RemoteConfig) -> Result<Self> {
        Self::new(
            &config.base_url,
            &config.bin_id,
            &config.api_key,
            config.timeout(),
        )
    }

    pub fn bin_url(&self) -> String {
        format!("{}/b/{}", self.base_url, self.bin_id)
    }

    /// Read the whole document (the `record` object).
    pub async fn read_document(&self) -> Result<Map<String, Value>, SyncError> {
        let url = self.bin_url();
        let response = self
            .client
            .get(&url)
            .header(HEADER_MASTER_KEY, &self.api_key)
            .header(HEADER_VERSIONING, "false")
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|error| SyncError::RemoteUnavailable(format!("GET {url}: {error}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::RemoteUnavailable(format!(
                "GET {url}: status {status}"
            )));
        }
        let body = response
            .text()
            .await
            .map_err(|error| SyncError::RemoteUnavailable(format!("GET {url}: {error}")))?;
        parse_document(&body)
    }

    /// Replace the whole document.
    pub async fn write_document(&self, document: &Map<String, Value>) -> Result<(), SyncError> {
        let url = self.bin_url();
        let response = self
            .client
            .put(&url)
            .header(HEADER_MASTER_KEY, &self.api_key)
            .header(HEADER_VERSIONING, "false")
            .json(document)
            .send()
            .await
            .map_err(|error| SyncError::RemoteUnavailable(format!("PUT {url}: {error}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::RemoteUnavailable(format!(
                "PUT {url}: status {status}"
            )));
        }
        Ok(())
    }

    /// Create a fresh document with both collections empty; returns its id.
    pub async fn create_bin(&self, name: &str) -> Result<String, SyncError> {
        let url = format!("{}/b", self.base_url);
        let response = self
            .client
            .post(&url)
            .header(HEADER_MASTER_KEY, &self.api_key)
            .header(HEADER_BIN_PRIVATE, "false")
            .header(HEADER_BIN_NAME, name)
            .json(&empty_document())
            .send()
            .await
            .map_err(|error| SyncError::RemoteUnavailable(format!("POST {url}: {error}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| SyncError::RemoteUnavailable(format!("POST {url}: {error}")))?;
        if !status.is_success() {
            return Err(SyncError::RemoteUnavailable(format!(
                "POST {url}: status {status}, body {body}"
            )));
        }
        let bin_id = parse_created_bin_id(&body)?;
        info!(%bin_id, name, "created document");
        Ok(bin_id)
    }
}

#[async_trait]
impl Collection for JsonBinClient {
    async fn fetch(&self, kind: CollectionKind) -> Result<Vec<Value>, SyncError> {
        let document = self.read_document().await?;
        let records = extract_collection(&document, kind)?;
        debug!(%kind, count = records.len(), "fetched remote collection");
        Ok(records)
    }

    /// Read-modify-write so the other collection's array survives.
    async fn save(&self, kind: CollectionKind, records: &[Value]) -> Result<(), SyncError> {
        let mut document = self.read_document().await?;
        document.insert(kind.field().to_string(), Value::Array(records.to_vec()));
        self.write_document(&document).await?;
        debug!(%kind, count = records.len(), "saved remote collection");
        Ok(())
    }
}

fn empty_document() -> Value {
    json!({ "messages": [], "photos": [] })
}

/// Unwrap the `record` envelope of a read response.
pub fn parse_document(body: &str) -> Result<Map<String, Value>, SyncError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|error| SyncError::MalformedResponse(format!("invalid JSON: {error}")))?;
    match value.get("record") {
        Some(Value::Object(record)) => Ok(record.clone()),
        Some(_) => Err(SyncError::MalformedResponse(
            "record is not an object".into(),
        )),
        None => Err(SyncError::MalformedResponse("missing record".into())),
    }
}

pub fn extract_collection(
    document: &Map<String, Value>,
    kind: CollectionKind,
) -> Result<Vec<Value>, SyncError> {
    match document.get(kind.field()) {
        Some(Value::Array(records)) => Ok(records.clone()),
        Some(_) => Err(SyncError::MalformedResponse(format!(
            "record.{} is not an array",
            kind.field()
        ))),
        None => Err(SyncError::MalformedResponse(format!(
            "record.{} is missing",
            kind.field()
        ))),
    }
}

/// Bin id from a create response (`metadata.id`).
pub fn parse_created_bin_id(body: &str) -> Result<String, SyncError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|error| SyncError::MalformedResponse(format!("invalid JSON: {error}")))?;
    value
        .get("metadata")
        .and_then(|metadata| metadata.get("id"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| SyncError::MalformedResponse("missing metadata.id".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document_unwraps_record() {
        let body = r#"{"record":{"messages":[{"id":1}],"photos":[]},"metadata":{"private":false}}"#;
        let document = parse_document(body).unwrap();
        assert_eq!(
            extract_collection(&document, CollectionKind::Messages)
                .unwrap()
                .len(),
            1
        );
        assert!(
            extract_collection(&document, CollectionKind::Photos)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_parse_document_rejects_bad_shapes() {
        assert!(matches!(
            parse_document("<html>"),
            Err(SyncError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_document(r#"{"messages":[]}"#),
            Err(SyncError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_document(r#"{"record":[1,2]}"#),
            Err(SyncError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_extract_collection_missing_or_wrong_type() {
        let document = parse_document(r#"{"record":{"messages":{"a":1}}}"#).unwrap();
        let err = extract_collection(&document, CollectionKind::Messages).unwrap_err();
        assert_eq!(
            err,
            SyncError::MalformedResponse("record.messages is not an array".into())
        );
        let err = extract_collection(&document, CollectionKind::Photos).unwrap_err();
        assert_eq!(
            err,
            SyncError::MalformedResponse("record.photos is missing".into())
        );
    }

    #[test]
    fn test_parse_created_bin_id() {
        let body = r#"{"record":{"messages":[]},"metadata":{"id":"65d4a8c5dc74654018a9e3c2","private":false}}"#;
        assert_eq!(
            parse_created_bin_id(body).unwrap(),
            "65d4a8c5dc74654018a9e3c2"
        );
        assert!(parse_created_bin_id(r#"{"metadata":{}}"#).is_err());
    }

    #[test]
    fn test_bin_url_trims_trailing_slash() {
        let client = JsonBinClient::new(
            "https://api.jsonbin.io/v3/",
            " abc ",
            "key",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.bin_url(), "https://api.jsonbin.io/v3/b/abc");
    }

    #[test]
    fn test_empty_document_has_both_fields() {
        let document = empty_document();
        for kind in CollectionKind::ALL {
            assert_eq!(document[kind.field()], json!([]));
        }
    }
}
