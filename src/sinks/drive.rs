use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use data_encoding::{BASE64, BASE64URL_NOPAD};
use reqwest::Client;
use ring::rand::SystemRandom;
use ring::signature::{RsaKeyPair, RSA_PKCS1_SHA256};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::DriveConfig;
use crate::errors::ResearchError;
use crate::models::CloudLocation;
use crate::utils::truncation::truncate_error;

const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";
const DEFAULT_API_BASE: &str = "https://www.googleapis.com";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const TOKEN_LIFETIME_SECS: i64 = 3600;
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);
const LIST_PAGE_SIZE: u32 = 100;

/// File metadata as returned by the Drive listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    pub mime_type: Option<String>,
    pub size: Option<String>,
    pub created_time: Option<String>,
    pub modified_time: Option<String>,
    pub web_view_link: Option<String>,
    pub web_content_link: Option<String>,
}

#[async_trait]
pub trait CloudStore: Send + Sync {
    async fn upload(
        &self,
        path: &Path,
        filename: &str,
        folder_id: &str,
        description: &str,
    ) -> Result<CloudLocation, ResearchError>;

    async fn list(&self, folder_id: &str) -> Result<Vec<DriveFile>, ResearchError>;
}

/// The fields of a service-account key file this client needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Google Drive v3 client authenticating as a service account.
pub struct DriveClient {
    client: Client,
    key: ServiceAccountKey,
    key_pair: RsaKeyPair,
    api_base: String,
    token: Mutex<Option<CachedToken>>,
}

impl DriveClient {
    pub async fn from_config(config: &DriveConfig) -> Result<Self, ResearchError> {
        let path = &config.service_account_file;
        if !path.exists() {
            return Err(ResearchError::Config(format!(
                "Service account file not found: {}",
                path.display()
            )));
        }
        let raw = tokio::fs::read_to_string(path).await?;
        let key: ServiceAccountKey = serde_json::from_str(&raw)
            .map_err(|e| ResearchError::Config(format!("Invalid service account file: {}", e)))?;
        Self::new(key)
    }

    pub fn new(key: ServiceAccountKey) -> Result<Self, ResearchError> {
        let der = pem_to_der(&key.private_key)?;
        let key_pair = RsaKeyPair::from_pkcs8(&der)
            .map_err(|e| ResearchError::Config(format!("Invalid service account private key: {}", e)))?;
        Ok(Self {
            client: Client::new(),
            key,
            key_pair,
            api_base: DEFAULT_API_BASE.to_string(),
            token: Mutex::new(None),
        })
    }

    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    fn signed_assertion(&self, issued_at: i64) -> Result<String, ResearchError> {
        let header = BASE64URL_NOPAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let claims = jwt_claims(&self.key, issued_at);
        let payload = BASE64URL_NOPAD.encode(claims.to_string().as_bytes());
        let signing_input = format!("{}.{}", header, payload);

        let mut signature = vec![0u8; self.key_pair.public().modulus_len()];
        self.key_pair
            .sign(&RSA_PKCS1_SHA256, &SystemRandom::new(), signing_input.as_bytes(), &mut signature)
            .map_err(|_| ResearchError::Sink("Failed to sign service account assertion".into()))?;

        Ok(format!("{}.{}", signing_input, BASE64URL_NOPAD.encode(&signature)))
    }

    async fn access_token(&self) -> Result<String, ResearchError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() + TOKEN_REFRESH_MARGIN {
                return Ok(token.access_token.clone());
            }
        }

        let assertion = self.signed_assertion(chrono::Utc::now().timestamp())?;
        let resp = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| ResearchError::Sink(format!("Token request failed: {}", e)))?;
        let body = json_or_error(resp, "token exchange").await?;

        let access_token = body["access_token"]
            .as_str()
            .ok_or_else(|| ResearchError::Sink("Token response missing access_token".into()))?
            .to_string();
        let lifetime = body["expires_in"].as_u64().unwrap_or(TOKEN_LIFETIME_SECS as u64);
        debug!(lifetime, "Obtained Drive access token");

        *cached = Some(CachedToken {
            access_token: access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        });
        Ok(access_token)
    }
}

#[async_trait]
impl CloudStore for DriveClient {
    async fn upload(
        &self,
        path: &Path,
        filename: &str,
        folder_id: &str,
        description: &str,
    ) -> Result<CloudLocation, ResearchError> {
        let bytes = tokio::fs::read(path).await?;
        let token = self.access_token().await?;
        let metadata = json!({
            "name": filename,
            "parents": [folder_id],
            "description": description,
        });
        let boundary = format!("report-{}", uuid::Uuid::new_v4().simple());
        let body = multipart_related(&boundary, &metadata, "application/pdf", &bytes);

        let resp = self
            .client
            .post(format!(
                "{}/upload/drive/v3/files?uploadType=multipart&fields=id,name,webViewLink,size",
                self.api_base
            ))
            .bearer_auth(token)
            .header("Content-Type", format!("multipart/related; boundary={}", boundary))
            .body(body)
            .send()
            .await
            .map_err(|e| ResearchError::Sink(format!("Drive upload failed: {}", e)))?;
        let file = json_or_error(resp, "upload").await?;

        let file_id = file["id"]
            .as_str()
            .ok_or_else(|| ResearchError::Sink("Upload failed - no result returned from Google Drive".into()))?
            .to_string();
        let location = CloudLocation {
            file_id,
            file_name: file["name"].as_str().map(str::to_string),
            view_link: file["webViewLink"].as_str().map(str::to_string),
            size: file["size"].as_str().map(str::to_string),
        };
        info!(file = %filename, folder = %folder_id, link = ?location.view_link, "Uploaded to Google Drive");
        Ok(location)
    }

    async fn list(&self, folder_id: &str) -> Result<Vec<DriveFile>, ResearchError> {
        let token = self.access_token().await?;
        let query = format!("'{}' in parents", folder_id.replace('\'', "\\'"));
        let page_size = LIST_PAGE_SIZE.to_string();

        let resp = self
            .client
            .get(format!("{}/drive/v3/files", self.api_base))
            .bearer_auth(token)
            .query(&[
                ("q", query.as_str()),
                ("pageSize", page_size.as_str()),
                (
                    "fields",
                    "nextPageToken, files(id, name, mimeType, size, modifiedTime, createdTime, webViewLink, webContentLink)",
                ),
            ])
            .send()
            .await
            .map_err(|e| ResearchError::Sink(format!("Drive listing failed: {}", e)))?;
        let body = json_or_error(resp, "listing").await?;

        let files = body
            .get("files")
            .cloned()
            .ok_or_else(|| ResearchError::Sink("Failed to retrieve files from Google Drive".into()))?;
        let files: Vec<DriveFile> = serde_json::from_value(files)?;
        info!(folder = %folder_id, count = files.len(), "Listed Drive folder");
        Ok(files)
    }
}

async fn json_or_error(resp: reqwest::Response, action: &str) -> Result<Value, ResearchError> {
    let status = resp.status();
    let text = resp
        .text()
        .await
        .map_err(|e| ResearchError::Sink(format!("Drive {} response unreadable: {}", action, e)))?;
    if !status.is_success() {
        return Err(ResearchError::Sink(format!(
            "Drive {} returned {}: {}",
            action,
            status,
            truncate_error(&text)
        )));
    }
    serde_json::from_str(&text)
        .map_err(|e| ResearchError::Sink(format!("Drive {} returned invalid JSON: {}", action, e)))
}

fn jwt_claims(key: &ServiceAccountKey, issued_at: i64) -> Value {
    json!({
        "iss": key.client_email,
        "scope": DRIVE_SCOPE,
        "aud": key.token_uri,
        "iat": issued_at,
        "exp": issued_at + TOKEN_LIFETIME_SECS,
    })
}

/// Decode the base64 body of a PEM block.
pub fn pem_to_der(pem: &str) -> Result<Vec<u8>, ResearchError> {
    let body: String = pem
        .lines()
        .filter(|line| !line.starts_with("-----"))
        .flat_map(|line| line.chars())
        .filter(|c| !c.is_whitespace())
        .collect();
    if body.is_empty() {
        return Err(ResearchError::Config("Service account private key is empty".into()));
    }
    BASE64
        .decode(body.as_bytes())
        .map_err(|e| ResearchError::Config(format!("Service account private key is not valid PEM: {}", e)))
}

/// Build a `multipart/related` body with a JSON metadata part followed by the file content.
pub fn multipart_related(boundary: &str, metadata: &Value, content_type: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(content.len() + 512);
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    body.extend_from_slice(metadata.to_string().as_bytes());
    body.extend_from_slice(format!("\r\n--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}
