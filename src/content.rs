use std::fmt;
use std::time::Duration;

use alloy::primitives::B256;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use sha2::{Digest, Sha256};
use thiserror::Error as ThisError;
use tracing::{debug, info};

pub const PINATA_PIN_JSON_URL: &str = "https://api.pinata.cloud/pinning/pinJSONToIPFS";
pub const DEFAULT_GATEWAY: &str = "ipfs.io/ipfs";

const PIN_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

///
/// UploadError
///

#[derive(Debug, ThisError)]
pub enum UploadError {
    #[error("failed to serialize metadata: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("pinning request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("pinning service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("pinning service returned an empty content identifier")]
    EmptyCid,
}

/// フィールド宣言順のコンパクト JSON
///
/// ハッシュ対象のバイト列と pin するバイト列は同一。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalJson(String);

impl CanonicalJson {
    pub fn from_value<T: Serialize + ?Sized>(value: &T) -> Result<Self, UploadError> {
        Ok(Self(serde_json::to_string(value)?))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn digest(&self) -> ContentDigest {
        ContentDigest(Sha256::digest(self.as_bytes()).into())
    }
}

/// [`CanonicalJson`] の SHA-256
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// 登録コールに埋め込む bytes32
    pub fn to_b256(&self) -> B256 {
        B256::from(self.0)
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

/// `https://<gateway>/<cid>` 形式の取得 URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gateway {
    host_path: String,
}

impl Gateway {
    /// `ipfs.io/ipfs` でも `https://ipfs.io/ipfs/` でもよい
    pub fn new(gateway: &str) -> Self {
        let trimmed = gateway
            .trim()
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/');
        Self {
            host_path: trimmed.to_string(),
        }
    }

    pub fn uri(&self, cid: &str) -> String {
        format!("https://{}/{}", self.host_path, cid)
    }
}

impl Default for Gateway {
    fn default() -> Self {
        Self::new(DEFAULT_GATEWAY)
    }
}

/// コンテンツアドレス型ストレージ
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// `json` を pin して CID を返す
    async fn pin_json(&self, name: &str, json: &CanonicalJson) -> Result<String, UploadError>;
}

/// メタデータ 1 件分の pin 結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedContent {
    pub cid: String,
    pub uri: String,
    pub digest: ContentDigest,
}

/// シリアライズ → ハッシュ → pin
pub async fn pin_metadata<S, T>(
    store: &S,
    gateway: &Gateway,
    name: &str,
    value: &T,
) -> Result<PinnedContent, UploadError>
where
    S: ContentStore + ?Sized,
    T: Serialize + ?Sized,
{
    let json = CanonicalJson::from_value(value)?;
    let digest = json.digest();
    debug!(pin = name, bytes = json.as_bytes().len(), %digest, "Pinning metadata");

    let cid = store.pin_json(name, &json).await?;
    if cid.is_empty() {
        return Err(UploadError::EmptyCid);
    }
    let uri = gateway.uri(&cid);
    info!(pin = name, %cid, %uri, "Metadata pinned");

    Ok(PinnedContent { cid, uri, digest })
}

// --- Pinata REST API types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PinJsonRequest<'a> {
    pinata_content: &'a RawValue,
    pinata_metadata: PinMetadata<'a>,
}

#[derive(Serialize)]
struct PinMetadata<'a> {
    name: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PinJsonResponse {
    ipfs_hash: String,
}

/// Pinata の pin サービス
pub struct PinataStore {
    http: reqwest::Client,
    jwt: String,
    endpoint: String,
}

impl PinataStore {
    pub fn new(jwt: impl Into<String>) -> Result<Self, UploadError> {
        let http = reqwest::Client::builder()
            .timeout(PIN_REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            jwt: jwt.into(),
            endpoint: PINATA_PIN_JSON_URL.to_string(),
        })
    }

    /// pinJSONToIPFS 互換のエンドポイントに差し替える
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl ContentStore for PinataStore {
    async fn pin_json(&self, name: &str, json: &CanonicalJson) -> Result<String, UploadError> {
        let content: &RawValue = serde_json::from_str(json.as_str())?;
        let body = PinJsonRequest {
            pinata_content: content,
            pinata_metadata: PinMetadata { name },
        };

        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.jwt)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(UploadError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: PinJsonResponse = resp.json().await?;
        Ok(parsed.ipfs_hash)
    }
}
