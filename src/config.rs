use alloy::primitives::{Address, address};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;
use serde::Deserialize;
use thiserror::Error as ThisError;

use crate::chain::ProtocolContracts;
use crate::content::{DEFAULT_GATEWAY, Gateway};

/// Odyssey テストネットのデプロイ先
pub const ODYSSEY_NFT_CONTRACT: Address = address!("041B4F29183317Fd352AE57e331154b73F8a1D73");
pub const ODYSSEY_SPG_NFT_CONTRACT: Address = address!("C81B2cbEFD1aA0227bf513729580d3CF40fd61dF");
pub const ODYSSEY_IP_ASSET_REGISTRY: Address = address!("28E59E91C0467e89fd0f0438D47Ca839cDfEc095");
pub const ODYSSEY_LICENSING_MODULE: Address = address!("5a7D9Fa17DE09350F481A53B470D798c1c1aabae");
pub const ODYSSEY_PIL_TEMPLATE: Address = address!("58E2c909D557Cd23EF90D14f8fd21667A5Ae7a93");
pub const ODYSSEY_CORE_METADATA_MODULE: Address =
    address!("89630Ccf23277417FBdfd3076C702F5248267e78");
pub const ODYSSEY_LICENSE_ATTACHMENT_WORKFLOWS: Address =
    address!("44Bad1E4035a44eAC1606B222873E4a85E8b7D9c");
pub const ODYSSEY_ROYALTY_POLICY_LAP: Address =
    address!("28b4F70ffE5ba7A26aEF979226f77Eb57fb9Fdb6");

pub const DEFAULT_EXPLORER_URL: &str = "https://odyssey.explorer.story.foundation";

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read environment: {0}")]
    Source(#[from] config::ConfigError),

    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// 環境変数そのまま（未検証）
#[derive(Debug, Default, Deserialize)]
struct RawEnv {
    wallet_private_key: Option<String>,
    rpc_provider_url: Option<String>,
    pinata_jwt: Option<String>,
    nft_contract_address: Option<String>,
    spg_nft_contract_address: Option<String>,
    ipfs_gateway: Option<String>,
    explorer_url: Option<String>,
    ip_asset_registry_address: Option<String>,
    licensing_module_address: Option<String>,
    pil_template_address: Option<String>,
    core_metadata_module_address: Option<String>,
    license_attachment_workflows_address: Option<String>,
    royalty_policy_lap_address: Option<String>,
}

/// 検証済みの実行設定
///
/// ネットワークに触れる前に全項目をここで検証する。
pub struct Settings {
    pub signer: PrivateKeySigner,
    pub rpc_url: Url,
    pub pinata_jwt: String,
    pub nft_contract: Address,
    pub spg_nft_contract: Address,
    pub gateway: Gateway,
    pub explorer_url: String,
    pub contracts: ProtocolContracts,
}

impl Settings {
    /// プロセス環境から読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(config::Environment::default())
    }

    /// 任意の変数表から読み込む（テスト用）
    pub fn from_vars(vars: config::Map<String, String>) -> Result<Self, ConfigError> {
        Self::load(config::Environment::default().source(Some(vars)))
    }

    fn load(env: config::Environment) -> Result<Self, ConfigError> {
        let raw: RawEnv = config::Config::builder()
            .add_source(env.try_parsing(false))
            .build()?
            .try_deserialize()?;
        Self::validate(raw)
    }

    fn validate(raw: RawEnv) -> Result<Self, ConfigError> {
        let key = required(raw.wallet_private_key, "WALLET_PRIVATE_KEY")?;
        let signer = parse_private_key(&key)?;

        let rpc = required(raw.rpc_provider_url, "RPC_PROVIDER_URL")?;
        let rpc_url = Url::parse(&rpc).map_err(|e| ConfigError::Invalid {
            var: "RPC_PROVIDER_URL",
            reason: e.to_string(),
        })?;
        if !matches!(rpc_url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                var: "RPC_PROVIDER_URL",
                reason: format!("unsupported scheme {:?}", rpc_url.scheme()),
            });
        }

        let pinata_jwt = required(raw.pinata_jwt, "PINATA_JWT")?;

        let contracts = ProtocolContracts {
            ip_asset_registry: address_or(
                raw.ip_asset_registry_address,
                "IP_ASSET_REGISTRY_ADDRESS",
                ODYSSEY_IP_ASSET_REGISTRY,
            )?,
            licensing_module: address_or(
                raw.licensing_module_address,
                "LICENSING_MODULE_ADDRESS",
                ODYSSEY_LICENSING_MODULE,
            )?,
            pil_template: address_or(
                raw.pil_template_address,
                "PIL_TEMPLATE_ADDRESS",
                ODYSSEY_PIL_TEMPLATE,
            )?,
            core_metadata_module: address_or(
                raw.core_metadata_module_address,
                "CORE_METADATA_MODULE_ADDRESS",
                ODYSSEY_CORE_METADATA_MODULE,
            )?,
            license_attachment_workflows: address_or(
                raw.license_attachment_workflows_address,
                "LICENSE_ATTACHMENT_WORKFLOWS_ADDRESS",
                ODYSSEY_LICENSE_ATTACHMENT_WORKFLOWS,
            )?,
            royalty_policy_lap: address_or(
                raw.royalty_policy_lap_address,
                "ROYALTY_POLICY_LAP_ADDRESS",
                ODYSSEY_ROYALTY_POLICY_LAP,
            )?,
        };

        Ok(Self {
            signer,
            rpc_url,
            pinata_jwt,
            nft_contract: address_or(
                raw.nft_contract_address,
                "NFT_CONTRACT_ADDRESS",
                ODYSSEY_NFT_CONTRACT,
            )?,
            spg_nft_contract: address_or(
                raw.spg_nft_contract_address,
                "SPG_NFT_CONTRACT_ADDRESS",
                ODYSSEY_SPG_NFT_CONTRACT,
            )?,
            gateway: Gateway::new(raw.ipfs_gateway.as_deref().unwrap_or(DEFAULT_GATEWAY)),
            explorer_url: raw
                .explorer_url
                .unwrap_or_else(|| DEFAULT_EXPLORER_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            contracts,
        })
    }

    /// エクスプローラーの IPA ページ
    pub fn explorer_ipa_url(&self, ip_id: Address) -> String {
        format!("{}/ipa/{}", self.explorer_url, ip_id)
    }
}

fn required(value: Option<String>, var: &'static str) -> Result<String, ConfigError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(var)),
    }
}

/// `0x` の有無どちらも受け付ける
fn parse_private_key(key: &str) -> Result<PrivateKeySigner, ConfigError> {
    let hex_key = key.strip_prefix("0x").unwrap_or(key);
    hex_key
        .parse::<PrivateKeySigner>()
        .map_err(|e| ConfigError::Invalid {
            var: "WALLET_PRIVATE_KEY",
            reason: e.to_string(),
        })
}

fn address_or(
    value: Option<String>,
    var: &'static str,
    default: Address,
) -> Result<Address, ConfigError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(v) => v.parse::<Address>().map_err(|e| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
    }
}
