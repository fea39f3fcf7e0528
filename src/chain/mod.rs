mod contracts;
mod story;
mod terms;

pub use story::StoryClient;
pub use terms::PilType;

use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;
use thiserror::Error as ThisError;

use crate::content::PinnedContent;

///
/// ChainError
///

#[derive(Debug, ThisError)]
pub enum ChainError {
    #[error("contract call failed: {0}")]
    Contract(#[from] alloy::contract::Error),

    #[error("transaction was not confirmed: {0}")]
    Pending(#[from] alloy::providers::PendingTransactionError),

    #[error("rpc request failed: {0}")]
    Transport(#[from] alloy::transports::TransportError),

    #[error("transaction {0} reverted")]
    Reverted(B256),

    #[error("transaction {tx_hash} did not emit {event}")]
    MissingEvent { event: &'static str, tx_hash: B256 },

    #[error("invalid license terms: {0}")]
    InvalidTerms(String),
}

/// デプロイ済みプロトコルコントラクトのアドレス一覧
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolContracts {
    pub ip_asset_registry: Address,
    pub licensing_module: Address,
    pub pil_template: Address,
    pub core_metadata_module: Address,
    pub license_attachment_workflows: Address,
    pub royalty_policy_lap: Address,
}

/// 登録時に渡すメタデータ URI とハッシュの組
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpMetadataRefs {
    pub ip_metadata_uri: String,
    pub ip_metadata_hash: B256,
    pub nft_metadata_uri: String,
    pub nft_metadata_hash: B256,
}

impl IpMetadataRefs {
    pub fn new(ip: &PinnedContent, nft: &PinnedContent) -> Self {
        Self {
            ip_metadata_uri: ip.uri.clone(),
            ip_metadata_hash: ip.digest.to_b256(),
            nft_metadata_uri: nft.uri.clone(),
            nft_metadata_hash: nft.digest.to_b256(),
        }
    }
}

/// mint 済みトークンの登録リクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterIpRequest {
    pub nft_contract: Address,
    pub token_id: U256,
    pub terms: PilType,
    pub metadata: IpMetadataRefs,
}

/// SPG による mint + 登録リクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintAndRegisterRequest {
    pub spg_nft_contract: Address,
    pub recipient: Address,
    pub terms: PilType,
    pub metadata: IpMetadataRefs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub tx_hash: B256,
    pub ip_id: Address,
    pub token_id: U256,
    pub license_terms_id: U256,
}

/// NFT を mint する外部コントラクト
#[async_trait]
pub trait NftMinter: Send + Sync {
    /// 送信元アカウント（mint 先の既定オーナー）
    fn account(&self) -> Address;

    /// トランザクション確定まで待ち、新しい tokenId を返す
    async fn mint_nft(&self, nft_contract: Address, to: Address, uri: &str)
    -> Result<U256, ChainError>;
}

/// IP Asset の登録とライセンス条件の付与
#[async_trait]
pub trait IpRegistrar: Send + Sync {
    async fn register_ip_and_attach_pil_terms(
        &self,
        req: RegisterIpRequest,
    ) -> Result<Registration, ChainError>;

    async fn mint_and_register_ip_with_pil_terms(
        &self,
        req: MintAndRegisterRequest,
    ) -> Result<Registration, ChainError>;
}
