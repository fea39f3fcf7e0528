use alloy::primitives::{Address, U256};
use tracing::info;

use crate::chain::{
    IpMetadataRefs, IpRegistrar, MintAndRegisterRequest, NftMinter, PilType, RegisterIpRequest,
    Registration,
};
use crate::content::{ContentStore, Gateway, PinnedContent, pin_metadata};
use crate::error::Result;
use crate::metadata::{IpMetadata, NftMetadata};

pub const IP_METADATA_PIN_NAME: &str = "ip-metadata.json";
pub const NFT_METADATA_PIN_NAME: &str = "nft-metadata.json";

/// IPFS に上げた 2 つのメタデータ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedBundle {
    pub ip: PinnedContent,
    pub nft: PinnedContent,
}

impl PinnedBundle {
    pub fn refs(&self) -> IpMetadataRefs {
        IpMetadataRefs::new(&self.ip, &self.nft)
    }
}

/// 1 回の実行結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub token_id: U256,
    pub registration: Registration,
    pub metadata: PinnedBundle,
}

/// pin 先ストアと取得 URI を作るゲートウェイの組
pub struct Uploader<'a, S: ?Sized> {
    pub store: &'a S,
    pub gateway: &'a Gateway,
}

impl<'a, S> Uploader<'a, S>
where
    S: ContentStore + ?Sized,
{
    pub fn new(store: &'a S, gateway: &'a Gateway) -> Self {
        Self { store, gateway }
    }

    /// IP メタデータ → NFT メタデータの順で pin する
    ///
    /// 両ワークフロー共通。ハッシュの計算経路はここだけ。
    pub async fn pin_bundle(&self, ip: &IpMetadata, nft: &NftMetadata) -> Result<PinnedBundle> {
        let ip = pin_metadata(self.store, self.gateway, IP_METADATA_PIN_NAME, ip).await?;
        let nft = pin_metadata(self.store, self.gateway, NFT_METADATA_PIN_NAME, nft).await?;
        Ok(PinnedBundle { ip, nft })
    }
}

/// pin → mint → 登録（ライセンス付与）
pub async fn mint_then_register<S, C>(
    uploader: &Uploader<'_, S>,
    chain: &C,
    nft_contract: Address,
    terms: PilType,
    ip: &IpMetadata,
    nft: &NftMetadata,
) -> Result<Outcome>
where
    S: ContentStore + ?Sized,
    C: NftMinter + IpRegistrar + ?Sized,
{
    let metadata = uploader.pin_bundle(ip, nft).await?;

    let owner = chain.account();
    let token_id = chain
        .mint_nft(nft_contract, owner, &metadata.nft.uri)
        .await?;
    info!(%token_id, %owner, "Minted NFT");

    let registration = chain
        .register_ip_and_attach_pil_terms(RegisterIpRequest {
            nft_contract,
            token_id,
            terms,
            metadata: metadata.refs(),
        })
        .await?;
    info!(ip_id = %registration.ip_id, tx_hash = %registration.tx_hash, "Registered IP asset");

    Ok(Outcome {
        token_id,
        registration,
        metadata,
    })
}

/// SPG での mint 先
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpgTarget {
    pub spg_nft_contract: Address,
    pub recipient: Address,
}

/// pin → SPG で mint と登録を 1 トランザクションで
pub async fn mint_and_register<S, C>(
    uploader: &Uploader<'_, S>,
    chain: &C,
    target: SpgTarget,
    terms: PilType,
    ip: &IpMetadata,
    nft: &NftMetadata,
) -> Result<Outcome>
where
    S: ContentStore + ?Sized,
    C: IpRegistrar + ?Sized,
{
    let metadata = uploader.pin_bundle(ip, nft).await?;

    let registration = chain
        .mint_and_register_ip_with_pil_terms(MintAndRegisterRequest {
            spg_nft_contract: target.spg_nft_contract,
            recipient: target.recipient,
            terms,
            metadata: metadata.refs(),
        })
        .await?;
    info!(
        ip_id = %registration.ip_id,
        token_id = %registration.token_id,
        tx_hash = %registration.tx_hash,
        "Minted and registered IP asset"
    );

    Ok(Outcome {
        token_id: registration.token_id,
        registration,
        metadata,
    })
}
