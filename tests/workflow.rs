use std::sync::Mutex;

use alloy::primitives::{Address, B256, U256, address};
use async_trait::async_trait;

use ip_asset_mint::Error;
use ip_asset_mint::chain::{
    ChainError, IpRegistrar, MintAndRegisterRequest, NftMinter, PilType, RegisterIpRequest,
    Registration,
};
use ip_asset_mint::content::{CanonicalJson, ContentStore, Gateway, UploadError};
use ip_asset_mint::metadata::samples;
use ip_asset_mint::workflow::{
    self, IP_METADATA_PIN_NAME, NFT_METADATA_PIN_NAME, SpgTarget, Uploader,
};

const OWNER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
const NFT_CONTRACT: Address = address!("041B4F29183317Fd352AE57e331154b73F8a1D73");
const SPG_CONTRACT: Address = address!("C81B2cbEFD1aA0227bf513729580d3CF40fd61dF");
const SPG_TARGET: SpgTarget = SpgTarget {
    spg_nft_contract: SPG_CONTRACT,
    recipient: OWNER,
};
const IP_ID: Address = address!("00000000000000000000000000000000000000a1");

/// 名前ごとに固定 CID を返すストア
#[derive(Default)]
struct MockStore {
    fail: bool,
    pinned: Mutex<Vec<(String, String)>>,
}

impl MockStore {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl ContentStore for MockStore {
    async fn pin_json(&self, name: &str, json: &CanonicalJson) -> Result<String, UploadError> {
        if self.fail {
            return Err(UploadError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        self.pinned
            .lock()
            .unwrap()
            .push((name.to_string(), json.as_str().to_string()));
        Ok(format!("cid-{name}"))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Mint { contract: Address, to: Address, uri: String },
    Register(RegisterIpRequest),
    MintAndRegister(MintAndRegisterRequest),
}

/// mint は常に tokenId 42 を返す
#[derive(Default)]
struct MockChain {
    calls: Mutex<Vec<Call>>,
}

impl MockChain {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

fn registration(token_id: U256) -> Registration {
    Registration {
        tx_hash: B256::repeat_byte(0xab),
        ip_id: IP_ID,
        token_id,
        license_terms_id: U256::from(1),
    }
}

#[async_trait]
impl NftMinter for MockChain {
    fn account(&self) -> Address {
        OWNER
    }

    async fn mint_nft(
        &self,
        nft_contract: Address,
        to: Address,
        uri: &str,
    ) -> Result<U256, ChainError> {
        self.calls.lock().unwrap().push(Call::Mint {
            contract: nft_contract,
            to,
            uri: uri.to_string(),
        });
        Ok(U256::from(42))
    }
}

#[async_trait]
impl IpRegistrar for MockChain {
    async fn register_ip_and_attach_pil_terms(
        &self,
        req: RegisterIpRequest,
    ) -> Result<Registration, ChainError> {
        let token_id = req.token_id;
        self.calls.lock().unwrap().push(Call::Register(req));
        Ok(registration(token_id))
    }

    async fn mint_and_register_ip_with_pil_terms(
        &self,
        req: MintAndRegisterRequest,
    ) -> Result<Registration, ChainError> {
        self.calls.lock().unwrap().push(Call::MintAndRegister(req));
        Ok(registration(U256::from(7)))
    }
}

/// 登録が常に revert するチェーン
struct RevertingChain;

#[async_trait]
impl NftMinter for RevertingChain {
    fn account(&self) -> Address {
        OWNER
    }

    async fn mint_nft(&self, _: Address, _: Address, _: &str) -> Result<U256, ChainError> {
        Ok(U256::from(1))
    }
}

#[async_trait]
impl IpRegistrar for RevertingChain {
    async fn register_ip_and_attach_pil_terms(
        &self,
        _: RegisterIpRequest,
    ) -> Result<Registration, ChainError> {
        Err(ChainError::Reverted(B256::ZERO))
    }

    async fn mint_and_register_ip_with_pil_terms(
        &self,
        _: MintAndRegisterRequest,
    ) -> Result<Registration, ChainError> {
        Err(ChainError::Reverted(B256::ZERO))
    }
}

#[tokio::test]
async fn minted_token_id_reaches_registration_unmodified() {
    let store = MockStore::default();
    let chain = MockChain::default();
    let (ip, nft) = samples::kenta_the_samurai();

    let outcome = workflow::mint_then_register(
        &Uploader::new(&store, &Gateway::default()),
        &chain,
        NFT_CONTRACT,
        PilType::NonCommercialRemix,
        &ip,
        &nft,
    )
    .await
    .unwrap();

    assert_eq!(outcome.token_id, U256::from(42));

    let calls = chain.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[0],
        Call::Mint {
            contract: NFT_CONTRACT,
            to: OWNER,
            uri: format!("https://ipfs.io/ipfs/cid-{NFT_METADATA_PIN_NAME}"),
        }
    );
    let Call::Register(req) = &calls[1] else {
        panic!("expected a registration call, got {:?}", calls[1]);
    };
    assert_eq!(req.token_id, U256::from(42));
    assert_eq!(req.nft_contract, NFT_CONTRACT);
    assert_eq!(req.terms, PilType::NonCommercialRemix);
}

#[tokio::test]
async fn metadata_uris_follow_gateway_pattern() {
    let store = MockStore::default();
    let (ip, nft) = samples::kenta_the_samurai();

    let bundle = Uploader::new(&store, &Gateway::default())
        .pin_bundle(&ip, &nft)
        .await
        .unwrap();

    assert_eq!(bundle.ip.cid, format!("cid-{IP_METADATA_PIN_NAME}"));
    assert_eq!(
        bundle.ip.uri,
        format!("https://ipfs.io/ipfs/cid-{IP_METADATA_PIN_NAME}")
    );
    assert_eq!(
        bundle.nft.uri,
        format!("https://ipfs.io/ipfs/cid-{NFT_METADATA_PIN_NAME}")
    );

    let refs = bundle.refs();
    assert_eq!(refs.ip_metadata_uri, bundle.ip.uri);
    assert_eq!(refs.nft_metadata_hash, bundle.nft.digest.to_b256());
}

#[tokio::test]
async fn pinned_bytes_are_the_hashed_bytes() {
    let store = MockStore::default();
    let (ip, nft) = samples::etching_edition();

    let bundle = Uploader::new(&store, &Gateway::default())
        .pin_bundle(&ip, &nft)
        .await
        .unwrap();

    let pinned = store.pinned.lock().unwrap().clone();
    assert_eq!(pinned.len(), 2);
    assert_eq!(pinned[0].0, IP_METADATA_PIN_NAME);
    assert_eq!(pinned[1].0, NFT_METADATA_PIN_NAME);

    let ip_json = CanonicalJson::from_value(&ip).unwrap();
    assert_eq!(pinned[0].1, ip_json.as_str());
    assert_eq!(bundle.ip.digest, ip_json.digest());
}

#[tokio::test]
async fn upload_failure_prevents_any_chain_call() {
    let store = MockStore::failing();
    let chain = MockChain::default();
    let (ip, nft) = samples::kenta_the_samurai();

    let err = workflow::mint_then_register(
        &Uploader::new(&store, &Gateway::default()),
        &chain,
        NFT_CONTRACT,
        PilType::NonCommercialRemix,
        &ip,
        &nft,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::Upload(UploadError::Status { status: 503, .. })));

    let err = workflow::mint_and_register(
        &Uploader::new(&store, &Gateway::default()),
        &chain,
        SPG_TARGET,
        PilType::NonCommercialRemix,
        &ip,
        &nft,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::Upload(_)));

    assert!(chain.calls().is_empty());
}

#[tokio::test]
async fn both_workflows_produce_identical_hashes() {
    let (ip, nft) = samples::etching_edition();
    let gateway = Gateway::default();

    let chain = MockChain::default();
    let separate = workflow::mint_then_register(
        &Uploader::new(&MockStore::default(), &gateway),
        &chain,
        NFT_CONTRACT,
        PilType::NonCommercialRemix,
        &ip,
        &nft,
    )
    .await
    .unwrap();

    let spg_chain = MockChain::default();
    let combined = workflow::mint_and_register(
        &Uploader::new(&MockStore::default(), &gateway),
        &spg_chain,
        SPG_TARGET,
        PilType::NonCommercialRemix,
        &ip,
        &nft,
    )
    .await
    .unwrap();

    assert_eq!(separate.metadata.ip.digest, combined.metadata.ip.digest);
    assert_eq!(separate.metadata.nft.digest, combined.metadata.nft.digest);

    let Call::Register(register) = &chain.calls()[1] else {
        panic!("expected a registration call");
    };
    let Call::MintAndRegister(spg) = &spg_chain.calls()[0] else {
        panic!("expected a combined call");
    };
    assert_eq!(register.metadata, spg.metadata);
}

#[tokio::test]
async fn combined_workflow_skips_separate_mint() {
    let store = MockStore::default();
    let chain = MockChain::default();
    let (ip, nft) = samples::etching_edition();

    let outcome = workflow::mint_and_register(
        &Uploader::new(&store, &Gateway::default()),
        &chain,
        SPG_TARGET,
        PilType::NonCommercialRemix,
        &ip,
        &nft,
    )
    .await
    .unwrap();

    let calls = chain.calls();
    assert_eq!(calls.len(), 1);
    let Call::MintAndRegister(req) = &calls[0] else {
        panic!("expected a combined call, got {:?}", calls[0]);
    };
    assert_eq!(req.spg_nft_contract, SPG_CONTRACT);
    assert_eq!(req.recipient, OWNER);
    assert_eq!(outcome.token_id, U256::from(7));
    assert_eq!(outcome.registration.ip_id, IP_ID);
}

#[tokio::test]
async fn registration_failure_aborts_the_run() {
    let (ip, nft) = samples::kenta_the_samurai();

    let err = workflow::mint_then_register(
        &Uploader::new(&MockStore::default(), &Gateway::default()),
        &RevertingChain,
        NFT_CONTRACT,
        PilType::NonCommercialRemix,
        &ip,
        &nft,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::Chain(ChainError::Reverted(_))));
}
