use alloy::network::{Ethereum, EthereumWallet};
use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy::rpc::types::{Log, TransactionReceipt};
use alloy::signers::local::PrivateKeySigner;
use alloy::sol_types::{SolCall, SolEvent};
use alloy::transports::http::reqwest::Url;
use async_trait::async_trait;
use tracing::{debug, info};

use super::contracts::{
    ICoreMetadataModule, IIPAccount, IIPAssetRegistry, ILicenseAttachmentWorkflows,
    ILicensingModule, IMintableNft, IPILicenseTemplate, IPMetadata, PILTerms,
};
use super::terms::pil_terms;
use super::{
    ChainError, IpMetadataRefs, IpRegistrar, MintAndRegisterRequest, NftMinter,
    ProtocolContracts, RegisterIpRequest, Registration,
};

/// Story Protocol クライアント（ローカル秘密鍵で署名）
pub struct StoryClient {
    provider: DynProvider,
    account: Address,
    contracts: ProtocolContracts,
}

impl StoryClient {
    pub fn connect(signer: PrivateKeySigner, rpc_url: Url, contracts: ProtocolContracts) -> Self {
        let account = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(rpc_url)
            .erased();

        info!(%account, "Story client connected");

        Self {
            provider,
            account,
            contracts,
        }
    }

    /// receipt を待ち、revert していれば失敗にする
    async fn confirm(
        &self,
        pending: PendingTransactionBuilder<Ethereum>,
    ) -> Result<TransactionReceipt, ChainError> {
        let tx_hash = *pending.tx_hash();
        debug!(%tx_hash, "Waiting for transaction");

        let receipt = pending.get_receipt().await?;
        if !receipt.status() {
            return Err(ChainError::Reverted(receipt.transaction_hash));
        }
        Ok(receipt)
    }

    /// 既存の PIL 条件 ID を引き、未登録なら登録する
    async fn license_terms_id(&self, terms: &PILTerms) -> Result<U256, ChainError> {
        let template = IPILicenseTemplate::new(self.contracts.pil_template, &self.provider);

        let existing = template.getLicenseTermsId(terms.clone()).call().await?;
        if !existing.is_zero() {
            return Ok(existing);
        }

        let id = template.registerLicenseTerms(terms.clone()).call().await?;
        let pending = template.registerLicenseTerms(terms.clone()).send().await?;
        let receipt = self.confirm(pending).await?;
        info!(
            license_terms_id = %id,
            tx_hash = %receipt.transaction_hash,
            "License terms registered"
        );

        Ok(id)
    }

    /// IP アカウント経由でモジュールを呼ぶ
    async fn execute_as_ip(
        &self,
        ip_id: Address,
        to: Address,
        data: Bytes,
    ) -> Result<(), ChainError> {
        let ip_account = IIPAccount::new(ip_id, &self.provider);
        let pending = ip_account.execute(to, U256::ZERO, data).send().await?;
        self.confirm(pending).await?;
        Ok(())
    }
}

/// `emitter` が出した `E` のうち `pred` を満たす最初のもの
fn find_event<E, F>(logs: &[Log], emitter: Address, pred: F) -> Option<E>
where
    E: SolEvent,
    F: Fn(&E) -> bool,
{
    logs.iter()
        .filter(|log| log.address() == emitter)
        .filter_map(|log| log.log_decode::<E>().ok())
        .map(|log| log.inner.data)
        .find(|event| pred(event))
}

/// ゼロアドレスから `to` への Transfer を mint とみなす
fn minted_token_id(logs: &[Log], nft_contract: Address, to: Address) -> Option<U256> {
    find_event::<IMintableNft::Transfer, _>(logs, nft_contract, |t| {
        t.from.is_zero() && t.to == to
    })
    .map(|t| t.tokenId)
}

fn ip_metadata(refs: &IpMetadataRefs) -> IPMetadata {
    IPMetadata {
        ipMetadataURI: refs.ip_metadata_uri.clone(),
        ipMetadataHash: refs.ip_metadata_hash,
        nftMetadataURI: refs.nft_metadata_uri.clone(),
        nftMetadataHash: refs.nft_metadata_hash,
    }
}

#[async_trait]
impl NftMinter for StoryClient {
    fn account(&self) -> Address {
        self.account
    }

    async fn mint_nft(
        &self,
        nft_contract: Address,
        to: Address,
        uri: &str,
    ) -> Result<U256, ChainError> {
        let nft = IMintableNft::new(nft_contract, &self.provider);
        let pending = nft.mintNFT(to, uri.to_string()).send().await?;
        let receipt = self.confirm(pending).await?;

        let token_id = minted_token_id(receipt.inner.logs(), nft_contract, to)
            .ok_or(ChainError::MissingEvent {
                event: "Transfer",
                tx_hash: receipt.transaction_hash,
            })?;

        info!(%token_id, tx_hash = %receipt.transaction_hash, "NFT minted");
        Ok(token_id)
    }
}

#[async_trait]
impl IpRegistrar for StoryClient {
    async fn register_ip_and_attach_pil_terms(
        &self,
        req: RegisterIpRequest,
    ) -> Result<Registration, ChainError> {
        let terms = pil_terms(&req.terms, self.contracts.royalty_policy_lap)?;
        let chain_id = self.provider.get_chain_id().await?;

        let registry = IIPAssetRegistry::new(self.contracts.ip_asset_registry, &self.provider);
        let pending = registry
            .register(U256::from(chain_id), req.nft_contract, req.token_id)
            .send()
            .await?;
        let receipt = self.confirm(pending).await?;

        let registered = find_event::<IIPAssetRegistry::IPRegistered, _>(
            receipt.inner.logs(),
            self.contracts.ip_asset_registry,
            |e| e.tokenContract == req.nft_contract && e.tokenId == req.token_id,
        )
        .ok_or(ChainError::MissingEvent {
            event: "IPRegistered",
            tx_hash: receipt.transaction_hash,
        })?;
        let ip_id = registered.ipId;
        info!(%ip_id, token_id = %req.token_id, "IP asset registered");

        let set_all = ICoreMetadataModule::setAllCall {
            ipId: ip_id,
            metadataURI: req.metadata.ip_metadata_uri.clone(),
            metadataHash: req.metadata.ip_metadata_hash,
            nftMetadataHash: req.metadata.nft_metadata_hash,
        };
        self.execute_as_ip(
            ip_id,
            self.contracts.core_metadata_module,
            set_all.abi_encode().into(),
        )
        .await?;
        debug!(%ip_id, "Core metadata set");

        let license_terms_id = self.license_terms_id(&terms).await?;
        let attach = ILicensingModule::attachLicenseTermsCall {
            ipId: ip_id,
            licenseTemplate: self.contracts.pil_template,
            licenseTermsId: license_terms_id,
        };
        self.execute_as_ip(
            ip_id,
            self.contracts.licensing_module,
            attach.abi_encode().into(),
        )
        .await?;
        info!(%ip_id, %license_terms_id, "License terms attached");

        Ok(Registration {
            tx_hash: receipt.transaction_hash,
            ip_id,
            token_id: req.token_id,
            license_terms_id,
        })
    }

    async fn mint_and_register_ip_with_pil_terms(
        &self,
        req: MintAndRegisterRequest,
    ) -> Result<Registration, ChainError> {
        let terms = pil_terms(&req.terms, self.contracts.royalty_policy_lap)?;

        let workflows = ILicenseAttachmentWorkflows::new(
            self.contracts.license_attachment_workflows,
            &self.provider,
        );
        let pending = workflows
            .mintAndRegisterIpAndAttachPILTerms(
                req.spg_nft_contract,
                req.recipient,
                ip_metadata(&req.metadata),
                terms,
            )
            .send()
            .await?;
        let receipt = self.confirm(pending).await?;
        let tx_hash = receipt.transaction_hash;

        let logs = receipt.inner.logs();
        let registered = find_event::<IIPAssetRegistry::IPRegistered, _>(
            logs,
            self.contracts.ip_asset_registry,
            |e| e.tokenContract == req.spg_nft_contract,
        )
        .ok_or(ChainError::MissingEvent {
            event: "IPRegistered",
            tx_hash,
        })?;
        let attached = find_event::<ILicensingModule::LicenseTermsAttached, _>(
            logs,
            self.contracts.licensing_module,
            |e| e.ipId == registered.ipId,
        )
        .ok_or(ChainError::MissingEvent {
            event: "LicenseTermsAttached",
            tx_hash,
        })?;

        info!(
            ip_id = %registered.ipId,
            token_id = %registered.tokenId,
            license_terms_id = %attached.licenseTermsId,
            "IP asset minted and registered"
        );

        Ok(Registration {
            tx_hash,
            ip_id: registered.ipId,
            token_id: registered.tokenId,
            license_terms_id: attached.licenseTermsId,
        })
    }
}
