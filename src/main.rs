use ip_asset_mint::chain::{PilType, StoryClient};
use ip_asset_mint::config::Settings;
use ip_asset_mint::content::PinataStore;
use ip_asset_mint::metadata::samples;
use ip_asset_mint::workflow::{self, Uploader};

use anyhow::{Context, Result};
use tracing::info;

/// NFT を mint してから IP Asset として登録する
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    ip_asset_mint::init_tracing();

    let settings = Settings::from_env().context("環境変数の読み込みに失敗しました")?;

    let store = PinataStore::new(settings.pinata_jwt.as_str())
        .context("Pinata クライアントの初期化に失敗しました")?;
    let client = StoryClient::connect(
        settings.signer.clone(),
        settings.rpc_url.clone(),
        settings.contracts,
    );

    let (ip_metadata, nft_metadata) = samples::kenta_the_samurai();

    info!(nft_contract = %settings.nft_contract, "Starting mint and register");

    let uploader = Uploader::new(&store, &settings.gateway);
    let outcome = workflow::mint_then_register(
        &uploader,
        &client,
        settings.nft_contract,
        PilType::NonCommercialRemix,
        &ip_metadata,
        &nft_metadata,
    )
    .await
    .context("IP Asset の mint / 登録に失敗しました")?;

    let ip_id = outcome.registration.ip_id;
    println!("NFT minted with tokenId {}", outcome.token_id);
    println!(
        "Root IPA created at transaction hash {}, IPA ID: {}",
        outcome.registration.tx_hash, ip_id
    );
    println!("View on the explorer: {}", settings.explorer_ipa_url(ip_id));

    Ok(())
}
