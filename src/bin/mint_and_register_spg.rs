use ip_asset_mint::chain::{NftMinter, PilType, StoryClient};
use ip_asset_mint::config::Settings;
use ip_asset_mint::content::PinataStore;
use ip_asset_mint::metadata::samples;
use ip_asset_mint::workflow::{self, SpgTarget, Uploader};

use anyhow::{Context, Result};
use tracing::info;

/// SPG コントラクトで mint と登録を一度に行う
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

    let (ip_metadata, nft_metadata) = samples::etching_edition();

    info!(spg_nft_contract = %settings.spg_nft_contract, "Starting SPG mint and register");

    let uploader = Uploader::new(&store, &settings.gateway);
    let target = SpgTarget {
        spg_nft_contract: settings.spg_nft_contract,
        recipient: client.account(),
    };
    let outcome = workflow::mint_and_register(
        &uploader,
        &client,
        target,
        PilType::NonCommercialRemix,
        &ip_metadata,
        &nft_metadata,
    )
    .await
    .context("SPG による IP Asset の mint / 登録に失敗しました")?;

    let ip_id = outcome.registration.ip_id;
    println!(
        "Root IPA created at transaction hash {}, IPA ID: {}",
        outcome.registration.tx_hash, ip_id
    );
    println!("View on the explorer: {}", settings.explorer_ipa_url(ip_id));

    Ok(())
}
