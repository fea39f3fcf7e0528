use serde::{Deserialize, Serialize};

/// IP Asset メタデータ（IPA metadata standard）
///
/// フィールドの宣言順がそのまま正規化 JSON のキー順になる。
/// 空のオプション項目はシリアライズ時に省略する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpMetadata {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watermark_img: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub creators: Vec<IpCreator>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<IpAttribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// key の重複は許容し、順序は保持する
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpAttribute {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpCreator {
    pub name: String,
    pub address: String,
    pub contribution_percent: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// ERC-721 形式の NFT メタデータ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NftMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: String,
}

impl IpMetadata {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ip_type: None,
            created_at: None,
            watermark_img: None,
            creators: Vec::new(),
            attributes: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(IpAttribute {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_creator(mut self, creator: IpCreator) -> Self {
        self.creators.push(creator);
        self
    }
}

impl NftMetadata {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            image: image.into(),
            attributes: Vec::new(),
        }
    }
}

/// 各ワークフローで使うサンプル入力
pub mod samples {
    use super::{IpMetadata, NftMetadata};

    const NFT_NAME: &str = "NFT representing ownership of IP Asset";
    const NFT_DESCRIPTION: &str = "This NFT represents ownership of an IP Asset";

    /// 通常の mint → register 用
    pub fn kenta_the_samurai() -> (IpMetadata, NftMetadata) {
        let ip = IpMetadata::new(
            "Kenta the Samurai Azuki",
            "An amazing IP asset by creators Kaiser and Azuki.",
        )
        .with_attribute("Creator 1 Name", "Kaiser")
        .with_attribute("Creator 1 Bio", "Kaiser is an anime enthusiast.")
        .with_attribute("Creator 1 Twitter", "https://twitter.com/kentathesamurai")
        .with_attribute("Creator 2 Name", "Azuki")
        .with_attribute("Creator 2 Bio", "Creator of Azuki collection")
        .with_attribute("Rarity", "Legendary");

        let nft = NftMetadata::new(NFT_NAME, NFT_DESCRIPTION, "https://i.imgur.com/gb59b2S.png");

        (ip, nft)
    }

    /// SPG による一括 mint + register 用
    pub fn etching_edition() -> (IpMetadata, NftMetadata) {
        let ip = IpMetadata::new("MY IP ASSET NFT", "Sample of my NFT")
            .with_attribute("Creator Name", "Damien Hirst")
            .with_attribute(
                "Creator Description",
                "Damien Hirst, a poster boy for the Young British Artists who rose to prominence in late 1980s London...",
            )
            .with_attribute("Creator Instagram", "https://www.instagram.com/damienhirst/")
            .with_attribute("Creator Wikipedia", "https://en.wikipedia.org/wiki/Damien_Hirst")
            // 文字化けした "Hahnem√ºhle" ではなく正しい表記。ダイジェストもこちら基準
            .with_attribute("Materials", "Etching on Hahnemühle paper")
            .with_attribute("Size", "45 1/10 x 44 3/10 in | 114.5 x 112.5 cm")
            .with_attribute("Edition", "Edition of 68")
            .with_attribute(
                "Signature",
                "Hand-signed by artist, Signed and numbered by the artist",
            )
            .with_attribute("Certificate of authenticity", "link_to_certificate");

        let nft = NftMetadata::new(NFT_NAME, NFT_DESCRIPTION, "https://picsum.photos/200");

        (ip, nft)
    }
}
