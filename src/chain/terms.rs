use alloy::primitives::{Address, Bytes, U256};

use super::ChainError;
use super::contracts::PILTerms;

const NON_COMMERCIAL_REMIX_URI: &str =
    "https://github.com/piplabs/pil-document/blob/998c13e6ee1d04eb817aefd1fe16dfe8be3cd7a2/off-chain-terms/NCSR.json";
const COMMERCIAL_USE_URI: &str =
    "https://github.com/piplabs/pil-document/blob/9a1f803fcf8101a8a78f1dcc929e6014e144ab56/off-chain-terms/CommercialUse.json";
const COMMERCIAL_REMIX_URI: &str =
    "https://github.com/piplabs/pil-document/blob/ad67bb632a310d2557f8abcccd428e4c9c798db1/off-chain-terms/CommercialRemix.json";

/// commercialRevShare は 1e6 = 1%
const REV_SHARE_UNIT: u32 = 1_000_000;

/// PIL のプリセット
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PilType {
    NonCommercialRemix,
    CommercialUse {
        minting_fee: U256,
        currency: Address,
    },
    CommercialRemix {
        minting_fee: U256,
        currency: Address,
        /// パーセント (0..=100)
        commercial_rev_share: u32,
    },
}

/// プリセットからオンチェーンの PILTerms を組み立てる
///
/// 商用プリセットは通貨とロイヤリティポリシーが必須。
/// 送信前にここで弾く。
pub(crate) fn pil_terms(
    pil_type: &PilType,
    royalty_policy: Address,
) -> Result<PILTerms, ChainError> {
    let terms = match *pil_type {
        PilType::NonCommercialRemix => PILTerms {
            transferable: true,
            royaltyPolicy: Address::ZERO,
            defaultMintingFee: U256::ZERO,
            expiration: U256::ZERO,
            commercialUse: false,
            commercialAttribution: false,
            commercializerChecker: Address::ZERO,
            commercializerCheckerData: zero_address_bytes(),
            commercialRevShare: 0,
            commercialRevCeiling: U256::ZERO,
            derivativesAllowed: true,
            derivativesAttribution: true,
            derivativesApproval: false,
            derivativesReciprocal: true,
            derivativeRevCeiling: U256::ZERO,
            currency: Address::ZERO,
            uri: NON_COMMERCIAL_REMIX_URI.to_string(),
        },
        PilType::CommercialUse {
            minting_fee,
            currency,
        } => {
            check_commercial(currency, royalty_policy)?;
            PILTerms {
                transferable: true,
                royaltyPolicy: royalty_policy,
                defaultMintingFee: minting_fee,
                expiration: U256::ZERO,
                commercialUse: true,
                commercialAttribution: true,
                commercializerChecker: Address::ZERO,
                commercializerCheckerData: zero_address_bytes(),
                commercialRevShare: 0,
                commercialRevCeiling: U256::ZERO,
                derivativesAllowed: false,
                derivativesAttribution: false,
                derivativesApproval: false,
                derivativesReciprocal: false,
                derivativeRevCeiling: U256::ZERO,
                currency,
                uri: COMMERCIAL_USE_URI.to_string(),
            }
        }
        PilType::CommercialRemix {
            minting_fee,
            currency,
            commercial_rev_share,
        } => {
            check_commercial(currency, royalty_policy)?;
            if commercial_rev_share > 100 {
                return Err(ChainError::InvalidTerms(format!(
                    "commercial revenue share must be between 0 and 100, got {commercial_rev_share}"
                )));
            }
            PILTerms {
                transferable: true,
                royaltyPolicy: royalty_policy,
                defaultMintingFee: minting_fee,
                expiration: U256::ZERO,
                commercialUse: true,
                commercialAttribution: true,
                commercializerChecker: Address::ZERO,
                commercializerCheckerData: zero_address_bytes(),
                commercialRevShare: commercial_rev_share * REV_SHARE_UNIT,
                commercialRevCeiling: U256::ZERO,
                derivativesAllowed: true,
                derivativesAttribution: true,
                derivativesApproval: false,
                derivativesReciprocal: true,
                derivativeRevCeiling: U256::ZERO,
                currency,
                uri: COMMERCIAL_REMIX_URI.to_string(),
            }
        }
    };

    Ok(terms)
}

fn check_commercial(currency: Address, royalty_policy: Address) -> Result<(), ChainError> {
    if currency.is_zero() {
        return Err(ChainError::InvalidTerms(
            "commercial terms require a currency token".to_string(),
        ));
    }
    if royalty_policy.is_zero() {
        return Err(ChainError::InvalidTerms(
            "commercial terms require a royalty policy".to_string(),
        ));
    }
    Ok(())
}

fn zero_address_bytes() -> Bytes {
    Bytes::copy_from_slice(Address::ZERO.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const WIP: Address = address!("1514000000000000000000000000000000000000");
    const LAP: Address = address!("28b4F70ffE5ba7A26aEF979226f77Eb57fb9Fdb6");

    #[test]
    fn non_commercial_remix_needs_no_policy() {
        let terms = pil_terms(&PilType::NonCommercialRemix, Address::ZERO).unwrap();
        assert!(!terms.commercialUse);
        assert!(terms.derivativesAllowed);
        assert!(terms.derivativesReciprocal);
        assert_eq!(terms.royaltyPolicy, Address::ZERO);
        assert_eq!(terms.uri, NON_COMMERCIAL_REMIX_URI);
    }

    #[test]
    fn commercial_remix_scales_rev_share() {
        let terms = pil_terms(
            &PilType::CommercialRemix {
                minting_fee: U256::from(10),
                currency: WIP,
                commercial_rev_share: 5,
            },
            LAP,
        )
        .unwrap();
        assert_eq!(terms.commercialRevShare, 5_000_000);
        assert_eq!(terms.defaultMintingFee, U256::from(10));
        assert_eq!(terms.royaltyPolicy, LAP);
        assert!(terms.derivativesAllowed);
    }

    #[test]
    fn commercial_use_disallows_derivatives() {
        let terms = pil_terms(
            &PilType::CommercialUse {
                minting_fee: U256::ZERO,
                currency: WIP,
            },
            LAP,
        )
        .unwrap();
        assert!(terms.commercialUse);
        assert!(!terms.derivativesAllowed);
    }

    #[test]
    fn commercial_without_currency_is_rejected() {
        let terms = pil_terms(
            &PilType::CommercialUse {
                minting_fee: U256::ZERO,
                currency: Address::ZERO,
            },
            LAP,
        );
        assert!(matches!(terms, Err(ChainError::InvalidTerms(_))));
    }

    #[test]
    fn commercial_without_royalty_policy_is_rejected() {
        let terms = pil_terms(
            &PilType::CommercialRemix {
                minting_fee: U256::ZERO,
                currency: WIP,
                commercial_rev_share: 10,
            },
            Address::ZERO,
        );
        assert!(matches!(terms, Err(ChainError::InvalidTerms(_))));
    }

    #[test]
    fn rev_share_over_hundred_is_rejected() {
        let terms = pil_terms(
            &PilType::CommercialRemix {
                minting_fee: U256::ZERO,
                currency: WIP,
                commercial_rev_share: 101,
            },
            LAP,
        );
        assert!(matches!(terms, Err(ChainError::InvalidTerms(_))));
    }
}
