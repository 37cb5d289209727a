//! Error types for the simulation crates.

use thiserror::Error;

use crate::enums::ShopItem;

/// Failures that abort session setup or reject admin input.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid map layout: {0}")]
    InvalidMap(String),

    #[error("failed to parse {what}: {source}")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid session config: {0}")]
    InvalidConfig(String),

    #[error("unknown console command `{0}`")]
    UnknownCheat(String),
}

/// Why the shop refused a purchase. Refusals are not fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PurchaseError {
    #[error("shop is not open")]
    ShopClosed,

    #[error("not enough money for {item:?}: need {price}, have {available}")]
    NotEnoughMoney {
        item: ShopItem,
        price: u32,
        available: u32,
    },

    #[error("skill already owned")]
    AlreadyOwned,

    #[error("all skill slots are full")]
    SlotsFull,

    #[error("partner already upgraded")]
    PartnerAlreadyUpgraded,
}
