//! Devil shop purchases.

use gollux_core::constants::*;
use gollux_core::enums::{PartnerKind, ShopItem};
use gollux_core::error::PurchaseError;

use crate::player::PlayerState;

/// Buy `item` for `player`. Currency is only deducted when the purchase
/// goes through. Returns the number of levels gained (xp potions).
pub fn purchase(player: &mut PlayerState, item: ShopItem) -> Result<u32, PurchaseError> {
    let price = item.price();

    match item {
        ShopItem::Skill(kind) => {
            if player.skills.owns(kind) {
                return Err(PurchaseError::AlreadyOwned);
            }
            if player.skills.owned().count() >= player.skills.len() {
                return Err(PurchaseError::SlotsFull);
            }
        }
        ShopItem::SkullPartner if player.partner.kind == PartnerKind::Skull => {
            return Err(PurchaseError::PartnerAlreadyUpgraded);
        }
        _ => {}
    }

    if !player.spend(price) {
        return Err(PurchaseError::NotEnoughMoney {
            item,
            price,
            available: player.currency,
        });
    }

    let levels = match item {
        ShopItem::HealthPotion => {
            player.heal(HEALTH_POTION_AMOUNT);
            0
        }
        ShopItem::XpPotion => player.gain_xp(XP_POTION_AMOUNT),
        ShopItem::SpeedPotion => {
            player.speed_buff_secs = SPEED_POTION_SECS;
            0
        }
        ShopItem::RegenPotion => {
            player.regen_buff_secs = REGEN_POTION_SECS;
            0
        }
        ShopItem::Skill(kind) => {
            player.skills.learn(kind)?;
            0
        }
        ShopItem::SkullPartner => {
            player.partner.kind = PartnerKind::Skull;
            0
        }
    };
    Ok(levels)
}
