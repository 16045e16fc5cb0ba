//! Trading post item ids referenced by the built-in catalog.

use crate::domain::ItemId;

// Gear
pub const RARE_UNID_GEAR: ItemId = ItemId::new(83008);
pub const UNID_GEAR: ItemId = ItemId::new(84731);

// T6 materials
pub const ECTOPLASM: ItemId = ItemId::new(19721);
pub const ELABORATE_TOTEM: ItemId = ItemId::new(24300);
pub const THICK_LEATHER: ItemId = ItemId::new(19729);
pub const GOSSAMER_SCRAP: ItemId = ItemId::new(19745);
pub const SILK_SCRAP: ItemId = ItemId::new(19748);
pub const HARDENED_LEATHER: ItemId = ItemId::new(19732);
pub const ANCIENT_WOOD: ItemId = ItemId::new(19725);
pub const ORICHALCUM: ItemId = ItemId::new(19701);

// T5 materials
pub const MITHRIL_ORE: ItemId = ItemId::new(19700);
pub const ELDER_WOOD_LOG: ItemId = ItemId::new(19722);
pub const LARGE_CLAW: ItemId = ItemId::new(24350);
pub const POTENT_BLOOD: ItemId = ItemId::new(24294);
pub const LARGE_BONE: ItemId = ItemId::new(24341);
pub const INTRICATE_TOTEM: ItemId = ItemId::new(24299);
pub const LARGE_FANG: ItemId = ItemId::new(24356);
pub const POTENT_VENOM_SAC: ItemId = ItemId::new(24282);
pub const LARGE_SCALE: ItemId = ItemId::new(24288);

// Lucent
pub const PILE_OF_LUCENT_CRYSTAL: ItemId = ItemId::new(89271);
pub const LUCENT_MOTE: ItemId = ItemId::new(89140);

// Runes and relics
pub const SCHOLAR_RUNE: ItemId = ItemId::new(24836);
pub const RELIC_OF_FIREWORKS: ItemId = ItemId::new(100947);

// Symbols and charms
pub const SYMBOL_OF_ENHANCEMENT: ItemId = ItemId::new(89141);
pub const SYMBOL_OF_PAIN: ItemId = ItemId::new(89182);
pub const SYMBOL_OF_CONTROL: ItemId = ItemId::new(89098);
pub const CHARM_OF_BRILLIANCE: ItemId = ItemId::new(89103);
pub const CHARM_OF_POTENCE: ItemId = ItemId::new(89258);
pub const CHARM_OF_SKILL: ItemId = ItemId::new(89216);
