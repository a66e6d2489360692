#![no_main]

use libfuzzer_sys::fuzz_target;
use pedido::core::*;

fn item(byte: u8) -> CatalogItem {
    let idx = byte % 4;
    match (byte >> 2) % 3 {
        0 => StandardPart {
            internal_code: format!("S{idx}"),
            prices: TierPrices::new("10,00", "9,00", ""),
            ..Default::default()
        }
        .into(),
        1 => BrakeKitComponent {
            item_type: format!("K{idx}"),
            prices: TierPrices::new("7,50", "7,00", "6,50"),
            ..Default::default()
        }
        .into(),
        _ => ThirdAxleKitPart {
            internal_code: format!("T{idx}"),
            price: "50,00".into(),
            ..Default::default()
        }
        .into(),
    }
}

fn tier(byte: u8) -> TaxTier {
    TaxTier::ALL[usize::from(byte) % TaxTier::ALL.len()]
}

// Drive the session with byte-coded operations; the tier lock must hold
// after every step.
fuzz_target!(|data: &[u8]| {
    let mut session = OrderSession::open(MemoryStorage::new(), PricingConfig::default());
    for chunk in data.chunks_exact(3) {
        let (op, a, b) = (chunk[0], chunk[1], chunk[2]);
        match op % 6 {
            0 | 1 => {
                session.add_catalog_item(&item(a), u32::from(b % 8), tier(b));
            }
            2 => {
                let action = if a % 2 == 0 {
                    ConflictAction::Replace
                } else {
                    ConflictAction::Cancel
                };
                session.resolve_conflict(action);
            }
            3 => {
                let id = format!("S{}", a % 4);
                session.update_quantity(&id, i64::from(b as i8));
            }
            4 => {
                let id = item(a).line_id();
                session.remove_item(&id);
            }
            _ => session.clear_cart(),
        }

        let cart = session.cart();
        assert_eq!(cart.active_tier.is_some(), cart.has_tier_dependent_lines());
        for line in &cart.lines {
            assert!(line.quantity >= 1);
            if line.is_tier_dependent() {
                assert_eq!(line.tax_origin.tier(), cart.active_tier);
            }
        }
    }
});
