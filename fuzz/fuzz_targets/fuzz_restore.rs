#![no_main]

use libfuzzer_sys::fuzz_target;
use pedido::core::*;

// Arbitrary bytes in the cart entry must never panic on open, and whatever
// survives restore must respect the tier lock.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let mut storage = MemoryStorage::new();
        storage.set(CART_ITEMS_KEY, s);
        if let Some(rate) = s.bytes().next().and_then(|b| TaxTier::ALL.get(usize::from(b % 4))) {
            storage.set(CART_RATE_KEY, format!("\"{}\"", rate.code()));
        }
        let session = OrderSession::open(storage, PricingConfig::default());
        let cart = session.cart();
        assert_eq!(cart.active_tier.is_some(), cart.has_tier_dependent_lines());
        for line in &cart.lines {
            assert!(line.quantity >= 1);
            if line.is_tier_dependent() {
                assert_eq!(line.tax_origin.tier(), cart.active_tier);
            } else {
                assert_eq!(line.tax_origin, TaxOrigin::Fixed);
            }
        }
        let _ = session.totals();
    }
});
