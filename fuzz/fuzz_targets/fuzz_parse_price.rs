#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let price = pedido::core::parse_price(s);
        assert!(!price.is_sign_negative() || price.is_zero());
        let _ = pedido::core::format_brl(price);
    }
});
