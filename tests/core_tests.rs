use chrono::{NaiveDate, NaiveDateTime};
use pedido::core::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn slack_adjuster(code: &str, p17: &str, p12: &str, p7: &str) -> CatalogItem {
    StandardPart {
        vehicle: "VOLVO FH 540".into(),
        internal_code: code.into(),
        vendor_code: format!("FRC-{code}"),
        model: "AUTOMATICA".into(),
        application: "Catraca automática eixo traseiro".into(),
        side: "LE".into(),
        prices: TierPrices::new(p17, p12, p7),
    }
    .into()
}

fn third_axle(code: &str, price: &str) -> CatalogItem {
    ThirdAxleKitPart {
        vehicle: "VW 24.280".into(),
        part_type: "SUSPENSAO".into(),
        internal_code: code.into(),
        vendor_code: format!("TE-{code}"),
        description: "Feixe de molas 3º eixo".into(),
        default_quantity: 2,
        price: price.into(),
        configuration: "6x2".into(),
    }
    .into()
}

fn session() -> OrderSession<MemoryStorage> {
    OrderSession::open(MemoryStorage::new(), PricingConfig::default())
}

// --- Scenario ---

#[test]
fn mixed_cart_scenario() {
    let mut s = session();
    let part = slack_adjuster("CAT-100", "120,00", "110,00", "100,00");
    let axle = third_axle("3E-200", "50,00");

    assert_eq!(
        s.add_item(&part, ItemCategory::StandardPart, "120,00", 2, TaxTier::Icms17),
        AddOutcome::Added
    );
    assert_eq!(s.lines().len(), 1);
    assert_eq!(s.lines()[0].unit_price, dec!(120));
    assert_eq!(s.lines()[0].quantity, 2);

    assert_eq!(
        s.add_item(&axle, ItemCategory::ThirdAxleKitPart, "50,00", 1, TaxTier::Icms17),
        AddOutcome::Added
    );
    assert_eq!(s.lines().len(), 2);
    assert_eq!(s.active_tier(), Some(TaxTier::Icms17));

    let totals = s.totals();
    assert_eq!(totals.subtotal, dec!(290));
    assert_eq!(totals.tax_amount, dec!(9.425));
    assert_eq!(totals.total, dec!(299.425));
}

// --- No price ---

#[test]
fn unpriced_items_are_ignored() {
    let mut s = session();
    let part = slack_adjuster("CAT-1", "0,00", "", "abc");

    for tier in TaxTier::ALL {
        assert_eq!(
            s.add_catalog_item(&part, 3, tier),
            AddOutcome::Ignored(IgnoreReason::NoPrice)
        );
    }
    assert!(s.is_empty());
    assert_eq!(s.active_tier(), None);
    assert!(s.storage().is_empty(), "ignored adds must not persist");
}

// --- Dedup ---

#[test]
fn same_id_merges_quantities() {
    let mut s = session();
    let part = slack_adjuster("CAT-1", "10,00", "9,00", "8,00");
    s.add_catalog_item(&part, 2, TaxTier::Icms12);
    assert_eq!(s.add_catalog_item(&part, 5, TaxTier::Icms12), AddOutcome::Merged { quantity: 7 });
    assert_eq!(s.lines().len(), 1);
    assert_eq!(s.item_count(), 7);
    assert!(s.contains("CAT-1"));
}

#[test]
fn blank_code_falls_back_to_type_label() {
    let mut s = session();
    let kit: CatalogItem = BrakeKitComponent {
        vehicle: "MB ATEGO".into(),
        item_type: "TAMBOR".into(),
        description: "Tambor de freio".into(),
        prices: TierPrices::new("300,00", "280,00", "260,00"),
        found: true,
        ..Default::default()
    }
    .into();
    s.add_catalog_item(&kit, 1, TaxTier::Icms17);
    s.add_catalog_item(&kit, 1, TaxTier::Icms17);
    assert_eq!(s.lines().len(), 1);
    assert_eq!(s.lines()[0].id, "TAMBOR");
    assert_eq!(s.lines()[0].quantity, 2);
    assert_eq!(s.lines()[0].description, "Tambor de freio");
}

// --- Conflict resolution ---

#[test]
fn conflict_blocks_then_replace_switches_tier() {
    let mut s = session();
    let a = slack_adjuster("CAT-A", "10,00", "9,00", "8,00");
    let b = slack_adjuster("CAT-B", "20,00", "18,00", "16,00");
    s.add_catalog_item(&a, 1, TaxTier::Icms17);
    s.set_customer_field(CustomerField::Name, "Transportes Silva");
    let before = s.lines().to_vec();

    let outcome = s.add_catalog_item(&b, 4, TaxTier::Icms7);
    assert_eq!(
        outcome,
        AddOutcome::Conflict {
            cart_tier: TaxTier::Icms17,
            requested_tier: TaxTier::Icms7,
        }
    );
    assert_eq!(s.lines(), before.as_slice());
    assert!(s.pending_conflict().is_some());

    assert_eq!(s.resolve_conflict(ConflictAction::Replace), AddOutcome::Added);
    assert_eq!(s.lines().len(), 1);
    assert_eq!(s.lines()[0].id, "CAT-B");
    assert_eq!(s.lines()[0].unit_price, dec!(16));
    assert_eq!(s.lines()[0].quantity, 4);
    assert_eq!(s.active_tier(), Some(TaxTier::Icms7));
    assert!(s.pending_conflict().is_none());
    // Replacing the cart keeps who the order is for.
    assert_eq!(s.customer().name, "Transportes Silva");
}

#[test]
fn cancel_leaves_cart_untouched() {
    let mut s = session();
    let a = slack_adjuster("CAT-A", "10,00", "9,00", "8,00");
    s.add_catalog_item(&a, 1, TaxTier::Icms12);
    s.add_catalog_item(&a, 1, TaxTier::Icms17);

    assert_eq!(s.resolve_conflict(ConflictAction::Cancel), AddOutcome::Cancelled);
    assert_eq!(s.lines().len(), 1);
    assert_eq!(s.lines()[0].quantity, 1);
    assert_eq!(s.active_tier(), Some(TaxTier::Icms12));
    assert_eq!(
        s.resolve_conflict(ConflictAction::Replace),
        AddOutcome::Ignored(IgnoreReason::NoPendingConflict)
    );
}

#[test]
fn fixed_price_line_never_conflicts() {
    let mut s = session();
    s.add_catalog_item(&slack_adjuster("CAT-A", "10,00", "9,00", "8,00"), 1, TaxTier::Icms17);
    let outcome = s.add_catalog_item(&third_axle("3E-1", "75,00"), 1, TaxTier::Icms7);
    assert_eq!(outcome, AddOutcome::Added);
    assert_eq!(s.active_tier(), Some(TaxTier::Icms17));
}

#[test]
fn driveshaft_parts_join_the_tier_lock() {
    let mut s = session();
    let cardan: CatalogItem = DriveshaftPart {
        model: "CARDAN 1710".into(),
        vehicle: "SCANIA R450".into(),
        internal_code: "CD-1710".into(),
        pieces: "Cruzeta 1710".into(),
        price: "450,00".into(),
        ..Default::default()
    }
    .into();
    s.add_catalog_item(&cardan, 1, TaxTier::Icms12);
    assert_eq!(s.active_tier(), Some(TaxTier::Icms12));
    assert_eq!(s.lines()[0].unit_price, dec!(450));
    assert_eq!(s.lines()[0].tax_origin, TaxOrigin::Tier(TaxTier::Icms12));

    let outcome = s.add_catalog_item(&cardan, 1, TaxTier::Icms17);
    assert!(matches!(outcome, AddOutcome::Conflict { .. }));
}

#[test]
fn tiered_record_sharing_a_fixed_line_id_does_not_lock() {
    let mut s = session();
    let axle = third_axle("X-1", "50,00");
    let part = slack_adjuster("X-1", "10,00", "9,00", "8,00");
    s.add_catalog_item(&axle, 1, TaxTier::Icms7);

    assert_eq!(s.add_catalog_item(&part, 1, TaxTier::Icms12), AddOutcome::Merged { quantity: 2 });
    assert_eq!(s.active_tier(), None);
    assert!(!s.cart().has_tier_dependent_lines());

    // No phantom lock: another region's part is accepted.
    let other = slack_adjuster("Y-1", "10,00", "9,00", "8,00");
    assert_eq!(s.add_catalog_item(&other, 1, TaxTier::Icms17), AddOutcome::Added);
    assert_eq!(s.active_tier(), Some(TaxTier::Icms17));

    let reopened = OrderSession::open(s.into_storage(), PricingConfig::default());
    assert_eq!(reopened.active_tier(), Some(TaxTier::Icms17));
    assert_eq!(reopened.lines().len(), 2);
}

// --- Quantity, remove, clear ---

#[test]
fn quantity_floor_is_one() {
    let mut s = session();
    s.add_catalog_item(&slack_adjuster("CAT-A", "10,00", "9,00", "8,00"), 3, TaxTier::Icms17);
    assert_eq!(s.update_quantity("CAT-A", 1), Some(4));
    assert_eq!(s.update_quantity("CAT-A", -10), Some(1));
    assert_eq!(s.update_quantity("CAT-A", -1), Some(1));
    assert_eq!(s.update_quantity("missing", 1), None);
}

#[test]
fn removing_everything_resets_tier() {
    let mut s = session();
    s.add_catalog_item(&slack_adjuster("CAT-A", "10,00", "9,00", "8,00"), 1, TaxTier::Icms7);
    assert!(!s.remove_item("nope"));
    assert!(s.remove_item("CAT-A"));
    assert!(s.is_empty());
    assert_eq!(s.active_tier(), None);

    // With the lock released any tier is accepted again.
    let outcome = s.add_catalog_item(&slack_adjuster("CAT-B", "10,00", "9,00", "8,00"), 1, TaxTier::Icms17);
    assert_eq!(outcome, AddOutcome::Added);
}

#[test]
fn clear_starts_a_new_order() {
    let mut s = session();
    s.add_catalog_item(&slack_adjuster("CAT-A", "10,00", "9,00", "8,00"), 1, TaxTier::Icms12);
    s.set_customer_field(CustomerField::Name, "Frota Norte");
    s.set_customer_field(CustomerField::FreightTerms, "CIF");
    s.set_end_consumer_surcharge(true);

    s.clear_cart();
    assert!(s.is_empty());
    assert_eq!(s.active_tier(), None);
    assert!(s.customer().is_blank());
    assert!(!s.end_consumer_surcharge());
    assert_eq!(s.totals(), Totals::ZERO);
}

// --- Totals ---

#[test]
fn end_consumer_surcharge_in_session_totals() {
    let mut s = session();
    s.add_item(&slack_adjuster("A", "", "", ""), ItemCategory::StandardPart, "10,00", 2, TaxTier::Icms17);
    s.add_item(&slack_adjuster("B", "", "", ""), ItemCategory::StandardPart, "5,00", 1, TaxTier::Icms17);
    assert_eq!(s.totals().total, dec!(25.8125));

    s.set_end_consumer_surcharge(true);
    let totals = s.totals();
    assert!(totals.end_consumer_surcharge);
    assert_eq!(totals.total, dec!(27.103125));
}

#[test]
fn out_of_range_amounts_do_not_panic() {
    let mut s = session();
    let part = slack_adjuster("Z", "100.000.000.000.000.000.000,00", "", "");
    assert_eq!(s.add_catalog_item(&part, 1, TaxTier::Icms17), AddOutcome::Added);
    assert_eq!(s.update_quantity("Z", 1_000_000_000), Some(1_000_000_001));

    let totals = s.totals();
    assert_eq!(totals.subtotal, Decimal::MAX);
    assert_eq!(totals.total, Decimal::MAX);

    let doc = s.snapshot(at(2024, 1, 1, 0, 0)).unwrap();
    assert_eq!(doc.lines[0].line_total, Decimal::MAX);
}

#[test]
fn unit_price_is_frozen_at_insertion() {
    let mut s = session();
    let part = slack_adjuster("CAT-A", "10,00", "9,00", "8,00");
    s.add_catalog_item(&part, 1, TaxTier::Icms17);

    // Moving to a cheaper region conflicts instead of repricing the line.
    s.add_catalog_item(&part, 1, TaxTier::Icms7);
    s.resolve_conflict(ConflictAction::Cancel);
    assert_eq!(s.lines()[0].unit_price, dec!(10));
}

#[test]
fn selection_totals_for_catalog_view() {
    let part = slack_adjuster("CAT-A", "10,00", "9,00", "8,00");
    let axle = third_axle("3E-1", "1.000,00");
    let totals = selection_totals(
        &[(&part, 2), (&axle, 1)],
        TaxTier::Icms7,
        &PricingConfig::default(),
        false,
    );
    assert_eq!(totals.subtotal, dec!(1016));
    assert_eq!(totals.tax_amount, dec!(33.02));
}

// --- Tax resolver and price parser ---

#[test]
fn resolver_defaults() {
    assert_eq!(resolve_tax_tier(""), TaxTier::Icms17);
    assert_eq!(resolve_tax_tier("unknown"), TaxTier::Icms17);
    assert_eq!(resolve_tax_tier("PR"), TaxTier::Icms12);
    assert_eq!(regions().len(), 27);
}

#[test]
fn price_parsing() {
    assert_eq!(parse_price("1.234,56"), dec!(1234.56));
    assert_eq!(parse_price(""), Decimal::ZERO);
    assert_eq!(parse_price("abc"), Decimal::ZERO);
    assert_eq!(parse_price("0,00"), Decimal::ZERO);
}

// --- Snapshot ---

#[test]
fn snapshot_freezes_order() {
    let mut s = session();
    s.add_catalog_item(&slack_adjuster("CAT-A", "10,00", "9,00", "8,00"), 2, TaxTier::Icms12);
    s.set_customer_field(CustomerField::Name, "Auto Peças Sul Ltda.");
    s.set_customer_field(CustomerField::Carrier, "Braspress");

    let doc = s.snapshot(at(2024, 11, 8, 16, 45)).unwrap();
    assert_eq!(doc.order_id, "Auto Peas Sul Ltda 081120241645");
    assert_eq!(doc.tax_tier_label, "12%");
    assert_eq!(doc.lines[0].internal_code, "CAT-A");
    assert_eq!(doc.lines[0].vendor_code, "FRC-CAT-A");
    assert_eq!(doc.lines[0].line_total, dec!(18));
    assert_eq!(doc.subtotal, dec!(18));
    assert_eq!(doc.customer.carrier, "Braspress");
    assert_eq!(doc.excise_rate_percent, dec!(3.25));

    // Later mutations do not touch the frozen document.
    s.clear_cart();
    assert_eq!(doc.lines.len(), 1);
}

// --- Persistence ---

#[test]
fn session_state_survives_reopen() {
    let mut storage = MemoryStorage::new();
    {
        let mut s = OrderSession::open(&mut storage, PricingConfig::default());
        s.add_catalog_item(&slack_adjuster("CAT-A", "10,00", "9,00", "8,00"), 2, TaxTier::Icms7);
        s.add_catalog_item(&third_axle("3E-1", "50,00"), 1, TaxTier::Icms7);
        s.set_customer_field(CustomerField::TaxId, "12.345.678/0001-90");
        s.set_end_consumer_surcharge(true);
    }
    assert!(storage.get(CART_ITEMS_KEY).is_some());
    assert_eq!(storage.get(CART_RATE_KEY), Some("\"icms7\""));

    let s = OrderSession::open(storage, PricingConfig::default());
    assert_eq!(s.lines().len(), 2);
    assert_eq!(s.active_tier(), Some(TaxTier::Icms7));
    assert_eq!(s.customer().tax_id, "12.345.678/0001-90");
    assert!(!s.end_consumer_surcharge(), "surcharge flag is session-only");
}

#[test]
fn corrupt_entry_only_loses_itself() {
    let mut storage = MemoryStorage::new();
    storage.set(CART_ITEMS_KEY, "[{\"broken\":");
    storage.set(CLIENT_DATA_KEY, "{\"name\":\"Frota Sul\"}");

    let mut s = OrderSession::open(storage, PricingConfig::default());
    assert!(s.is_empty());
    assert_eq!(s.customer().name, "Frota Sul");

    // And it recovers by overwriting the bad entry on the next mutation.
    s.add_catalog_item(&third_axle("3E-1", "50,00"), 1, TaxTier::Icms17);
    let reopened = OrderSession::open(s.into_storage(), PricingConfig::default());
    assert_eq!(reopened.lines().len(), 1);
}

#[test]
fn corrupt_customer_keeps_cart() {
    let mut storage = MemoryStorage::new();
    {
        let mut s = OrderSession::open(&mut storage, PricingConfig::default());
        s.add_catalog_item(&slack_adjuster("CAT-A", "10,00", "9,00", "8,00"), 2, TaxTier::Icms12);
    }
    storage.set(CLIENT_DATA_KEY, "not json");

    let s = OrderSession::open(storage, PricingConfig::default());
    assert_eq!(s.lines().len(), 1);
    assert_eq!(s.active_tier(), Some(TaxTier::Icms12));
    assert!(s.customer().is_blank());
}

#[test]
fn restored_lines_at_another_tier_are_dropped() {
    let a = slack_adjuster("CAT-A", "10,00", "9,00", "8,00");
    let b = slack_adjuster("CAT-B", "20,00", "18,00", "16,00");

    // Build two carts at different tiers and splice their lines together.
    let mut first = OrderSession::open(MemoryStorage::new(), PricingConfig::default());
    first.add_catalog_item(&a, 1, TaxTier::Icms17);
    let mut second = OrderSession::open(MemoryStorage::new(), PricingConfig::default());
    second.add_catalog_item(&b, 1, TaxTier::Icms12);
    let mut lines = first.lines().to_vec();
    lines.extend_from_slice(second.lines());

    let mut storage = MemoryStorage::new();
    storage.set(CART_ITEMS_KEY, serde_json::to_string(&lines).unwrap());
    storage.set(CART_RATE_KEY, "\"icms17\"");

    let s = OrderSession::open(storage, PricingConfig::default());
    assert_eq!(s.active_tier(), Some(TaxTier::Icms17));
    assert_eq!(s.lines().len(), 1);
    for line in s.lines() {
        assert_eq!(line.tax_origin, TaxOrigin::Tier(TaxTier::Icms17));
    }
}

#[test]
fn restored_rate_without_tiered_lines_is_dropped() {
    let mut storage = MemoryStorage::new();
    storage.set(CART_RATE_KEY, "\"icms12\"");
    let s = OrderSession::open(storage, PricingConfig::default());
    assert_eq!(s.active_tier(), None);
}
