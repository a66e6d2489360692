//! The order session: cart engine, tax-tier lock and conflict resolution.
//!
//! An [`OrderSession`] owns the cart, the customer metadata and at most one
//! pending tier conflict. Every mutation is written through the
//! [`OrderStorage`] port; storage failures are logged and never surface to
//! the caller.
//!
//! ```
//! use pedido::core::*;
//!
//! let part: CatalogItem = StandardPart {
//!     internal_code: "CAT-001".into(),
//!     application: "Catraca automática dianteira".into(),
//!     prices: TierPrices::new("120,00", "110,00", "100,00"),
//!     ..Default::default()
//! }
//! .into();
//!
//! let mut session = OrderSession::open(MemoryStorage::new(), PricingConfig::default());
//! assert_eq!(session.add_catalog_item(&part, 2, TaxTier::Icms17), AddOutcome::Added);
//!
//! // Same part priced for another region would mix tiers: the cart refuses
//! // until the user decides.
//! let outcome = session.add_catalog_item(&part, 1, TaxTier::Icms12);
//! assert!(matches!(outcome, AddOutcome::Conflict { .. }));
//! assert_eq!(session.resolve_conflict(ConflictAction::Replace), AddOutcome::Added);
//! assert_eq!(session.active_tier(), Some(TaxTier::Icms12));
//! ```

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::catalog::CatalogItem;
use super::config::PricingConfig;
use super::price::parse_price;
use super::regions::{TaxTier, resolve_tax_tier_with};
use super::roles::UserRole;
use super::snapshot::{OrderDocument, export_snapshot};
use super::storage::{OrderStorage, PersistedState};
use super::totals::compute_totals;
use super::types::{Cart, CartLine, CustomerField, CustomerMetadata, ItemCategory, TaxOrigin, Totals};

/// Result of an add or conflict resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was inserted.
    Added,
    /// An existing line with the same id grew to `quantity`.
    Merged { quantity: u32 },
    /// Nothing changed.
    Ignored(IgnoreReason),
    /// The line would mix tax tiers. It is held as the pending conflict until
    /// [`OrderSession::resolve_conflict`] is called.
    Conflict {
        cart_tier: TaxTier,
        requested_tier: TaxTier,
    },
    /// The pending conflict was discarded.
    Cancelled,
}

/// Why an add changed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The price resolved to zero or less: no price configured.
    NoPrice,
    /// The session's role may not order this category.
    NotPermitted,
    /// `resolve_conflict` was called with nothing pending.
    NoPendingConflict,
}

/// User decision on a pending tier conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictAction {
    /// Empty the cart, then add the pending line.
    Replace,
    /// Drop the pending line; the cart stays as it is.
    Cancel,
}

/// A blocked insertion awaiting the user's decision.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingConflict {
    /// The line as it would be inserted.
    pub line: CartLine,
    /// Tier the line was priced at.
    pub requested_tier: TaxTier,
    /// Tier the cart was locked to when the add was attempted.
    pub cart_tier: TaxTier,
}

/// Session-scoped order state with write-through persistence.
#[derive(Debug)]
pub struct OrderSession<S: OrderStorage> {
    storage: S,
    config: PricingConfig,
    role: UserRole,
    cart: Cart,
    customer: CustomerMetadata,
    pending: Option<PendingConflict>,
    end_consumer_surcharge: bool,
}

impl<S: OrderStorage> OrderSession<S> {
    /// Restore the session from `storage`.
    ///
    /// Unreadable storage starts an empty session; a corrupt entry loses only
    /// itself. Restored state is repaired so the tier lock holds.
    pub fn open(storage: S, config: PricingConfig) -> Self {
        let state = storage.load().unwrap_or_else(|e| {
            warn!(error = %e, "failed to restore order state, starting empty");
            PersistedState::default()
        });
        let (cart, customer) = restore(state);
        debug!(
            lines = cart.lines.len(),
            tier = ?cart.active_tier,
            "order session opened"
        );

        Self {
            storage,
            config,
            role: UserRole::default(),
            cart,
            customer,
            pending: None,
            end_consumer_surcharge: false,
        }
    }

    /// Restrict which categories this session may order.
    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn set_role(&mut self, role: UserRole) {
        self.role = role;
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.cart.lines
    }

    pub fn active_tier(&self) -> Option<TaxTier> {
        self.cart.active_tier
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Whether a line with `id` is in the cart.
    pub fn contains(&self, id: &str) -> bool {
        self.cart.contains(id)
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    pub fn customer(&self) -> &CustomerMetadata {
        &self.customer
    }

    pub fn pending_conflict(&self) -> Option<&PendingConflict> {
        self.pending.as_ref()
    }

    pub fn end_consumer_surcharge(&self) -> bool {
        self.end_consumer_surcharge
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Tier for a region code, falling back to the configured default.
    pub fn resolve_tier(&self, region_code: &str) -> TaxTier {
        resolve_tax_tier_with(region_code, self.config.default_tier)
    }

    /// Add `quantity` units of `item`, priced from `price_source` under
    /// `active_tier`.
    ///
    /// A zero quantity counts as one. Items without a positive price are
    /// ignored. A tier-dependent item whose tier differs from the cart's
    /// active tier is not added; it becomes the pending conflict instead.
    pub fn add_item(
        &mut self,
        item: &CatalogItem,
        category: ItemCategory,
        price_source: &str,
        quantity: u32,
        active_tier: TaxTier,
    ) -> AddOutcome {
        if !self.role.can_order(category) {
            debug!(role = ?self.role, ?category, "add ignored: category not permitted");
            return AddOutcome::Ignored(IgnoreReason::NotPermitted);
        }

        let unit_price = parse_price(price_source);
        if unit_price <= Decimal::ZERO {
            debug!(id = %item.line_id(), price = price_source, "add ignored: no price");
            return AddOutcome::Ignored(IgnoreReason::NoPrice);
        }

        let line = build_line(item, category, unit_price, quantity.max(1), active_tier);

        if category.is_tier_dependent() && !self.cart.is_empty() {
            if let Some(cart_tier) = self.cart.active_tier.filter(|t| *t != active_tier) {
                info!(
                    id = %line.id,
                    cart_tier = %cart_tier,
                    requested_tier = %active_tier,
                    "tax tier conflict, awaiting decision"
                );
                self.pending = Some(PendingConflict {
                    line,
                    requested_tier: active_tier,
                    cart_tier,
                });
                return AddOutcome::Conflict {
                    cart_tier,
                    requested_tier: active_tier,
                };
            }
        }

        let outcome = self.insert(line, active_tier);
        self.persist();
        outcome
    }

    /// Add a catalog record, deriving its category and price string from the
    /// record itself.
    pub fn add_catalog_item(
        &mut self,
        item: &CatalogItem,
        quantity: u32,
        active_tier: TaxTier,
    ) -> AddOutcome {
        let price = item.price_source().resolve(active_tier);
        self.add_item(item, item.category(), price, quantity, active_tier)
    }

    /// Settle the pending conflict.
    ///
    /// `Replace` empties the cart (customer metadata is kept) and inserts the
    /// pending line, which then sets the active tier.
    pub fn resolve_conflict(&mut self, action: ConflictAction) -> AddOutcome {
        let Some(pending) = self.pending.take() else {
            return AddOutcome::Ignored(IgnoreReason::NoPendingConflict);
        };

        match action {
            ConflictAction::Replace => {
                info!(
                    id = %pending.line.id,
                    discarded_lines = self.cart.lines.len(),
                    tier = %pending.requested_tier,
                    "replacing cart to switch tax tier"
                );
                self.cart.clear();
                let outcome = self.insert(pending.line, pending.requested_tier);
                self.persist();
                outcome
            }
            ConflictAction::Cancel => {
                debug!(id = %pending.line.id, "tax tier conflict cancelled");
                AddOutcome::Cancelled
            }
        }
    }

    /// Change a line's quantity by `delta`, never going below 1.
    ///
    /// Returns the new quantity, or `None` when no line has `id`.
    pub fn update_quantity(&mut self, id: &str, delta: i64) -> Option<u32> {
        let line = self.cart.line_mut(id)?;
        let updated = i64::from(line.quantity).saturating_add(delta).max(1);
        line.quantity = u32::try_from(updated).unwrap_or(u32::MAX);
        let quantity = line.quantity;
        debug!(id, quantity, "quantity updated");
        self.persist();
        Some(quantity)
    }

    /// Remove a line. Returns whether it existed.
    ///
    /// Once no tier-dependent line remains, the tier lock is released.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.cart.lines.len();
        self.cart.lines.retain(|l| l.id != id);
        if self.cart.lines.len() == before {
            return false;
        }
        if !self.cart.has_tier_dependent_lines() {
            self.cart.active_tier = None;
        }
        debug!(id, remaining = self.cart.lines.len(), "line removed");
        self.persist();
        true
    }

    /// Start a new order: empties the cart, releases the tier lock, blanks the
    /// customer metadata and turns the end-consumer surcharge off.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.customer = CustomerMetadata::default();
        self.end_consumer_surcharge = false;
        self.pending = None;
        info!("cart cleared, new order started");
        self.persist();
    }

    pub fn set_customer_field(&mut self, field: CustomerField, value: impl Into<String>) {
        self.customer.set(field, value);
        self.persist();
    }

    pub fn replace_customer(&mut self, customer: CustomerMetadata) {
        self.customer = customer;
        self.persist();
    }

    /// Toggle the end-consumer surcharge. Session-only; not persisted.
    pub fn set_end_consumer_surcharge(&mut self, enabled: bool) {
        self.end_consumer_surcharge = enabled;
    }

    /// Totals of the current cart.
    pub fn totals(&self) -> Totals {
        compute_totals(&self.cart.lines, &self.config, self.end_consumer_surcharge)
    }

    /// Freeze the order for printing. `None` while the cart is empty.
    pub fn snapshot(&self, issued_at: NaiveDateTime) -> Option<OrderDocument> {
        if self.cart.is_empty() {
            return None;
        }
        Some(export_snapshot(
            &self.cart,
            &self.customer,
            &self.totals(),
            self.config.excise_rate_percent,
            issued_at,
        ))
    }

    /// [`Self::snapshot`] stamped with the local time.
    pub fn snapshot_now(&self) -> Option<OrderDocument> {
        self.snapshot(chrono::Local::now().naive_local())
    }

    fn insert(&mut self, line: CartLine, active_tier: TaxTier) -> AddOutcome {
        // The stored line decides lock participation: a merge keeps the
        // existing line's category and origin.
        let (outcome, tier_dependent) = match self.cart.line_mut(&line.id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
                debug!(id = %existing.id, quantity = existing.quantity, "line merged");
                (
                    AddOutcome::Merged {
                        quantity: existing.quantity,
                    },
                    existing.is_tier_dependent(),
                )
            }
            None => {
                debug!(
                    id = %line.id,
                    quantity = line.quantity,
                    unit_price = %line.unit_price,
                    origin = %line.tax_origin,
                    "line added"
                );
                let tier_dependent = line.is_tier_dependent();
                self.cart.lines.push(line);
                (AddOutcome::Added, tier_dependent)
            }
        };

        if tier_dependent && self.cart.active_tier.is_none() {
            self.cart.active_tier = Some(active_tier);
        }
        outcome
    }

    fn persist(&mut self) {
        let state = PersistedState {
            lines: self.cart.lines.clone(),
            active_tier: self.cart.active_tier,
            customer: self.customer.clone(),
        };
        if let Err(e) = self.storage.save(&state) {
            warn!(error = %e, "failed to persist order state");
        }
    }
}

fn build_line(
    item: &CatalogItem,
    category: ItemCategory,
    unit_price: Decimal,
    quantity: u32,
    active_tier: TaxTier,
) -> CartLine {
    CartLine {
        id: item.line_id(),
        internal_code: item.internal_code().to_string(),
        vendor_code: item.vendor_code().to_string(),
        description: item.display_description(),
        unit_price,
        quantity,
        item_category: category,
        tax_origin: if category.is_tier_dependent() {
            TaxOrigin::Tier(active_tier)
        } else {
            TaxOrigin::Fixed
        },
    }
}

/// Rebuild cart and customer from persisted state, repairing anything that
/// would break the cart's invariants.
///
/// The active tier is the persisted rate, or the first tier-dependent line's
/// origin when the rate is missing. Tier-dependent lines priced at any other
/// tier are dropped; fixed-price lines always keep a fixed origin.
fn restore(state: PersistedState) -> (Cart, CustomerMetadata) {
    let mut lines: Vec<CartLine> = Vec::with_capacity(state.lines.len());
    for mut line in state.lines {
        if line.quantity == 0 {
            warn!(id = %line.id, "restored line had zero quantity, using 1");
            line.quantity = 1;
        }
        if !line.is_tier_dependent() && line.tax_origin != TaxOrigin::Fixed {
            warn!(id = %line.id, origin = %line.tax_origin, "restored fixed-price line had a tier origin");
            line.tax_origin = TaxOrigin::Fixed;
        }
        match lines.iter_mut().find(|l| l.id == line.id) {
            Some(existing) => {
                warn!(id = %line.id, "restored duplicate line, merging quantities");
                existing.quantity = existing.quantity.saturating_add(line.quantity);
            }
            None => lines.push(line),
        }
    }

    let active_tier = state.active_tier.or_else(|| {
        let derived = lines
            .iter()
            .filter(|l| l.is_tier_dependent())
            .find_map(|l| l.tax_origin.tier());
        if derived.is_some() {
            warn!(tier = ?derived, "restored cart had no tier, derived from lines");
        }
        derived
    });

    lines.retain(|l| {
        let consistent = !l.is_tier_dependent() || l.tax_origin.tier() == active_tier;
        if !consistent {
            warn!(
                id = %l.id,
                origin = %l.tax_origin,
                tier = ?active_tier,
                "dropping restored line priced at another tier"
            );
        }
        consistent
    });

    let mut cart = Cart { lines, active_tier };
    if !cart.has_tier_dependent_lines() && cart.active_tier.take().is_some() && !cart.is_empty() {
        debug!("restored tier dropped: only fixed-price lines remain");
    }

    (cart, state.customer)
}
