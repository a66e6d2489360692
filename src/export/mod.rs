//! Order document export.
//!
//! Renders a frozen [`OrderDocument`] as a semicolon-separated CSV file in
//! Brazilian locale (comma decimal separator), for spreadsheets and ERP
//! import. The file has three blocks separated by blank lines:
//!
//! - header: order id, issue date, customer fields, ICMS tier, end-consumer flag
//! - lines: `Codigo;Cod. Fornecedor;Descricao;Valor unitario;Quantidade;Total`
//! - totals: subtotal, IPI, total
//!
//! # Example
//!
//! ```
//! use pedido::core::*;
//! use pedido::export::to_csv;
//!
//! let part: CatalogItem = StandardPart {
//!     internal_code: "CAT-1".into(),
//!     prices: TierPrices::new("10,00", "9,00", "8,00"),
//!     ..Default::default()
//! }
//! .into();
//! let mut session = OrderSession::open(MemoryStorage::new(), PricingConfig::default());
//! session.add_catalog_item(&part, 3, TaxTier::Icms17);
//!
//! let doc = session.snapshot_now().unwrap();
//! let csv = to_csv(&doc).unwrap();
//! assert!(csv.contains("\"CAT-1\""));
//! ```

mod csv;

use crate::core::{OrderDocument, PedidoError};

/// Render `doc` as CSV.
pub fn to_csv(doc: &OrderDocument) -> Result<String, PedidoError> {
    if doc.lines.is_empty() {
        return Err(PedidoError::Export(format!(
            "order {} has no lines to export",
            doc.order_id
        )));
    }
    Ok(csv::render(doc))
}
