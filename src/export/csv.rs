use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::{CustomerField, OrderDocument};

const LINE_END: &str = "\r\n";

/// Header labels for each customer field, in print order.
const CUSTOMER_LABELS: [(CustomerField, &str); 13] = [
    (CustomerField::Name, "Cliente"),
    (CustomerField::TaxId, "CNPJ"),
    (CustomerField::Contact, "Contato"),
    (CustomerField::Phone, "Telefone"),
    (CustomerField::Email, "Email"),
    (CustomerField::City, "Cidade"),
    (CustomerField::State, "UF"),
    (CustomerField::Representative, "Representante"),
    (CustomerField::OrderReference, "Pedido cliente"),
    (CustomerField::PaymentTerms, "Pagamento"),
    (CustomerField::Carrier, "Transportadora"),
    (CustomerField::FreightTerms, "Frete"),
    (CustomerField::Notes, "Observacoes"),
];

pub(super) fn render(doc: &OrderDocument) -> String {
    let mut out = String::new();

    // Header block
    pair(&mut out, "Pedido", &doc.order_id);
    pair(&mut out, "Data", &doc.issued_at.format("%d/%m/%Y %H:%M").to_string());
    for (field, label) in CUSTOMER_LABELS {
        pair(&mut out, label, doc.customer.get(field));
    }
    pair(&mut out, "ICMS", &doc.tax_tier_label);
    pair(
        &mut out,
        "Consumidor final",
        if doc.end_consumer_surcharge { "SIM" } else { "NAO" },
    );
    out.push_str(LINE_END);

    // Line block
    let columns = [
        "Codigo",
        "Cod. Fornecedor",
        "Descricao",
        "Valor unitario",
        "Quantidade",
        "Total",
    ];
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        csv_field_str(&mut out, column);
    }
    out.push_str(LINE_END);

    for line in &doc.lines {
        csv_field_str(&mut out, &line.internal_code);
        out.push(';');
        csv_field_str(&mut out, &line.vendor_code);
        out.push(';');
        csv_field_str(&mut out, &line.description);
        out.push(';');
        csv_field_decimal(&mut out, line.unit_price);
        out.push(';');
        out.push_str(&line.quantity.to_string());
        out.push(';');
        csv_field_decimal(&mut out, line.line_total);
        out.push_str(LINE_END);
    }
    out.push_str(LINE_END);

    // Totals block
    amount(&mut out, "Subtotal", doc.subtotal);
    let excise_label = format!(
        "IPI ({}%)",
        doc.excise_rate_percent.normalize().to_string().replace('.', ",")
    );
    amount(&mut out, &excise_label, doc.tax_amount);
    amount(&mut out, "Total", doc.total);

    out
}

fn pair(out: &mut String, label: &str, value: &str) {
    csv_field_str(out, label);
    out.push(';');
    csv_field_str(out, value);
    out.push_str(LINE_END);
}

fn amount(out: &mut String, label: &str, value: Decimal) {
    csv_field_str(out, label);
    out.push(';');
    csv_field_decimal(out, value);
    out.push_str(LINE_END);
}

fn csv_field_str(out: &mut String, value: &str) {
    out.push('"');
    for ch in value.chars() {
        if ch == '"' {
            out.push_str("\"\"");
        } else {
            out.push(ch);
        }
    }
    out.push('"');
}

fn csv_field_decimal(out: &mut String, d: Decimal) {
    let scaled = d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let s = format!("{:.2}", scaled);
    out.push_str(&s.replace('.', ","));
}
