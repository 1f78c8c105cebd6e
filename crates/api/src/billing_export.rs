// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! E-billing XML rendering for monthly export.
//!
//! The document carries one `<Claim>` element per exported line item.
//! Rendering is pure; the caller applies the billed/submitted side
//! effects atomically around it.

use swimops_persistence::{BillingLineItemRow, BillingPeriodRow, FundingSourceRow};

/// Builds the export file name, e.g. `VMRC_Billing_2026_03.xml`.
#[must_use]
pub fn export_file_name(source: &FundingSourceRow, period: &BillingPeriodRow) -> String {
    format!(
        "{}_Billing_{}_{:02}.xml",
        source.short_name, period.year, period.month
    )
}

/// Renders the e-billing document over the given line items.
#[must_use]
pub fn render_billing_xml(
    source: &FundingSourceRow,
    period: &BillingPeriodRow,
    items: &[BillingLineItemRow],
) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<EBilling>\n");
    xml.push_str("  <Header>\n");
    push_element(&mut xml, 4, "Agency", &source.name);
    push_element(&mut xml, 4, "AgencyCode", &source.short_name);
    push_element(&mut xml, 4, "BillingMonth", &format!("{:02}", period.month));
    push_element(&mut xml, 4, "BillingYear", &period.year.to_string());
    push_element(&mut xml, 4, "ClaimCount", &items.len().to_string());
    xml.push_str("  </Header>\n");
    xml.push_str("  <Claims>\n");

    for item in items {
        xml.push_str("    <Claim>\n");
        push_element(&mut xml, 6, "ConsumerName", &item.swimmer_name);
        push_element(
            &mut xml,
            6,
            "AuthorizationNumber",
            item.authorization_number.as_deref().unwrap_or(""),
        );
        push_element(&mut xml, 6, "Units", &item.units_billed.to_string());
        push_element(&mut xml, 6, "UnitRate", &format_cents(item.rate_cents));
        push_element(
            &mut xml,
            6,
            "GrossAmount",
            &format_cents(item.gross_amount_cents),
        );
        xml.push_str("    </Claim>\n");
    }

    xml.push_str("  </Claims>\n");

    let total: i64 = items.iter().map(|i| i.gross_amount_cents).sum();
    xml.push_str("  <Totals>\n");
    push_element(&mut xml, 4, "TotalGrossAmount", &format_cents(total));
    xml.push_str("  </Totals>\n");
    xml.push_str("</EBilling>\n");
    xml
}

fn push_element(xml: &mut String, indent: usize, name: &str, value: &str) {
    for _ in 0..indent {
        xml.push(' ');
    }
    xml.push('<');
    xml.push_str(name);
    xml.push('>');
    xml.push_str(&escape_xml(value));
    xml.push_str("</");
    xml.push_str(name);
    xml.push_str(">\n");
}

/// Formats cents as a decimal dollar amount.
fn format_cents(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, (cents % 100).abs())
}

/// Escapes the five XML special characters.
fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_source() -> FundingSourceRow {
        FundingSourceRow {
            funding_source_id: 1,
            name: String::from("Valley Regional Center"),
            short_name: String::from("VMRC"),
            allowed_email_domains: String::from("[\"@regional-center.net\"]"),
            assessment_sessions: 2,
            lessons_per_po: 12,
            authorization_months: 6,
            renewal_alert_threshold: 11,
            lesson_rate_cents: 9500,
            billing_contact_name: None,
            billing_contact_email: None,
            billing_contact_phone: None,
            is_active: 1,
        }
    }

    fn sample_period() -> BillingPeriodRow {
        BillingPeriodRow {
            billing_period_id: 1,
            month: 3,
            year: 2026,
            funding_source_id: 1,
            status: String::from("generated"),
            generated_at: Some(String::from("2026-04-01T00:00:00Z")),
            exported_at: None,
        }
    }

    fn sample_item(name: &str) -> BillingLineItemRow {
        BillingLineItemRow {
            line_item_id: 1,
            billing_period_id: 1,
            po_id: 1,
            swimmer_id: 1,
            swimmer_name: name.to_string(),
            authorization_number: Some(String::from("AUTH-123")),
            units_billed: 4,
            rate_cents: 9500,
            gross_amount_cents: 38000,
            status: String::from("included"),
        }
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            export_file_name(&sample_source(), &sample_period()),
            "VMRC_Billing_2026_03.xml"
        );
    }

    #[test]
    fn test_document_shape() {
        let xml = render_billing_xml(&sample_source(), &sample_period(), &[sample_item("Mia Lopez")]);
        assert!(xml.starts_with("<?xml version=\"1.0\""));
        assert!(xml.contains("<AgencyCode>VMRC</AgencyCode>"));
        assert!(xml.contains("<ClaimCount>1</ClaimCount>"));
        assert!(xml.contains("<ConsumerName>Mia Lopez</ConsumerName>"));
        assert!(xml.contains("<Units>4</Units>"));
        assert!(xml.contains("<UnitRate>95.00</UnitRate>"));
        assert!(xml.contains("<GrossAmount>380.00</GrossAmount>"));
        assert!(xml.contains("<TotalGrossAmount>380.00</TotalGrossAmount>"));
    }

    #[test]
    fn test_special_characters_are_escaped() {
        let xml = render_billing_xml(
            &sample_source(),
            &sample_period(),
            &[sample_item("Mia <Lopez> & Co")],
        );
        assert!(xml.contains("<ConsumerName>Mia &lt;Lopez&gt; &amp; Co</ConsumerName>"));
    }

    #[test]
    fn test_empty_export_totals_zero() {
        let xml = render_billing_xml(&sample_source(), &sample_period(), &[]);
        assert!(xml.contains("<ClaimCount>0</ClaimCount>"));
        assert!(xml.contains("<TotalGrossAmount>0.00</TotalGrossAmount>"));
    }
}
