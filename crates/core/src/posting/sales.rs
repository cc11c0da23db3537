//! Sales invoice journal.
//!
//! ```text
//! Dr  Receivable / Cash / Bank        net receivable
//! Dr  Prepaid PPh21                    pph + pph21
//! Dr  Prepaid PPh23                    pph23
//! Dr  Other prepaid tax                other deductions
//!     Cr  Sales revenue                subtotal (less discount)
//!     Cr  PPN Keluaran                 ppn
//!     Cr  Other tax payable            other additions
//!     Cr  Shipping revenue             shipping
//! Dr  COGS                             sum(qty * cost)
//!     Cr  Inventory                    sum(qty * cost)
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use saldo_shared::types::SaleId;
use serde::{Deserialize, Serialize};

use super::error::PostingError;
use super::payment_method::PaymentMethod;
use super::status::SaleStatus;
use super::{PostableDocument, PostingContext};
use crate::ledger::{BalancePolicy, DraftLine, JournalDraft, JournalSource, SourceType};

fn default_true() -> bool {
    true
}

/// One sold line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleItem {
    /// Product name or code.
    pub product: String,
    /// Quantity sold.
    pub quantity: Decimal,
    /// Selling price per unit.
    pub unit_price: Decimal,
    /// Cost per unit, for COGS.
    #[serde(default)]
    pub cost_price: Decimal,
}

/// Sales invoice as the posting rules see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleDocument {
    /// Sale ID.
    #[serde(default)]
    pub id: SaleId,
    /// Sale code, e.g. `SO-2026-0001`.
    pub code: String,
    /// Invoice number once invoiced.
    #[serde(default)]
    pub invoice_number: Option<String>,
    /// Customer name.
    #[serde(default)]
    pub customer: String,
    /// Invoice date.
    pub date: NaiveDate,
    /// Current status.
    pub status: SaleStatus,
    /// Raw payment method.
    #[serde(default)]
    pub payment_method: String,
    /// Cash or bank account the sale was paid into.
    #[serde(default)]
    pub cash_bank_account_code: Option<String>,
    /// Sum of item totals.
    pub subtotal: Decimal,
    /// Sale-level discount.
    #[serde(default)]
    pub discount: Decimal,
    /// Whether `subtotal` is already net of `discount`.
    #[serde(default = "default_true")]
    pub discount_in_subtotal: bool,
    /// PPN Keluaran.
    #[serde(default)]
    pub ppn: Decimal,
    /// Other taxes added to the invoice.
    #[serde(default)]
    pub other_tax_additions: Decimal,
    /// Shipping charged to the customer.
    #[serde(default)]
    pub shipping: Decimal,
    /// Generic PPh withheld by the customer.
    #[serde(default)]
    pub pph: Decimal,
    /// PPh21 withheld by the customer.
    #[serde(default)]
    pub pph21: Decimal,
    /// PPh23 withheld by the customer.
    #[serde(default)]
    pub pph23: Decimal,
    /// Other taxes deducted from the invoice.
    #[serde(default)]
    pub other_tax_deductions: Decimal,
    /// Amount still owed, when tracked.
    #[serde(default)]
    pub outstanding: Option<Decimal>,
    /// Sold items.
    #[serde(default)]
    pub items: Vec<SaleItem>,
}

impl SaleDocument {
    /// Discount not yet taken out of the subtotal.
    fn pending_discount(&self) -> Decimal {
        if self.discount_in_subtotal {
            Decimal::ZERO
        } else {
            self.discount
        }
    }

    /// Revenue credited for the goods.
    #[must_use]
    pub fn revenue(&self) -> Decimal {
        self.subtotal - self.pending_discount()
    }

    /// Withholding prepaid through PPh21.
    #[must_use]
    pub fn pph21_total(&self) -> Decimal {
        self.pph + self.pph21
    }

    /// What the customer owes after taxes, shipping and withholding.
    #[must_use]
    pub fn net_receivable(&self) -> Decimal {
        self.subtotal + self.ppn + self.other_tax_additions + self.shipping
            - self.pph
            - self.pph21
            - self.pph23
            - self.other_tax_deductions
            - self.pending_discount()
    }

    /// Cost of the goods sold.
    #[must_use]
    pub fn cost_of_goods(&self) -> Decimal {
        self.items.iter().map(|i| i.quantity * i.cost_price).sum()
    }

    /// Journal reference, `SALE-{code}`.
    #[must_use]
    pub fn reference(&self) -> String {
        format!("SALE-{}", self.code)
    }
}

/// Builds sales journals.
pub struct SalesJournalBuilder;

impl SalesJournalBuilder {
    /// Builds the unsettled draft for an invoiced sale.
    ///
    /// Ancillary lines (other taxes, shipping) below `min_line_amount` are
    /// left out, so the draft may be off by those amounts until settled.
    ///
    /// # Errors
    ///
    /// `NonPositiveAmount` when the net receivable is zero or negative.
    pub fn build(sale: &SaleDocument, ctx: &PostingContext<'_>) -> Result<JournalDraft, PostingError> {
        let net = sale.net_receivable();
        if net <= Decimal::ZERO {
            return Err(PostingError::NonPositiveAmount {
                reference: sale.reference(),
                amount: net,
            });
        }

        let accounts = ctx.accounts;
        let min_line = ctx.posting.min_line_amount;
        let method = PaymentMethod::parse(&sale.payment_method);
        let receivable = method.sale_account(accounts, sale.cash_bank_account_code.as_deref());
        let party = if sale.customer.is_empty() {
            String::new()
        } else {
            format!(" - {}", sale.customer)
        };

        let mut draft = JournalDraft::new(
            JournalSource::document(SourceType::Sale, sale.id.into(), sale.reference()),
            sale.date,
            format!(
                "Sales Invoice {}{party}",
                sale.invoice_number.as_deref().unwrap_or(&sale.code)
            ),
        );

        let receivable_memo = match method {
            PaymentMethod::Credit => format!("Accounts receivable{party}"),
            PaymentMethod::Cash | PaymentMethod::Bank => format!("Cash sale{party}"),
        };
        draft
            .push(DraftLine::debit(receivable, net, receivable_memo))
            .push(DraftLine::credit(&accounts.sales_revenue, sale.revenue(), "Sales revenue"))
            .push(DraftLine::credit(&accounts.ppn_output, sale.ppn, "PPN Keluaran"));

        if sale.other_tax_additions >= min_line {
            draft.push(
                DraftLine::credit(&accounts.other_tax_payable, sale.other_tax_additions, "Other tax additions")
                    .or_account(&accounts.ppn_output),
            );
        }
        if sale.shipping >= min_line {
            draft.push(
                DraftLine::credit(&accounts.shipping_revenue, sale.shipping, "Shipping revenue")
                    .or_account(&accounts.sales_revenue),
            );
        }

        draft
            .push(DraftLine::debit(&accounts.prepaid_pph21, sale.pph21_total(), "Prepaid PPh21"))
            .push(DraftLine::debit(&accounts.prepaid_pph23, sale.pph23, "Prepaid PPh23"));
        if sale.other_tax_deductions >= min_line {
            draft.push(
                DraftLine::debit(&accounts.prepaid_other_tax, sale.other_tax_deductions, "Other tax deductions")
                    .or_account(&accounts.prepaid_pph21),
            );
        }

        let cogs = sale.cost_of_goods();
        if cogs > Decimal::ZERO {
            draft
                .push(DraftLine::debit(&accounts.cogs, cogs, "Cost of goods sold"))
                .push(DraftLine::credit(&accounts.inventory, cogs, "Inventory out"));
        }

        Ok(draft)
    }
}

impl PostableDocument for SaleDocument {
    fn source(&self) -> JournalSource {
        JournalSource::document(SourceType::Sale, self.id.into(), self.reference())
    }

    fn status_label(&self) -> String {
        self.status.to_string()
    }

    fn allows_posting(&self) -> bool {
        self.status.allows_posting()
    }

    fn entry_date(&self) -> NaiveDate {
        self.date
    }

    fn build_draft(&self, ctx: &PostingContext<'_>) -> Result<JournalDraft, PostingError> {
        SalesJournalBuilder::build(self, ctx)
    }

    fn balance_policy(&self, ctx: &PostingContext<'_>) -> BalancePolicy {
        BalancePolicy::tolerant(ctx.posting, ctx.ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::EntryType;
    use rust_decimal_macros::dec;
    use saldo_shared::AppConfig;

    fn invoiced_sale() -> SaleDocument {
        SaleDocument {
            id: SaleId::new(),
            code: "SO-0001".into(),
            invoice_number: Some("INV-2026-0001".into()),
            customer: "PT Maju Jaya".into(),
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            status: SaleStatus::Invoiced,
            payment_method: "CREDIT".into(),
            cash_bank_account_code: None,
            subtotal: dec!(1000000),
            discount: Decimal::ZERO,
            discount_in_subtotal: true,
            ppn: dec!(110000),
            other_tax_additions: Decimal::ZERO,
            shipping: Decimal::ZERO,
            pph: Decimal::ZERO,
            pph21: Decimal::ZERO,
            pph23: Decimal::ZERO,
            other_tax_deductions: Decimal::ZERO,
            outstanding: None,
            items: vec![SaleItem {
                product: "Widget".into(),
                quantity: dec!(10),
                unit_price: dec!(100000),
                cost_price: dec!(70000),
            }],
        }
    }

    fn line<'a>(draft: &'a JournalDraft, code: &str) -> &'a DraftLine {
        draft
            .lines
            .iter()
            .find(|l| l.account_code == code)
            .unwrap_or_else(|| panic!("no line for {code}"))
    }

    #[test]
    fn test_credit_sale_with_ppn_and_cogs() {
        let config = AppConfig::default();
        let ctx = PostingContext::from_config(&config);
        let draft = SalesJournalBuilder::build(&invoiced_sale(), &ctx).unwrap();

        assert_eq!(line(&draft, "1201").debit, dec!(1110000));
        assert_eq!(line(&draft, "4101").credit, dec!(1000000));
        assert_eq!(line(&draft, "2103").credit, dec!(110000));
        assert_eq!(line(&draft, "5101").debit, dec!(700000));
        assert_eq!(line(&draft, "1301").credit, dec!(700000));
        assert_eq!(draft.lines.len(), 5);
        assert!(draft.totals().is_balanced());
        assert_eq!(draft.source.reference, "SALE-SO-0001");
        assert_eq!(draft.description, "Sales Invoice INV-2026-0001 - PT Maju Jaya");
    }

    #[test]
    fn test_cash_sale_debits_linked_account() {
        let config = AppConfig::default();
        let ctx = PostingContext::from_config(&config);
        let mut sale = invoiced_sale();
        sale.payment_method = "tunai".into();
        let draft = SalesJournalBuilder::build(&sale, &ctx).unwrap();
        assert_eq!(draft.lines[0].account_code, "1101");

        sale.payment_method = "TRANSFER".into();
        sale.cash_bank_account_code = Some("1103".into());
        let draft = SalesJournalBuilder::build(&sale, &ctx).unwrap();
        assert_eq!(draft.lines[0].account_code, "1103");
        assert_eq!(draft.lines[0].entry_type(), EntryType::Debit);
    }

    #[test]
    fn test_cash_sale_keeps_cash_account_when_linked() {
        let config = AppConfig::default();
        let ctx = PostingContext::from_config(&config);
        let mut sale = invoiced_sale();
        sale.payment_method = "CASH".into();
        sale.cash_bank_account_code = Some("1102".into());

        let draft = SalesJournalBuilder::build(&sale, &ctx).unwrap();

        assert_eq!(line(&draft, "1101").debit, dec!(1110000));
        assert!(draft.lines.iter().all(|l| l.account_code != "1102"));
    }

    #[test]
    fn test_withholding_and_shipping() {
        let config = AppConfig::default();
        let ctx = PostingContext::from_config(&config);
        let mut sale = invoiced_sale();
        sale.items.clear();
        sale.shipping = dec!(25000);
        sale.pph = dec!(5000);
        sale.pph21 = dec!(10000);
        sale.pph23 = dec!(20000);

        let draft = SalesJournalBuilder::build(&sale, &ctx).unwrap();

        // 1,000,000 + 110,000 + 25,000 - 5,000 - 10,000 - 20,000
        assert_eq!(line(&draft, "1201").debit, dec!(1100000));
        assert_eq!(line(&draft, "1114").debit, dec!(15000));
        assert_eq!(line(&draft, "1115").debit, dec!(20000));
        let shipping = line(&draft, "4102");
        assert_eq!(shipping.credit, dec!(25000));
        assert_eq!(shipping.fallback_code.as_deref(), Some("4101"));
        assert!(draft.totals().is_balanced());
    }

    #[test]
    fn test_discount_outside_subtotal_reduces_revenue() {
        let config = AppConfig::default();
        let ctx = PostingContext::from_config(&config);
        let mut sale = invoiced_sale();
        sale.items.clear();
        sale.discount = dec!(50000);
        sale.discount_in_subtotal = false;

        let draft = SalesJournalBuilder::build(&sale, &ctx).unwrap();

        assert_eq!(line(&draft, "4101").credit, dec!(950000));
        assert_eq!(line(&draft, "1201").debit, dec!(1060000));
        assert!(draft.totals().is_balanced());
    }

    #[test]
    fn test_tiny_ancillary_lines_are_dropped() {
        let config = AppConfig::default();
        let ctx = PostingContext::from_config(&config);
        let mut sale = invoiced_sale();
        sale.items.clear();
        sale.shipping = dec!(0.40);

        let draft = SalesJournalBuilder::build(&sale, &ctx).unwrap();

        assert!(draft.lines.iter().all(|l| l.account_code != "4102"));
        assert_eq!(draft.totals().difference(), dec!(0.40));
    }

    #[test]
    fn test_non_positive_receivable_rejected() {
        let config = AppConfig::default();
        let ctx = PostingContext::from_config(&config);
        let mut sale = invoiced_sale();
        sale.subtotal = Decimal::ZERO;
        sale.ppn = Decimal::ZERO;

        assert!(matches!(
            SalesJournalBuilder::build(&sale, &ctx),
            Err(PostingError::NonPositiveAmount { .. })
        ));
    }

    #[test]
    fn test_sales_use_tolerant_policy() {
        let config = AppConfig::default();
        let ctx = PostingContext::from_config(&config);
        let policy = invoiced_sale().balance_policy(&ctx);
        assert_eq!(policy.rounding_limit, dec!(100));
        assert_eq!(policy.adjust_limit, dec!(500));
    }
}
