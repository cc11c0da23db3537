//! Purchase journal.
//!
//! ```text
//! Dr  Item expense / Inventory        qty * unit price, merged by account
//! Dr  PPN Masukan                      ppn
//!     Cr  Payable / Cash / Bank        subtotal + ppn - pph21 - pph23
//!     Cr  PPh21 payable                pph21
//!     Cr  PPh23 payable                pph23
//! ```
//!
//! Withholding is owed to the tax office by the buyer, so it is credited.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use saldo_shared::types::PurchaseId;
use serde::{Deserialize, Serialize};

use super::error::PostingError;
use super::payment_method::PaymentMethod;
use super::status::PurchaseStatus;
use super::{PostableDocument, PostingContext};
use crate::ledger::{DraftLine, JournalDraft, JournalSource, SourceType};

/// Largest accepted gap between the declared subtotal and the items.
const SUBTOTAL_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// One purchased line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseItem {
    /// Product name or code.
    pub product: String,
    /// Quantity bought.
    pub quantity: Decimal,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Account debited for this item; inventory when absent.
    #[serde(default)]
    pub expense_account_code: Option<String>,
}

impl PurchaseItem {
    /// Line total.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.quantity * self.unit_price
    }
}

/// Purchase as the posting rules see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseDocument {
    /// Purchase ID.
    #[serde(default)]
    pub id: PurchaseId,
    /// Purchase code, e.g. `PO-2026-0001`.
    pub code: String,
    /// Vendor name.
    #[serde(default)]
    pub vendor: String,
    /// Purchase date.
    pub date: NaiveDate,
    /// Current status.
    pub status: PurchaseStatus,
    /// Raw payment method.
    #[serde(default)]
    pub payment_method: String,
    /// Cash or bank account the purchase was paid from.
    #[serde(default)]
    pub cash_bank_account_code: Option<String>,
    /// Declared subtotal; checked against the items when present.
    #[serde(default)]
    pub subtotal: Option<Decimal>,
    /// PPN Masukan.
    #[serde(default)]
    pub ppn: Decimal,
    /// PPh21 withheld from the vendor.
    #[serde(default)]
    pub pph21: Decimal,
    /// PPh23 withheld from the vendor.
    #[serde(default)]
    pub pph23: Decimal,
    /// Purchased items.
    #[serde(default)]
    pub items: Vec<PurchaseItem>,
}

impl PurchaseDocument {
    /// Sum of item totals.
    #[must_use]
    pub fn items_total(&self) -> Decimal {
        self.items.iter().map(PurchaseItem::total).sum()
    }

    /// Amount owed to the vendor after withholding.
    #[must_use]
    pub fn net_payable(&self) -> Decimal {
        self.items_total() + self.ppn - self.pph21 - self.pph23
    }

    /// Journal reference, `PURCHASE-{code}`.
    #[must_use]
    pub fn reference(&self) -> String {
        format!("PURCHASE-{}", self.code)
    }
}

/// Builds purchase journals.
pub struct PurchaseJournalBuilder;

impl PurchaseJournalBuilder {
    /// Builds the draft for an approved purchase.
    ///
    /// # Errors
    ///
    /// - `NoItems` for a purchase without items
    /// - `SubtotalMismatch` when the declared subtotal is off by more than 0.01
    /// - `NonPositiveAmount` when withholding swallows the whole payable
    pub fn build(
        purchase: &PurchaseDocument,
        ctx: &PostingContext<'_>,
    ) -> Result<JournalDraft, PostingError> {
        let reference = purchase.reference();
        if purchase.items.is_empty() {
            return Err(PostingError::NoItems(reference));
        }

        let computed = purchase.items_total();
        if let Some(declared) = purchase.subtotal
            && (declared - computed).abs() > SUBTOTAL_TOLERANCE
        {
            return Err(PostingError::SubtotalMismatch {
                reference,
                declared,
                computed,
            });
        }

        let net = purchase.net_payable();
        if net <= Decimal::ZERO {
            return Err(PostingError::NonPositiveAmount {
                reference,
                amount: net,
            });
        }

        let accounts = ctx.accounts;
        let mut merged: Vec<(String, Decimal)> = Vec::new();
        for item in &purchase.items {
            let code = item
                .expense_account_code
                .clone()
                .unwrap_or_else(|| accounts.inventory.clone());
            match merged.iter_mut().find(|(c, _)| *c == code) {
                Some((_, total)) => *total += item.total(),
                None => merged.push((code, item.total())),
            }
        }

        let vendor = if purchase.vendor.is_empty() {
            String::new()
        } else {
            format!(" - {}", purchase.vendor)
        };
        let mut draft = JournalDraft::new(
            JournalSource::document(SourceType::Purchase, purchase.id.into(), &reference),
            purchase.date,
            format!("Purchase {}{vendor}", purchase.code),
        );

        for (code, total) in merged {
            draft.push(DraftLine::debit(code, total, format!("Purchase {}", purchase.code)));
        }
        draft.push(DraftLine::debit(&accounts.ppn_input, purchase.ppn, "PPN Masukan"));

        let method = PaymentMethod::parse(&purchase.payment_method);
        let payable = method.purchase_account(accounts, purchase.cash_bank_account_code.as_deref());
        let payable_memo = match method {
            PaymentMethod::Credit => format!("Accounts payable{vendor}"),
            PaymentMethod::Cash | PaymentMethod::Bank => format!("Cash purchase{vendor}"),
        };
        draft
            .push(DraftLine::credit(payable, net, payable_memo))
            .push(
                DraftLine::credit(&accounts.pph21_payable, purchase.pph21, "PPh21 withheld")
                    .or_account(&accounts.other_tax_payable),
            )
            .push(
                DraftLine::credit(&accounts.pph23_payable, purchase.pph23, "PPh23 withheld")
                    .or_account(&accounts.other_tax_payable),
            );

        Ok(draft)
    }
}

impl PostableDocument for PurchaseDocument {
    fn source(&self) -> JournalSource {
        JournalSource::document(SourceType::Purchase, self.id.into(), self.reference())
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
        PurchaseJournalBuilder::build(self, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use saldo_shared::AppConfig;

    fn item(product: &str, qty: Decimal, price: Decimal, account: Option<&str>) -> PurchaseItem {
        PurchaseItem {
            product: product.into(),
            quantity: qty,
            unit_price: price,
            expense_account_code: account.map(str::to_string),
        }
    }

    fn approved_purchase() -> PurchaseDocument {
        PurchaseDocument {
            id: PurchaseId::new(),
            code: "PO-0001".into(),
            vendor: "CV Sumber Makmur".into(),
            date: NaiveDate::from_ymd_opt(2026, 3, 5).unwrap(),
            status: PurchaseStatus::Approved,
            payment_method: "CREDIT".into(),
            cash_bank_account_code: None,
            subtotal: Some(dec!(500000)),
            ppn: dec!(55000),
            pph21: Decimal::ZERO,
            pph23: Decimal::ZERO,
            items: vec![
                item("Bolt", dec!(100), dec!(3000), None),
                item("Nut", dec!(100), dec!(2000), None),
            ],
        }
    }

    #[test]
    fn test_credit_purchase() {
        let config = AppConfig::default();
        let ctx = PostingContext::from_config(&config);
        let draft = PurchaseJournalBuilder::build(&approved_purchase(), &ctx).unwrap();

        assert_eq!(draft.lines.len(), 3);
        assert_eq!(draft.lines[0].account_code, "1301");
        assert_eq!(draft.lines[0].debit, dec!(500000));
        assert_eq!(draft.lines[1].account_code, "1240");
        assert_eq!(draft.lines[1].debit, dec!(55000));
        assert_eq!(draft.lines[2].account_code, "2101");
        assert_eq!(draft.lines[2].credit, dec!(555000));
        assert!(draft.totals().is_balanced());
        assert_eq!(draft.source.reference, "PURCHASE-PO-0001");
    }

    #[test]
    fn test_items_merged_by_account() {
        let config = AppConfig::default();
        let ctx = PostingContext::from_config(&config);
        let mut purchase = approved_purchase();
        purchase.items.push(item("Paper", dec!(10), dec!(5000), Some("6101")));
        purchase.items.push(item("Toner", dec!(1), dec!(150000), Some("6101")));
        purchase.subtotal = None;

        let draft = PurchaseJournalBuilder::build(&purchase, &ctx).unwrap();

        let expense: Vec<_> = draft.lines.iter().filter(|l| l.account_code == "6101").collect();
        assert_eq!(expense.len(), 1);
        assert_eq!(expense[0].debit, dec!(200000));
        assert!(draft.totals().is_balanced());
    }

    #[test]
    fn test_withholding_credited_to_payables() {
        let config = AppConfig::default();
        let ctx = PostingContext::from_config(&config);
        let mut purchase = approved_purchase();
        purchase.pph21 = dec!(10000);
        purchase.pph23 = dec!(10000);
        purchase.payment_method = "TRANSFER".into();

        let draft = PurchaseJournalBuilder::build(&purchase, &ctx).unwrap();

        let bank = draft.lines.iter().find(|l| l.account_code == "1102").unwrap();
        assert_eq!(bank.credit, dec!(535000));
        let pph21 = draft.lines.iter().find(|l| l.account_code == "2104").unwrap();
        assert_eq!(pph21.credit, dec!(10000));
        assert_eq!(pph21.fallback_code.as_deref(), Some("2108"));
        let pph23 = draft.lines.iter().find(|l| l.account_code == "2105").unwrap();
        assert_eq!(pph23.credit, dec!(10000));
        assert!(draft.totals().is_balanced());
    }

    #[test]
    fn test_subtotal_mismatch() {
        let config = AppConfig::default();
        let ctx = PostingContext::from_config(&config);
        let mut purchase = approved_purchase();
        purchase.subtotal = Some(dec!(500000.01));
        assert!(PurchaseJournalBuilder::build(&purchase, &ctx).is_ok());

        purchase.subtotal = Some(dec!(499000));
        assert_eq!(
            PurchaseJournalBuilder::build(&purchase, &ctx).unwrap_err().error_code(),
            "SUBTOTAL_MISMATCH"
        );
    }

    #[test]
    fn test_empty_purchase_rejected() {
        let config = AppConfig::default();
        let ctx = PostingContext::from_config(&config);
        let mut purchase = approved_purchase();
        purchase.items.clear();
        assert_eq!(
            PurchaseJournalBuilder::build(&purchase, &ctx).unwrap_err(),
            PostingError::NoItems("PURCHASE-PO-0001".into())
        );
    }
}
