//! Payment journals.
//!
//! - Sale receipt: Dr cash/bank, Cr receivables
//! - Purchase payment: Dr payables, Cr cash/bank

use chrono::NaiveDate;
use rust_decimal::Decimal;
use saldo_shared::AccountMapping;
use saldo_shared::types::PaymentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::PostingError;
use super::payment_method::PaymentMethod;
use super::{PostableDocument, PostingContext};
use crate::ledger::{DraftLine, JournalDraft, JournalSource, SourceType};

/// A payment against a sale or a purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDocument {
    /// Payment ID.
    #[serde(default)]
    pub id: PaymentId,
    /// Payment code.
    pub code: String,
    /// Code of the sale or purchase being paid.
    #[serde(default)]
    pub document_code: String,
    /// ID of the sale or purchase being paid.
    #[serde(default)]
    pub document_id: Option<Uuid>,
    /// Customer or vendor.
    #[serde(default)]
    pub party: String,
    /// Payment date.
    pub date: NaiveDate,
    /// Amount paid.
    pub amount: Decimal,
    /// Raw payment method.
    #[serde(default)]
    pub method: String,
    /// Cash or bank account used.
    #[serde(default)]
    pub cash_bank_account_code: Option<String>,
    /// Amount owed on the document before this payment, when known.
    #[serde(default)]
    pub outstanding: Option<Decimal>,
}

impl PaymentDocument {
    /// Cash or bank account moved by the payment.
    ///
    /// The linked account wins; otherwise bank for transfers and cash for
    /// everything else.
    #[must_use]
    pub fn cash_account(&self, accounts: &AccountMapping) -> String {
        if let Some(code) = &self.cash_bank_account_code {
            return code.clone();
        }
        match PaymentMethod::parse(&self.method) {
            PaymentMethod::Bank => accounts.bank.clone(),
            PaymentMethod::Cash | PaymentMethod::Credit => accounts.cash.clone(),
        }
    }

    fn ensure_positive(&self, reference: &str) -> Result<(), PostingError> {
        if self.amount <= Decimal::ZERO {
            return Err(PostingError::NonPositiveAmount {
                reference: reference.to_string(),
                amount: self.amount,
            });
        }
        Ok(())
    }
}

/// Payment received from a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleReceipt(pub PaymentDocument);

/// Payment made to a vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PurchasePayment(pub PaymentDocument);

impl SaleReceipt {
    /// Journal reference, `SALE-PAYMENT-{code}`.
    #[must_use]
    pub fn reference(&self) -> String {
        format!("SALE-PAYMENT-{}", self.0.code)
    }
}

impl PurchasePayment {
    /// Journal reference, `PURCHASE-PAYMENT-{code}`.
    #[must_use]
    pub fn reference(&self) -> String {
        format!("PURCHASE-PAYMENT-{}", self.0.code)
    }
}

/// Builds payment journals.
pub struct PaymentJournalBuilder;

impl PaymentJournalBuilder {
    /// Receipt journal: Dr cash/bank, Cr receivables.
    ///
    /// # Errors
    ///
    /// `NonPositiveAmount`, or `Overpayment` when the receipt exceeds the
    /// outstanding amount.
    pub fn sale_receipt(
        receipt: &SaleReceipt,
        ctx: &PostingContext<'_>,
    ) -> Result<JournalDraft, PostingError> {
        let payment = &receipt.0;
        let reference = receipt.reference();
        payment.ensure_positive(&reference)?;
        if let Some(outstanding) = payment.outstanding
            && payment.amount > outstanding
        {
            return Err(PostingError::Overpayment {
                reference,
                amount: payment.amount,
                outstanding,
            });
        }

        let mut draft = JournalDraft::new(
            JournalSource::document(SourceType::SalePayment, payment.id.into(), &reference),
            payment.date,
            format!("Payment received {} for {}", payment.code, payment.document_code),
        );
        draft
            .push(DraftLine::debit(
                payment.cash_account(ctx.accounts),
                payment.amount,
                format!("Receipt {}", payment.code),
            ))
            .push(DraftLine::credit(
                &ctx.accounts.accounts_receivable,
                payment.amount,
                format!("Settle receivable {}", payment.document_code),
            ));
        Ok(draft)
    }

    /// Payment journal: Dr payables, Cr cash/bank.
    ///
    /// # Errors
    ///
    /// `NonPositiveAmount`.
    pub fn purchase_payment(
        payment: &PurchasePayment,
        ctx: &PostingContext<'_>,
    ) -> Result<JournalDraft, PostingError> {
        let reference = payment.reference();
        let payment = &payment.0;
        payment.ensure_positive(&reference)?;

        let mut draft = JournalDraft::new(
            JournalSource::document(SourceType::PurchasePayment, payment.id.into(), &reference),
            payment.date,
            format!("Payment made {} for {}", payment.code, payment.document_code),
        );
        draft
            .push(DraftLine::debit(
                &ctx.accounts.accounts_payable,
                payment.amount,
                format!("Settle payable {}", payment.document_code),
            ))
            .push(DraftLine::credit(
                payment.cash_account(ctx.accounts),
                payment.amount,
                format!("Payment {}", payment.code),
            ));
        Ok(draft)
    }
}

impl PostableDocument for SaleReceipt {
    fn source(&self) -> JournalSource {
        JournalSource::document(SourceType::SalePayment, self.0.id.into(), self.reference())
    }

    fn status_label(&self) -> String {
        "RECEIVED".to_string()
    }

    fn allows_posting(&self) -> bool {
        self.0.amount > Decimal::ZERO
    }

    fn entry_date(&self) -> NaiveDate {
        self.0.date
    }

    fn build_draft(&self, ctx: &PostingContext<'_>) -> Result<JournalDraft, PostingError> {
        PaymentJournalBuilder::sale_receipt(self, ctx)
    }
}

impl PostableDocument for PurchasePayment {
    fn source(&self) -> JournalSource {
        JournalSource::document(SourceType::PurchasePayment, self.0.id.into(), self.reference())
    }

    fn status_label(&self) -> String {
        "PAID".to_string()
    }

    fn allows_posting(&self) -> bool {
        self.0.amount > Decimal::ZERO
    }

    fn entry_date(&self) -> NaiveDate {
        self.0.date
    }

    fn build_draft(&self, ctx: &PostingContext<'_>) -> Result<JournalDraft, PostingError> {
        PaymentJournalBuilder::purchase_payment(self, ctx)
    }
}
