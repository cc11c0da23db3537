//! Document posting and status-change handling.

use saldo_core::ledger::{JournalEntry, LedgerKind};
use saldo_core::posting::{
    PostableDocument, PostingContext, PostingDecision, PostingError, PurchaseDocument,
    PurchasePayment, PurchaseStatus, SaleDocument, SaleReceipt, SaleStatus,
};
use saldo_shared::types::{JournalId, UserId};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::engine::{PostingEngine, PostingReceipt};
use super::reversal::{PendingReversal, log_reversal};
use crate::error::EngineError;
use crate::repository::LedgerRepository;

/// Result of posting one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PostOutcome {
    /// A new journal was written.
    Posted(PostingReceipt),
    /// The document already had a live journal; nothing was written.
    AlreadyPosted {
        /// Existing journal.
        journal_id: JournalId,
        /// Its entry number.
        entry_number: String,
    },
}

impl PostOutcome {
    /// Journal that now represents the document.
    #[must_use]
    pub fn journal_id(&self) -> JournalId {
        match self {
            Self::Posted(receipt) => receipt.journal_id,
            Self::AlreadyPosted { journal_id, .. } => *journal_id,
        }
    }
}

/// What a status change did to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangeOutcome {
    /// Decision taken.
    pub decision: PostingDecision,
    /// Reversal written, on `Reverse` and `Repost`.
    pub reversal: Option<PostingReceipt>,
    /// Posting written, on `Create` and `Repost`.
    pub posting: Option<PostOutcome>,
}

impl<R: LedgerRepository> PostingEngine<R> {
    /// Posts a sale.
    ///
    /// # Errors
    ///
    /// `Posting(NotPostable)` when the status forbids posting, or any posting,
    /// ledger or store error.
    pub fn post_sale(&self, sale: &SaleDocument, user: UserId) -> Result<PostOutcome, EngineError> {
        self.post_document(sale, user)
    }

    /// Posts a purchase.
    ///
    /// # Errors
    ///
    /// As [`PostingEngine::post_sale`].
    pub fn post_purchase(&self, purchase: &PurchaseDocument, user: UserId) -> Result<PostOutcome, EngineError> {
        self.post_document(purchase, user)
    }

    /// Posts a customer receipt against a sale.
    ///
    /// # Errors
    ///
    /// As [`PostingEngine::post_sale`]; `Overpayment` when the receipt exceeds
    /// the outstanding amount.
    pub fn post_sale_payment(&self, receipt: &SaleReceipt, user: UserId) -> Result<PostOutcome, EngineError> {
        self.post_document(receipt, user)
    }

    /// Posts a payment to a vendor.
    ///
    /// # Errors
    ///
    /// As [`PostingEngine::post_sale`].
    pub fn post_purchase_payment(
        &self,
        payment: &PurchasePayment,
        user: UserId,
    ) -> Result<PostOutcome, EngineError> {
        self.post_document(payment, user)
    }

    /// Applies the ledger action for a sale whose status changed from `previous`.
    ///
    /// # Errors
    ///
    /// Any error from the posting or reversal performed.
    pub fn on_sale_status_change(
        &self,
        sale: &SaleDocument,
        previous: &SaleStatus,
        user: UserId,
    ) -> Result<StatusChangeOutcome, EngineError> {
        self.on_status_change(sale, previous.allows_posting(), previous.as_str(), user)
    }

    /// Applies the ledger action for a purchase whose status changed from `previous`.
    ///
    /// # Errors
    ///
    /// Any error from the posting or reversal performed.
    pub fn on_purchase_status_change(
        &self,
        purchase: &PurchaseDocument,
        previous: &PurchaseStatus,
        user: UserId,
    ) -> Result<StatusChangeOutcome, EngineError> {
        self.on_status_change(purchase, previous.allows_posting(), previous.as_str(), user)
    }

    /// Live unified journal for a document, if any.
    fn live_journal<D: PostableDocument>(&self, doc: &D) -> Result<Option<JournalEntry>, EngineError> {
        let source = doc.source();
        let Some(source_id) = source.source_id else {
            return Ok(None);
        };
        Ok(self
            .repo
            .journal_for_source(LedgerKind::Unified, source.source_type, source_id)?)
    }

    fn post_document<D: PostableDocument>(&self, doc: &D, user: UserId) -> Result<PostOutcome, EngineError> {
        let source = doc.source();
        if !doc.allows_posting() {
            return Err(PostingError::NotPostable {
                reference: source.reference,
                status: doc.status_label(),
            }
            .into());
        }

        if let Some(existing) = self.live_journal(doc)? {
            warn!(
                reference = %source.reference,
                journal_id = %existing.id,
                "Document already posted, skipping"
            );
            return Ok(PostOutcome::AlreadyPosted {
                journal_id: existing.id,
                entry_number: existing.entry_number,
            });
        }

        let ctx = PostingContext::from_config(&self.config);
        let draft = doc.build_draft(&ctx)?;
        let receipt = self.post_draft(&draft, &doc.balance_policy(&ctx), user)?;
        Ok(PostOutcome::Posted(receipt))
    }

    fn on_status_change<D: PostableDocument>(
        &self,
        doc: &D,
        was_postable: bool,
        previous: &str,
        user: UserId,
    ) -> Result<StatusChangeOutcome, EngineError> {
        let existing = self.live_journal(doc)?;
        let decision =
            PostingDecision::on_transition(was_postable, doc.allows_posting(), existing.is_some());
        let reference = doc.source().reference;
        info!(
            reference = %reference,
            from = %previous,
            to = %doc.status_label(),
            decision = ?decision,
            "Document status changed"
        );

        let reason = format!("Status changed from {previous} to {}", doc.status_label());
        let mut outcome = StatusChangeOutcome {
            decision,
            reversal: None,
            posting: None,
        };

        match (decision, existing) {
            (PostingDecision::Create, _) => {
                outcome.posting = Some(self.post_document(doc, user)?);
            }
            (PostingDecision::Reverse, Some(journal)) => {
                outcome.reversal = Some(self.reverse(journal.id, &reason, user)?);
            }
            (PostingDecision::Repost, Some(journal)) => {
                let (reversal, posting) = self.repost(doc, &journal, &reason, user)?;
                outcome.reversal = Some(reversal);
                outcome.posting = Some(PostOutcome::Posted(posting));
            }
            (PostingDecision::Reverse | PostingDecision::Repost | PostingDecision::Skip, _) => {}
        }

        Ok(outcome)
    }

    /// Reverses `journal` and posts the current `doc` in one batch. Either
    /// both land or the original stays live.
    fn repost<D: PostableDocument>(
        &self,
        doc: &D,
        journal: &JournalEntry,
        reason: &str,
        user: UserId,
    ) -> Result<(PostingReceipt, PostingReceipt), EngineError> {
        let ctx = PostingContext::from_config(&self.config);
        let draft = doc.build_draft(&ctx)?;

        let chart = self.chart()?;
        let PendingReversal { plan, pending, batch } = self.prepare_reversal(&chart, journal, reason, user)?;
        let posting = self.prepare_entry(&chart, &draft, &doc.balance_policy(&ctx), user)?;

        let numbers = self.repo.commit(batch.merge(self.batch_for(&posting)))?;

        let reversal = self.receipt(&pending.numbered(&numbers));
        let posting = self.receipt(&posting.numbered(&numbers));
        log_reversal(&plan, &reversal);
        info!(
            journal_id = %posting.journal_id,
            entry_number = %posting.entry_number,
            reference = %posting.reference,
            replaces = %journal.entry_number,
            "Journal reposted"
        );
        Ok((reversal, posting))
    }
}
