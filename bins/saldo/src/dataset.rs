//! JSON dataset: chart of accounts plus the documents to post.

use std::path::Path;

use anyhow::Context;
use saldo_core::coa::Account;
use saldo_core::posting::{
    PostableDocument, PurchaseDocument, PurchasePayment, SaleDocument, SaleReceipt,
};
use saldo_shared::types::UserId;
use saldo_store::{EngineError, LedgerRepository, PostOutcome, PostingEngine, PostingReceipt};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Everything the engine needs for one run.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub accounts: Vec<Account>,
    pub sales: Vec<SaleDocument>,
    pub purchases: Vec<PurchaseDocument>,
    pub sale_payments: Vec<SaleReceipt>,
    pub purchase_payments: Vec<PurchasePayment>,
}

impl Dataset {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Invalid dataset {}", path.display()))
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Posts documents in dependency order: invoices and purchases before
    /// the payments that settle them.
    pub fn post_all<R: LedgerRepository>(&self, engine: &PostingEngine<R>, user: UserId) -> PostSummary {
        let mut summary = PostSummary::default();
        post_each(&self.sales, &mut summary, |d| engine.post_sale(d, user));
        post_each(&self.purchases, &mut summary, |d| engine.post_purchase(d, user));
        post_each(&self.sale_payments, &mut summary, |d| engine.post_sale_payment(d, user));
        post_each(&self.purchase_payments, &mut summary, |d| {
            engine.post_purchase_payment(d, user)
        });

        info!(
            posted = summary.posted.len(),
            already_posted = summary.already_posted.len(),
            skipped = summary.skipped.len(),
            failed = summary.failed.len(),
            "Dataset posted"
        );
        summary
    }
}

/// Document left out because its status carries no journal.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedDocument {
    pub reference: String,
    pub status: String,
}

/// Document the engine rejected.
#[derive(Debug, Clone, Serialize)]
pub struct FailedDocument {
    pub reference: String,
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Default, Serialize)]
pub struct PostSummary {
    pub posted: Vec<PostingReceipt>,
    pub already_posted: Vec<String>,
    pub skipped: Vec<SkippedDocument>,
    pub failed: Vec<FailedDocument>,
}

fn post_each<D, F>(documents: &[D], summary: &mut PostSummary, post: F)
where
    D: PostableDocument,
    F: Fn(&D) -> Result<PostOutcome, EngineError>,
{
    for document in documents {
        let reference = document.source().reference;
        if !document.allows_posting() {
            info!(reference = %reference, status = %document.status_label(), "Skipping unpostable document");
            summary.skipped.push(SkippedDocument {
                reference,
                status: document.status_label(),
            });
            continue;
        }

        match post(document) {
            Ok(PostOutcome::Posted(receipt)) => summary.posted.push(receipt),
            Ok(PostOutcome::AlreadyPosted { .. }) => summary.already_posted.push(reference),
            Err(err) => {
                warn!(reference = %reference, code = err.error_code(), error = %err, "Document rejected");
                summary.failed.push(FailedDocument {
                    reference,
                    code: err.error_code(),
                    message: err.to_string(),
                });
            }
        }
    }
}
