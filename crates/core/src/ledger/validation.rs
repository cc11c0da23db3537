//! Line-level validation for journals.

use rust_decimal::Decimal;
use saldo_shared::types::round_amount;

use super::draft::DraftLine;
use super::error::LedgerError;
use super::types::JournalTotals;

/// Validates the lines of a draft journal.
///
/// Totals are compared after rounding to `decimal_places`; a difference up to
/// `residual_limit` is allowed (zero means exact).
///
/// # Errors
///
/// Returns the first rule the lines break.
pub fn validate_lines(
    lines: &[DraftLine],
    decimal_places: u32,
    residual_limit: Decimal,
) -> Result<JournalTotals, LedgerError> {
    if lines.is_empty() {
        return Err(LedgerError::NoLines);
    }

    let mut total_debit = Decimal::ZERO;
    let mut total_credit = Decimal::ZERO;
    let mut has_debit = false;
    let mut has_credit = false;

    for line in lines {
        for amount in [line.debit, line.credit] {
            if amount < Decimal::ZERO {
                return Err(LedgerError::NegativeAmount {
                    account_code: line.account_code.clone(),
                    amount,
                });
            }
        }

        match (line.debit > Decimal::ZERO, line.credit > Decimal::ZERO) {
            (true, true) => return Err(LedgerError::BothSides(line.account_code.clone())),
            (false, false) => return Err(LedgerError::ZeroLine(line.account_code.clone())),
            (true, false) => {
                has_debit = true;
                total_debit += line.debit;
            }
            (false, true) => {
                has_credit = true;
                total_credit += line.credit;
            }
        }
    }

    if !has_debit || !has_credit {
        return Err(LedgerError::SingleSided);
    }

    let totals = JournalTotals::new(
        round_amount(total_debit, decimal_places),
        round_amount(total_credit, decimal_places),
    );
    if !totals.is_balanced_within(residual_limit) {
        return Err(LedgerError::Unbalanced {
            debit: totals.total_debit,
            credit: totals.total_credit,
        });
    }

    Ok(totals)
}
