//! Engine configuration management.
//!
//! Every field has a default, so an empty environment yields a working
//! configuration for an Indonesian chart of accounts.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Journal numbering and date rules.
    #[serde(default)]
    pub ledger: LedgerSettings,
    /// Default account codes used by the posting rules.
    #[serde(default)]
    pub accounts: AccountMapping,
    /// Tax rates.
    #[serde(default)]
    pub tax: TaxRates,
    /// Balance tolerances.
    #[serde(default)]
    pub posting: PostingSettings,
}

/// Journal numbering and date rules.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerSettings {
    /// Reporting currency.
    #[serde(default)]
    pub base_currency: Currency,
    /// Decimal places for posted amounts.
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Prefix for generated entry numbers.
    #[serde(default = "default_entry_prefix")]
    pub entry_prefix: String,
    /// Reject journals that do not balance after tolerance handling.
    #[serde(default = "default_true")]
    pub require_balanced_entry: bool,
    /// Allow entry dates after today.
    #[serde(default)]
    pub allow_future_dates: bool,
    /// Days ahead accepted when future dates are not allowed.
    #[serde(default = "default_max_future_days")]
    pub max_future_days: u32,
    /// Also write every posting to the legacy ledger.
    #[serde(default = "default_true")]
    pub mirror_legacy: bool,
}

fn default_decimal_places() -> u32 {
    2
}

fn default_entry_prefix() -> String {
    "JE".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_future_days() -> u32 {
    7
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            base_currency: Currency::Idr,
            decimal_places: default_decimal_places(),
            entry_prefix: default_entry_prefix(),
            require_balanced_entry: true,
            allow_future_dates: false,
            max_future_days: default_max_future_days(),
            mirror_legacy: true,
        }
    }
}

/// Default account codes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AccountMapping {
    /// Kas.
    pub cash: String,
    /// Bank.
    pub bank: String,
    /// Piutang Usaha.
    pub accounts_receivable: String,
    /// Persediaan.
    pub inventory: String,
    /// PPN Masukan (input VAT, asset).
    pub ppn_input: String,
    /// PPh 21 dibayar dimuka.
    pub prepaid_pph21: String,
    /// PPh 23 dibayar dimuka.
    pub prepaid_pph23: String,
    /// Other prepaid taxes.
    pub prepaid_other_tax: String,
    /// Utang Usaha.
    pub accounts_payable: String,
    /// PPN Keluaran (output VAT, liability).
    pub ppn_output: String,
    /// Utang PPh 21.
    pub pph21_payable: String,
    /// Utang PPh 23.
    pub pph23_payable: String,
    /// Other taxes payable.
    pub other_tax_payable: String,
    /// Pendapatan Penjualan.
    pub sales_revenue: String,
    /// Shipping income.
    pub shipping_revenue: String,
    /// Harga Pokok Penjualan.
    pub cogs: String,
    /// Laba Ditahan.
    pub retained_earnings: String,
}

impl Default for AccountMapping {
    fn default() -> Self {
        Self {
            cash: "1101".into(),
            bank: "1102".into(),
            accounts_receivable: "1201".into(),
            inventory: "1301".into(),
            ppn_input: "1240".into(),
            prepaid_pph21: "1114".into(),
            prepaid_pph23: "1115".into(),
            prepaid_other_tax: "1116".into(),
            accounts_payable: "2101".into(),
            ppn_output: "2103".into(),
            pph21_payable: "2104".into(),
            pph23_payable: "2105".into(),
            other_tax_payable: "2108".into(),
            sales_revenue: "4101".into(),
            shipping_revenue: "4102".into(),
            cogs: "5101".into(),
            retained_earnings: "3201".into(),
        }
    }
}

/// Statutory tax rates, as fractions.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxRates {
    /// PPN (VAT).
    #[serde(default = "default_ppn_rate")]
    pub ppn_rate: Decimal,
    /// PPh 21 withholding.
    #[serde(default = "default_pph21_rate")]
    pub pph21_rate: Decimal,
    /// PPh 23 withholding.
    #[serde(default = "default_pph23_rate")]
    pub pph23_rate: Decimal,
}

fn default_ppn_rate() -> Decimal {
    Decimal::new(11, 2)
}

fn default_pph21_rate() -> Decimal {
    Decimal::new(5, 2)
}

fn default_pph23_rate() -> Decimal {
    Decimal::new(2, 2)
}

impl Default for TaxRates {
    fn default() -> Self {
        Self {
            ppn_rate: default_ppn_rate(),
            pph21_rate: default_pph21_rate(),
            pph23_rate: default_pph23_rate(),
        }
    }
}

/// Tolerances applied while building and checking journals.
#[derive(Debug, Clone, Deserialize)]
pub struct PostingSettings {
    /// Imbalance accepted as-is.
    #[serde(default = "default_balance_tolerance")]
    pub balance_tolerance: Decimal,
    /// Imbalance corrected by adjusting the first debit line.
    #[serde(default = "default_adjust_tolerance")]
    pub adjust_tolerance: Decimal,
    /// Ancillary lines (shipping, other taxes) below this are dropped.
    #[serde(default = "default_min_line_amount")]
    pub min_line_amount: Decimal,
    /// Cached vs derived balance tolerance.
    #[serde(default = "default_integrity_tolerance")]
    pub integrity_tolerance: Decimal,
    /// Minimum length of a reversal reason.
    #[serde(default = "default_min_reversal_reason")]
    pub min_reversal_reason: usize,
}

fn default_balance_tolerance() -> Decimal {
    Decimal::ONE_HUNDRED
}

fn default_adjust_tolerance() -> Decimal {
    Decimal::new(500, 0)
}

fn default_min_line_amount() -> Decimal {
    Decimal::ONE
}

fn default_integrity_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

fn default_min_reversal_reason() -> usize {
    10
}

impl Default for PostingSettings {
    fn default() -> Self {
        Self {
            balance_tolerance: default_balance_tolerance(),
            adjust_tolerance: default_adjust_tolerance(),
            min_line_amount: default_min_line_amount(),
            integrity_tolerance: default_integrity_tolerance(),
            min_reversal_reason: default_min_reversal_reason(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from config files and `SALDO__*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a source exists but cannot be parsed.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        Self::load_from("config", &run_mode)
    }

    /// Loads configuration from `{dir}/default` and `{dir}/{run_mode}` plus the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source exists but cannot be parsed.
    pub fn load_from(dir: &str, run_mode: &str) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("SALDO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
