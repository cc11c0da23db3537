//! Shared fixtures for engine tests.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use saldo_core::coa::{Account, AccountType};
use saldo_core::posting::{
    PaymentDocument, PurchaseDocument, PurchaseItem, PurchasePayment, PurchaseStatus, SaleDocument,
    SaleItem, SaleReceipt, SaleStatus,
};
use saldo_shared::AppConfig;
use saldo_shared::types::{PaymentId, PurchaseId, SaleId, UserId};

use super::engine::PostingEngine;
use crate::memory::MemoryStore;

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub(crate) fn today() -> NaiveDate {
    date(2026, 3, 31)
}

pub(crate) fn user() -> UserId {
    UserId::new()
}

pub(crate) fn chart() -> Vec<Account> {
    vec![
        Account::new("1000", "Aset", AccountType::Asset).header(),
        Account::new("1100", "Aset Lancar", AccountType::Asset).header().under("1000"),
        Account::new("1101", "Kas", AccountType::Asset).under("1100"),
        Account::new("1102", "Bank BCA", AccountType::Asset).under("1100"),
        Account::new("1114", "PPh 21 Dibayar Dimuka", AccountType::Asset).under("1100"),
        Account::new("1115", "PPh 23 Dibayar Dimuka", AccountType::Asset).under("1100"),
        Account::new("1116", "Pajak Lain Dibayar Dimuka", AccountType::Asset).under("1100"),
        Account::new("1201", "Piutang Usaha", AccountType::Asset).under("1100"),
        Account::new("1240", "PPN Masukan", AccountType::Asset).under("1100"),
        Account::new("1301", "Persediaan", AccountType::Asset).under("1100"),
        Account::new("2000", "Kewajiban", AccountType::Liability).header(),
        Account::new("2101", "Utang Usaha", AccountType::Liability).under("2000"),
        Account::new("2103", "PPN Keluaran", AccountType::Liability).under("2000"),
        Account::new("2104", "Utang PPh 21", AccountType::Liability).under("2000"),
        Account::new("2105", "Utang PPh 23", AccountType::Liability).under("2000"),
        Account::new("2108", "Utang Pajak Lain", AccountType::Liability).under("2000"),
        Account::new("3000", "Ekuitas", AccountType::Equity).header(),
        Account::new("3101", "Modal Disetor", AccountType::Equity).under("3000"),
        Account::new("3201", "Laba Ditahan", AccountType::Equity).under("3000"),
        Account::new("4000", "Pendapatan", AccountType::Revenue).header(),
        Account::new("4101", "Penjualan", AccountType::Revenue).under("4000"),
        Account::new("4102", "Pendapatan Ongkos Kirim", AccountType::Revenue).under("4000"),
        Account::new("5000", "Beban", AccountType::Expense).header(),
        Account::new("5101", "Harga Pokok Penjualan", AccountType::Expense).under("5000"),
        Account::new("5201", "Beban Kantor", AccountType::Expense).under("5000"),
    ]
}

pub(crate) fn engine_with(config: AppConfig) -> PostingEngine<MemoryStore> {
    let engine = PostingEngine::new(MemoryStore::new(), config).with_today(today());
    engine.load_chart(chart()).unwrap();
    engine
}

pub(crate) fn engine() -> PostingEngine<MemoryStore> {
    engine_with(AppConfig::default())
}

/// Credit sale: 10 x 100,000 with 11% PPN, cost 70,000 each.
pub(crate) fn invoiced_sale() -> SaleDocument {
    SaleDocument {
        id: SaleId::new(),
        code: "SO-0001".into(),
        invoice_number: Some("INV-0001".into()),
        customer: "PT Maju Jaya".into(),
        date: date(2026, 3, 2),
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
            product: "Kopi Arabika 1kg".into(),
            quantity: dec!(10),
            unit_price: dec!(100000),
            cost_price: dec!(70000),
        }],
    }
}

/// Credit purchase of office supplies and stock, with PPN and PPh23.
pub(crate) fn approved_purchase() -> PurchaseDocument {
    PurchaseDocument {
        id: PurchaseId::new(),
        code: "PO-0001".into(),
        vendor: "CV Sumber Rejeki".into(),
        date: date(2026, 3, 5),
        status: PurchaseStatus::Approved,
        payment_method: "CREDIT".into(),
        cash_bank_account_code: None,
        subtotal: Some(dec!(600000)),
        ppn: dec!(66000),
        pph21: Decimal::ZERO,
        pph23: dec!(12000),
        items: vec![
            PurchaseItem {
                product: "Biji kopi".into(),
                quantity: dec!(5),
                unit_price: dec!(100000),
                expense_account_code: None,
            },
            PurchaseItem {
                product: "Kertas A4".into(),
                quantity: dec!(2),
                unit_price: dec!(50000),
                expense_account_code: Some("5201".into()),
            },
        ],
    }
}

pub(crate) fn payment(document_code: &str, amount: Decimal, method: &str) -> PaymentDocument {
    PaymentDocument {
        id: PaymentId::new(),
        code: format!("PAY-{document_code}"),
        document_code: document_code.to_string(),
        document_id: None,
        party: String::new(),
        date: date(2026, 3, 20),
        amount,
        method: method.to_string(),
        cash_bank_account_code: None,
        outstanding: None,
    }
}

pub(crate) fn sale_receipt(sale: &SaleDocument, amount: Decimal) -> SaleReceipt {
    let mut doc = payment(&sale.code, amount, "TRANSFER");
    doc.document_id = Some(sale.id.into());
    doc.outstanding = Some(sale.net_receivable());
    SaleReceipt(doc)
}

pub(crate) fn purchase_payment(purchase: &PurchaseDocument, amount: Decimal) -> PurchasePayment {
    let mut doc = payment(&purchase.code, amount, "CASH");
    doc.document_id = Some(purchase.id.into());
    PurchasePayment(doc)
}
