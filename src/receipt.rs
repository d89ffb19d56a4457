//! Receipt
//!
//! Plain-text rendering of an [`OrderSummary`] for terminals and order confirmation emails.

use std::io;

use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{checkout::OrderSummary, config::parse_currency};

/// Errors that can occur when rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// The summary's currency is not supported.
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Receipt for an order summary.
#[derive(Debug, Clone, Copy)]
pub struct Receipt<'a> {
    summary: &'a OrderSummary,
    currency: &'static Currency,
}

impl<'a> Receipt<'a> {
    /// Create a receipt for the given summary.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::UnknownCurrency`] if the summary's currency is unsupported.
    pub fn new(summary: &'a OrderSummary) -> Result<Self, ReceiptError> {
        let currency = parse_currency(&summary.currency)
            .ok_or_else(|| ReceiptError::UnknownCurrency(summary.currency.clone()))?;

        Ok(Self { summary, currency })
    }

    fn money(&self, minor: i64) -> Money<'static, Currency> {
        Money::from_minor(minor, self.currency)
    }

    /// Writes the receipt as a table followed by the totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["Item", "Size", "Colour", "Qty", "Unit Price", "Total"]);

        for line in &self.summary.items {
            builder.push_record([
                line.name.clone(),
                line.selected_size.clone().unwrap_or_default(),
                line.color_name.clone().unwrap_or_default(),
                line.quantity.to_string(),
                self.money(line.price).to_string(),
                self.money(line.line_total).to_string(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::rounded());
        table.modify(Columns::new(3..), Alignment::right());
        table.modify(Rows::first(), Alignment::center());

        writeln!(out, "{table}").map_err(|_err| ReceiptError::IO)?;

        let rows = [
            ("Subtotal:", self.money(self.summary.subtotal)),
            ("Delivery:", self.money(self.summary.delivery_fee)),
            ("Total:", self.money(self.summary.grand_total)),
        ];

        let value_width = rows
            .iter()
            .map(|(_, value)| value.to_string().chars().count())
            .max()
            .unwrap_or_default();

        for (label, value) in rows {
            writeln!(out, "{label:>10}  {:>value_width$}", value.to_string())
                .map_err(|_err| ReceiptError::IO)?;
        }

        Ok(())
    }
}
