//! Document export - turns a list into printable markup.
//!
//! The core builds the markup only. Currency display and the final
//! document are delegated to a [`CurrencyFormatter`] and a
//! [`DocumentRenderer`] supplied by the caller.

use super::aggregate;
use super::model::ShoppingList;
use crate::errors::{Error, Result};
use async_trait::async_trait;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{error, info};

/// Locale-aware display of an amount, e.g. `R$ 12,50`.
pub trait CurrencyFormatter {
    /// Renders `amount` for display, rounded to the currency's minor unit.
    fn format(&self, amount: Decimal) -> String;
}

/// Produces the final artifact (PDF, print job, ...) from markup.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    /// Turns printable markup into document bytes.
    async fn render(&self, markup: &str) -> Result<Vec<u8>>;
}

/// Formats amounts with a symbol, two decimals and digit grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleCurrencyFormatter {
    symbol: String,
    decimal_separator: char,
    group_separator: char,
}

impl LocaleCurrencyFormatter {
    /// A formatter with the given symbol and separators.
    #[must_use]
    pub fn new(symbol: impl Into<String>, decimal_separator: char, group_separator: char) -> Self {
        Self {
            symbol: symbol.into(),
            decimal_separator,
            group_separator,
        }
    }

    /// Brazilian real: `R$ 1.234,50`.
    #[must_use]
    pub fn brl() -> Self {
        Self::new("R$", ',', '.')
    }

    fn group_digits(&self, digits: &str) -> String {
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, digit) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(self.group_separator);
            }
            grouped.push(digit);
        }
        grouped
    }
}

impl Default for LocaleCurrencyFormatter {
    fn default() -> Self {
        Self::brl()
    }
}

impl CurrencyFormatter for LocaleCurrencyFormatter {
    fn format(&self, amount: Decimal) -> String {
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let plain = format!("{:.2}", rounded.abs());
        let (whole, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
        let sign = if rounded < Decimal::ZERO { "-" } else { "" };
        format!(
            "{sign}{} {}{}{fraction}",
            self.symbol,
            self.group_digits(whole),
            self.decimal_separator
        )
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Builds the printable markup for `list`: title, one `name — price` line per
/// product, and the grand total.
///
/// # Errors
/// Returns [`Error::EmptyExport`] if the list has no products.
pub fn render_list_as_document<F: CurrencyFormatter + ?Sized>(
    list: &ShoppingList,
    formatter: &F,
) -> Result<String> {
    if list.products.is_empty() {
        return Err(Error::EmptyExport {
            name: list.name.clone(),
        });
    }

    let lines: Vec<String> = list
        .products
        .iter()
        .map(|p| {
            format!(
                "      <li>{} — {}</li>",
                escape_html(&p.name),
                escape_html(&formatter.format(p.price))
            )
        })
        .collect();
    let total = formatter.format(aggregate::total(&list.products));

    Ok(format!(
        "<html>\n  <body>\n    <h1>{}</h1>\n    <ul>\n{}\n    </ul>\n    <p><strong>Total: {}</strong></p>\n  </body>\n</html>\n",
        escape_html(&list.name),
        lines.join("\n"),
        escape_html(&total)
    ))
}

/// Renders `list` and hands the markup to `renderer`.
///
/// Nothing reaches the renderer for an empty list.
///
/// # Errors
/// - [`Error::EmptyExport`] if the list has no products
/// - [`Error::Render`] if the renderer fails
pub async fn export_list<F, R>(list: &ShoppingList, formatter: &F, renderer: &R) -> Result<Vec<u8>>
where
    F: CurrencyFormatter + ?Sized,
    R: DocumentRenderer + ?Sized,
{
    let markup = render_list_as_document(list, formatter)?;
    let document = renderer.render(&markup).await.map_err(|e| {
        error!("Failed to render list '{}': {}", list.name, e);
        Error::Render {
            message: e.to_string(),
        }
    })?;
    info!("Exported list '{}' ({} bytes)", list.name, document.len());
    Ok(document)
}
