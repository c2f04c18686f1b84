//! Money text format: `<CODE> <SIGN?><DIGITS>(.<DIGITS>)?`.
//!
//! Exactly one space separates code and amount. Surrounding whitespace is
//! not trimmed.

use ducat_shared::{DecimalAmount, MoneyError, MoneyResult};

use crate::currency::{Currency, CurrencyLookup};

/// Returns true for three uppercase ASCII letters.
pub(crate) fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}

/// Splits money text into a resolved currency and an amount.
///
/// # Errors
///
/// Returns `MissingArgument` for empty text, `InvalidFormat` if the text
/// breaks the grammar, and `UnknownCurrency` for unregistered codes.
pub fn parse_money_text<L>(text: &str, lookup: &L) -> MoneyResult<(Currency, DecimalAmount)>
where
    L: CurrencyLookup + ?Sized,
{
    if text.is_empty() {
        return Err(MoneyError::MissingArgument("money text"));
    }

    let (code, amount) = text
        .split_once(' ')
        .ok_or_else(|| MoneyError::invalid_format(text, "expected '<CODE> <AMOUNT>'"))?;
    if !is_currency_code(code) {
        return Err(MoneyError::invalid_format(text, "expected three-letter currency code"));
    }
    if amount.is_empty() {
        return Err(MoneyError::invalid_format(text, "missing amount"));
    }
    let amount: DecimalAmount = amount
        .parse()
        .map_err(|_| MoneyError::invalid_format(text, "invalid amount"))?;

    let currency = lookup.lookup(code)?;
    Ok((currency, amount))
}
