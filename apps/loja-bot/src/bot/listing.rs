//! Text layer of a product post: rendering and the footer-key round trip.

/// Fixed delimiter between the footer label and the product key. The
/// purchase flow relies on this exact prefix to find the key again.
pub const KEY_FOOTER_PREFIX: &str = "Chave: ";

pub fn render_product_text(title: &str, price_cents: i64, key: &str) -> String {
    format!(
        "{title}\nPreço: {}\n\n{KEY_FOOTER_PREFIX}{key}",
        format_price(price_cents)
    )
}

/// Recovers the product key from a post's text by its footer line.
/// `None` when the footer is absent or malformed.
pub fn extract_product_key(text: &str) -> Option<&str> {
    text.lines()
        .rev()
        .find_map(|line| line.trim().strip_prefix(KEY_FOOTER_PREFIX))
        .map(str::trim)
        .filter(|key| !key.is_empty())
}

/// `4990` -> `R$ 49,90`.
pub fn format_price(cents: i64) -> String {
    format!("R$ {},{:02}", cents / 100, cents % 100)
}

/// Accepts `49,90`, `49.90`, `49` and an optional `R$` prefix. `None` on
/// anything that is not a non-negative amount with at most two decimals.
pub fn parse_price(input: &str) -> Option<i64> {
    let normalized = input
        .trim()
        .strip_prefix("R$")
        .unwrap_or(input.trim())
        .trim()
        .replace(',', ".");

    let mut parts = normalized.splitn(2, '.');
    let whole_part = parts.next()?;
    if whole_part.is_empty() || !whole_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let whole: i64 = whole_part.parse().ok()?;

    let cents = match parts.next() {
        None | Some("") => 0,
        Some(frac) => {
            if frac.len() > 2 || !frac.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let value: i64 = frac.parse().ok()?;
            if frac.len() == 1 {
                value * 10
            } else {
                value
            }
        }
    };

    Some(whole * 100 + cents)
}
