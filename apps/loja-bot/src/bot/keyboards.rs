use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

/// Callback payload of the purchase button. The product key is not carried
/// here; it is read back from the post footer when the button is pressed.
pub const BUY_CALLBACK: &str = "buy_now";

pub fn buy_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "🛒 Comprar agora",
        BUY_CALLBACK,
    )]])
}
