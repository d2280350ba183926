pub mod overdue;
pub mod refund;

pub use overdue::OverdueReceipt;
pub use refund::{PayoutAccount, RefundReceipt};

use crate::types::ReceiptId;

pub const HEAVY_RULE: &str = "=============================================";
pub const LIGHT_RULE: &str = "---------------------------------------------";

/// trait for printable counter receipts
pub trait Receipt {
    fn receipt_id(&self) -> ReceiptId;

    /// plain text block as handed to the customer
    fn render(&self) -> String;

    /// html fragment for the export sink
    fn to_html(&self) -> String {
        format!(
            "<pre class=\"receipt\" data-receipt-id=\"{}\">{}</pre>",
            self.receipt_id(),
            escape_html(&self.render())
        )
    }
}

/// minimal escaping for text placed inside html
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
