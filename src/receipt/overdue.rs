use uuid::Uuid;

use crate::overdue::OverdueResult;
use crate::receipt::Receipt;
use crate::types::ReceiptId;

const COMPACT_MINUTE_FORMAT: &str = "%Y%m%d %H:%M";

/// unprocessed-checkout recovery note
pub struct OverdueReceipt<'a> {
    id: ReceiptId,
    result: &'a OverdueResult,
}

impl<'a> OverdueReceipt<'a> {
    pub fn new(result: &'a OverdueResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            result,
        }
    }
}

impl Receipt for OverdueReceipt<'_> {
    fn receipt_id(&self) -> ReceiptId {
        self.id
    }

    fn render(&self) -> String {
        let r = self.result;
        [
            format!(
                "미처리 기간 : {} ~ {}",
                r.checkout_instant.format(COMPACT_MINUTE_FORMAT),
                r.reference_now.format(COMPACT_MINUTE_FORMAT)
            ),
            format!("미처리 시간 : {}", r.duration_label()),
            format!("초과 요금 : {} ({})", r.overcharge, r.tariff_label()),
        ]
        .join("\n")
    }
}
