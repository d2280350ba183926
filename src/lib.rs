pub mod branch;
pub mod config;
pub mod dates;
pub mod decimal;
pub mod errors;
pub mod form;
pub mod locker;
pub mod overdue;
pub mod receipt;
pub mod refund;
pub mod types;

// re-export key types
pub use branch::{BranchDirectory, BranchProfile, InMemoryBranchDirectory, LockerCredentials};
pub use config::{
    AdvisoryConfig, CalculatorConfig, OverdueConfig, PricingConfig, PricingOverrides,
    RefundTierConfig,
};
pub use decimal::{Money, Rate};
pub use errors::{CalcError, Result};
pub use form::{CheckoutForm, RefundForm};
pub use locker::LockerMasterKey;
pub use overdue::{compute_overdue, CheckoutInput, OverdueFeeCalculator, OverdueResult};
pub use receipt::{OverdueReceipt, PayoutAccount, Receipt, RefundReceipt};
pub use refund::{
    compute_refund, DeductionPolicy, RefundPolicyEngine, RefundResult, RefundTier, Ticket,
    TicketInput, TicketInputBuilder, TierBoundary,
};
pub use types::{Advisory, PenaltyRate, ReceiptId, RefundPolicyMode, TicketType};

// re-export external dependencies that users will need
pub use chrono;
pub use chrono_tz;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
