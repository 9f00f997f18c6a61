//! Cross-crate tests through the signed ledger.

mod adversarial;
mod scenarios;
