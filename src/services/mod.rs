pub mod ledger;
pub mod payment;
pub mod quota;
pub mod report;
