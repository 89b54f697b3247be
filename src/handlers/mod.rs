pub mod cash;
pub mod driver;
pub mod quota;
pub mod report;
pub mod trip;
