pub mod cash;
pub mod driver;
pub mod report;
pub mod trip;
