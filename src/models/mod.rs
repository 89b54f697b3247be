pub mod cell;
pub mod cash;
pub mod driver;
pub mod trip;
