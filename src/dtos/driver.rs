use serde::Serialize;
use crate::models::driver::{Driver, PayoutStrategy};

#[derive(Serialize)]
pub struct DriverResponse {
    pub name: String,
    pub strategy: PayoutStrategy,
    pub withdrawal_allowed: bool,
}

impl From<&Driver> for DriverResponse {
    fn from(driver: &Driver) -> Self {
        Self {
            name: driver.name.clone(),
            strategy: driver.strategy,
            withdrawal_allowed: driver.withdrawal_allowed,
        }
    }
}
