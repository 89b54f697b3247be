use serde::Serialize;

/// How a driver's share of the day's net earnings is worked out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PayoutStrategy {
    /// 50/50 split of earnings net of fuel. Other expenses are ignored.
    FixedSplit,
    /// Fraction of net earnings, in [0, 1).
    PercentShare { share: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Driver {
    pub name: String,
    pub strategy: PayoutStrategy,
    pub withdrawal_allowed: bool,
}

impl Driver {
    pub fn new(name: &str, strategy: PayoutStrategy, withdrawal_allowed: bool) -> Self {
        Self {
            name: name.to_string(),
            strategy,
            withdrawal_allowed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Roster {
    drivers: Vec<Driver>,
}

impl Roster {
    pub fn new(drivers: Vec<Driver>) -> Self {
        Self { drivers }
    }

    pub fn find(&self, name: &str) -> Option<&Driver> {
        self.drivers.iter().find(|d| d.name == name)
    }

    pub fn drivers(&self) -> &[Driver] {
        &self.drivers
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new(vec![
            Driver::new("Vivek Bali", PayoutStrategy::PercentShare { share: 0.3 }, true),
            Driver::new("Vikash Yadav", PayoutStrategy::FixedSplit, true),
            Driver::new("Chhotelal Yadav", PayoutStrategy::PercentShare { share: 0.35 }, false),
        ])
    }
}
