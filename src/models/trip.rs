use serde::{Deserialize, Serialize, Serializer};
use crate::models::cell::{lenient, reading, text, to_cell};
use crate::models::driver::Driver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Uber,
    Indrive,
    Yatri,
    Rapido,
    Offline,
}

impl Channel {
    pub const ALL: [Channel; 5] = [
        Channel::Uber,
        Channel::Indrive,
        Channel::Yatri,
        Channel::Rapido,
        Channel::Offline,
    ];
}

/// One amount per revenue channel. Missing or blank channels are 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelAmounts {
    #[serde(default, deserialize_with = "lenient")]
    pub uber: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub indrive: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub yatri: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub rapido: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub offline: f64,
}

impl ChannelAmounts {
    pub fn get(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Uber => self.uber,
            Channel::Indrive => self.indrive,
            Channel::Yatri => self.yatri,
            Channel::Rapido => self.rapido,
            Channel::Offline => self.offline,
        }
    }

    pub fn total(&self) -> f64 {
        Channel::ALL.iter().map(|c| self.get(*c)).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherExpense {
    #[serde(default)]
    pub label: String,
    #[serde(default, deserialize_with = "lenient")]
    pub amount: f64,
}

/// Everything entered on the trip form for one driver-day.
#[derive(Debug, Clone)]
pub struct TripInput {
    pub driver: Driver,
    pub start_km: Option<f64>,
    pub end_km: Option<f64>,
    pub earnings: ChannelAmounts,
    pub cash: ChannelAmounts,
    pub yatri_trip_count: u32,
    pub uber_deduction_applies: bool,
    pub online_payment_amount: f64,
    pub fuel_costs: Vec<f64>,
    pub other_expenses: Vec<OtherExpense>,
    pub driver_withdrawal: Option<f64>,
    pub cash_given_to_accountant: f64,
}

impl TripInput {
    /// Kilometres driven, or None when either reading is blank.
    pub fn distance(&self) -> Option<f64> {
        match (self.start_km, self.end_km) {
            (Some(start), Some(end)) => Some((end - start).max(0.0)),
            _ => None,
        }
    }
}

/// One saved trip as it sits in the earnings sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    #[serde(default, deserialize_with = "text")]
    pub date: String,
    #[serde(default, deserialize_with = "text")]
    pub driver: String,
    #[serde(default, deserialize_with = "reading", serialize_with = "km_cell")]
    pub km: Option<f64>,
    #[serde(default, deserialize_with = "lenient", serialize_with = "money_cell")]
    pub earnings: f64,
    #[serde(default, deserialize_with = "lenient", serialize_with = "money_cell")]
    pub cash_collected: f64,
    #[serde(default, deserialize_with = "lenient", serialize_with = "money_cell")]
    pub fuel: f64,
    #[serde(default, deserialize_with = "lenient", serialize_with = "money_cell")]
    pub uber_commission: f64,
    #[serde(default, deserialize_with = "lenient", serialize_with = "money_cell")]
    pub yatri_commission: f64,
    #[serde(default, deserialize_with = "lenient", serialize_with = "money_cell")]
    pub other_expenses: f64,
    #[serde(default, deserialize_with = "lenient", serialize_with = "money_cell")]
    pub driver_pay: f64,
    #[serde(default, deserialize_with = "lenient", serialize_with = "money_cell")]
    pub driver_withdrawal: f64,
    #[serde(default, deserialize_with = "lenient", serialize_with = "money_cell")]
    pub owner_profit: f64,
    #[serde(default, deserialize_with = "lenient", serialize_with = "money_cell")]
    pub remaining_cash: f64,
}

fn money_cell<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_cell(*value))
}

fn km_cell<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(km) => serializer.serialize_f64(*km),
        None => serializer.serialize_str(""),
    }
}
