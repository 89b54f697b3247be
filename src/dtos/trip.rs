use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::error::AppError;
use crate::models::cell::{coerce, lenient, lenient_count, lenient_optional, reading, round2};
use crate::models::driver::Roster;
use crate::models::trip::{ChannelAmounts, OtherExpense, TripInput, TripRecord};
use crate::services::payment::PaymentBreakdown;
use crate::services::report::ReportSource;

// Request DTOs

/// The trip form as the browser sends it. Every numeric field is lenient:
/// blank or non-numeric values count as 0.
#[derive(Debug, Deserialize)]
pub struct TripPaymentRequest {
    pub driver: String,
    #[serde(default, deserialize_with = "reading")]
    pub start_km: Option<f64>,
    #[serde(default, deserialize_with = "reading")]
    pub end_km: Option<f64>,
    #[serde(default)]
    pub earnings: ChannelAmounts,
    #[serde(default)]
    pub cash: ChannelAmounts,
    #[serde(default, deserialize_with = "lenient_count")]
    pub yatri_trips: u32,
    #[serde(default)]
    pub uber_deduction: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub online_payment_amount: f64,
    #[serde(default)]
    pub fuel_entries: Vec<Value>,
    #[serde(default)]
    pub other_expenses: Vec<OtherExpense>,
    #[serde(default, deserialize_with = "lenient_optional")]
    pub driver_withdrawal: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub cash_given: f64,
}

impl TripPaymentRequest {
    pub fn into_input(self, roster: &Roster) -> Result<TripInput, AppError> {
        let driver = roster
            .find(&self.driver)
            .cloned()
            .ok_or_else(|| AppError::validation(format!("Unknown driver '{}'", self.driver)))?;

        Ok(TripInput {
            driver,
            start_km: self.start_km,
            end_km: self.end_km,
            earnings: self.earnings,
            cash: self.cash,
            yatri_trip_count: self.yatri_trips,
            uber_deduction_applies: self.uber_deduction,
            online_payment_amount: self.online_payment_amount,
            fuel_costs: self.fuel_entries.iter().map(coerce).collect(),
            other_expenses: self.other_expenses,
            driver_withdrawal: self.driver_withdrawal,
            cash_given_to_accountant: self.cash_given,
        })
    }
}

// Response DTOs

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub driver: String,
    pub total_km: Option<f64>,
    pub raw_total_earnings: f64,
    pub uber_commission: f64,
    pub yatri_commission: f64,
    pub total_earnings: f64,
    pub total_fuel: f64,
    pub total_other_expenses: f64,
    pub total_cash_collected: f64,
    pub driver_pay: f64,
    pub driver_withdrawal: f64,
    pub paid_to_driver: f64,
    pub owner_profit: f64,
    pub cash_collection_total: f64,
    pub remaining_cash: f64,
    pub summary: String,
}

impl PaymentResponse {
    pub fn new(driver: &str, b: &PaymentBreakdown) -> Self {
        Self {
            driver: driver.to_string(),
            total_km: b.distance_km,
            raw_total_earnings: round2(b.raw_total_earnings),
            uber_commission: round2(b.uber_commission),
            yatri_commission: round2(b.yatri_commission),
            total_earnings: round2(b.total_earnings),
            total_fuel: round2(b.total_fuel),
            total_other_expenses: round2(b.total_other_expenses),
            total_cash_collected: round2(b.total_cash_collected),
            driver_pay: round2(b.driver_pay),
            driver_withdrawal: round2(b.driver_withdrawal),
            paid_to_driver: round2(b.paid_to_driver),
            owner_profit: round2(b.owner_profit),
            cash_collection_total: round2(b.cash_collection_total),
            remaining_cash: round2(b.remaining_cash),
            summary: format!(
                "Total Earnings: ₹{:.2} | Driver Pay: ₹{:.2} | Owner Profit: ₹{:.2} | Total Cash: ₹{:.2}",
                b.total_earnings, b.driver_pay, b.owner_profit, b.cash_collection_total
            ),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SaveTripResponse {
    pub record: TripRecord,
    pub payment: PaymentResponse,
    pub quota_used: Option<i64>,
    pub quota_cap: i64,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LatestRecordsResponse {
    pub records: Vec<TripRecord>,
    pub source: ReportSource,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn form_values_are_coerced() {
        let req: TripPaymentRequest = serde_json::from_value(json!({
            "driver": "Vivek Bali",
            "start_km": "12000",
            "end_km": "",
            "earnings": {"uber": "1000", "yatri": 200, "rapido": ""},
            "yatri_trips": "5",
            "uber_deduction": true,
            "fuel_entries": ["60", 40, "", "x"],
            "other_expenses": [{"label": "toll", "amount": "25"}],
            "driver_withdrawal": "",
            "cash_given": null
        }))
        .unwrap();

        let input = req.into_input(&Roster::default()).unwrap();
        assert_eq!(input.start_km, Some(12000.0));
        assert_eq!(input.end_km, None);
        assert_eq!(input.earnings.total(), 1200.0);
        assert_eq!(input.fuel_costs, vec![60.0, 40.0, 0.0, 0.0]);
        assert_eq!(input.other_expenses[0].amount, 25.0);
        assert_eq!(input.driver_withdrawal, None);
        assert_eq!(input.cash_given_to_accountant, 0.0);
        assert_eq!(input.yatri_trip_count, 5);
    }

    #[test]
    fn unknown_driver_is_rejected() {
        let req: TripPaymentRequest = serde_json::from_value(json!({"driver": "Nobody"})).unwrap();
        assert!(matches!(req.into_input(&Roster::default()), Err(AppError::ValidationError(_))));
    }
}
