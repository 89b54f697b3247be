use serde::Serialize;
use crate::models::driver::PayoutStrategy;
use crate::models::trip::{TripInput, TripRecord};

/// Flat amount charged when the Uber deduction applies.
pub const UBER_COMMISSION: f64 = 117.0;
/// Charged per Yatri Sathi trip, only when Yatri earned something.
pub const YATRI_COMMISSION_PER_TRIP: f64 = 10.0;

/// Result of one payout calculation. Values are unrounded; rounding to two
/// decimals happens when they are shown or written to the sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentBreakdown {
    pub distance_km: Option<f64>,
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
}

pub fn compute(input: &TripInput) -> PaymentBreakdown {
    let raw_total_earnings = input.earnings.total();

    let uber_commission = if input.uber_deduction_applies { UBER_COMMISSION } else { 0.0 };
    let yatri_commission = if input.earnings.yatri > 0.0 {
        input.yatri_trip_count as f64 * YATRI_COMMISSION_PER_TRIP
    } else {
        0.0
    };

    let total_earnings = raw_total_earnings - uber_commission - yatri_commission;
    let total_fuel: f64 = input.fuel_costs.iter().sum();
    let total_other_expenses: f64 = input.other_expenses.iter().map(|e| e.amount).sum();
    let total_cash_collected = input.cash.total();

    let (driver_pay, owner_profit, cash_collection_total) = match input.driver.strategy {
        PayoutStrategy::FixedSplit => {
            let driver_pay = (total_earnings - total_fuel) / 2.0;
            // Uber commission is added back to the cash figure on this branch only
            let cash = total_cash_collected - total_fuel - input.online_payment_amount + uber_commission;
            (driver_pay, driver_pay, cash)
        }
        PayoutStrategy::PercentShare { share } => {
            let driver_pay = total_earnings * share;
            let owner_profit = total_earnings - total_fuel - total_other_expenses - driver_pay;
            let cash = total_cash_collected - total_fuel - input.online_payment_amount - driver_pay;
            (driver_pay, owner_profit, cash)
        }
    };

    let driver_withdrawal = match input.driver_withdrawal {
        Some(amount) if input.driver.withdrawal_allowed => amount,
        _ => 0.0,
    };

    let remaining_cash = cash_collection_total - input.cash_given_to_accountant - driver_withdrawal;

    PaymentBreakdown {
        distance_km: input.distance(),
        raw_total_earnings,
        uber_commission,
        yatri_commission,
        total_earnings,
        total_fuel,
        total_other_expenses,
        total_cash_collected,
        driver_pay,
        driver_withdrawal,
        paid_to_driver: driver_pay - driver_withdrawal,
        owner_profit,
        cash_collection_total,
        remaining_cash,
    }
}

/// Builds the sheet row for a computed trip. `driver_pay` is the earned
/// figure; any withdrawal goes in its own column.
pub fn to_record(input: &TripInput, breakdown: &PaymentBreakdown, date: String) -> TripRecord {
    TripRecord {
        date,
        driver: input.driver.name.clone(),
        km: breakdown.distance_km,
        earnings: breakdown.raw_total_earnings,
        cash_collected: breakdown.total_cash_collected,
        fuel: breakdown.total_fuel,
        uber_commission: breakdown.uber_commission,
        yatri_commission: breakdown.yatri_commission,
        other_expenses: breakdown.total_other_expenses,
        driver_pay: breakdown.driver_pay,
        driver_withdrawal: breakdown.driver_withdrawal,
        owner_profit: breakdown.owner_profit,
        remaining_cash: breakdown.remaining_cash,
    }
}
