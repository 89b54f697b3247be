use chrono::{Datelike, Duration, Local, NaiveDate};

pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date, matching what the fleet owner sees on their phone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// `DD/MM/YYYY`, the date format used in every sheet row.
pub fn sheet_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn parse_sheet_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%d/%m/%Y").ok()
}

/// `YYYY-M`, the month suffix of quota counter keys.
pub fn month_key(date: NaiveDate) -> String {
    format!("{}-{}", date.year(), date.month())
}

pub fn yesterday(date: NaiveDate) -> NaiveDate {
    date - Duration::days(1)
}

#[cfg(test)]
pub mod fixed {
    use std::sync::Mutex;
    use chrono::NaiveDate;
    use super::Clock;

    /// Test clock that only moves when told to.
    pub struct FixedClock {
        today: Mutex<NaiveDate>,
    }

    impl FixedClock {
        pub fn new(today: NaiveDate) -> Self {
            Self { today: Mutex::new(today) }
        }

        pub fn set(&self, today: NaiveDate) {
            *self.today.lock().unwrap() = today;
        }
    }

    impl Clock for FixedClock {
        fn today(&self) -> NaiveDate {
            *self.today.lock().unwrap()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_dates_are_day_first_and_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(sheet_date(date), "07/03/2026");
        assert_eq!(parse_sheet_date("07/03/2026"), Some(date));
        assert_eq!(parse_sheet_date("2026-03-07"), None);
        assert_eq!(parse_sheet_date(""), None);
    }

    #[test]
    fn month_key_is_unpadded() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
        assert_eq!(month_key(date), "2026-3");
        assert_eq!(sheet_date(yesterday(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())), "28/02/2026");
    }
}
