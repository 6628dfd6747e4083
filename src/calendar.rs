use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Marks which calendar dates carry a demand boost.
pub trait HolidayCalendar: Send + Sync {
    fn is_holiday(&self, date: NaiveDate) -> bool;
}

/// Major US retail demand spikes: New Year's Day, Independence Day,
/// Christmas Day, Thanksgiving, Black Friday and Cyber Monday.
#[derive(Debug, Default, Clone, Copy)]
pub struct UsRetailCalendar;

impl UsRetailCalendar {
    fn thanksgiving(year: i32) -> Option<NaiveDate> {
        // Fourth Thursday of November.
        NaiveDate::from_weekday_of_month_opt(year, 11, Weekday::Thu, 4)
    }
}

impl HolidayCalendar for UsRetailCalendar {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        if matches!((date.month(), date.day()), (1, 1) | (7, 4) | (12, 25)) {
            return true;
        }

        if let Some(thanksgiving) = Self::thanksgiving(date.year()) {
            if date == thanksgiving {
                return true;
            }
            // Black Friday and Cyber Monday trail Thanksgiving.
            if date == thanksgiving + Duration::days(1) || date == thanksgiving + Duration::days(4)
            {
                return true;
            }
        }
        false
    }
}

/// Calendar with no holidays, for markets where seasonal spikes do not apply.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHolidays;

impl HolidayCalendar for NoHolidays {
    fn is_holiday(&self, _date: NaiveDate) -> bool {
        false
    }
}
