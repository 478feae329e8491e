use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Flat surcharge for each additional day past the planned return.
pub const LATE_RETURN_DAILY_SURCHARGE: Decimal = dec!(50.00);

/// Penalty rate on unused days of the seven-day plan.
const SHORT_PLAN_PENALTY_RATE: Decimal = dec!(0.20);
/// Penalty rate on unused days of every longer plan.
const LONG_PLAN_PENALTY_RATE: Decimal = dec!(0.40);

const SHORT_PLAN_DAYS: i32 = 7;

/// Prices a concluded rental from its planned and actual return dates.
#[derive(Debug, Clone, Copy, Default)]
pub struct RentalPriceCalculator;

impl RentalPriceCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Total price using the current instant for the late-return count.
    pub fn calculate_total(
        &self,
        planned_return_date: NaiveDate,
        actual_return_date: NaiveDate,
        daily_rate: Decimal,
        plan_days: i32,
    ) -> Decimal {
        self.calculate_total_at(
            Utc::now(),
            planned_return_date,
            actual_return_date,
            daily_rate,
            plan_days,
        )
    }

    /// Base price is the daily rate over the full plan. An early return
    /// refunds the unused days, then charges the plan's penalty rate on
    /// the refunded amount. A late return adds a flat surcharge per
    /// additional day.
    ///
    /// The late branch counts additional days by comparing each date's
    /// whole-day distance from `now` rather than subtracting the dates;
    /// when `now` falls between the planned and actual dates, the count
    /// comes out one short of the calendar gap.
    pub fn calculate_total_at(
        &self,
        now: DateTime<Utc>,
        planned_return_date: NaiveDate,
        actual_return_date: NaiveDate,
        daily_rate: Decimal,
        plan_days: i32,
    ) -> Decimal {
        let mut total = daily_rate * Decimal::from(plan_days);

        if actual_return_date < planned_return_date {
            let unfulfilled_days = (planned_return_date - actual_return_date).num_days();
            let penalty_rate = if plan_days == SHORT_PLAN_DAYS {
                SHORT_PLAN_PENALTY_RATE
            } else {
                LONG_PLAN_PENALTY_RATE
            };
            let unfulfilled_price = daily_rate * Decimal::from(unfulfilled_days);
            total = (total - unfulfilled_price) + unfulfilled_price * penalty_rate;
        } else if actual_return_date > planned_return_date {
            let planned_days = (midnight_utc(planned_return_date) - now).num_days();
            let actual_days = (midnight_utc(actual_return_date) - now).num_days();
            let additional_days = actual_days - planned_days;
            total += Decimal::from(additional_days) * LATE_RETURN_DAILY_SURCHARGE;
        }

        total.round_dp(2)
    }
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
