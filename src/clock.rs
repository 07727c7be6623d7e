use std::sync::Arc;

use chrono::{ DateTime, FixedOffset, Utc };

/// Source of the current instant. Services take this instead of calling
/// `Utc::now()` so day boundaries and the withdrawal window can be pinned.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock plus the canonical business timezone.
#[derive(Clone)]
pub struct BusinessCalendar {
    clock: Arc<dyn Clock>,
    offset: FixedOffset,
}

impl BusinessCalendar {
    pub fn new(clock: Arc<dyn Clock>, offset: FixedOffset) -> Self {
        Self { clock, offset }
    }

    pub fn now_utc(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn now_local(&self) -> DateTime<FixedOffset> {
        self.clock.now().with_timezone(&self.offset)
    }

    /// `YYYY-MM-DD` in the business timezone, used for daily limits.
    pub fn today(&self) -> String {
        self.now_local().format("%Y-%m-%d").to_string()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FixedClock;
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_today_uses_business_offset() {
        // 03:00 UTC on the 2nd is still the 1st in Bogotá
        let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 2, 3, 0, 0).unwrap()));
        let bogota = FixedOffset::west_opt(5 * 3600).unwrap();
        let calendar = BusinessCalendar::new(clock.clone(), bogota);

        assert_eq!(calendar.today(), "2024-01-01");

        clock.set(Utc.with_ymd_and_hms(2024, 1, 2, 5, 0, 0).unwrap());
        assert_eq!(calendar.today(), "2024-01-02");
    }
}
