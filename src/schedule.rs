//! Weekly withdrawal window: which weekdays and between which clock times
//! withdrawal requests are accepted.

use chrono::{ Datelike, NaiveDateTime, NaiveTime, Weekday };
use serde::Serialize;

use crate::db::entity::withdrawal_config;
use crate::error::{ AppError, Result };

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WindowStatus {
    Open,
    /// Today is not an allowed weekday.
    ClosedToday,
    /// Allowed day, before opening time.
    OpensIn {
        hours: i64,
        minutes: i64,
    },
    /// Allowed day, after closing time.
    FinishedForToday,
}

impl WindowStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, WindowStatus::Open)
    }

    pub fn message(&self) -> &'static str {
        match self {
            WindowStatus::Open => "Withdrawals are open.",
            WindowStatus::ClosedToday => "Withdrawals are not available today.",
            WindowStatus::OpensIn { .. } => "Withdrawals open in:",
            WindowStatus::FinishedForToday => "Withdrawals have finished for today.",
        }
    }

    /// `"{h}h {m}m"` until opening, only while waiting for today's opening.
    pub fn remaining_time(&self) -> Option<String> {
        match self {
            WindowStatus::OpensIn { hours, minutes } => Some(format!("{}h {}m", hours, minutes)),
            _ => None,
        }
    }

    /// Message with the countdown appended when there is one.
    pub fn describe(&self) -> String {
        match self.remaining_time() {
            Some(remaining) => format!("{} {}", self.message(), remaining),
            None => self.message().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalWindow {
    allowed_days: Vec<Weekday>,
    opens_at: NaiveTime,
    closes_at: NaiveTime,
}

impl WithdrawalWindow {
    pub fn new(allowed_days: Vec<Weekday>, opens_at: NaiveTime, closes_at: NaiveTime) -> Self {
        Self {
            allowed_days,
            opens_at,
            closes_at,
        }
    }

    pub fn from_config(config: &withdrawal_config::Model) -> Result<Self> {
        let allowed_days = config.allowed_days
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| {
                parse_weekday(name).ok_or_else(||
                    AppError::Config(format!("Unknown weekday in withdrawal config: {}", name))
                )
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(allowed_days, parse_clock_time(&config.start_time)?, parse_clock_time(&config.end_time)?))
    }

    pub fn allowed_days(&self) -> &[Weekday] {
        &self.allowed_days
    }

    pub fn opens_at(&self) -> NaiveTime {
        self.opens_at
    }

    pub fn closes_at(&self) -> NaiveTime {
        self.closes_at
    }

    /// Status at a wall-clock time in the business timezone. The opening
    /// and closing instants themselves count as open.
    pub fn evaluate(&self, local_now: NaiveDateTime) -> WindowStatus {
        if !self.allowed_days.contains(&local_now.weekday()) {
            return WindowStatus::ClosedToday;
        }

        let opens = local_now.date().and_time(self.opens_at);
        if local_now < opens {
            let remaining = opens - local_now;
            return WindowStatus::OpensIn {
                hours: remaining.num_hours(),
                minutes: remaining.num_minutes() % 60,
            };
        }

        let closes = local_now.date().and_time(self.closes_at);
        if local_now > closes {
            return WindowStatus::FinishedForToday;
        }

        WindowStatus::Open
    }
}

/// `HH:MM`, 24-hour.
pub fn parse_clock_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_|
        AppError::Config(format!("Invalid time of day '{}', expected HH:MM", value))
    )
}

/// Accepts the Spanish names the admin panel stores (with or without
/// accents) and English names.
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    let normalized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            _ => c,
        })
        .collect();

    match normalized.as_str() {
        "lunes" | "monday" => Some(Weekday::Mon),
        "martes" | "tuesday" => Some(Weekday::Tue),
        "miercoles" | "wednesday" => Some(Weekday::Wed),
        "jueves" | "thursday" => Some(Weekday::Thu),
        "viernes" | "friday" => Some(Weekday::Fri),
        "sabado" | "saturday" => Some(Weekday::Sat),
        "domingo" | "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Spanish label, as the admin panel writes it.
pub fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Lunes",
        Weekday::Tue => "Martes",
        Weekday::Wed => "Miércoles",
        Weekday::Thu => "Jueves",
        Weekday::Fri => "Viernes",
        Weekday::Sat => "Sábado",
        Weekday::Sun => "Domingo",
    }
}
