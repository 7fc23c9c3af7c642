//! Relógio usado só para escolher a saudação ("¡Buenos días!" etc.).
//!
//! O motor não mede tempo decorrido; a hora do dia entra por um [`Clock`]
//! injetável para que os testes não dependam do relógio da máquina.

use chrono::Timelike;

/// Período do dia para a saudação.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DayPeriod {
    /// 06:00 – 11:59
    Morning,
    /// 12:00 – 18:59
    Afternoon,
    /// 19:00 – 05:59
    Night,
}

impl DayPeriod {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => DayPeriod::Morning,
            12..=18 => DayPeriod::Afternoon,
            _ => DayPeriod::Night,
        }
    }
}

pub trait Clock: Send + Sync {
    /// Hora local, `0..24`.
    fn hour(&self) -> u32;

    fn day_period(&self) -> DayPeriod {
        DayPeriod::from_hour(self.hour())
    }
}

/// Hora local do sistema via `chrono`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn hour(&self) -> u32 {
        chrono::Local::now().hour()
    }
}

/// Hora fixa, para testes.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub u32);

impl Clock for FixedClock {
    fn hour(&self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_boundaries() {
        assert_eq!(DayPeriod::from_hour(5), DayPeriod::Night);
        assert_eq!(DayPeriod::from_hour(6), DayPeriod::Morning);
        assert_eq!(DayPeriod::from_hour(11), DayPeriod::Morning);
        assert_eq!(DayPeriod::from_hour(12), DayPeriod::Afternoon);
        assert_eq!(DayPeriod::from_hour(18), DayPeriod::Afternoon);
        assert_eq!(DayPeriod::from_hour(19), DayPeriod::Night);
        assert_eq!(DayPeriod::from_hour(0), DayPeriod::Night);
    }

    #[test]
    fn system_clock_hour_in_range() {
        assert!(SystemClock.hour() < 24);
    }
}
