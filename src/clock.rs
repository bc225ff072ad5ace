use chrono::{DateTime, Local};

/// A source of the current local time, read only when timestamps are on.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// The system wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock that always reports the same instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

impl<F> Clock for F
where
    F: Fn() -> DateTime<Local>,
{
    fn now(&self) -> DateTime<Local> {
        self()
    }
}
