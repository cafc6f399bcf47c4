use chrono::{Local, NaiveDate};

/// Source of "today" for the usage gate.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local calendar day of the machine running the client.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate { Local::now().date_naive() }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate { (**self).today() }
}
