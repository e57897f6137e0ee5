use chrono::{Local, NaiveDate};

/// Represents an entity responsible for telling what day it is. Only the command line edge asks
/// it; everything below receives the date as a parameter.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Sync + Send + 'static {
    fn today(&self) -> NaiveDate;
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
