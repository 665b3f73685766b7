use std::fmt::{Display, Formatter};

use chrono::{DateTime, Local};

use crate::units::{KilowattHours, Watts};

/// One snapshot of the inverter metrics.
///
/// The cloud may omit any individual metric, hence the options. A new snapshot
/// always supersedes the previous one, they are never merged.
#[derive(Clone, Debug, PartialEq)]
pub struct Reading {
    pub ac_power: Option<Watts>,
    pub yield_today: Option<KilowattHours>,
    pub yield_total: Option<KilowattHours>,
    pub feed_in_power: Option<Watts>,
    pub fetched_at: DateTime<Local>,
}

impl Display for Reading {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        fn option<T: Display>(value: Option<&T>) -> String {
            value.map_or_else(|| "n/a".to_string(), ToString::to_string)
        }

        write!(
            f,
            "ac {}, today {}, total {}, feed-in {}",
            option(self.ac_power.as_ref()),
            option(self.yield_today.as_ref()),
            option(self.yield_total.as_ref()),
            option(self.feed_in_power.as_ref()),
        )
    }
}
