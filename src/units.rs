use std::fmt::{Display, Formatter};

use ordered_float::OrderedFloat;
use serde::Deserialize;

/// Active power, the unit the cloud reports `acpower` and `feedinpower` in.
///
/// Feed-in power is negative when the house draws from the grid.
#[derive(Copy, Clone, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, derive_more::From)]
#[from(f64, OrderedFloat<f64>)]
#[must_use]
pub struct Watts(pub OrderedFloat<f64>);

impl Display for Watts {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.0} W", self.0)
    }
}

#[derive(Copy, Clone, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, derive_more::From)]
#[from(f64, OrderedFloat<f64>)]
#[must_use]
pub struct KilowattHours(pub OrderedFloat<f64>);

impl Display for KilowattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1} kWh", self.0)
    }
}
