use serde::Deserialize;

use crate::units::{KilowattHours, Watts};

/// The `result` object of `getRealtimeInfo`.
///
/// The cloud omits whichever metrics the inverter did not report, so every
/// field is optional on its own: one missing key must not fail the fetch.
#[derive(Deserialize)]
pub struct RealTimeInfo {
    #[serde(rename = "acpower")]
    pub ac_power: Option<Watts>,

    #[serde(rename = "yieldtoday")]
    pub yield_today: Option<KilowattHours>,

    #[serde(rename = "yieldtotal")]
    pub yield_total: Option<KilowattHours>,

    #[serde(rename = "feedinpower")]
    pub feed_in_power: Option<Watts>,
}
