use std::fmt::Display;

use comfy_table::{Cell, CellAlignment, Table, modifiers, presets};

use crate::reading::Reading;

/// Format the cached reading as a chat message.
pub fn describe_reading(reading: Option<&Reading>) -> String {
    let Some(reading) = reading else {
        return "No data from the inverter yet, try again in a minute.".to_string();
    };
    format!(
        "📊 Inverter data:\n⚡ Power: {}\n☀️ Today: {}\n🔋 Total: {}\n🔌 Feed-in: {}",
        option(reading.ac_power.as_ref()),
        option(reading.yield_today.as_ref()),
        option(reading.yield_total.as_ref()),
        option(reading.feed_in_power.as_ref()),
    )
}

pub fn build_reading_table(reading: &Reading) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec!["Metric", "Value"]);
    for (metric, value) in [
        ("AC power", option(reading.ac_power.as_ref())),
        ("Yield today", option(reading.yield_today.as_ref())),
        ("Yield total", option(reading.yield_total.as_ref())),
        ("Feed-in power", option(reading.feed_in_power.as_ref())),
        ("Fetched at", reading.fetched_at.format("%H:%M:%S").to_string()),
    ] {
        table.add_row(vec![
            Cell::new(metric),
            Cell::new(value).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

fn option<T: Display>(value: Option<&T>) -> String {
    value.map_or_else(|| "n/a".to_string(), ToString::to_string)
}
