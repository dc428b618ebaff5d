//! Reference events bundled with the library.
//!
//! Masses are catalog medians; reference spins are zero for every event.

use crate::events::EventTable;

/// Names of the bundled events in display order.
pub static FACTORY_EVENT_NAMES: &[&str] = &[
    "GW150914", "GW190521", "GW200129", "GW200224", "GW200311", "GW191109", "GW190828", "GW190519",
];

/// Bundled event table, embedded at compile time.
const FACTORY_EVENTS_TOML: &str = r#"
[[events]]
name = "GW150914"
gps_time = 1126259462.4
mass1 = 34.6
mass2 = 30.0

[[events]]
name = "GW190521"
gps_time = 1242459857.4
mass1 = 43.4
mass2 = 33.4

[[events]]
name = "GW200129"
gps_time = 1264316116.4
mass1 = 35.5
mass2 = 29.0

[[events]]
name = "GW200224"
gps_time = 1266618172.4
mass1 = 40.0
mass2 = 32.5

[[events]]
name = "GW200311"
gps_time = 1267963151.3
mass1 = 34.2
mass2 = 27.7

[[events]]
name = "GW191109"
gps_time = 1257296855.2
mass1 = 65.0
mass2 = 47.0

[[events]]
name = "GW190828"
gps_time = 1251009263.7
mass1 = 32.1
mass2 = 26.2

[[events]]
name = "GW190519"
gps_time = 1242315362.3
mass1 = 66.0
mass2 = 40.5
"#;

/// The bundled event table.
///
/// Returns an empty table only if the embedded TOML fails to parse, which
/// the tests rule out.
pub fn factory_events() -> EventTable {
    EventTable::from_toml(FACTORY_EVENTS_TOML).unwrap_or_default()
}

/// Whether `name` is a bundled event (case-insensitive).
pub fn is_factory_event(name: &str) -> bool {
    FACTORY_EVENT_NAMES.iter().any(|n| n.eq_ignore_ascii_case(name))
}
