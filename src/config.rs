use crate::placement::ShipSpec;

pub const DEFAULT_WIDTH: usize = 10;
pub const DEFAULT_HEIGHT: usize = 10;

/// Standard fleet: one carrier, one battleship, two cruisers, one destroyer.
pub const DEFAULT_FLEET: [ShipSpec; 4] = [
    ShipSpec::new(1, 5),
    ShipSpec::new(1, 4),
    ShipSpec::new(2, 3),
    ShipSpec::new(1, 2),
];

/// Number of times random placement may wipe the board and start over before
/// the fleet is reported as unplaceable.
pub const MAX_PLACEMENT_RESTARTS: usize = 10_000;

/// Save slots kept by a snapshot store when none is configured.
pub const DEFAULT_MAX_SAVES: usize = 10;

/// Environment variable holding the log level filter.
pub const LOG_ENV: &str = "BATTLESHIPS_LOG";

/// Jitter radius used by the hard opponent: half the larger board dimension.
pub fn hard_radius(width: usize, height: usize) -> i32 {
    (width.max(height) / 2) as i32
}

/// Total number of spaces occupied by a fleet.
pub fn fleet_area(fleet: &[ShipSpec]) -> usize {
    fleet.iter().map(ShipSpec::area).sum()
}
