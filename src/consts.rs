//! Shared numeric constants for the crate.

// ── Hex math ────────────────────────────────────────────────────

/// √3, the ratio between a pointy-top hex's width and its corner radius.
pub const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Angular step between adjacent hex corners, in degrees.
pub const CORNER_STEP_DEG: f64 = 60.0;

/// Rotation of corner 0 for pointy-topped hexes, in degrees.
pub const POINTY_TOP_OFFSET_DEG: f64 = -30.0;

// ── Defaults ────────────────────────────────────────────────────

/// Default tick interval of the host driver loop, in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 32;

/// Default application name when none is configured.
pub const DEFAULT_APPLICATION_NAME: &str = "MyApplication";

// ── Debug overlay ───────────────────────────────────────────────

/// Font used for region labels when `Config::debug` is set.
pub const DEBUG_LABEL_FONT: &str = "12px sans-serif";

/// Stroke color of region outlines when `Config::debug` is set.
pub const DEBUG_OUTLINE_COLOR: &str = "#ff00ff";
