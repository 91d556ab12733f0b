use std::f64::consts::PI;

/// Speed of light in vacuum (m/s)
pub const C0: f64 = 299_792_458.0;

/// Free-space wave impedance used by the closed-form microstrip formulas (Ω)
pub const ETA0: f64 = 120.0 * PI;

/// Reference impedance of the measurement system (Ω)
pub const Z_REF: f64 = 50.0;

/// dB per neper
pub const DB_PER_NEPER: f64 = 8.686;
