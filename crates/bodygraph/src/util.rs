/// Normalize degrees to [0, 360).
pub fn normalize_degrees(value: f64) -> f64 {
    ((value % 360.0) + 360.0) % 360.0
}

/// Signed difference `to - from` folded into (-180, 180].
pub fn signed_delta(from: f64, to: f64) -> f64 {
    let diff = normalize_degrees(to - from);
    if diff > 180.0 {
        diff - 360.0
    } else {
        diff
    }
}

/// Unsigned angular separation in [0, 180].
pub fn angular_separation(lon1: f64, lon2: f64) -> f64 {
    signed_delta(lon1, lon2).abs()
}
