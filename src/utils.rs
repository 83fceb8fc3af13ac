use mapproj::LonLat;

/// Great-circle distance between two (lon, lat) positions given in radians.
/// The result is in radians.
pub fn angular_dist(a: &LonLat, b: &LonLat) -> f64 {
    a.haversine_dist(b)
}

/// Round `x` to `decimals` digits after the point
pub fn round_to(x: f64, decimals: i32) -> f64 {
    let f = 10.0_f64.powi(decimals);
    (x * f).round() / f
}
