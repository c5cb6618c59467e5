use super::Vec2;

/// WGS84 semi-major axis (meters), the sphere radius used by Web Mercator.
pub const WGS84_A: f64 = 6_378_137.0;

/// Latitude limit of the square Web Mercator world.
pub const MERCATOR_MAX_LAT_DEG: f64 = 85.051_128_779_806_6;

/// Projects WGS84 degrees to EPSG:3857 Pseudo-Mercator metres.
///
/// Latitudes are clamped to the Mercator limit so poles stay finite.
pub fn lon_lat_to_web_mercator(lon_deg: f64, lat_deg: f64) -> Vec2 {
    let lat = lat_deg.clamp(-MERCATOR_MAX_LAT_DEG, MERCATOR_MAX_LAT_DEG);
    let x = WGS84_A * lon_deg.to_radians();
    let y = WGS84_A * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    Vec2::new(x, y)
}
