use std::f64::consts::TAU;

/// Reduce an angle into `[0, 2π)`
///
/// Euclidean remainder, so negative angles wrap from the top of the range
/// and large angles reduce exactly.
pub fn wrap_angle(theta: f64) -> f64 {
    let wrapped = theta.rem_euclid(TAU);
    // tiny negative inputs round up to exactly 2π
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}
