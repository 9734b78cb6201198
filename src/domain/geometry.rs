/// Small 2D vector helpers for the view layer.
///
/// Board coordinates are integers, but interpolated snake positions are
/// fractional, so everything here works on `(f32, f32)` pairs.

pub type Vec2 = (f32, f32);

pub fn sub(a: Vec2, b: Vec2) -> Vec2 {
    (a.0 - b.0, a.1 - b.1)
}

pub fn magnitude(v: Vec2) -> f32 {
    (v.0 * v.0 + v.1 * v.1).sqrt()
}

pub fn distance(a: Vec2, b: Vec2) -> f32 {
    magnitude(sub(a, b))
}

/// Unit vector in the direction of `v`. The zero vector stays zero.
pub fn normalize(v: Vec2) -> Vec2 {
    let m = magnitude(v);
    if m == 0.0 {
        (0.0, 0.0)
    } else {
        (v.0 / m, v.1 / m)
    }
}

/// Normalized `to - from`, truncated toward zero per axis.
///
/// Only exactly axis-aligned targets produce a non-zero component, so the
/// result equals a direction vector iff `to` lies straight ahead on that axis.
pub fn direction_vector_between(to: Vec2, from: Vec2) -> (i32, i32) {
    let (x, y) = normalize(sub(to, from));
    (x.trunc() as i32, y.trunc() as i32)
}

pub fn lerp(t: f32, a: f32, b: f32) -> f32 {
    (1.0 - t) * a + t * b
}

pub fn lerp_vector(t: f32, a: Vec2, b: Vec2) -> Vec2 {
    (lerp(t, a.0, b.0), lerp(t, a.1, b.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn distance_is_euclidean() {
        assert!(close(distance((0.0, 0.0), (3.0, 4.0)), 5.0));
        assert!(close(distance((2.0, 2.0), (2.0, 2.0)), 0.0));
    }

    #[test]
    fn normalize_keeps_zero() {
        assert_eq!(normalize((0.0, 0.0)), (0.0, 0.0));
        let (x, y) = normalize((0.0, -7.0));
        assert!(close(x, 0.0) && close(y, -1.0));
    }

    #[test]
    fn direction_between_axis_aligned_only() {
        assert_eq!(direction_vector_between((9.0, 7.0), (5.0, 7.0)), (1, 0));
        assert_eq!(direction_vector_between((5.0, 2.0), (5.0, 7.0)), (0, -1));
        // Diagonal offsets truncate to nothing
        assert_eq!(direction_vector_between((6.0, 8.0), (5.0, 7.0)), (0, 0));
        assert_eq!(direction_vector_between((5.0, 7.0), (5.0, 7.0)), (0, 0));
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        assert!(close(lerp(0.0, 2.0, 6.0), 2.0));
        assert!(close(lerp(1.0, 2.0, 6.0), 6.0));
        let (x, y) = lerp_vector(0.5, (4.0, 7.0), (5.0, 7.0));
        assert!(close(x, 4.5) && close(y, 7.0));
    }
}
