//! Closed-form real root finders for polynomials up to degree four.
//!
//! Coefficients are given lowest order first: `c[0] + c[1]·x + c[2]·x² + ...`.
//! The quartic solver reduces to a depressed quartic, solves its resolvent
//! cubic and splits into two quadratics (Ferrari's method). Everything runs in
//! f64; torus intersections lose too much precision in f32.

use std::f64::consts::PI;

const EQN_EPS: f64 = 1e-9;

#[inline]
fn is_zero(x: f64) -> bool {
    x.abs() < EQN_EPS
}

/// Up to four real roots, unordered.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Roots {
    values: [f64; 4],
    len: usize,
}

impl Roots {
    fn push(&mut self, x: f64) {
        if self.len < self.values.len() {
            self.values[self.len] = x;
            self.len += 1;
        }
    }

    fn extend(&mut self, other: Roots) {
        for &x in other.as_slice() {
            self.push(x);
        }
    }

    fn shift(&mut self, offset: f64) {
        for x in &mut self.values[..self.len] {
            *x += offset;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values[..self.len]
    }

    /// Smallest root strictly greater than `min`.
    pub fn smallest_above(&self, min: f64) -> Option<f64> {
        self.as_slice()
            .iter()
            .copied()
            .filter(|&x| x > min)
            .fold(None, |best, x| match best {
                Some(b) if b <= x => Some(b),
                _ => Some(x),
            })
    }
}

/// Solve `c[2]·x² + c[1]·x + c[0] = 0`.
pub fn solve_quadratic(c: [f64; 3]) -> Roots {
    let mut roots = Roots::default();
    if is_zero(c[2]) {
        if !is_zero(c[1]) {
            roots.push(-c[0] / c[1]);
        }
        return roots;
    }

    // normal form: x^2 + px + q = 0
    let p = c[1] / (2.0 * c[2]);
    let q = c[0] / c[2];
    let d = p * p - q;

    if is_zero(d) {
        roots.push(-p);
    } else if d > 0.0 {
        let sqrt_d = d.sqrt();
        roots.push(sqrt_d - p);
        roots.push(-sqrt_d - p);
    }
    roots
}

/// Solve `c[3]·x³ + c[2]·x² + c[1]·x + c[0] = 0`.
pub fn solve_cubic(c: [f64; 4]) -> Roots {
    if is_zero(c[3]) {
        return solve_quadratic([c[0], c[1], c[2]]);
    }

    // normal form: x^3 + Ax^2 + Bx + C = 0
    let a = c[2] / c[3];
    let b = c[1] / c[3];
    let cc = c[0] / c[3];

    // substitute x = y - A/3 to eliminate the quadric term: y^3 + 3py + 2q = 0
    let sq_a = a * a;
    let p = (-sq_a / 3.0 + b) / 3.0;
    let q = (2.0 / 27.0 * a * sq_a - a * b / 3.0 + cc) / 2.0;

    // use Cardano's formula
    let cb_p = p * p * p;
    let d = q * q + cb_p;

    let mut roots = Roots::default();
    if is_zero(d) {
        if is_zero(q) {
            // one triple solution
            roots.push(0.0);
        } else {
            // one single and one double solution
            let u = (-q).cbrt();
            roots.push(2.0 * u);
            roots.push(-u);
        }
    } else if d < 0.0 {
        // casus irreducibilis: three real solutions
        let phi = (-q / (-cb_p).sqrt()).clamp(-1.0, 1.0).acos() / 3.0;
        let t = 2.0 * (-p).sqrt();
        roots.push(t * phi.cos());
        roots.push(-t * (phi + PI / 3.0).cos());
        roots.push(-t * (phi - PI / 3.0).cos());
    } else {
        // one real solution
        let sqrt_d = d.sqrt();
        let u = (sqrt_d - q).cbrt();
        let v = -(sqrt_d + q).cbrt();
        roots.push(u + v);
    }

    roots.shift(-a / 3.0);
    roots
}

/// Solve `c[4]·x⁴ + c[3]·x³ + c[2]·x² + c[1]·x + c[0] = 0`.
pub fn solve_quartic(c: [f64; 5]) -> Roots {
    if is_zero(c[4]) {
        return solve_cubic([c[0], c[1], c[2], c[3]]);
    }

    // normal form: x^4 + Ax^3 + Bx^2 + Cx + D = 0
    let a = c[3] / c[4];
    let b = c[2] / c[4];
    let cc = c[1] / c[4];
    let d = c[0] / c[4];

    // substitute x = y - A/4 to eliminate the cubic term: y^4 + py^2 + qy + r = 0
    let sq_a = a * a;
    let p = -3.0 / 8.0 * sq_a + b;
    let q = sq_a * a / 8.0 - a * b / 2.0 + cc;
    let r = -3.0 / 256.0 * sq_a * sq_a + sq_a * b / 16.0 - a * cc / 4.0 + d;

    let mut roots = Roots::default();
    if is_zero(r) {
        // no absolute term: y(y^3 + py + q) = 0
        roots.extend(solve_cubic([q, p, 0.0, 1.0]));
        roots.push(0.0);
    } else {
        // solve the resolvent cubic and take its first real root
        let resolvent = solve_cubic([r * p / 2.0 - q * q / 8.0, -r, -p / 2.0, 1.0]);
        let Some(&z) = resolvent.as_slice().first() else {
            return roots;
        };

        // build two quadratic equations from it
        let u = z * z - r;
        let v = 2.0 * z - p;

        let u = if is_zero(u) {
            0.0
        } else if u > 0.0 {
            u.sqrt()
        } else {
            return roots;
        };
        let v = if is_zero(v) {
            0.0
        } else if v > 0.0 {
            v.sqrt()
        } else {
            return roots;
        };

        let sign = if q < 0.0 { -1.0 } else { 1.0 };
        roots.extend(solve_quadratic([z - u, sign * v, 1.0]));
        roots.extend(solve_quadratic([z + u, -sign * v, 1.0]));
    }

    roots.shift(-a / 4.0);
    roots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(roots: Roots) -> Vec<f64> {
        let mut v = roots.as_slice().to_vec();
        v.sort_by(|a, b| a.partial_cmp(b).unwrap());
        v
    }

    fn assert_roots(actual: Roots, expected: &[f64]) {
        let actual = sorted(actual);
        assert_eq!(actual.len(), expected.len(), "roots: {:?}", actual);
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-6, "got {} expected {}", a, e);
        }
    }

    #[test]
    fn test_quadratic() {
        // (x - 1)(x - 3) = x^2 - 4x + 3
        assert_roots(solve_quadratic([3.0, -4.0, 1.0]), &[1.0, 3.0]);
        // double root at 2
        assert_roots(solve_quadratic([4.0, -4.0, 1.0]), &[2.0]);
        // no real roots
        assert!(solve_quadratic([1.0, 0.0, 1.0]).is_empty());
    }

    #[test]
    fn test_cubic() {
        // (x - 1)(x - 2)(x - 3) = x^3 - 6x^2 + 11x - 6
        assert_roots(solve_cubic([-6.0, 11.0, -6.0, 1.0]), &[1.0, 2.0, 3.0]);
        // x^3 - 8 has the single real root 2
        assert_roots(solve_cubic([-8.0, 0.0, 0.0, 1.0]), &[2.0]);
    }

    #[test]
    fn test_quartic_four_roots() {
        // (x - 1)(x - 2)(x - 3)(x - 4) = x^4 - 10x^3 + 35x^2 - 50x + 24
        let roots = solve_quartic([24.0, -50.0, 35.0, -10.0, 1.0]);
        assert_roots(roots, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(roots.smallest_above(1.5), Some(2.0));
    }

    #[test]
    fn test_quartic_biquadratic() {
        // (x^2 - 1)(x^2 - 4) = x^4 - 5x^2 + 4
        assert_roots(solve_quartic([4.0, 0.0, -5.0, 0.0, 1.0]), &[-2.0, -1.0, 1.0, 2.0]);
    }

    #[test]
    fn test_quartic_no_real_roots() {
        // x^4 + 1
        assert!(solve_quartic([1.0, 0.0, 0.0, 0.0, 1.0]).is_empty());
    }

    #[test]
    fn test_smallest_above_ignores_non_positive() {
        let roots = solve_quartic([4.0, 0.0, -5.0, 0.0, 1.0]);
        assert_eq!(roots.smallest_above(0.0), Some(1.0));
        assert_eq!(roots.smallest_above(5.0), None);
    }
}
