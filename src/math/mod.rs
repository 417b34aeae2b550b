//! Numerical kernels: standard-normal distribution helpers and a bracketed
//! root finder.

pub mod timeseries;

/// Errors from the numerical-method layer.
#[derive(Debug, Clone, PartialEq)]
pub enum MathError {
    /// The objective does not change sign across the supplied bracket.
    NoBracket,
    /// Iteration budget exhausted before reaching tolerance.
    NonConvergence,
    /// Structural misuse of the routine.
    InvalidInput(&'static str),
}

impl std::fmt::Display for MathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoBracket => write!(f, "root is not bracketed"),
            Self::NonConvergence => write!(f, "iteration did not converge"),
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
        }
    }
}

impl std::error::Error for MathError {}

/// Standard-normal probability density.
pub fn normal_pdf(x: f64) -> f64 {
    const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;
    INV_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Standard-normal cumulative distribution.
pub fn normal_cdf(x: f64) -> f64 {
    // Abramowitz & Stegun 7.1.26
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.231_641_9 * z);
    let poly = t
        * (0.319_381_530
            + t * (-0.356_563_782
                + t * (1.781_477_937 + t * (-1.821_255_978 + t * 1.330_274_429))));
    let approx = 1.0 - normal_pdf(z) * poly;
    if x >= 0.0 { approx } else { 1.0 - approx }
}

/// Brent's bracketed root finder.
///
/// Combines inverse-quadratic interpolation, the secant step, and a
/// bisection safeguard; requires `f(a)` and `f(b)` to have opposite signs.
/// Termination is by bracket width against `tol` plus machine epsilon.
///
/// # Errors
/// - [`MathError::NoBracket`] when the objective does not change sign over
///   `[a, b]` (or is non-finite at either endpoint).
/// - [`MathError::NonConvergence`] when `max_iter` is exhausted.
/// - [`MathError::InvalidInput`] for non-positive tolerance or zero budget.
pub fn brent<F>(f: F, a: f64, b: f64, tol: f64, max_iter: usize) -> Result<f64, MathError>
where
    F: Fn(f64) -> f64,
{
    if !(tol > 0.0) {
        return Err(MathError::InvalidInput("tol must be positive"));
    }
    if max_iter == 0 {
        return Err(MathError::InvalidInput("max_iter must be > 0"));
    }

    let mut a = a;
    let mut b = b;
    let mut fa = f(a);
    let mut fb = f(b);

    if !fa.is_finite() || !fb.is_finite() {
        return Err(MathError::NoBracket);
    }
    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }
    if fa * fb > 0.0 {
        return Err(MathError::NoBracket);
    }

    let mut c = a;
    let mut fc = fa;
    let mut d = b - a;
    let mut e = d;

    for _ in 0..max_iter {
        if fb * fc > 0.0 {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol1 = 2.0 * f64::EPSILON * b.abs() + 0.5 * tol;
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol1 || fb == 0.0 {
            return Ok(b);
        }

        if e.abs() >= tol1 && fa.abs() > fb.abs() {
            // Interpolation is worth attempting.
            let s = fb / fa;
            let (mut p, mut q);
            if a == c {
                p = 2.0 * xm * s;
                q = 1.0 - s;
            } else {
                let q0 = fa / fc;
                let r = fb / fc;
                p = s * (2.0 * xm * q0 * (q0 - r) - (b - a) * (r - 1.0));
                q = (q0 - 1.0) * (r - 1.0) * (s - 1.0);
            }
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();
            let min1 = 3.0 * xm * q - (tol1 * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }

        a = b;
        fa = fb;
        if d.abs() > tol1 {
            b += d;
        } else {
            b += tol1.copysign(xm);
        }
        fb = f(b);
        if !fb.is_finite() {
            return Err(MathError::NonConvergence);
        }
    }

    Err(MathError::NonConvergence)
}
