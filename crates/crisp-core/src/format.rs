// Tick value → glyph sequence.


use crate::atlas::{DECIMAL_SEPARATOR, EXPONENT, MINUS};

/// Longest glyph sequence a label may hold.
pub const MAX_GLYPHS: usize = 7;

/// Fractions closer than this to 0 or 1 are float noise, not digits.
const FRACTION_EPSILON: f64 = 1e-7;

/// Nudges the fraction up so digits like 0.3 (stored as 0.29999…) extract cleanly.
const FRACTION_BIAS: f64 = 1e-8;

/// Ordered glyph codes, every one drawn from [`crate::GLYPH_SET`].
pub type GlyphRun = Vec<char>;

/// Format `value` as at most [`MAX_GLYPHS`] glyphs.
///
/// The integer part is truncated, never rounded. Fraction digits stop as soon as
/// the remainder is negligible or the glyph budget is spent. Integers too long
/// for the budget switch to exponent form (`1,234e8`).
pub fn format_number(value: f64) -> GlyphRun {
    let mut run = GlyphRun::with_capacity(MAX_GLYPHS);

    if !value.is_finite() {
        log::warn!("Cannot format non-finite tick value {value}, drawing 0");
        run.push('0');
        return run;
    }

    let (int_part, frac_part) = split_folded(value.abs());

    if value < 0.0 && (int_part > 0.0 || frac_part > 0.0) {
        run.push(MINUS);
    }

    let integer_budget = (MAX_GLYPHS - run.len()) as i32;
    if int_part >= 10f64.powi(integer_budget) {
        push_exponent_form(&mut run, int_part, frac_part);
        return run;
    }

    push_integer_digits(&mut run, int_part as u64);
    if frac_part > 0.0 && run.len() + 2 <= MAX_GLYPHS {
        run.push(DECIMAL_SEPARATOR);
        push_fraction_digits(&mut run, frac_part, MAX_GLYPHS);
    }
    run
}

/// Split a non-negative value into integer and fraction parts, carrying a
/// fraction within [`FRACTION_EPSILON`] of 1 into the integer part.
///
/// The returned fraction is either 0 or below `1 - FRACTION_EPSILON`, so no
/// fraction digit can reach 10.
fn split_folded(magnitude: f64) -> (f64, f64) {
    let mut int_part = magnitude.trunc();
    let mut frac_part = magnitude - int_part;
    if frac_part < FRACTION_EPSILON {
        frac_part = 0.0;
    } else if 1.0 - frac_part < FRACTION_EPSILON {
        int_part += 1.0;
        frac_part = 0.0;
    }
    (int_part, frac_part)
}

/// Append the decimal digits of `int_part`, most significant first.
///
/// Digits come out least significant first and are reversed in place; the
/// range starts after anything already in `run`, so a leading sign stays put.
fn push_integer_digits(run: &mut GlyphRun, mut int_part: u64) {
    if int_part == 0 {
        run.push('0');
        return;
    }
    let start = run.len();
    while int_part > 0 {
        run.push(digit_glyph((int_part % 10) as u8));
        int_part /= 10;
    }
    run[start..].reverse();
}

/// Append fraction digits until the remainder is negligible or `run` reaches `limit`.
///
/// `fraction` must come from [`split_folded`]: with the bias added it stays
/// below 1, and every later remainder is below 1 by construction.
fn push_fraction_digits(run: &mut GlyphRun, fraction: f64, limit: usize) {
    debug_assert!(fraction + FRACTION_BIAS < 1.0);
    let mut remainder = fraction + FRACTION_BIAS;
    let mut threshold = FRACTION_EPSILON;
    while run.len() < limit {
        let scaled = remainder * 10.0;
        let digit = scaled.trunc();
        remainder = scaled - digit;
        run.push(digit_glyph(digit as u8));
        // Each step magnifies the accumulated error tenfold.
        threshold *= 10.0;
        if remainder < threshold {
            break;
        }
    }
}

/// Append `d,ddde<exponent>` for an already folded value of at least 10.
fn push_exponent_form(run: &mut GlyphRun, int_part: f64, frac_part: f64) {
    let mut exponent = int_part.log10().floor() as i32;
    let mut mantissa = (int_part + frac_part) / 10f64.powi(exponent);
    if mantissa >= 10.0 {
        exponent += 1;
        mantissa /= 10.0;
    } else if mantissa < 1.0 {
        exponent -= 1;
        mantissa *= 10.0;
    }

    let (mut lead, mut fraction) = split_folded(mantissa);
    // 9,99999999 folded up is 10: renormalize to 1e(N+1).
    if lead >= 10.0 {
        lead = 1.0;
        fraction = 0.0;
        exponent += 1;
    }

    let exponent_glyphs: Vec<char> = exponent.to_string().chars().collect();
    let mantissa_limit = MAX_GLYPHS - 1 - exponent_glyphs.len();

    run.push(digit_glyph(lead as u8));
    if fraction > 0.0 && run.len() + 2 <= mantissa_limit {
        run.push(DECIMAL_SEPARATOR);
        push_fraction_digits(run, fraction, mantissa_limit);
    }

    run.push(EXPONENT);
    run.extend(exponent_glyphs);
}

fn digit_glyph(digit: u8) -> char {
    char::from(b'0' + digit)
}
