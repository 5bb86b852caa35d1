//! Dimension normalisation: `"14 7/8"` → `"14.875"`.
//!
//! Values are held as exact rationals (`u128 / u128`) from parse to render.
//! Rounding is always toward +∞ at the configured decimal granularity, so a
//! rendered dimension is never smaller than what was written on the order
//! sheet: `10 1/3` at two places is `10.34`, not `10.33`.

use thiserror::Error;

/// Why a dimension string could not be turned into an exact value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DimensionError {
    #[error("zero denominator")]
    ZeroDenominator,
    #[error("'{0}' is not a number")]
    NotNumeric(String),
    #[error("value too large")]
    Overflow,
}

/// A non-negative exact rational dimension in inches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimension {
    numer: u128,
    denom: u128,
}

impl Dimension {
    /// Build from a whole part and an optional `N/D` fraction.
    pub fn from_parts(whole: &str, fraction: Option<&str>) -> Result<Self, DimensionError> {
        let whole = parse_uint(whole)?;
        let Some(fraction) = fraction else {
            return Ok(Self { numer: whole, denom: 1 });
        };

        let (n, d) = fraction
            .split_once('/')
            .ok_or_else(|| DimensionError::NotNumeric(fraction.to_string()))?;
        let n = parse_uint(n)?;
        let d = parse_uint(d)?;
        if d == 0 {
            return Err(DimensionError::ZeroDenominator);
        }

        // whole + n/d = (whole·d + n) / d
        let numer = whole
            .checked_mul(d)
            .and_then(|v| v.checked_add(n))
            .ok_or(DimensionError::Overflow)?;
        Ok(Self { numer, denom: d })
    }

    /// Parse any spelling the row grammars capture: `14`, `14 7/8`, `7/8`,
    /// `14.5`.
    pub fn parse(text: &str) -> Result<Self, DimensionError> {
        let text = text.trim();
        if let Some((whole, fraction)) = text.split_once(char::is_whitespace) {
            return Self::from_parts(whole, Some(fraction.trim()));
        }
        if text.contains('/') {
            return Self::from_parts("0", Some(text));
        }
        if let Some((int, frac)) = text.split_once('.') {
            let scale = u32::try_from(frac.len())
                .ok()
                .and_then(|len| 10u128.checked_pow(len))
                .ok_or(DimensionError::Overflow)?;
            let int = if int.is_empty() { 0 } else { parse_uint(int)? };
            let frac = parse_uint(frac)?;
            let numer = int
                .checked_mul(scale)
                .and_then(|v| v.checked_add(frac))
                .ok_or(DimensionError::Overflow)?;
            return Ok(Self { numer, denom: scale });
        }
        Self::from_parts(text, None)
    }

    /// The value in units of `10^-places`, rounded up.
    pub fn ceil_scaled(&self, places: u32) -> Result<u128, DimensionError> {
        let scale = 10u128.checked_pow(places).ok_or(DimensionError::Overflow)?;
        let scaled = self.numer.checked_mul(scale).ok_or(DimensionError::Overflow)?;
        Ok(scaled.div_ceil(self.denom))
    }

    /// Render with exactly `places` digits after the decimal point.
    pub fn render(&self, places: u32) -> Result<String, DimensionError> {
        let scaled = self.ceil_scaled(places)?;
        if places == 0 {
            return Ok(scaled.to_string());
        }
        let scale = 10u128.pow(places);
        Ok(format!(
            "{}.{:0width$}",
            scaled / scale,
            scaled % scale,
            width = places as usize
        ))
    }
}

/// Normalise a whole part plus optional fraction straight to its rendered form.
pub fn normalize(whole: &str, fraction: Option<&str>, places: u32) -> Result<String, DimensionError> {
    Dimension::from_parts(whole, fraction)?.render(places)
}

fn parse_uint(s: &str) -> Result<u128, DimensionError> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DimensionError::NotNumeric(s.to_string()));
    }
    // Cap the input at u64 so every later product stays inside u128.
    s.parse::<u64>()
        .map(u128::from)
        .map_err(|_| DimensionError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_and_fraction() {
        assert_eq!(normalize("14", Some("7/8"), 3).unwrap(), "14.875");
        assert_eq!(normalize("22", None, 3).unwrap(), "22.000");
    }

    #[test]
    fn test_rounds_up_not_nearest() {
        assert_eq!(normalize("10", Some("1/3"), 2).unwrap(), "10.34");
        assert_eq!(normalize("0", Some("2/3"), 3).unwrap(), "0.667");
        // 1/16 = 0.0625 → 0.07 at two places, half-even would give 0.06
        assert_eq!(normalize("0", Some("1/16"), 2).unwrap(), "0.07");
        assert_eq!(normalize("5", Some("1/1000"), 0).unwrap(), "6");
    }

    #[test]
    fn test_zero_precision_has_no_point() {
        assert_eq!(normalize("12", None, 0).unwrap(), "12");
        assert_eq!(normalize("12", Some("1/2"), 0).unwrap(), "13");
    }

    #[test]
    fn test_zero_denominator() {
        assert_eq!(
            normalize("14", Some("7/0"), 3),
            Err(DimensionError::ZeroDenominator)
        );
    }

    #[test]
    fn test_non_numeric_parts() {
        assert!(matches!(
            normalize("1a", None, 3),
            Err(DimensionError::NotNumeric(_))
        ));
        assert!(matches!(
            normalize("1", Some("3"), 3),
            Err(DimensionError::NotNumeric(_))
        ));
        assert!(matches!(
            normalize("1", Some("x/4"), 3),
            Err(DimensionError::NotNumeric(_))
        ));
    }

    #[test]
    fn test_overflow_is_an_error() {
        assert_eq!(
            normalize("99999999999999999999999", None, 3),
            Err(DimensionError::Overflow)
        );
    }

    #[test]
    fn test_parse_spellings() {
        assert_eq!(Dimension::parse("14 7/8").unwrap().render(3).unwrap(), "14.875");
        assert_eq!(Dimension::parse("7/8").unwrap().render(2).unwrap(), "0.88");
        assert_eq!(Dimension::parse("14.5").unwrap().render(3).unwrap(), "14.500");
        assert_eq!(Dimension::parse("14.8751").unwrap().render(3).unwrap(), "14.876");
        assert_eq!(Dimension::parse("24").unwrap().render(1).unwrap(), "24.0");
    }

    #[test]
    fn test_digit_count_for_each_precision() {
        for places in 0..=4u32 {
            for text in ["14 7/8", "10 1/3", "22", "3/16", "0"] {
                let rendered = Dimension::parse(text).unwrap().render(places).unwrap();
                let digits = rendered.split_once('.').map(|(_, f)| f.len()).unwrap_or(0);
                assert_eq!(digits, places as usize, "{text} @ {places} → {rendered}");
                assert_eq!(rendered.contains('.'), places > 0);
            }
        }
    }

    #[test]
    fn test_round_up_invariant() {
        // rendered ≥ exact and rendered − exact < one unit in the last place,
        // compared exactly: rendered·10^-p vs n/d  ⇔  scaled·d vs n·10^p
        for places in 0..=4u32 {
            let scale = 10u128.pow(places);
            for whole in [0u32, 1, 13, 47] {
                for denom in [2u32, 3, 4, 7, 8, 16, 32, 64] {
                    for numer in 0..denom {
                        let frac = format!("{numer}/{denom}");
                        let dim = Dimension::from_parts(&whole.to_string(), Some(&frac)).unwrap();
                        let scaled = dim.ceil_scaled(places).unwrap();

                        let rendered = dim.render(places).unwrap();
                        let reparsed = Dimension::parse(&rendered).unwrap();
                        assert_eq!(reparsed.ceil_scaled(places).unwrap(), scaled);

                        let exact_n = u128::from(whole) * u128::from(denom) + u128::from(numer);
                        let lhs = scaled * u128::from(denom);
                        let rhs = exact_n * scale;
                        assert!(lhs >= rhs, "{whole} {frac} @ {places}: {rendered} undersized");
                        assert!(
                            lhs - rhs < u128::from(denom),
                            "{whole} {frac} @ {places}: {rendered} more than one unit over"
                        );
                    }
                }
            }
        }
    }
}
