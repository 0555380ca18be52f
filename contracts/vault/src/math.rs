use crate::error::Error;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Rounding {
    Down,
    Up,
}

/// Compute `a × b / denominator` with checked arithmetic
///
/// # Errors
/// - `MathOverflow` if the product overflows or the denominator is zero
pub fn mul_div(a: i128, b: i128, denominator: i128, rounding: Rounding) -> Result<i128, Error> {
    let product = a.checked_mul(b).ok_or(Error::MathOverflow)?;
    let quotient = product
        .checked_div(denominator)
        .ok_or(Error::MathOverflow)?;

    if rounding == Rounding::Up && product % denominator != 0 {
        return quotient.checked_add(1).ok_or(Error::MathOverflow);
    }
    Ok(quotient)
}

pub fn add(a: i128, b: i128) -> Result<i128, Error> {
    a.checked_add(b).ok_or(Error::MathOverflow)
}

pub fn sub(a: i128, b: i128) -> Result<i128, Error> {
    a.checked_sub(b).ok_or(Error::MathOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_div_rounding() {
        // 10 × 2 / 3 = 6.66..
        assert_eq!(mul_div(10, 2, 3, Rounding::Down), Ok(6));
        assert_eq!(mul_div(10, 2, 3, Rounding::Up), Ok(7));

        // Exact division never rounds up
        assert_eq!(mul_div(10, 3, 3, Rounding::Up), Ok(10));
    }

    #[test]
    fn test_mul_div_errors() {
        assert_eq!(mul_div(1, 1, 0, Rounding::Down), Err(Error::MathOverflow));
        assert_eq!(
            mul_div(i128::MAX, 2, 1, Rounding::Down),
            Err(Error::MathOverflow)
        );
    }

    #[test]
    fn test_checked_add_sub() {
        assert_eq!(add(1, 2), Ok(3));
        assert_eq!(sub(5, 7), Ok(-2));
        assert_eq!(add(i128::MAX, 1), Err(Error::MathOverflow));
    }
}
