use crate::error::Error;
use crate::storage::{FeeConfig, MAX_BPS, SECONDS_PER_YEAR};

/// Fees and refunds owed on a report, before balance capping
///
/// Formula:
/// - fees = value × management_fee × elapsed / (MAX_BPS × year) + gain × performance_fee / MAX_BPS
/// - fees are capped at the gain and nothing is charged on a loss
/// - refunds = (gain + loss) × refund_ratio / MAX_BPS
pub fn assess(
    config: &FeeConfig,
    value: i128,
    gain: i128,
    loss: i128,
    elapsed: u64,
) -> Result<(i128, i128), Error> {
    let mut total_fees = 0;
    if gain > 0 {
        let management = value
            .checked_mul(config.management_fee as i128)
            .and_then(|v| v.checked_mul(elapsed as i128))
            .ok_or(Error::MathOverflow)?
            / (MAX_BPS * SECONDS_PER_YEAR as i128);
        let performance = gain
            .checked_mul(config.performance_fee as i128)
            .ok_or(Error::MathOverflow)?
            / MAX_BPS;
        total_fees = (management + performance).min(gain);
    }

    let total_refunds = gain
        .checked_add(loss)
        .and_then(|v| v.checked_mul(config.refund_ratio as i128))
        .ok_or(Error::MathOverflow)?
        / MAX_BPS;

    Ok((total_fees, total_refunds))
}

pub fn validate(config: &FeeConfig) -> Result<(), Error> {
    let max = MAX_BPS as u32;
    if config.management_fee > max || config.performance_fee > max || config.refund_ratio > max {
        return Err(Error::InvalidFee);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(management_fee: u32, performance_fee: u32, refund_ratio: u32) -> FeeConfig {
        FeeConfig {
            management_fee,
            performance_fee,
            refund_ratio,
        }
    }

    #[test]
    fn test_performance_fee_on_gain() {
        // 10% of 1_000 gain
        assert_eq!(assess(&config(0, 1_000, 0), 11_000, 1_000, 0, 0), Ok((100, 0)));
    }

    #[test]
    fn test_management_fee_over_a_year() {
        // 1% of 10_000 for a full year, plus 10% of 500
        let fees = assess(&config(100, 1_000, 0), 10_000, 500, 0, SECONDS_PER_YEAR);
        assert_eq!(fees, Ok((150, 0)));
    }

    #[test]
    fn test_fees_capped_at_gain() {
        let fees = assess(&config(10_000, 10_000, 0), 10_000, 50, 0, SECONDS_PER_YEAR);
        assert_eq!(fees, Ok((50, 0)));
    }

    #[test]
    fn test_no_fees_on_loss() {
        assert_eq!(assess(&config(100, 1_000, 0), 9_000, 0, 1_000, 1_000), Ok((0, 0)));
    }

    #[test]
    fn test_refund_ratio() {
        assert_eq!(assess(&config(0, 0, 5_000), 9_000, 0, 1_000, 0), Ok((0, 500)));
        assert_eq!(assess(&config(0, 0, 2_000), 11_000, 1_000, 0, 0), Ok((0, 200)));
    }

    #[test]
    fn test_validate() {
        assert_eq!(validate(&config(10_000, 10_000, 10_000)), Ok(()));
        assert_eq!(validate(&config(10_001, 0, 0)), Err(Error::InvalidFee));
        assert_eq!(validate(&config(0, 0, 10_001)), Err(Error::InvalidFee));
    }
}
