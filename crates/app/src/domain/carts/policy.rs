//! Shipping pricing policy.

use serde::{Deserialize, Serialize};

/// Flat shipping policy: free at or above a subtotal threshold, a fixed fee
/// otherwise. Amounts are minor currency units. This is a pricing constant,
/// not carrier data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingPolicy {
    /// Subtotal at which shipping becomes free.
    pub free_threshold: u64,
    /// Fee charged below the threshold.
    pub flat_fee: u64,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            free_threshold: 60_00,
            flat_fee: 7_90,
        }
    }
}

impl ShippingPolicy {
    /// The shipping fee for the given subtotal.
    #[must_use]
    pub fn fee(&self, subtotal: u64) -> u64 {
        if subtotal >= self.free_threshold {
            0
        } else {
            self.flat_fee
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fee_below_threshold_is_flat() {
        let policy = ShippingPolicy::default();

        assert_eq!(policy.fee(59_99), 7_90);
        assert_eq!(policy.fee(0), 7_90);
    }

    #[test]
    fn fee_at_and_above_threshold_is_zero() {
        let policy = ShippingPolicy::default();

        assert_eq!(policy.fee(60_00), 0);
        assert_eq!(policy.fee(120_00), 0);
    }

    #[test]
    fn policy_is_configurable() {
        let policy = ShippingPolicy {
            free_threshold: 100_00,
            flat_fee: 4_50,
        };

        assert_eq!(policy.fee(99_99), 4_50);
        assert_eq!(policy.fee(100_00), 0);
    }
}
