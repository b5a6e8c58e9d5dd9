use crate::config::InstallmentConfig;
use crate::payment::value_objects::CardBrand;
use crate::ports::{Installment, InstallmentResolver};

// ============================================================================
// Config-Table Installment Resolver
// ============================================================================
//
// Builds the valid installment plans straight from the configured schedule:
// counts inside the interest-free window keep the base amount, later counts
// accrue the configured rate plus the incremental step per extra installment.
// Brandless cards are restricted to a single installment.
//
// ============================================================================

pub struct ConfigInstallmentResolver;

impl InstallmentResolver for ConfigInstallmentResolver {
    fn resolve_installments(
        &self,
        brand: CardBrand,
        amount: i64,
        config: &InstallmentConfig,
    ) -> Vec<Installment> {
        if brand == CardBrand::NoBrand {
            return vec![Installment { times: 1, total: amount }];
        }

        let mut table = Vec::with_capacity(config.max_installments as usize);
        for times in 1..=config.max_installments {
            let total = if times <= config.interest_free_installments {
                amount
            } else {
                let steps = i64::from(times - config.interest_free_installments);
                let rate_bps =
                    config.interest_rate_bps + config.incremental_interest_bps * (steps - 1);
                amount + amount * rate_bps / 10_000
            };
            table.push(Installment { times, total });
        }
        table
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
