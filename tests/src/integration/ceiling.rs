//! # Spend Ceiling and Quote Freshness
//!
//! On the oracle-priced path an undiscounted estimate is checked against the
//! caller's ceiling before the funding source is split, and a quote older than the
//! configured age is refused before anything is registered.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ns_registration::{
        AttemptState, MockClock, MockPriceService, OperationKind, RecordingSubmitter,
        RegistrationApi, RegistrationError,
    };

    use crate::fixtures::{
        alice_base, bob_usdc, oracle, price_update, service, service_with, NOW, USDC,
    };

    use OperationKind::*;

    #[tokio::test]
    async fn test_estimate_above_ceiling_aborts_before_split() {
        let (service, _, _) = service();
        let mut attempt = service.begin(bob_usdc().with_max_spend(999 * USDC)).unwrap();

        let err = attempt
            .compose(&oracle(), &MockClock::at(NOW))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            RegistrationError::PriceCeilingExceeded {
                estimated: 1_000 * USDC,
                ceiling: 999 * USDC,
            }
        );
        assert_eq!(attempt.state(), AttemptState::Aborted);
        assert_eq!(
            attempt.context().kinds(),
            vec![InitRegistration, CalculatePrice, RegisterPriceUpdate, ConvertPrice]
        );
    }

    #[tokio::test]
    async fn test_estimate_equal_to_ceiling_settles() {
        let (service, _, _) = service();

        let tx = service
            .compose(bob_usdc().with_max_spend(1_000 * USDC))
            .await
            .unwrap();

        assert!(tx.kinds().contains(&SettleOracle));
    }

    #[tokio::test]
    async fn test_price_drop_pushes_estimate_over_default_ceiling() {
        // USDC at $0.50 doubles the spend to 2000 USDC
        let oracle = MockPriceService::new().with_update(price_update("USDC/USD", 50_000_000, -8, NOW));
        let submitter = Arc::new(RecordingSubmitter::new());
        let service = service_with(Arc::new(oracle), submitter.clone());

        let err = service.register(bob_usdc()).await.unwrap_err();

        assert!(matches!(
            err,
            RegistrationError::PriceCeilingExceeded { estimated, .. } if estimated == 2_000 * USDC
        ));
        assert!(!err.is_retryable());
        assert!(submitter.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_base_asset_ignores_ceiling() {
        let (service, _, _) = service();

        let tx = service.compose(alice_base().with_max_spend(1)).await.unwrap();

        assert!(tx.kinds().contains(&SettleBase));
    }

    #[tokio::test]
    async fn test_stale_quote_refused() {
        let oracle =
            MockPriceService::new().with_update(price_update("USDC/USD", 100_000_000, -8, NOW - 120));
        let (service, _, _) = service();
        let mut attempt = service.begin(bob_usdc()).unwrap();

        let err = attempt
            .compose(&oracle, &MockClock::at(NOW))
            .await
            .unwrap_err();

        assert!(matches!(err, RegistrationError::StaleQuote { max_age_secs: 60, .. }));
        assert!(err.is_retryable());
        assert_eq!(attempt.context().kinds(), vec![InitRegistration, CalculatePrice]);
    }

    #[tokio::test]
    async fn test_quote_at_max_age_accepted() {
        let (service, _, _) = service();
        let mut attempt = service.begin(bob_usdc()).unwrap();

        attempt
            .compose(&oracle(), &MockClock::at(NOW + 60))
            .await
            .unwrap();

        assert_eq!(attempt.state(), AttemptState::Finalized);
    }

    #[tokio::test]
    async fn test_clock_past_max_age_refuses_quote() {
        let (service, _, _) = service();
        let clock = MockClock::at(NOW);
        clock.advance(61);
        let mut attempt = service.begin(bob_usdc()).unwrap();

        let err = attempt.compose(&oracle(), &clock).await.unwrap_err();

        assert!(matches!(err, RegistrationError::StaleQuote { .. }));
    }
}
