//! # Handle Graph Properties
//!
//! For any valid request the composed transaction:
//!
//! - references only earlier results
//! - prices the intent with exactly one `calculate_price_after_discount`
//! - carries exactly one settle call, matching the funding path
//! - splits funds only after every oracle-derived operation
//! - reaches the price service once on the oracle-priced path, never otherwise

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ns_registration::{
        Discount, FundingSource, MockClock, OperationKind, RecordingSubmitter, RegistrationApi,
        RegistrationError, RegistrationRequest, RegistrationService, SealedTransaction, SuiAddress,
    };
    use proptest::prelude::*;

    use crate::fixtures::{coin, config, oracle, recipient, NOW};

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    fn compose(request: RegistrationRequest) -> (Result<SealedTransaction, RegistrationError>, usize) {
        let oracle = oracle();
        let service = RegistrationService::new(
            config(),
            Arc::new(oracle.clone()),
            Arc::new(RecordingSubmitter::new()),
            Arc::new(MockClock::at(NOW)),
        )
        .unwrap();
        let result = runtime().block_on(service.compose(request));
        (result, oracle.calls())
    }

    fn discount_strategy() -> impl Strategy<Value = Discount> {
        prop_oneof![
            Just(Discount::None),
            "[A-Z0-9]{4,12}".prop_map(|code| Discount::Coupon { code }),
            any::<u8>().prop_map(|b| Discount::TokenHolding {
                object: SuiAddress::new([b; 32]),
                object_type: "0x5::day_one::DayOne".to_string(),
            }),
        ]
    }

    /// Gas pays only in SUI; every asset can pay from a coin object.
    fn funding_strategy(asset: &'static str) -> BoxedStrategy<FundingSource> {
        match asset {
            "SUI" => prop_oneof![Just(FundingSource::Gas), Just(FundingSource::Coin(coin()))].boxed(),
            _ => Just(FundingSource::Coin(coin())).boxed(),
        }
    }

    fn asset_and_funding() -> impl Strategy<Value = (&'static str, FundingSource)> {
        prop::sample::select(vec!["SUI", "USDC", "NS"])
            .prop_flat_map(|asset| (Just(asset), funding_strategy(asset)))
    }

    fn position(tx: &SealedTransaction, kind: OperationKind) -> Option<usize> {
        tx.kinds().iter().position(|k| *k == kind)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_valid_requests_compose(
            label in "[a-z0-9]{3,24}",
            years in 1u8..=5,
            (asset, funding) in asset_and_funding(),
            discount in discount_strategy(),
        ) {
            let request = RegistrationRequest::register(
                format!("{label}.sui"), years, asset, funding, recipient(),
            )
            .with_discount(discount)
            .with_max_spend(u64::MAX);

            let (result, calls) = compose(request);
            let tx = result.unwrap();
            let kinds = tx.kinds();

            for (index, op) in tx.operations.iter().enumerate() {
                prop_assert!(op.referenced_results().iter().all(|r| usize::from(*r) < index));
            }

            let pricing = tx.operations.iter()
                .filter(|op| op.kind == OperationKind::CalculatePrice)
                .filter(|op| op.referenced_results().contains(&0))
                .count();
            prop_assert_eq!(pricing, 1);

            let settlements: Vec<_> = kinds.iter().filter(|k| k.is_settlement()).collect();
            prop_assert_eq!(settlements.len(), 1);

            let split = position(&tx, OperationKind::SplitFunds).unwrap();
            if asset == "SUI" {
                prop_assert_eq!(calls, 0);
                prop_assert_eq!(*settlements[0], OperationKind::SettleBase);
                prop_assert!(position(&tx, OperationKind::RegisterPriceUpdate).is_none());
            } else {
                prop_assert_eq!(calls, 1);
                prop_assert_eq!(*settlements[0], OperationKind::SettleOracle);
                prop_assert!(position(&tx, OperationKind::RegisterPriceUpdate).unwrap() < split);
                prop_assert!(position(&tx, OperationKind::ConvertPrice).unwrap() < split);
            }
            prop_assert_eq!(kinds.last(), Some(&OperationKind::Transfer));
        }

        #[test]
        fn prop_out_of_range_years_rejected_without_oracle(
            years in prop_oneof![Just(0u8), 6u8..=u8::MAX],
            (asset, funding) in asset_and_funding(),
        ) {
            let request = RegistrationRequest::register(
                "alice.sui", years, asset, funding, recipient(),
            );

            let (result, calls) = compose(request);
            let err = result.unwrap_err();

            prop_assert!(
                matches!(err, RegistrationError::InvalidDuration { .. }),
                "unexpected error: {}", err
            );
            prop_assert!(err.is_validation());
            prop_assert_eq!(calls, 0);
        }

        #[test]
        fn prop_short_labels_rejected(label in "[a-z]{1,2}") {
            let request = RegistrationRequest::register(
                format!("{label}.sui"), 1, "USDC", FundingSource::Coin(coin()), recipient(),
            );

            let (result, calls) = compose(request);

            prop_assert!(
                matches!(result, Err(RegistrationError::InvalidDomainName { .. })),
                "short label accepted"
            );
            prop_assert_eq!(calls, 0);
        }

        #[test]
        fn prop_gas_never_pays_fed_assets(
            asset in prop::sample::select(vec!["USDC", "NS"]),
            discount in discount_strategy(),
        ) {
            let request = RegistrationRequest::register(
                "carol.sui", 1, asset, FundingSource::Gas, recipient(),
            )
            .with_discount(discount);

            let (result, calls) = compose(request);
            let err = result.unwrap_err();

            prop_assert!(
                matches!(err, RegistrationError::InvalidFunding { .. }),
                "unexpected error: {}", err
            );
            prop_assert!(err.is_validation());
            prop_assert_eq!(calls, 0);
        }
    }
}
