//! # Discount Flows
//!
//! A coupon or a holding discount is applied to the intent right after it is
//! created and before the amount is computed. The local spend estimate
//! ignores both, so it stays an upper bound of what settlement will charge;
//! a discounted attempt leaves the ceiling to the settle call.

#[cfg(test)]
mod tests {
    use ns_registration::domain::{Command, PureValue};
    use ns_registration::{Discount, MockClock, OperationKind, RegistrationApi, SuiAddress};

    use crate::fixtures::{alice_base, bob_usdc, oracle, pure_value, service, NOW, USDC};

    use OperationKind::*;

    const HOLDING_TYPE: &str = "0x5::day_one::DayOne";

    fn coupon() -> Discount {
        Discount::Coupon {
            code: "LAUNCH25".to_string(),
        }
    }

    fn holding() -> Discount {
        Discount::TokenHolding {
            object: SuiAddress::new([0xd1; 32]),
            object_type: HOLDING_TYPE.to_string(),
        }
    }

    #[tokio::test]
    async fn test_coupon_applied_before_pricing() {
        let (service, _, _) = service();

        let tx = service
            .compose(alice_base().with_discount(coupon()))
            .await
            .unwrap();

        assert_eq!(
            tx.kinds(),
            vec![
                InitRegistration,
                ApplyCoupon,
                CalculatePrice,
                SplitFunds,
                SettleBase,
                Claim,
                Transfer,
            ]
        );
        let Command::MoveCall { arguments, .. } = &tx.operations[1].command else {
            panic!("expected apply_coupon call");
        };
        assert_eq!(
            pure_value(&tx, &arguments[2]),
            Some(PureValue::String("LAUNCH25".to_string()))
        );
    }

    #[tokio::test]
    async fn test_holding_discount_typed_by_held_object() {
        let (service, _, _) = service();

        let tx = service
            .compose(alice_base().with_discount(holding()))
            .await
            .unwrap();

        assert_eq!(tx.kinds()[1], ApplyHoldingDiscount);
        let Command::MoveCall { type_arguments, .. } = &tx.operations[1].command else {
            panic!("expected apply_percentage_discount call");
        };
        assert_eq!(type_arguments, &vec![HOLDING_TYPE.to_string()]);
    }

    #[tokio::test]
    async fn test_discounted_intent_still_priced_once() {
        let (service, _, _) = service();
        let mut attempt = service.begin(alice_base().with_discount(coupon())).unwrap();

        attempt.compose(&oracle(), &MockClock::at(NOW)).await.unwrap();

        let consumers = attempt.context().consumers_of(0);
        assert_eq!(consumers, vec![ApplyCoupon, CalculatePrice, SettleBase]);
    }

    #[tokio::test]
    async fn test_oracle_priced_with_coupon() {
        let (service, oracle, _) = service();

        let tx = service
            .compose(bob_usdc().with_discount(coupon()))
            .await
            .unwrap();

        assert_eq!(
            &tx.kinds()[..5],
            &[InitRegistration, ApplyCoupon, CalculatePrice, RegisterPriceUpdate, ConvertPrice]
        );
        assert_eq!(oracle.calls(), 1);
    }

    #[tokio::test]
    async fn test_same_discount_state_composes_identically() {
        let (service, _, _) = service();

        let first = service.compose(alice_base()).await.unwrap();
        let second = service.compose(alice_base()).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.inputs, second.inputs);
        assert_eq!(first.operations, second.operations);
    }

    #[tokio::test]
    async fn test_estimate_ignores_coupon() {
        let (service, _, _) = service();
        let mut attempt = service.begin(bob_usdc().with_discount(coupon())).unwrap();

        attempt.compose(&oracle(), &MockClock::at(NOW)).await.unwrap();

        assert_eq!(attempt.estimated_spend(), Some(1_000 * USDC));
    }

    #[tokio::test]
    async fn test_coupon_ceiling_between_discounted_and_list_spend() {
        let (service, _, _) = service();
        let request = bob_usdc()
            .with_discount(Discount::Coupon {
                code: "50percentoff".to_string(),
            })
            .with_max_spend(600 * USDC);

        let tx = service.compose(request).await.unwrap();

        assert_eq!(tx.kinds()[5], SplitFunds);
        let Command::MoveCall { arguments, .. } = &tx.operations[6].command else {
            panic!("expected settle call");
        };
        assert_eq!(tx.kinds()[6], SettleOracle);
        assert_eq!(
            pure_value(&tx, arguments.last().unwrap()),
            Some(PureValue::U64(600 * USDC))
        );
    }

    #[tokio::test]
    async fn test_holding_discount_leaves_ceiling_to_settlement() {
        let (service, _, _) = service();
        let mut attempt = service
            .begin(bob_usdc().with_discount(holding()).with_max_spend(600 * USDC))
            .unwrap();

        attempt.compose(&oracle(), &MockClock::at(NOW)).await.unwrap();

        assert_eq!(attempt.estimated_spend(), Some(1_000 * USDC));
        assert!(attempt.seal().is_ok());
    }
}
