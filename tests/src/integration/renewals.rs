//! # Renewal Flows
//!
//! Renewals extend an owned registration in place: same intent, pricing and
//! settlement as a new registration, but the flow ends with `renew` against
//! the existing NFT and nothing is transferred.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ns_registration::domain::{Argument, Command, Input, PriceList};
    use ns_registration::{
        FundingSource, MockClock, OperationKind, RecordingSubmitter, RegistrationApi,
        RegistrationRequest, RegistrationService,
    };

    use crate::fixtures::{coin, config, nft, oracle, recipient, service, NOW};

    use OperationKind::*;

    fn renew_alice(asset: &str) -> RegistrationRequest {
        let funding = match asset {
            "SUI" => FundingSource::Gas,
            _ => FundingSource::Coin(coin()),
        };
        RegistrationRequest::renew("alice.sui", nft(), 1, asset, funding, recipient())
    }

    fn object_at(inputs: &[Input], argument: &Argument) -> Option<Input> {
        match argument {
            Argument::Input(index) => inputs.get(usize::from(*index)).cloned(),
            _ => None,
        }
    }

    #[tokio::test]
    async fn test_base_asset_renewal_sequence() {
        let (service, oracle, _) = service();

        let tx = service.compose(renew_alice("SUI")).await.unwrap();

        assert_eq!(
            tx.kinds(),
            vec![InitRenewal, CalculatePrice, SplitFunds, SettleBase, Renew]
        );
        assert_eq!(oracle.calls(), 0);
    }

    #[tokio::test]
    async fn test_oracle_priced_renewal_sequence() {
        let (service, oracle, _) = service();

        let tx = service.compose(renew_alice("NS")).await.unwrap();

        assert_eq!(
            tx.kinds(),
            vec![
                InitRenewal,
                CalculatePrice,
                RegisterPriceUpdate,
                ConvertPrice,
                SplitFunds,
                SettleOracle,
                Renew,
            ]
        );
        assert_eq!(oracle.calls(), 1);
    }

    #[tokio::test]
    async fn test_renewal_references_owned_nft() {
        let (service, _, _) = service();

        let tx = service.compose(renew_alice("SUI")).await.unwrap();

        let nft_input = Input::Object { id: nft() };
        let Command::MoveCall { arguments, .. } = &tx.operations[0].command else {
            panic!("expected init_renewal call");
        };
        assert!(arguments
            .iter()
            .any(|arg| object_at(&tx.inputs, arg) == Some(nft_input.clone())));

        let Command::MoveCall { arguments, .. } = &tx.operations[4].command else {
            panic!("expected renew call");
        };
        assert_eq!(arguments[0], Argument::Result(3));
        assert!(arguments
            .iter()
            .any(|arg| object_at(&tx.inputs, arg) == Some(nft_input.clone())));
    }

    #[tokio::test]
    async fn test_renewal_transfers_nothing() {
        let (service, _, _) = service();

        let tx = service.compose(renew_alice("NS")).await.unwrap();

        assert!(!tx
            .operations
            .iter()
            .any(|op| matches!(op.command, Command::TransferObjects { .. })));
    }

    #[tokio::test]
    async fn test_renewal_estimate_uses_renewal_list() {
        let mut config = config();
        config.renewal_price_list = Some(PriceList {
            three_char: 250_000_000,
            four_char: 50_000_000,
            five_plus: 10_000_000,
        });
        let service = RegistrationService::new(
            config,
            Arc::new(oracle()),
            Arc::new(RecordingSubmitter::new()),
            Arc::new(MockClock::at(NOW)),
        )
        .unwrap();
        let mut attempt = service.begin(renew_alice("NS")).unwrap();

        attempt.compose(&oracle(), &MockClock::at(NOW)).await.unwrap();

        // $10 list, 25% NS discount, NS at $0.50
        assert_eq!(attempt.estimated_spend(), Some(15_000_000));
    }

    #[tokio::test]
    async fn test_renewal_estimate_falls_back_to_registration_list() {
        let (service, _, _) = service();
        let mut attempt = service.begin(renew_alice("NS")).unwrap();

        attempt.compose(&oracle(), &MockClock::at(NOW)).await.unwrap();

        // $20 list, 25% NS discount, NS at $0.50
        assert_eq!(attempt.estimated_spend(), Some(30_000_000));
    }

    #[tokio::test]
    async fn test_renewal_submits_once() {
        let (service, _, submitter) = service();

        let outcome = service.register(renew_alice("SUI")).await.unwrap();

        assert_eq!(outcome.operations, 5);
        assert_eq!(submitter.submitted().len(), 1);
    }
}
