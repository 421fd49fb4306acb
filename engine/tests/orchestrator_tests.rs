//! End-to-end split runs against the nullable chain.
//!
//! Every run signs with a real account key and the chain verifies each
//! signature, encoding and fee, so passing runs also prove that every
//! submitted transaction conserved value.

use splitter_crypto::{account_from_private_key, Account, TypedDataSigner};
use splitter_engine::{
    FeeOracle, LeftoverPolicy, SplitConfig, SplitError, SplitOrchestrator, SplitReport,
    UtxoSource,
};
use splitter_nullables::NullChain;
use splitter_types::{Address, Amount, FeeInfo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const ACCOUNT_KEY: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

fn contract() -> Address {
    Address::repeat_byte(0x42)
}

fn eth() -> Address {
    Address::ZERO
}

fn token() -> Address {
    Address::repeat_byte(0x11)
}

fn account() -> Account {
    account_from_private_key(ACCOUNT_KEY).expect("valid key")
}

fn chain_with_fee(fee: u64) -> NullChain {
    NullChain::new()
        .with_fee(FeeInfo::new(eth(), Amount::from(fee)))
        .verifying_signatures(contract())
}

fn signer() -> TypedDataSigner {
    TypedDataSigner::new(account(), contract())
}

fn config(split_token: Address, policy: LeftoverPolicy) -> SplitConfig {
    SplitConfig {
        leftover_policy: policy,
        ..SplitConfig::new(split_token, Amount::from(50u64))
    }
}

fn amounts_of(chain: &NullChain, currency: Address) -> Vec<u64> {
    let mut amounts: Vec<u64> = chain
        .utxos_of(&account().address)
        .into_iter()
        .filter(|u| u.currency == currency)
        .map(|u| u.amount.saturating_to_u64())
        .collect();
    amounts.sort_unstable();
    amounts
}

async fn resolve_and_run(
    chain: &NullChain,
    config: SplitConfig,
) -> Result<SplitReport, SplitError> {
    let fee = FeeOracle::new(chain).resolve(&eth()).await?;
    let utxos = chain.fetch_utxos(&account().address).await?;
    SplitOrchestrator::new(signer(), chain, config)
        .run(utxos, &fee)
        .await
}

// ---------------------------------------------------------------------------
// Fee token splits
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fee_token_utxo_splits_until_below_threshold() {
    let chain = chain_with_fee(10);
    chain.deposit(account().address, eth(), Amount::from(1000u64));

    let report = resolve_and_run(&chain, config(eth(), LeftoverPolicy::Carry))
        .await
        .unwrap();

    // 1000 -> 4 outputs of ~247, then each of those -> 4 outputs of ~59.
    assert_eq!(report.rounds, 2);
    assert_eq!(report.transactions, 5);
    assert_eq!(report.outputs_created, 20);
    assert_eq!(chain.balance(&account().address, &eth()), Amount::from(950u64));

    let remaining = amounts_of(&chain, eth());
    assert_eq!(remaining.len(), 16);
    assert!(remaining.iter().all(|&a| a < 100));
}

#[tokio::test]
async fn first_round_of_fee_token_split() {
    let chain = chain_with_fee(10);
    chain.deposit(account().address, eth(), Amount::from(1000u64));
    let fee = FeeInfo::new(eth(), Amount::from(10u64));
    let utxos = chain.utxos_of(&account().address);

    let orchestrator =
        SplitOrchestrator::new(signer(), &chain, config(eth(), LeftoverPolicy::Carry));
    let plans = orchestrator.plan_round(&utxos, &fee).unwrap();

    assert_eq!(plans.len(), 1);
    let outputs: Vec<u64> = plans[0]
        .outputs
        .iter()
        .map(|o| o.amount.saturating_to_u64())
        .collect();
    assert_eq!(outputs, vec![247, 247, 247, 249]);
    // Planning alone submits nothing.
    assert!(chain.accepted().is_empty());
}

#[tokio::test]
async fn final_report_matches_chain_state() {
    let chain = chain_with_fee(10);
    chain.deposit(account().address, eth(), Amount::from(1000u64));

    let report = resolve_and_run(&chain, config(eth(), LeftoverPolicy::Drop))
        .await
        .unwrap();

    let mut reported: Vec<_> = report.final_utxos.iter().map(|u| u.position()).collect();
    let mut on_chain: Vec<_> = chain
        .utxos_of(&account().address)
        .iter()
        .map(|u| u.position())
        .collect();
    reported.sort();
    on_chain.sort();
    assert_eq!(reported, on_chain);
}

// ---------------------------------------------------------------------------
// Separate fee token
// ---------------------------------------------------------------------------

#[tokio::test]
async fn separate_fee_token_with_change() {
    let chain = chain_with_fee(10);
    chain.deposit(account().address, token(), Amount::from(500u64));
    chain.deposit(account().address, eth(), Amount::from(20u64));
    let fee = FeeInfo::new(eth(), Amount::from(10u64));

    let orchestrator =
        SplitOrchestrator::new(signer(), &chain, config(token(), LeftoverPolicy::Carry));

    let first = orchestrator
        .plan_round(&chain.utxos_of(&account().address), &fee)
        .unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].outputs.len(), 4);
    assert_eq!(first[0].outputs[0].currency, eth());
    assert_eq!(first[0].outputs[0].amount, Amount::from(10u64));

    let report = orchestrator
        .run(chain.utxos_of(&account().address), &fee)
        .await
        .unwrap();

    // Round 1: 500 -> 166/166/168 plus 10 change. Round 2: the exact-fee
    // change pays for splitting one 166 three ways.
    assert_eq!(report.rounds, 2);
    assert_eq!(report.transactions, 2);
    assert_eq!(report.outputs_created, 7);
    assert_eq!(amounts_of(&chain, token()), vec![55, 55, 56, 166, 168]);
    assert!(amounts_of(&chain, eth()).is_empty());
    assert_eq!(chain.balance(&account().address, &token()), Amount::from(500u64));
}

#[tokio::test]
async fn no_fee_utxo_means_nothing_to_do() {
    let chain = chain_with_fee(10);
    chain.deposit(account().address, token(), Amount::from(500u64));
    chain.deposit(account().address, eth(), Amount::from(9u64));

    let report = resolve_and_run(&chain, config(token(), LeftoverPolicy::Carry))
        .await
        .unwrap();

    assert_eq!(report.rounds, 0);
    assert!(chain.accepted().is_empty());
}

// ---------------------------------------------------------------------------
// Leftover policy
// ---------------------------------------------------------------------------

async fn run_with_unpaired_leftover(policy: LeftoverPolicy) -> NullChain {
    let chain = chain_with_fee(10);
    chain.deposit(account().address, token(), Amount::from(500u64));
    chain.deposit(account().address, token(), Amount::from(600u64));
    chain.deposit(account().address, eth(), Amount::from(20u64));

    resolve_and_run(&chain, config(token(), policy)).await.unwrap();
    chain
}

#[tokio::test]
async fn carry_reconsiders_unpaired_utxos() {
    let chain = run_with_unpaired_leftover(LeftoverPolicy::Carry).await;
    let amounts = amounts_of(&chain, token());
    assert!(!amounts.contains(&600));
    assert_eq!(amounts.iter().filter(|&&a| a == 150).count(), 4);
}

#[tokio::test]
async fn drop_forgets_unpaired_utxos() {
    let chain = run_with_unpaired_leftover(LeftoverPolicy::Drop).await;
    let amounts = amounts_of(&chain, token());
    assert!(amounts.contains(&600));
    assert_eq!(amounts, vec![55, 55, 56, 166, 168, 600]);
}

async fn run_with_two_way_target(config: SplitConfig) -> (NullChain, SplitReport) {
    let chain = chain_with_fee(10);
    chain.deposit(account().address, token(), Amount::from(120u64));
    chain.deposit(account().address, token(), Amount::from(500u64));
    chain.deposit(account().address, eth(), Amount::from(20u64));

    let report = resolve_and_run(&chain, config).await.unwrap();
    (chain, report)
}

#[tokio::test]
async fn drop_pairs_fee_utxos_by_position() {
    let (chain, report) = run_with_two_way_target(config(token(), LeftoverPolicy::Drop)).await;

    // Round 1 pays for the 120 with the 20, leaving it whole beside 10
    // change. Round 2 splits it with that exact-fee change.
    assert_eq!(report.rounds, 2);
    assert_eq!(report.transactions, 2);
    assert_eq!(report.outputs_created, 4);
    assert_eq!(amounts_of(&chain, token()), vec![60, 60, 500]);
    assert!(amounts_of(&chain, eth()).is_empty());
}

#[tokio::test]
async fn deferring_skips_targets_that_would_stay_whole() {
    let config = SplitConfig {
        defer_unsplittable: true,
        ..config(token(), LeftoverPolicy::Drop)
    };
    let (chain, report) = run_with_two_way_target(config).await;

    assert_eq!(report.rounds, 2);
    assert_eq!(amounts_of(&chain, token()), vec![55, 55, 56, 120, 166, 168]);
}

// ---------------------------------------------------------------------------
// Termination and failure
// ---------------------------------------------------------------------------

#[tokio::test]
async fn nothing_above_threshold_finishes_without_submitting() {
    let chain = chain_with_fee(10);
    chain.deposit(account().address, eth(), Amount::from(99u64));
    chain.deposit(account().address, token(), Amount::from(5000u64));

    let report = resolve_and_run(&chain, config(eth(), LeftoverPolicy::Carry))
        .await
        .unwrap();

    assert_eq!(report.rounds, 0);
    assert_eq!(report.transactions, 0);
    assert!(chain.accepted().is_empty());
}

#[tokio::test]
async fn unsupported_fee_token_fails_before_any_round() {
    let chain = NullChain::new().with_fee(FeeInfo::new(token(), Amount::from(1u64)));
    chain.deposit(account().address, eth(), Amount::from(1000u64));

    let result = resolve_and_run(&chain, config(eth(), LeftoverPolicy::Carry)).await;

    assert!(matches!(result, Err(SplitError::UnsupportedFeeToken(_))));
    assert!(chain.accepted().is_empty());
}

#[tokio::test]
async fn rejected_submission_aborts_and_keeps_earlier_rounds() {
    let chain = chain_with_fee(10);
    chain.deposit(account().address, eth(), Amount::from(1000u64));
    chain.reject_after(1);

    let result = resolve_and_run(&chain, config(eth(), LeftoverPolicy::Carry)).await;

    assert!(matches!(result, Err(SplitError::Submission(_))));
    assert_eq!(chain.accepted().len(), 1);
    assert_eq!(amounts_of(&chain, eth()), vec![247, 247, 247, 249]);
}

#[tokio::test]
async fn fresh_run_resumes_from_chain_state() {
    let chain = chain_with_fee(10);
    chain.deposit(account().address, eth(), Amount::from(1000u64));
    chain.reject_after(1);
    assert!(resolve_and_run(&chain, config(eth(), LeftoverPolicy::Carry))
        .await
        .is_err());

    chain.reject_after(usize::MAX);
    let report = resolve_and_run(&chain, config(eth(), LeftoverPolicy::Carry))
        .await
        .unwrap();

    assert_eq!(report.rounds, 1);
    assert_eq!(report.transactions, 4);
    assert_eq!(chain.balance(&account().address, &eth()), Amount::from(950u64));
}

#[tokio::test]
async fn fee_larger_than_utxo_is_fatal() {
    let chain = chain_with_fee(500);
    chain.deposit(account().address, eth(), Amount::from(120u64));

    let result = resolve_and_run(&chain, config(eth(), LeftoverPolicy::Carry)).await;

    assert!(matches!(result, Err(SplitError::InsufficientFunds { .. })));
    assert!(chain.accepted().is_empty());
}
