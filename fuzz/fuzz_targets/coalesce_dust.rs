#![no_main]

use arbitrary::Arbitrary;
use coin_selection_fee::{coalesce_dust, Coin, DustThreshold};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Params {
    threshold: u64,
    coins: Vec<u64>,
}

fuzz_target!(|params: Params| {
    if params.coins.is_empty() {
        return;
    }

    let threshold = DustThreshold::new(Coin::new(params.threshold));
    let coins: Vec<Coin> = params.coins.iter().map(|c| Coin::new(*c)).collect();
    let before: u128 = coins.iter().map(|c| c.to_u64() as u128).sum();

    let result = coalesce_dust(threshold, &coins);

    let after: u128 = result.iter().map(|c| c.to_u64() as u128).sum();
    assert_eq!(after, before);
    for c in &result {
        assert!(!threshold.is_dust(*c));
    }
});
