#![no_main]

use arbitrary::Arbitrary;
use coin_selection_fee::{distribute_fee, Coin, Fee};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Params {
    total: u64,
    coins: Vec<u64>,
}

fuzz_target!(|params: Params| {
    if params.total == 0 || params.coins.is_empty() || params.coins.iter().any(|c| *c == 0) {
        return;
    }

    let total = Fee::new(Coin::new(params.total));
    let coins: Vec<Coin> = params.coins.iter().map(|c| Coin::new(*c)).collect();

    let result = distribute_fee(total, &coins);

    let sum: u128 = result.iter().map(|(f, _)| f.to_coin().to_u64() as u128).sum();
    assert_eq!(sum, params.total as u128);
    assert_eq!(result.len(), coins.len());
    for ((_, c), original) in result.iter().zip(coins.iter()) {
        assert_eq!(c, original);
    }
});
