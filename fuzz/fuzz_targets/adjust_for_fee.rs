#![no_main]

use arbitrary::Arbitrary;
use coin_selection_fee::{
    adjust_for_fee, calculate_fee, CoinMap, CoinSelection, Coin, DustThreshold, Fee, FeeOptions,
    RngSource,
};
use libfuzzer_sys::fuzz_target;
use rand::rngs::mock::StepRng;

#[derive(Arbitrary, Debug)]
struct Params {
    inputs: Vec<u64>,
    outputs: Vec<u64>,
    change: Vec<u64>,
    pool: Vec<u64>,
    rate: u64,
    dust_threshold: u64,
    seed: u64,
}

fuzz_target!(|params: Params| {
    let estimator = move |sel: &CoinSelection<u32, u32>| Fee::new(Coin::new(sel.inputs.len() as u64 * (params.rate % 1000)));

    let mut inputs = CoinMap::new();
    for (i, v) in params.inputs.iter().enumerate() {
        inputs.insert(i as u32, Coin::new(*v));
    }
    let mut outputs = CoinMap::new();
    for (i, v) in params.outputs.iter().enumerate() {
        outputs.insert(1_000_000 + i as u32, Coin::new(*v));
    }
    let change: Vec<Coin> = params.change.iter().map(|v| Coin::new(*v)).collect();

    let selection = CoinSelection::new(inputs, outputs, change);
    if calculate_fee(&selection).is_none() {
        return;
    }
    if estimator(&selection).to_coin() == Coin::ZERO {
        return;
    }

    let mut pool = CoinMap::new();
    for (i, v) in params.pool.iter().enumerate() {
        pool.insert(2_000_000 + i as u32, Coin::new(*v));
    }

    let options = FeeOptions::new(estimator, DustThreshold::new(Coin::new(params.dust_threshold)));
    let mut rng = StepRng::new(params.seed, 1);
    let mut random = RngSource(&mut rng);

    if let Ok(result) = adjust_for_fee(selection, pool, &options, &mut random) {
        for c in &result.change {
            assert!(!options.dust_threshold.is_dust(*c));
        }
    }
});
