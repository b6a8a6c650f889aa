//! Fuzz target for constrain/eval sequences against the reference model
//!
//! Catch decomposition bugs that only show up deep in a delegation chain
//!
//! # Strategy
//!
//! - Operation sequences: Arbitrary evals, range evals, constrains and drops
//!   over a growing set of handles
//! - Tree sizes: Depths 1 to 12, with leaf indices that may run past the end
//! - Keys: Derived from a fuzzed seed so crashes replay
//!
//! # Invariants
//!
//! - Every result (outputs and error kind) matches the model
//! - A handle never evaluates a leaf outside the range it was issued for
//! - NEVER panic on any argument combination

#![no_main]

use arbitrary::Arbitrary;
use arbor_harness::{ModelWorld, Operation, RealWorld, seeded_key};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    /// Seed for the root key.
    seed: u64,
    /// Raw depth, folded into 1..=12.
    depth: u8,
    /// Operation sequence to process.
    ops: Vec<Operation>,
}

fuzz_target!(|input: FuzzInput| {
    let depth = input.depth % 12 + 1;
    let key = seeded_key(input.seed);

    let mut model = ModelWorld::new(key, depth);
    let Ok(mut real) = RealWorld::new(key, depth) else {
        panic!("depth {depth} must be accepted");
    };

    // Bound the work per input; the model walks from the root per leaf.
    for op in input.ops.iter().take(64) {
        let model_result = model.apply(op);
        let real_result = real.apply(op);

        assert_eq!(model_result, real_result, "divergence on {op:?}");
    }
});
