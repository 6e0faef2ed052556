//! # Concurrent Scans
//!
//! One read-only engine shared by many scans, each with its own context.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use mf_fusion::domain::invariants::invariant_conservation;
    use mf_fusion::{FusionApi, InstPtrList};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::sync::Arc;
    use std::thread;

    /// Random program over zoo words plus unmatched filler.
    fn program(decoder: &RvDecoder, seed: u64, len: usize) -> InstPtrList<RvInst> {
        let mut rng = StdRng::seed_from_u64(seed);
        let zoo = zoo();
        let filler = [
            asm::mul(reg::A0, reg::A1, reg::A2),
            asm::sub(reg::T1, reg::T1, reg::A0),
            asm::addi(reg::SP, reg::SP, -16),
        ];

        let mut words = Vec::with_capacity(len);
        while words.len() < len {
            if rng.gen_bool(0.5) {
                words.extend(&zoo[rng.gen_range(0..zoo.len())].words);
            } else {
                words.push(filler[rng.gen_range(0..filler.len())]);
            }
        }
        decoder.program(&words)
    }

    #[test]
    fn test_threads_share_one_engine() {
        let decoder = RvDecoder::new();
        let fusion: Arc<dyn FusionApi<RvInst>> = Arc::new(zoo_fusion());
        let streams: Vec<_> = (0..8).map(|seed| program(&decoder, seed, 256)).collect();
        let sequential: Vec<_> = streams.iter().map(|s| fusion.fuse(s)).collect();

        let handles: Vec<_> = streams
            .iter()
            .cloned()
            .map(|stream| {
                let fusion = Arc::clone(&fusion);
                thread::spawn(move || fusion.fuse_with_stats(&stream))
            })
            .collect();

        for ((handle, expected), input) in handles.into_iter().zip(&sequential).zip(&streams) {
            let outcome = handle.join().unwrap();
            assert_eq!(outcome.output.len(), expected.len());
            assert!(outcome
                .output
                .iter()
                .zip(expected)
                .all(|(a, b)| a.mnemonic == b.mnemonic));
            assert!(invariant_conservation(&outcome.stats, input.len()));
        }
    }

    #[test]
    fn test_fuse_batch_matches_sequential() {
        let decoder = RvDecoder::new();
        let fusion = zoo_fusion();
        let streams: Vec<_> = (100..132).map(|seed| program(&decoder, seed, 128)).collect();

        let batch = fusion.fuse_batch(&streams);
        assert_eq!(batch.len(), streams.len());
        for (out, input) in batch.iter().zip(&streams) {
            let expected = fusion.fuse(input);
            assert_eq!(out.len(), expected.len());
            assert!(out.iter().zip(&expected).all(|(a, b)| Arc::ptr_eq(a, b) || a == b));
        }

        let (_, total) = fusion.fuse_batch_with_stats(&streams);
        let input_len: usize = streams.iter().map(Vec::len).sum();
        assert!(invariant_conservation(&total, input_len));
        assert!(total.accepted > 0);
    }
}
