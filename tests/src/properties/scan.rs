//! Scan properties over random programs drawn from zoo words and filler.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use mf_fusion::domain::invariants::{invariant_conservation, invariant_identity_when_unmatched};
    use mf_fusion::{Fusion, InstPtrList};
    use proptest::prelude::*;
    use std::sync::{Arc, OnceLock};

    fn engine() -> &'static Fusion<RvInst> {
        static ENGINE: OnceLock<Fusion<RvInst>> = OnceLock::new();
        ENGINE.get_or_init(zoo_fusion)
    }

    /// Words that begin no zoo variant
    fn filler() -> Vec<u32> {
        vec![
            asm::mul(reg::A0, reg::A1, reg::A2),
            asm::sub(reg::T1, reg::T1, reg::A0),
            asm::addi(reg::SP, reg::SP, -16),
            asm::addiw(reg::A0, reg::A0, 1),
            asm::lw(reg::A1, reg::SP, 8),
            asm::ld(reg::A1, reg::SP, 8),
            asm::sd(reg::A1, reg::SP, 8),
            asm::jalr(reg::ZERO, reg::RA, 0),
            asm::srli(reg::A0, reg::A0, 1),
        ]
    }

    /// Every distinct word the zoo uses, plus filler
    fn alphabet() -> Vec<u32> {
        let mut words: Vec<u32> = zoo().into_iter().flat_map(|g| g.words).collect();
        words.extend(filler());
        words.sort_unstable();
        words.dedup();
        words
    }

    fn decode(words: &[u32]) -> InstPtrList<RvInst> {
        RvDecoder::new().program(words)
    }

    proptest! {
        #[test]
        fn prop_filler_only_streams_are_identity(picks in prop::collection::vec(0usize..9, 0..64)) {
            let pool = filler();
            let words: Vec<u32> = picks.iter().map(|&i| pool[i]).collect();
            let input = decode(&words);

            let output = engine().fuse(&input);
            prop_assert!(invariant_identity_when_unmatched(&input, &output));
        }

        #[test]
        fn prop_every_instruction_classified_once(picks in prop::collection::vec(any::<prop::sample::Index>(), 0..128)) {
            let pool = alphabet();
            let words: Vec<u32> = picks.iter().map(|i| pool[i.index(pool.len())]).collect();
            let input = decode(&words);

            let outcome = engine().fuse_with_stats(&input);
            prop_assert!(invariant_conservation(&outcome.stats, input.len()));
            prop_assert_eq!(outcome.stats.emitted, outcome.output.len());
            // Every zoo transform emits one macro-op per accepted match
            prop_assert_eq!(
                outcome.output.len(),
                outcome.stats.passed_through + outcome.stats.accepted
            );
        }

        #[test]
        fn prop_unfused_output_keeps_input_order(picks in prop::collection::vec(any::<prop::sample::Index>(), 0..128)) {
            let pool = alphabet();
            let words: Vec<u32> = picks.iter().map(|i| pool[i.index(pool.len())]).collect();
            let input = decode(&words);
            let output = engine().fuse(&input);

            // Pass-through handles appear in input order
            let mut cursor = 0;
            for inst in output.iter().filter(|i| !i.is_fused()) {
                let found = input[cursor..].iter().position(|x| Arc::ptr_eq(x, inst));
                prop_assert!(found.is_some());
                cursor += found.unwrap_or(0) + 1;
            }
        }

        #[test]
        fn prop_scan_is_deterministic(picks in prop::collection::vec(any::<prop::sample::Index>(), 0..64)) {
            let pool = alphabet();
            let words: Vec<u32> = picks.iter().map(|i| pool[i.index(pool.len())]).collect();
            let input = decode(&words);

            let first = engine().fuse(&input);
            let second = engine().fuse(&input);
            prop_assert_eq!(first, second);
        }
    }
}
