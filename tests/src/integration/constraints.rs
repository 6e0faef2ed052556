//! # Constraints
//!
//! Semantic checks on syntactic matches, and what a reject does to the
//! rest of the scan.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use mf_fusion::domain::invariants::{invariant_conservation, invariant_identity_when_unmatched};
    use mf_fusion::{
        FieldExtractor, FieldName, Fusion, FusionConfigBuilder, FusionGroupCfg, InstPtr,
        RejectPolicy,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn names(list: &[InstPtr<RvInst>]) -> Vec<String> {
        list.iter().map(|i| i.mnemonic.clone()).collect()
    }

    /// F1 guarded by `f1_constraints`, plus F4
    fn guarded_cfgs() -> Vec<FusionGroupCfg<RvInst>> {
        let f1 = zoo_group("F1");
        let f4 = zoo_group("F4");
        vec![
            FusionGroupCfg::new("F1")
                .uids(f1.uids)
                .constraint(f1_constraints(RvDecoder::new()))
                .transform(fused_transform(0)),
            FusionGroupCfg::new("F4")
                .uids(f4.uids)
                .transform(fused_transform(6)),
        ]
    }

    #[test]
    fn test_constraint_accepts_legal_window() {
        let decoder = RvDecoder::new();
        let fusion = Fusion::new(guarded_cfgs(), &decoder).unwrap();

        let input = decoder.program(&zoo_group("F1").words);
        assert_eq!(names(&fusion.fuse(&input)), vec!["F1'"]);
    }

    #[test]
    fn test_forbidden_middle_field_keeps_window_unchanged() {
        init_tracing();
        let decoder = RvDecoder::new();
        let fusion = Fusion::new(guarded_cfgs(), &decoder).unwrap();

        let input = decoder.program(&[
            asm::lui(reg::T0, 0x10),
            asm::addi(reg::ZERO, reg::T0, 4),
            asm::add(reg::A0, reg::A1, reg::T0),
        ]);
        let outcome = fusion.fuse_with_stats(&input);

        assert!(invariant_identity_when_unmatched(&input, &outcome.output));
        assert_eq!(outcome.stats.rejected, 1);
        assert_eq!(outcome.stats.accepted, 0);
        assert!(invariant_conservation(&outcome.stats, input.len()));
    }

    #[test]
    fn test_scan_resumes_inside_rejected_window() {
        let decoder = RvDecoder::new();
        let fusion = Fusion::new(guarded_cfgs(), &decoder).unwrap();

        // F1 rejected at lui; add (third of the window) starts F4 with ld
        let input = decoder.program(&[
            asm::lui(reg::T0, 0x10),
            asm::addi(reg::ZERO, reg::T0, 4),
            asm::add(reg::A0, reg::A1, reg::T0),
            asm::ld(reg::A0, reg::A0, 0),
        ]);
        let output = fusion.fuse(&input);

        assert_eq!(names(&output), vec!["lui", "addi", "F4'"]);
        assert!(Arc::ptr_eq(&output[0], &input[0]));
        assert!(Arc::ptr_eq(&output[1], &input[1]));
    }

    #[test]
    fn test_variant_starting_at_second_instruction_found_after_reject() {
        let decoder = RvDecoder::new();
        let cfgs = vec![
            FusionGroupCfg::<RvInst>::new("F5")
                .uids(zoo_group("F5").uids)
                .constraint(|_, _, _, _| false),
            FusionGroupCfg::new("F4")
                .uids(zoo_group("F4").uids)
                .transform(fused_transform(6)),
        ];
        let fusion = Fusion::new(cfgs, &decoder).unwrap();

        let output = fusion.fuse(&decoder.program(&zoo_group("F5").words));
        assert_eq!(names(&output), vec!["slli", "F4'"]);
    }

    #[test]
    fn test_skip_window_policy_does_not_rescan() {
        let decoder = RvDecoder::new();
        let config = FusionConfigBuilder::new()
            .reject_policy(RejectPolicy::SkipWindow)
            .build()
            .unwrap();
        let cfgs = vec![
            FusionGroupCfg::<RvInst>::new("F5")
                .uids(zoo_group("F5").uids)
                .constraint(|_, _, _, _| false),
            FusionGroupCfg::new("F4")
                .uids(zoo_group("F4").uids)
                .transform(fused_transform(6)),
        ];
        let fusion = Fusion::with_config(config, cfgs, &decoder).unwrap();

        let output = fusion.fuse(&decoder.program(&zoo_group("F5").words));
        assert_eq!(names(&output), vec!["slli", "add", "ld"]);
    }

    #[test]
    fn test_partition_feeds_transform_and_keeps_rejected() {
        let decoder = RvDecoder::new();
        let extractor = RvDecoder::new();

        // Fuse only the instructions that write t0; anything else stays
        let cfgs = vec![FusionGroupCfg::<RvInst>::new("F5")
            .uids(zoo_group("F5").uids)
            .constraint(move |_, window, accepted, rejected| {
                for inst in window {
                    if extractor.check_field(inst, FieldName::Rd, u64::from(reg::T0)) {
                        accepted.push(inst.clone());
                    } else {
                        rejected.push(inst.clone());
                    }
                }
                !accepted.is_empty()
            })
            .transform(fused_transform(7))];
        let fusion = Fusion::new(cfgs, &decoder).unwrap();

        let input = decoder.program(&zoo_group("F5").words);
        let outcome = fusion.fuse_with_stats(&input);

        assert_eq!(names(&outcome.output), vec!["F5'", "ld"]);
        assert_eq!(outcome.output[0].fused_from.len(), 2);
        assert!(Arc::ptr_eq(&outcome.output[1], &input[2]));
        assert_eq!(outcome.stats.fused_inputs, 2);
        assert!(invariant_conservation(&outcome.stats, 3));
    }

    #[test]
    fn test_constraint_sees_owning_group() {
        let decoder = RvDecoder::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();

        let cfgs = vec![FusionGroupCfg::<RvInst>::new("F2")
            .uids(zoo_group("F2").uids)
            .constraint(move |group, window, _, _| {
                seen.fetch_add(1, Ordering::Relaxed);
                group.name() == "F2" && window.len() == group.variants()[0].len()
            })];
        let fusion = Fusion::new(cfgs, &decoder).unwrap();

        let mut words = zoo_group("F2").words;
        words.extend(zoo_group("F2").words);
        let output = fusion.fuse(&decoder.program(&words));

        assert_eq!(calls.load(Ordering::Relaxed), 2);
        // Default transform is the identity
        assert_eq!(names(&output), vec!["slli", "srli", "slli", "srli"]);
    }
}
