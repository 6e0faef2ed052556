//! # Signature Hash
//!
//! Golden references: the engine's signatures against an independent
//! implementation and fixed known values.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use mf_fusion::{jenkins_one_at_a_time, Fusion, GroupRegistry, InstUid};
    use std::collections::HashSet;

    fn raw(uids: &[InstUid]) -> Vec<u32> {
        uids.iter().map(|u| u.raw()).collect()
    }

    #[test]
    fn test_known_values() {
        let cases: [(&[u32], u32); 4] = [
            (&[1], 0x009d_bee6),
            (&[1, 2], 0xa8b8_6eff),
            (&[2, 1], 0x9932_15b9),
            (&[0x10, 0x20, 0x30], 0x05c7_ebef),
        ];

        for (uids, expected) in cases {
            assert_eq!(jenkins_1aat(uids), expected, "{uids:?}");
            let ids: Vec<InstUid> = uids.iter().copied().map(InstUid).collect();
            assert_eq!(jenkins_one_at_a_time(&ids).raw(), expected, "{uids:?}");
        }
    }

    #[test]
    fn test_registry_matches_golden_reference() {
        let decoder = RvDecoder::new();
        let expected = generate_expect_hashes(&zoo_cfgs(Shape::Uids), &decoder);

        let mut registry = GroupRegistry::new();
        registry.build_from_cfg(zoo_cfgs(Shape::Uids), &decoder).unwrap();

        for (name, signature) in registry.expected_signatures() {
            assert_eq!(Some(&signature.raw()), expected.get(&name), "group {name}");
        }
    }

    #[test]
    fn test_every_variant_signature_recomputable() {
        let fusion = zoo_fusion();
        for group in fusion.groups() {
            for (variant, signature) in group.variants().iter().zip(group.variant_signatures()) {
                assert_eq!(Fusion::<RvInst>::compute_signature(variant.as_slice()), *signature);
                assert_eq!(jenkins_1aat(&raw(variant.as_slice())), signature.raw());
            }
        }
    }

    #[test]
    fn test_zoo_signatures_do_not_collide() {
        let hashed: HashSet<u32> = zoo().iter().map(|g| jenkins_1aat(&raw(&g.uids))).collect();
        assert_eq!(hashed.len(), zoo().len());
    }

    #[test]
    fn test_order_changes_signature() {
        let f4 = zoo_group("F4").uids;
        let reversed: Vec<_> = f4.iter().rev().copied().collect();
        assert_ne!(jenkins_one_at_a_time(&f4), jenkins_one_at_a_time(&reversed));
    }
}
