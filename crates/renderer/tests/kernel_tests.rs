//! Tests for kernel construction and configuration parsing.

use renderer::{Kernel, KernelEntry, KernelSpec};
use test_utils::assert_approx_eq;
use tile_common::DensityError;

// ============================================================================
// Builders
// ============================================================================

#[test]
fn test_radial_weights() {
    let k = Kernel::radial(4);
    let w = |dx: i32, dy: i32| {
        k.entries()
            .iter()
            .find(|e| e.dx == dx && e.dy == dy)
            .map(|e| e.weight)
    };
    assert_eq!(w(0, 0), Some(1.0));
    assert_approx_eq!(w(2, 0).unwrap(), 0.25, 1e-12);
    assert_approx_eq!(w(0, -3).unwrap(), 0.0625, 1e-12);
    // d = 4 has zero weight and is dropped
    assert_eq!(w(4, 0), None);
    assert_eq!(w(3, 3), None);
}

#[test]
fn test_radial_total_weight_grows_with_radius() {
    let mut last = 0.0;
    for r in 1..10 {
        let tw = Kernel::radial(r).total_weight();
        assert!(tw > last, "radius {}", r);
        last = tw;
    }
}

#[test]
fn test_gaussian_is_symmetric() {
    let k = Kernel::gaussian(5, 2.0);
    for e in k.entries() {
        for (sx, sy) in [(-1, 1), (1, -1), (-1, -1)] {
            let m = k
                .entries()
                .iter()
                .find(|m| m.dx == sx * e.dx && m.dy == sy * e.dy)
                .expect("mirrored entry");
            assert_eq!(m.weight, e.weight);
        }
    }
}

// ============================================================================
// Serialized specs
// ============================================================================

#[test]
fn test_parse_yaml_variants() {
    let spec: KernelSpec = serde_yaml::from_str("type: radial\nradius: 8\n").unwrap();
    assert_eq!(spec, KernelSpec::Radial { radius: 8 });

    let spec: KernelSpec = serde_yaml::from_str("type: gaussian\nradius: 6\n").unwrap();
    assert_eq!(
        spec,
        KernelSpec::Gaussian {
            radius: 6,
            sigma: None
        }
    );

    let spec: KernelSpec = serde_yaml::from_str("type: identity\n").unwrap();
    assert_eq!(spec.build().unwrap(), Kernel::identity());
}

#[test]
fn test_parse_custom_json() {
    let json = r#"{
        "type": "custom",
        "entries": [
            {"dx": 0, "dy": 0, "weight": 2.0},
            {"dx": 1, "dy": 0, "weight": 1.0},
            {"dx": -1, "dy": 0, "weight": 1.0}
        ]
    }"#;
    let spec: KernelSpec = serde_json::from_str(json).unwrap();
    let k = spec.build().unwrap();
    assert_eq!(k.len(), 3);
    assert_eq!(k.total_weight(), 4.0);
    assert_eq!(k.radius(), 1);
    assert_eq!(k.entries()[1], KernelEntry::new(1, 0, 1.0));
}

#[test]
fn test_unknown_type_rejected() {
    assert!(serde_yaml::from_str::<KernelSpec>("type: box\nradius: 2\n").is_err());
}

#[test]
fn test_invalid_custom_kernel() {
    let json = r#"{"type": "custom", "entries": [{"dx": 0, "dy": 0, "weight": -1.0}]}"#;
    let spec: KernelSpec = serde_json::from_str(json).unwrap();
    match spec.build() {
        Err(DensityError::InvalidKernel(msg)) => assert!(msg.contains("non-negative")),
        other => panic!("expected InvalidKernel, got {:?}", other),
    }
}

#[test]
fn test_spec_serializes_tagged() {
    let json = serde_json::to_value(KernelSpec::default()).unwrap();
    assert_eq!(json, serde_json::json!({"type": "radial", "radius": 5}));
}
