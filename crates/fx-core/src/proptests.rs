use proptest::prelude::*;

use crate::defaults::{parse_default, MAX_COMPONENTS};
use crate::types::UniformType;

const TYPES: [UniformType; 15] = [
    UniformType::Float,
    UniformType::Float2,
    UniformType::Float3,
    UniformType::Float4,
    UniformType::Int,
    UniformType::Int2,
    UniformType::Int3,
    UniformType::Int4,
    UniformType::Bool,
    UniformType::Bool2,
    UniformType::Bool3,
    UniformType::Bool4,
    UniformType::Float2x2,
    UniformType::Float3x3,
    UniformType::Float4x4,
];

/// One source literal of `ty` paired with the value it denotes.
fn literal(ty: UniformType) -> BoxedStrategy<(f32, String)> {
    if ty.is_bool() {
        any::<bool>()
            .prop_map(|b| (if b { 1.0 } else { 0.0 }, b.to_string()))
            .boxed()
    } else if ty.is_int() {
        (-100_000i32..100_000)
            .prop_map(|i| (i as f32, i.to_string()))
            .boxed()
    } else {
        // `Display` for f32 prints the shortest decimal that reads back exactly.
        (-1.0e6f32..1.0e6, prop::sample::select(vec!["", "f", "F", "h", "H"]))
            .prop_map(|(x, suffix)| (x, format!("{x}{suffix}")))
            .boxed()
    }
}

fn typed_literals(extra: usize) -> impl Strategy<Value = (UniformType, Vec<(f32, String)>)> {
    prop::sample::select(TYPES.to_vec()).prop_flat_map(move |ty| {
        let count = ty.component_count() + extra;
        (Just(ty), prop::collection::vec(literal(ty), count))
    })
}

fn initializer(ty: UniformType, literals: &[(f32, String)], braces: bool) -> String {
    let args = literals
        .iter()
        .map(|(_, text)| text.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    if braces {
        format!("{{{args}}}")
    } else {
        format!("{}({args})", ty.name())
    }
}

proptest! {
    #[test]
    fn literal_initializers_read_back_exactly(
        (ty, literals) in typed_literals(0),
        braces in any::<bool>(),
    ) {
        let value = parse_default(ty, &initializer(ty, &literals, braces));
        let expected: Vec<f32> = literals.iter().map(|(v, _)| *v).collect();
        prop_assert_eq!(&value[..expected.len()], &expected[..]);
        prop_assert!(value[expected.len()..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn surplus_components_yield_zero(
        (ty, literals) in typed_literals(1),
        braces in any::<bool>(),
    ) {
        let value = parse_default(ty, &initializer(ty, &literals, braces));
        prop_assert_eq!(value, [0.0; MAX_COMPONENTS]);
    }

    #[test]
    fn names_outside_the_vocabulary_are_unknown(name in "x[a-z0-9_]{0,10}") {
        prop_assert_eq!(UniformType::parse(&name), UniformType::Unknown);
        prop_assert_eq!(parse_default(UniformType::parse(&name), "{1}"), [0.0; MAX_COMPONENTS]);
    }
}

#[test]
fn every_type_name_reads_back() {
    for ty in TYPES {
        assert_eq!(UniformType::parse(ty.name()), ty);
        assert!(ty.component_count() <= MAX_COMPONENTS);
    }
}
