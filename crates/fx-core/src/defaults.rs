//! Best-effort scanner for literal default-value initializers.
//!
//! Only constructor (`float3(1, 0, 0)`) and brace (`{1, 0, 0}`) forms built
//! from numeric or boolean literals are recognised. Anything else, including
//! expressions that merely evaluate to a constant, yields an all-zero value.

use crate::types::UniformType;

/// Enough room for a 4x4 matrix.
pub const MAX_COMPONENTS: usize = 16;

pub type UniformValue = [f32; MAX_COMPONENTS];

/// Parse `expr` as a literal of type `ty`. Components appear in source order.
pub fn parse_default(ty: UniformType, expr: &str) -> UniformValue {
    let mut value = [0.0; MAX_COMPONENTS];
    let count = ty.component_count();
    if count == 0 {
        return value;
    }
    match scan_components(ty, expr.trim()) {
        Some(components) if components.len() == count => {
            value[..count].copy_from_slice(&components);
        }
        _ => {
            if !expr.trim().is_empty() {
                tracing::trace!(?ty, expr, "default value not a recognised literal");
            }
        }
    }
    value
}

fn scan_components(ty: UniformType, expr: &str) -> Option<Vec<f32>> {
    if expr.is_empty() {
        return None;
    }
    let body = if let Some(rest) = expr.strip_prefix('{') {
        let inner = rest.strip_suffix('}')?;
        // Matrices may be written as nested rows.
        inner.replace(['{', '}'], "")
    } else if let Some(args) = constructor_args(ty, expr) {
        args.to_string()
    } else {
        expr.to_string()
    };
    body.split(',')
        .map(|literal| parse_literal(ty, literal.trim()))
        .collect()
}

/// `T(args)` where `T` is the type's own name (or `T1` for scalars).
fn constructor_args(ty: UniformType, expr: &str) -> Option<&str> {
    let mut rest = expr.strip_prefix(ty.name())?;
    if ty.component_count() == 1 {
        rest = rest.strip_prefix('1').unwrap_or(rest);
    }
    rest.trim_start().strip_prefix('(')?.strip_suffix(')')
}

fn parse_literal(ty: UniformType, literal: &str) -> Option<f32> {
    if ty.is_bool() {
        match literal {
            "true" => return Some(1.0),
            "false" => return Some(0.0),
            _ => {}
        }
    }
    let number = literal
        .strip_suffix(['f', 'F', 'h', 'H'])
        .unwrap_or(literal);
    let is_numeric = !number.is_empty()
        && number.chars().any(|c| c.is_ascii_digit())
        && number
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !is_numeric {
        return None;
    }
    number.parse::<f32>().ok()
}
