//! Parsing of the metadata comments in ARB assembly emitted by `cgc`.
//!
//! Each referenced variable is described by a line of the form
//!
//! ```text
//! #var float4x4 wvp : WORLDVIEWPROJECTION : c[0], 4 : -1 : 1
//! #var sampler2D diffuseMap :  : texunit 0 : -1 : 1
//! ```
//!
//! with fields `type name : semantic : resource : parameter number :
//! referenced`.

use crate::{BindingKind, RegisterBinding};

/// Every referenced constant register and texture unit in `assembly`.
pub fn parse_var_metadata(assembly: &str) -> Vec<RegisterBinding> {
    assembly.lines().filter_map(parse_var_line).collect()
}

fn parse_var_line(line: &str) -> Option<RegisterBinding> {
    let rest = line.trim().strip_prefix("#var")?;
    let fields: Vec<&str> = rest.split(':').map(str::trim).collect();
    if fields.len() < 3 {
        return None;
    }
    if fields.get(4).is_some_and(|referenced| *referenced == "0") {
        return None;
    }

    let declared = fields[0].split_whitespace().last()?;
    // Arrays are reported per element; the base register is element 0's.
    let name = match declared.split_once('[') {
        Some((base, element)) => {
            if element.trim_end_matches(']') != "0" {
                return None;
            }
            base
        }
        None => declared,
    };

    let resource = fields[2];
    let (index, kind) = if let Some(unit) = resource.strip_prefix("texunit") {
        (unit.trim().parse().ok()?, BindingKind::TextureUnit)
    } else if let Some(register) = resource.strip_prefix("c[") {
        (register.split(']').next()?.parse().ok()?, BindingKind::Constant)
    } else {
        return None;
    };

    Some(RegisterBinding {
        name: name.to_string(),
        index,
        kind,
    })
}

/// Number of program headers (`!!ARBvp1.0`, `!!ARBfp1.0`, ...) in `assembly`.
pub fn count_segments(assembly: &str) -> usize {
    assembly
        .lines()
        .filter(|line| line.trim_start().starts_with("!!"))
        .count()
}
