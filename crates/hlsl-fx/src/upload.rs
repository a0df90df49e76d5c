//! Packing of uniform values into four-component constant registers.

use fx_core::{UniformType, UniformValue};

/// Registers written for one uniform, starting at its bound index.
///
/// Scalars splat to all four components and short vectors are zero-padded.
/// An N×N matrix fills N consecutive registers; register `r` holds
/// `value[r + k * N]` for `k < N`, so the row-major value buffer is stored
/// transposed. Unknown types pack to nothing.
pub fn pack_uniform(ty: UniformType, value: &UniformValue) -> Vec<[f32; 4]> {
    if let Some(n) = ty.matrix_dim() {
        return (0..n)
            .map(|r| {
                let mut row = [0.0; 4];
                for (k, slot) in row.iter_mut().take(n).enumerate() {
                    *slot = value[r + k * n];
                }
                row
            })
            .collect();
    }
    match ty.component_count() {
        0 => Vec::new(),
        1 => vec![[value[0]; 4]],
        count => {
            let mut row = [0.0; 4];
            row[..count].copy_from_slice(&value[..count]);
            vec![row]
        }
    }
}
