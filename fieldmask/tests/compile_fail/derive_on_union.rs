//! Test: Unions have no field names, so `MaskSchema` cannot be derived.

use fieldmask::MaskSchema;

#[derive(MaskSchema)]
union Bits {
    int: u32,
    float: f32,
}

fn main() {}
