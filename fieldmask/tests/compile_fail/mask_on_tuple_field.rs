//! Test: Tuple fields are serialized without a name to match an override to.

use fieldmask::MaskSchema;

#[derive(MaskSchema)]
struct Token(#[mask] String);

fn main() {}
