//! Test: Only `style` and `mask_char` are accepted inside `#[mask(...)]`.

use fieldmask::MaskSchema;

#[derive(MaskSchema)]
struct Account {
    #[mask(colour = Red)]
    email: String,
}

fn main() {}
