//! Test: A flattened field makes serde write the struct as a map, which carries
//! no type name to look overrides up by.

use fieldmask::MaskSchema;
use serde::Serialize;

#[derive(Serialize, MaskSchema)]
struct User {
    #[mask(style = Full)]
    ssn: String,
    #[serde(flatten)]
    meta: std::collections::HashMap<String, String>,
}

fn main() {}
