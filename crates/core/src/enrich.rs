//! Demo attributes for the storefront.
//!
//! The backend has no notion of size, color, or fabric. When the storefront
//! runs with demo attributes enabled, each product is given a set derived
//! from its id so the same product always shows the same values across
//! requests and restarts. Nothing here is ever sent to the backend.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::Serialize;

use crate::types::ProductId;

pub const SIZES: [&str; 6] = ["XS", "S", "M", "L", "XL", "XXL"];
pub const COLORS: [&str; 8] = [
    "Black", "White", "Red", "Blue", "Green", "Yellow", "Maroon", "Beige",
];
pub const FABRICS: [&str; 6] = ["Cotton", "Silk", "Linen", "Rayon", "Chiffon", "Georgette"];

/// Synthetic attributes attached to a product for display and filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemoAttributes {
    /// Available sizes, in [`SIZES`] order.
    pub sizes: Vec<&'static str>,
    /// Available colors, in [`COLORS`] order.
    pub colors: Vec<&'static str>,
    pub fabric: &'static str,
}

impl DemoAttributes {
    #[must_use]
    pub fn has_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s.eq_ignore_ascii_case(size))
    }

    #[must_use]
    pub fn has_color(&self, color: &str) -> bool {
        self.colors.iter().any(|c| c.eq_ignore_ascii_case(color))
    }
}

/// Attributes for `id`. Deterministic: equal ids give equal attributes.
#[must_use]
pub fn demo_attributes(id: &ProductId) -> DemoAttributes {
    let mut rng = StdRng::seed_from_u64(fnv1a(id.as_str()));

    let sizes = pick_subset(&mut rng, &SIZES, 2..=4);
    let colors = pick_subset(&mut rng, &COLORS, 1..=3);
    let fabric = FABRICS.choose(&mut rng).copied().unwrap_or("Cotton");

    DemoAttributes {
        sizes,
        colors,
        fabric,
    }
}

/// A random subset of `options`, sized within `len`, kept in source order.
fn pick_subset(
    rng: &mut StdRng,
    options: &[&'static str],
    len: std::ops::RangeInclusive<usize>,
) -> Vec<&'static str> {
    use rand::Rng;

    let count = rng.random_range(len).min(options.len());
    let mut indices: Vec<usize> = (0..options.len()).collect();
    indices.shuffle(rng);
    indices.truncate(count);
    indices.sort_unstable();
    indices
        .into_iter()
        .filter_map(|i| options.get(i).copied())
        .collect()
}

/// 64-bit FNV-1a. Stable across platforms and releases, unlike `DefaultHasher`.
fn fnv1a(s: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;
    s.bytes()
        .fold(OFFSET, |hash, b| (hash ^ u64::from(b)).wrapping_mul(PRIME))
}
