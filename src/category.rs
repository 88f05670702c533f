//! Waste categories
//!
//! Closed set of five kinds shared by falling entities, particles and the
//! collector. Renderers dispatch on this one enum for shapes and colours.

use rand::Rng;
use rand::distr::{Distribution, StandardUniform};
use serde::{Deserialize, Serialize};

/// One of the five waste types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Paper,
    Plastic,
    Metal,
    Glass,
    Organic,
}

impl Category {
    /// Number of categories
    pub const COUNT: usize = 5;

    /// All categories in selection order (keys 1..=5)
    pub const ALL: [Category; Self::COUNT] = [
        Category::Paper,
        Category::Plastic,
        Category::Metal,
        Category::Glass,
        Category::Organic,
    ];

    /// Zero-based index in selection order
    pub fn index(self) -> usize {
        match self {
            Category::Paper => 0,
            Category::Plastic => 1,
            Category::Metal => 2,
            Category::Glass => 3,
            Category::Organic => 4,
        }
    }

    /// Category for a zero-based index, if in range
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Category bound to a selection key (1..=5)
    pub fn from_key(key: u8) -> Option<Self> {
        key.checked_sub(1).and_then(|i| Self::from_index(i as usize))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Paper => "Paper",
            Category::Plastic => "Plastic",
            Category::Metal => "Metal",
            Category::Glass => "Glass",
            Category::Organic => "Organic",
        }
    }

    /// Bin colour (linear RGB, 0-1)
    pub fn color(&self) -> [f32; 3] {
        match self {
            Category::Paper => [0.0, 0.5, 0.8],
            Category::Plastic => [0.8, 0.2, 0.2],
            Category::Metal => [0.9, 0.8, 0.1],
            Category::Glass => [0.2, 0.7, 0.2],
            Category::Organic => [0.5, 0.35, 0.05],
        }
    }
}

impl Distribution<Category> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Category {
        Category::ALL[rng.random_range(0..Category::COUNT)]
    }
}
