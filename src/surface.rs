//! The four faces of the board a Cell can be stationed against.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    Top,
    Right,
    Bottom,
    Left,
}

impl Surface {
    pub const ALL: [Surface; 4] = [Surface::Top, Surface::Right, Surface::Bottom, Surface::Left];

    /// The outward unit-normal vector for this surface. Consumed only by
    /// the (out-of-scope) visualization collaborator; the core treats it
    /// opaquely.
    pub const fn unit_normal(self) -> [f64; 3] {
        match self {
            Surface::Top => [0.0, 1.0, 0.0],
            Surface::Right => [0.0, 0.0, 1.0],
            Surface::Bottom => [0.0, -1.0, 0.0],
            Surface::Left => [0.0, 0.0, -1.0],
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Surface::Top => "Top",
            Surface::Right => "Right",
            Surface::Bottom => "Bottom",
            Surface::Left => "Left",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_contains_four_distinct_surfaces() {
        let mut seen = Surface::ALL.to_vec();
        seen.sort_by_key(|s| s.name());
        seen.dedup_by_key(|s| s.name());
        assert_eq!(seen.len(), 4);
    }
}
