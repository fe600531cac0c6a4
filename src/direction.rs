//! Eight-point compass direction lookup

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the eight compass points
///
/// Each direction owns the angles at the centre of its 45° sector. North owns
/// both 0 and 360 so angles just below 360 resolve to it without wraparound
/// arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// Human readable name, e.g. "North East"
    pub fn full_name(self) -> &'static str {
        match self {
            Direction::North => "North",
            Direction::NorthEast => "North East",
            Direction::East => "East",
            Direction::SouthEast => "South East",
            Direction::South => "South",
            Direction::SouthWest => "South West",
            Direction::West => "West",
            Direction::NorthWest => "North West",
        }
    }

    /// Abbreviation, e.g. "NE"
    pub fn short_name(self) -> &'static str {
        match self {
            Direction::North => "N",
            Direction::NorthEast => "NE",
            Direction::East => "E",
            Direction::SouthEast => "SE",
            Direction::South => "S",
            Direction::SouthWest => "SW",
            Direction::West => "W",
            Direction::NorthWest => "NW",
        }
    }

    /// Representative angles in degrees
    pub fn angles(self) -> &'static [i32] {
        match self {
            Direction::North => &[0, 360],
            Direction::NorthEast => &[45],
            Direction::East => &[90],
            Direction::SouthEast => &[135],
            Direction::South => &[180],
            Direction::SouthWest => &[225],
            Direction::West => &[270],
            Direction::NorthWest => &[315],
        }
    }

    pub fn has_angle(self, angle: i32) -> bool {
        self.angles().contains(&angle)
    }
}

impl core::fmt::Display for Direction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Evaluation order of the lookup; earlier entries win ties
const DIRECTIONS: [Direction; 8] = [
    Direction::North,
    Direction::NorthEast,
    Direction::East,
    Direction::SouthEast,
    Direction::South,
    Direction::SouthWest,
    Direction::West,
    Direction::NorthWest,
];

/// Maps angles to the closest compass direction
///
/// Distance is the plain absolute difference to each owned angle, with no
/// wraparound. The running candidate starts at 0. Each direction measures its
/// angles against the candidate distance taken before its own angles were
/// scanned, and only a strictly smaller distance replaces the candidate.
///
/// # Example
/// ```
/// use fusion_compass::{Direction, DirectionClassifier};
///
/// let classifier = DirectionClassifier::new();
/// assert_eq!(classifier.classify(22), Direction::North);
/// assert_eq!(classifier.classify(23), Direction::NorthEast);
/// assert_eq!(classifier.classify(359), Direction::North);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectionClassifier;

impl DirectionClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Direction closest to `angle` in whole degrees
    pub fn classify(&self, angle: i32) -> Direction {
        let mut closest_angle = 0;

        for direction in DIRECTIONS {
            let closest_distance = angle.abs_diff(closest_angle);

            for &owned in direction.angles() {
                if angle.abs_diff(owned) < closest_distance {
                    closest_angle = owned;
                }
            }
        }

        DIRECTIONS
            .into_iter()
            .find(|direction| direction.has_angle(closest_angle))
            .unwrap_or(Direction::North)
    }

    /// Classify an azimuth, truncating it to whole degrees first
    pub fn classify_azimuth(&self, azimuth: f32) -> Direction {
        self.classify(azimuth as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sector_centres() {
        let classifier = DirectionClassifier::new();
        for direction in DIRECTIONS {
            for &angle in direction.angles() {
                assert_eq!(classifier.classify(angle), direction, "angle {}", angle);
            }
        }
    }

    #[test]
    fn test_north_wraps_at_both_ends() {
        let classifier = DirectionClassifier::new();
        assert_eq!(classifier.classify(0), Direction::North);
        assert_eq!(classifier.classify(360), Direction::North);
        assert_eq!(classifier.classify(350), Direction::North);
        assert_eq!(classifier.classify(338), Direction::North);
        assert_eq!(classifier.classify(337), Direction::NorthWest);
    }

    #[test]
    fn test_sector_boundaries() {
        let classifier = DirectionClassifier::new();
        let boundaries = [
            (22, Direction::North, 23, Direction::NorthEast),
            (67, Direction::NorthEast, 68, Direction::East),
            (112, Direction::East, 113, Direction::SouthEast),
            (157, Direction::SouthEast, 158, Direction::South),
            (202, Direction::South, 203, Direction::SouthWest),
            (247, Direction::SouthWest, 248, Direction::West),
            (292, Direction::West, 293, Direction::NorthWest),
        ];

        for (below, below_direction, above, above_direction) in boundaries {
            assert_eq!(classifier.classify(below), below_direction, "angle {}", below);
            assert_eq!(classifier.classify(above), above_direction, "angle {}", above);
        }
    }

    #[test]
    fn test_classify_is_total() {
        let classifier = DirectionClassifier::new();
        for angle in 0..=360 {
            let direction = classifier.classify(angle);
            assert!(DIRECTIONS.contains(&direction));
        }
    }

    #[test]
    fn test_classify_never_overflows() {
        let classifier = DirectionClassifier::new();
        assert_eq!(classifier.classify(i32::MIN), Direction::North);
        assert_eq!(classifier.classify(i32::MAX), Direction::North);
        assert_eq!(classifier.classify(-45), Direction::North);
        assert_eq!(classifier.classify(1000), Direction::North);
    }

    #[test]
    fn test_classify_azimuth_truncates() {
        let classifier = DirectionClassifier::new();
        assert_eq!(classifier.classify_azimuth(22.9), Direction::North);
        assert_eq!(classifier.classify_azimuth(23.0), Direction::NorthEast);
        assert_eq!(classifier.classify_azimuth(359.99), Direction::North);
    }

    #[test]
    fn test_names() {
        assert_eq!(Direction::SouthWest.full_name(), "South West");
        assert_eq!(Direction::SouthWest.short_name(), "SW");
        assert_eq!(Direction::East.to_string(), "E");
        assert!(Direction::North.has_angle(360));
        assert!(!Direction::NorthEast.has_angle(0));
    }
}
