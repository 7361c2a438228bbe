use std::fmt;

/// Body-area tag carried by exercises and progress entries
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BodyArea {
    Legs,
    Cardio,
    Strength,
    Other(String),
}

impl BodyArea {
    /// Areas charted for every week, present even with zero volume
    pub const STANDARD: [BodyArea; 3] = [BodyArea::Legs, BodyArea::Cardio, BodyArea::Strength];

    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "piernas" | "legs" => BodyArea::Legs,
            "cardio" => BodyArea::Cardio,
            "fuerza" | "strength" => BodyArea::Strength,
            _ => BodyArea::Other(value.trim().to_string()),
        }
    }

    pub fn as_wire(&self) -> &str {
        match self {
            BodyArea::Legs => "Piernas",
            BodyArea::Cardio => "Cardio",
            BodyArea::Strength => "Fuerza",
            BodyArea::Other(raw) => raw,
        }
    }
}

impl fmt::Display for BodyArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyArea::Legs => write!(f, "Legs"),
            BodyArea::Cardio => write!(f, "Cardio"),
            BodyArea::Strength => write!(f, "Strength"),
            BodyArea::Other(raw) => write!(f, "{}", raw),
        }
    }
}

impl std::str::FromStr for BodyArea {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(BodyArea::from_wire(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_schema_tags() {
        assert_eq!(BodyArea::from_wire("Piernas"), BodyArea::Legs);
        assert_eq!(BodyArea::from_wire("cardio"), BodyArea::Cardio);
        assert_eq!(BodyArea::from_wire("Fuerza"), BodyArea::Strength);
        assert_eq!(BodyArea::from_wire(" Core "), BodyArea::Other("Core".to_string()));
    }
}
