//! Rounding modes applied whenever an operation has to drop digits.

use serde::{Deserialize, Serialize};

/// How discarded digits are resolved when a value loses scale.
///
/// Every operation that reduces scale takes one of these explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundingMode {
    /// Away from zero.
    Up,
    /// Toward zero (truncation).
    Down,
    /// Toward positive infinity.
    Ceiling,
    /// Toward negative infinity.
    Floor,
    /// Nearest neighbour, ties away from zero.
    HalfUp,
    /// Nearest neighbour, ties toward zero.
    HalfDown,
    /// Nearest neighbour, ties to the even neighbour (banker's rounding).
    HalfEven,
    /// Exact result required; any discarded digit is an error.
    Unnecessary,
}

impl RoundingMode {
    /// Alias of [`RoundingMode::Down`].
    pub const TRUNCATE: Self = Self::Down;

    /// Decides whether a truncated quotient must move one unit away from zero.
    ///
    /// `negative` is the sign of the exact value, `half` is how the discarded
    /// fraction compares to one half, `odd` is the parity of the truncated
    /// quotient. Returns `None` for `Unnecessary`.
    #[must_use]
    pub(crate) fn increments(
        self,
        negative: bool,
        half: std::cmp::Ordering,
        odd: bool,
    ) -> Option<bool> {
        use std::cmp::Ordering::{Equal, Greater, Less};

        let step = match self {
            Self::Up => true,
            Self::Down => false,
            Self::Ceiling => !negative,
            Self::Floor => negative,
            Self::HalfUp | Self::HalfDown | Self::HalfEven => match half {
                Greater => true,
                Less => false,
                Equal => match self {
                    Self::HalfUp => true,
                    Self::HalfEven => odd,
                    _ => false,
                },
            },
            Self::Unnecessary => return None,
        };
        Some(step)
    }
}

impl std::fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Ceiling => "CEILING",
            Self::Floor => "FLOOR",
            Self::HalfUp => "HALF_UP",
            Self::HalfDown => "HALF_DOWN",
            Self::HalfEven => "HALF_EVEN",
            Self::Unnecessary => "UNNECESSARY",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for RoundingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "UP" => Ok(Self::Up),
            "DOWN" | "TRUNCATE" => Ok(Self::Down),
            "CEILING" => Ok(Self::Ceiling),
            "FLOOR" => Ok(Self::Floor),
            "HALF_UP" => Ok(Self::HalfUp),
            "HALF_DOWN" => Ok(Self::HalfDown),
            "HALF_EVEN" => Ok(Self::HalfEven),
            "UNNECESSARY" => Ok(Self::Unnecessary),
            _ => Err(format!("Unknown rounding mode: {s}")),
        }
    }
}
