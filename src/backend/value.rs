use std::fmt;

/// One parsed cell.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Empty,
    Number(f64),
    Text(String),
}

impl Scalar {
    /// Parses a raw cell. Never fails: blank text becomes `Empty`, finite
    /// decimal literals become `Number`, anything else is kept as written.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Scalar::Empty;
        }
        match parse_number(trimmed) {
            Some(n) => Scalar::Number(n),
            None => Scalar::Text(raw.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Scalar::Empty)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Scalar::Number(_))
    }

    /// Numeric reading of the cell, converting text that holds a literal.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            Scalar::Text(s) => parse_number(s.trim()),
            Scalar::Empty => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Empty => Ok(()),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// True for a cell that is missing from a ragged row or holds the empty marker.
pub fn is_blank(cell: Option<&Scalar>) -> bool {
    cell.map_or(true, Scalar::is_empty)
}

/// Standard decimal parsing; non-finite results (`inf`, `NaN`) are rejected.
pub fn parse_number(text: &str) -> Option<f64> {
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}
