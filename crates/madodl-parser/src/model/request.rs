//! Parsed download request.

use super::NumberSet;

/// What the user asked for, e.g. `Berserk v1-5 c300-`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedRequest {
    pub series_name: String,
    pub volumes: NumberSet,
    pub chapters: NumberSet,
    /// Everything in the series. Never set together with numbers.
    pub wants_all: bool,
}

impl ParsedRequest {
    /// Request for an entire series.
    pub fn all(series_name: impl Into<String>) -> Self {
        Self {
            series_name: series_name.into(),
            wants_all: true,
            ..Self::default()
        }
    }

    /// Whether `value` is a requested volume.
    pub fn wants_volume(&self, value: f64) -> bool {
        self.wants_all || self.volumes.contains(value)
    }

    /// Whether `value` is a requested chapter.
    pub fn wants_chapter(&self, value: f64) -> bool {
        self.wants_all || self.chapters.contains(value)
    }
}

impl std::fmt::Display for ParsedRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.series_name)?;
        if self.wants_all {
            return write!(f, " all");
        }
        if !self.volumes.is_empty() {
            write!(f, " v{}", self.volumes)?;
        }
        if !self.chapters.is_empty() {
            write!(f, " c{}", self.chapters)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_wants_everything() {
        let req = ParsedRequest::all("Berserk");
        assert!(req.wants_volume(1.0));
        assert!(req.wants_chapter(350.0));
        assert_eq!(req.to_string(), "Berserk all");
    }

    #[test]
    fn test_display_numbers() {
        let mut req = ParsedRequest {
            series_name: "Berserk".into(),
            volumes: NumberSet::from_values([1.0, 2.0]),
            ..Default::default()
        };
        req.chapters.push(5.0);
        req.chapters.open(5.0);
        req.chapters.finalize();
        assert_eq!(req.to_string(), "Berserk v1,2 c5-");
        assert!(!req.wants_volume(3.0));
        assert!(req.wants_chapter(9.0));
    }
}
