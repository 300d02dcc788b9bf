//! One-shot reveal of skill bars as they scroll into view.

/// Parse a `data-level` value into a percentage in `[0, 100]`.
/// Missing, empty or non-numeric values yield `None`.
pub fn parse_level(raw: Option<&str>) -> Option<f64> {
    let level: f64 = raw?.trim().trim_end_matches('%').parse().ok()?;
    level.is_finite().then(|| level.clamp(0.0, 100.0))
}

/// CSS width for a revealed bar, e.g. `73%`.
pub fn width_for(level: f64) -> String {
    format!("{level}%")
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct SkillBar {
    level: f64,
    revealed: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SkillReveal {
    pub index: usize,
    pub width: String,
}

/// Tracks which registered bars have already been revealed.
#[derive(Debug)]
pub struct SkillTracker {
    bars: Vec<SkillBar>,
    threshold: f64,
}

impl SkillTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            bars: Vec::new(),
            threshold,
        }
    }

    /// Register a bar; returns its index.
    pub fn register(&mut self, level: f64) -> usize {
        self.bars.push(SkillBar {
            level,
            revealed: false,
        });
        self.bars.len() - 1
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.bars.get(index).is_some_and(|b| b.revealed)
    }

    /// Visibility report for bar `index`. Returns the reveal the first time the
    /// ratio reaches the threshold, and `None` ever after.
    pub fn observe(&mut self, index: usize, ratio: f64) -> Option<SkillReveal> {
        let bar = self.bars.get_mut(index)?;
        if bar.revealed || ratio < self.threshold {
            return None;
        }
        bar.revealed = true;
        Some(SkillReveal {
            index,
            width: width_for(bar.level),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_level_accepts_numbers_and_rejects_garbage() {
        assert_eq!(parse_level(Some("73")), Some(73.0));
        assert_eq!(parse_level(Some(" 42.5% ")), Some(42.5));
        assert_eq!(parse_level(Some("140")), Some(100.0));
        assert_eq!(parse_level(Some("-3")), Some(0.0));
        assert_eq!(parse_level(Some("high")), None);
        assert_eq!(parse_level(Some("")), None);
        assert_eq!(parse_level(Some("NaN")), None);
        assert_eq!(parse_level(None), None);
    }

    #[test]
    fn reveals_once_at_half_visibility() {
        let mut t = SkillTracker::new(0.5);
        let i = t.register(73.0);
        assert_eq!(t.observe(i, 0.2), None);
        assert!(!t.is_revealed(i));
        assert_eq!(
            t.observe(i, 0.5),
            Some(SkillReveal {
                index: i,
                width: "73%".into()
            })
        );
        assert_eq!(t.observe(i, 1.0), None);
        assert_eq!(t.observe(i, 0.0), None);
        assert!(t.is_revealed(i));
    }

    #[test]
    fn unknown_index_is_ignored() {
        let mut t = SkillTracker::new(0.5);
        assert_eq!(t.observe(3, 1.0), None);
    }
}
