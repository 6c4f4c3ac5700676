use std::fmt;
use std::time::Duration;

use super::effect::Effect;

/// Detailed classification report returned by
/// [`RuleSet::exec_detailed()`](super::RuleSet::exec_detailed).
///
/// Contains the effects, the paths of rules whose conditions passed, how many
/// rules were visited, and the wall-clock duration of the classification.
#[derive(Debug, Clone)]
#[must_use]
pub struct ExecReport {
    effects: Vec<Effect>,
    matched: Vec<String>,
    visited: usize,
    duration: Duration,
}

impl ExecReport {
    pub(crate) fn new(
        effects: Vec<Effect>,
        matched: Vec<String>,
        visited: usize,
        duration: Duration,
    ) -> Self {
        Self {
            effects,
            matched,
            visited,
            duration,
        }
    }

    /// The effects, same as [`RuleSet::exec()`](super::RuleSet::exec).
    #[must_use]
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Paths of rules whose conditions passed, in visit order.
    #[must_use]
    pub fn matched(&self) -> &[String] {
        &self.matched
    }

    /// Number of rules whose conditions were checked.
    #[must_use]
    pub fn visited(&self) -> usize {
        self.visited
    }

    /// Wall-clock duration of the classification.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Consume the report, keeping only the effects.
    #[must_use]
    pub fn into_effects(self) -> Vec<Effect> {
        self.effects
    }
}

impl fmt::Display for ExecReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "effects: {}", self.effects.len())?;
        write!(f, ", matched: [{}]", self.matched.join(", "))?;
        write!(f, ", visited: {}", self.visited)?;
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_accessors() {
        let report = ExecReport::new(
            vec![Effect::new("type", "json")],
            vec!["ruleSet[0]".into(), "ruleSet[0].oneOf[1]".into()],
            4,
            Duration::from_nanos(500),
        );

        assert_eq!(report.effects(), &[Effect::new("type", "json")]);
        assert_eq!(report.matched(), &["ruleSet[0]", "ruleSet[0].oneOf[1]"]);
        assert_eq!(report.visited(), 4);
        assert_eq!(report.duration(), Duration::from_nanos(500));
    }

    #[test]
    fn report_display() {
        let report = ExecReport::new(
            vec![],
            vec!["ruleSet[1]".into()],
            2,
            Duration::from_nanos(100),
        );
        let s = report.to_string();
        assert!(s.contains("effects: 0"));
        assert!(s.contains("matched: [ruleSet[1]]"));
        assert!(s.contains("visited: 2"));
    }
}
