//! Expression probabilities from action units

use serde::{Deserialize, Serialize};

use crate::action_units::{ActionUnit, ActionUnits};

/// Facial expression class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    Happy,
    Sad,
    Angry,
    Surprised,
    Disgusted,
    Fearful,
    Stressed,
    #[default]
    Neutral,
}

impl Expression {
    /// Tie-break order for the primary expression, strongest claim first
    pub const PRIORITY: [Expression; 8] = [
        Expression::Stressed,
        Expression::Angry,
        Expression::Sad,
        Expression::Surprised,
        Expression::Happy,
        Expression::Fearful,
        Expression::Disgusted,
        Expression::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Expression::Happy => "happy",
            Expression::Sad => "sad",
            Expression::Angry => "angry",
            Expression::Surprised => "surprised",
            Expression::Disgusted => "disgusted",
            Expression::Fearful => "fearful",
            Expression::Stressed => "stressed",
            Expression::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probability of each expression, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpressionScores {
    pub happy: f64,
    pub sad: f64,
    pub angry: f64,
    pub surprised: f64,
    /// Not derived from any AU, always 0.0
    pub disgusted: f64,
    /// Not derived from any AU, always 0.0
    pub fearful: f64,
    pub stressed: f64,
    pub neutral: f64,
}

impl Default for ExpressionScores {
    fn default() -> Self {
        Self {
            happy: 0.0,
            sad: 0.0,
            angry: 0.0,
            surprised: 0.0,
            disgusted: 0.0,
            fearful: 0.0,
            stressed: 0.0,
            neutral: 1.0,
        }
    }
}

impl ExpressionScores {
    pub fn from_action_units(units: &ActionUnits) -> Self {
        let au = |unit| units.get(unit);

        let happy = au(ActionUnit::AU12).min(1.0);
        let sad = au(ActionUnit::AU15).min(1.0);
        let angry = (0.6 * au(ActionUnit::AU4) + 0.4 * au(ActionUnit::AU23)).min(1.0);
        let surprised =
            (0.4 * au(ActionUnit::AU1) + 0.3 * au(ActionUnit::AU2) + 0.3 * au(ActionUnit::AU26)).min(1.0);
        let stressed =
            (0.4 * au(ActionUnit::JawClench) + 0.3 * au(ActionUnit::AU4) + 0.3 * au(ActionUnit::AU23)).min(1.0);

        let mut scores = Self {
            happy,
            sad,
            angry,
            surprised,
            disgusted: 0.0,
            fearful: 0.0,
            stressed,
            neutral: 0.0,
        };
        let others: f64 = scores
            .iter()
            .filter(|(e, _)| *e != Expression::Neutral)
            .map(|(_, v)| v)
            .sum();
        scores.neutral = (1.0 - others).max(0.0);
        scores
    }

    pub fn get(&self, expression: Expression) -> f64 {
        match expression {
            Expression::Happy => self.happy,
            Expression::Sad => self.sad,
            Expression::Angry => self.angry,
            Expression::Surprised => self.surprised,
            Expression::Disgusted => self.disgusted,
            Expression::Fearful => self.fearful,
            Expression::Stressed => self.stressed,
            Expression::Neutral => self.neutral,
        }
    }

    /// Scores in priority order
    pub fn iter(&self) -> impl Iterator<Item = (Expression, f64)> + '_ {
        Expression::PRIORITY.into_iter().map(|e| (e, self.get(e)))
    }

    /// Highest-scoring expression; ties go to the earlier entry in
    /// [`Expression::PRIORITY`].
    pub fn primary(&self) -> Expression {
        let mut best = (Expression::Neutral, f64::NEG_INFINITY);
        for (expression, score) in self.iter() {
            if score > best.1 {
                best = (expression, score);
            }
        }
        best.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(pairs: &[(ActionUnit, f64)]) -> ActionUnits {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_default_is_neutral() {
        let scores = ExpressionScores::default();
        assert_eq!(scores.neutral, 1.0);
        assert_eq!(scores.primary(), Expression::Neutral);
    }

    #[test]
    fn test_no_action_units_is_neutral() {
        let scores = ExpressionScores::from_action_units(&ActionUnits::default());
        assert_eq!(scores, ExpressionScores::default());
    }

    #[test]
    fn test_formulas() {
        let scores = ExpressionScores::from_action_units(&units(&[
            (ActionUnit::AU12, 0.2),
            (ActionUnit::AU4, 0.5),
            (ActionUnit::AU23, 0.25),
            (ActionUnit::AU1, 0.5),
            (ActionUnit::JawClench, 0.5),
        ]));
        assert!((scores.happy - 0.2).abs() < 1e-12);
        assert!((scores.angry - 0.4).abs() < 1e-12);
        assert!((scores.surprised - 0.2).abs() < 1e-12);
        assert!((scores.stressed - 0.425).abs() < 1e-12);
        assert_eq!(scores.neutral, 0.0);
        assert_eq!(scores.disgusted, 0.0);
        assert_eq!(scores.fearful, 0.0);
        assert_eq!(scores.primary(), Expression::Stressed);
    }

    #[test]
    fn test_neutral_is_complement() {
        let scores = ExpressionScores::from_action_units(&units(&[(ActionUnit::AU12, 0.3)]));
        assert!((scores.neutral - 0.7).abs() < 1e-12);
        assert_eq!(scores.primary(), Expression::Neutral);
    }

    #[test]
    fn test_tie_break_by_priority() {
        let tied = ExpressionScores {
            angry: 0.3,
            stressed: 0.3,
            sad: 0.3,
            neutral: 0.1,
            ..Default::default()
        };
        assert_eq!(tied.primary(), Expression::Stressed);

        let happy_sad = ExpressionScores {
            happy: 0.5,
            sad: 0.5,
            neutral: 0.0,
            ..Default::default()
        };
        assert_eq!(happy_sad.primary(), Expression::Sad);

        let all_zero = ExpressionScores {
            neutral: 0.0,
            ..Default::default()
        };
        assert_eq!(all_zero.primary(), Expression::Stressed);
    }

    #[test]
    fn test_serializes_snake_case() {
        let json = serde_json::to_string(&Expression::Surprised).unwrap();
        assert_eq!(json, "\"surprised\"");
        assert_eq!(Expression::Neutral.to_string(), "neutral");
    }
}
