/// Which part of the guided flow is on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Loading,
    IntroToast,
    Tutorial,
    FollowUpToast,
    SelectionPrompt,
    NodeFocus,
    EmotionSelection,
    BeliefIntro,
}

impl Stage {
    /// Stages that hold the map still behind an overlay.
    pub fn is_modal(self) -> bool {
        matches!(
            self,
            Self::NodeFocus | Self::EmotionSelection | Self::BeliefIntro
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Event/belief halves in the order they were tapped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SplitSelection {
    pub first: Option<Side>,
    pub second: Option<Side>,
    pub belief_side: Option<Side>,
}

impl SplitSelection {
    pub fn contains(&self, side: Side) -> bool {
        self.first == Some(side) || self.second == Some(side)
    }

    pub fn is_complete(&self) -> bool {
        self.first.is_some() && self.second.is_some()
    }
}

pub const BELIEF_STARTERS: [&str; 5] = [
    "I am",
    "People are",
    "The world is",
    "I must",
    "I can't",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Belief {
    pub starter: String,
    pub ending: String,
    pub full_sentence: String,
}

impl Belief {
    pub fn new(starter: &str, ending: &str) -> Option<Self> {
        let starter = starter.trim();
        let ending = ending.trim().trim_end_matches('.').trim_end();
        if starter.is_empty() || ending.is_empty() {
            return None;
        }

        Some(Self {
            starter: starter.to_owned(),
            ending: ending.to_owned(),
            full_sentence: format!("{starter} {ending}."),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modal_stages() {
        assert!(Stage::NodeFocus.is_modal());
        assert!(Stage::EmotionSelection.is_modal());
        assert!(Stage::BeliefIntro.is_modal());
        assert!(!Stage::SelectionPrompt.is_modal());
        assert!(!Stage::Tutorial.is_modal());
    }

    #[test]
    fn split_selection_tracks_sides() {
        let split = SplitSelection {
            first: Some(Side::Left),
            ..Default::default()
        };
        assert!(split.contains(Side::Left));
        assert!(!split.contains(Side::Left.other()));
        assert!(!split.is_complete());
    }

    #[test]
    fn belief_sentence() {
        let belief = Belief::new("I am", " not enough. ").expect("belief");
        assert_eq!(belief.full_sentence, "I am not enough.");
        assert!(Belief::new("I am", "   ").is_none());
    }
}
