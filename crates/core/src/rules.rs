use crate::domain::campaign::{MusicChoice, Objective};
use crate::domain::session::ConversationState;
use crate::outcome::{FailureKind, ValidationFailure, ValidationOutcome};

/// The single predicate behind the music-required rule. Both call sites go
/// through here (the eager check in the music selection sub-flow and the
/// submission-time re-check), so the two can never drift apart.
pub fn music_required_violated(
    objective: Option<Objective>,
    music_choice: Option<MusicChoice>,
) -> bool {
    matches!(
        (objective, music_choice),
        (Some(Objective::Conversions), Some(MusicChoice::None))
    )
}

pub fn music_required_failure() -> ValidationFailure {
    ValidationFailure::new(
        FailureKind::MusicRequired,
        "Conversion campaigns require background music.",
        "Upload music or choose existing music.",
        true,
    )
}

/// Cross-field invariants that only become checkable once several fields are
/// known. Evaluated against the live state; never mutates it.
pub fn check_cross_field_rules(state: &ConversationState) -> ValidationOutcome {
    if music_required_violated(state.objective(), state.music_choice()) {
        return Err(music_required_failure());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::domain::campaign::{MusicChoice, MusicSelection, Objective, SessionId};
    use crate::domain::session::ConversationState;
    use crate::fields::FieldName;
    use crate::outcome::FailureKind;

    use super::{check_cross_field_rules, music_required_violated};

    #[test]
    fn conversions_with_no_music_violates_the_rule() {
        assert!(music_required_violated(
            Some(Objective::Conversions),
            Some(MusicChoice::None)
        ));
    }

    #[test]
    fn traffic_campaigns_may_skip_music() {
        assert!(!music_required_violated(Some(Objective::Traffic), Some(MusicChoice::None)));
        assert!(!music_required_violated(Some(Objective::Conversions), Some(MusicChoice::Upload)));
        assert!(!music_required_violated(None, Some(MusicChoice::None)));
        assert!(!music_required_violated(Some(Objective::Conversions), None));
    }

    #[test]
    fn rule_catches_objective_changed_after_music_was_declined() {
        let mut state = ConversationState::new(SessionId("conv_rules".to_string()));
        state.assign(FieldName::Objective, "Traffic").expect("objective");
        state.commit_music(MusicSelection::None);
        assert!(check_cross_field_rules(&state).is_ok());

        // each individual write was valid, but together they now conflict
        state.assign(FieldName::Objective, "Conversions").expect("objective change");
        let failure = check_cross_field_rules(&state).expect_err("rule must fire");
        assert_eq!(failure.kind, FailureKind::MusicRequired);
        assert_eq!(failure.explanation, "Conversion campaigns require background music.");
        assert_eq!(failure.suggested_action, "Upload music or choose existing music.");
    }
}
