pub const MIN_SCORE: i32 = 1;
pub const MAX_SCORE: i32 = 180;
/// Lower bound of the checkout window: a player wins by landing in
/// [CHECKOUT_FLOOR, 0].
pub const CHECKOUT_FLOOR: i32 = -10;

/// Totals between 1 and 180 that cannot be thrown with three darts.
const UNREACHABLE_SCORES: [i32; 9] = [163, 166, 169, 172, 173, 175, 176, 178, 179];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreResult {
    Valid(i32),
    /// Score does not count; the player's total stays unchanged.
    Bust,
    Checkout(i32),
}

/// Pure darts-score rules. No state, no side effects.
pub struct ScoringService;

impl ScoringService {
    pub fn is_valid_darts_score(score: i32) -> bool {
        (MIN_SCORE..=MAX_SCORE).contains(&score) && !UNREACHABLE_SCORES.contains(&score)
    }

    pub fn calculate(current_score: i32, candidate_score: i32) -> ScoreResult {
        // A score already in the checkout window means this player checked
        // out earlier; any further submission is a replay and busts.
        if (CHECKOUT_FLOOR..=0).contains(&current_score) {
            return ScoreResult::Bust;
        }

        if !Self::is_valid_darts_score(candidate_score) {
            return ScoreResult::Bust;
        }

        let new_score = current_score - candidate_score;

        if new_score < CHECKOUT_FLOOR {
            ScoreResult::Bust
        } else if new_score <= 0 {
            ScoreResult::Checkout(new_score)
        } else {
            ScoreResult::Valid(new_score)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(163)]
    #[test_case(166)]
    #[test_case(169)]
    #[test_case(172)]
    #[test_case(173)]
    #[test_case(175)]
    #[test_case(176)]
    #[test_case(178)]
    #[test_case(179)]
    fn test_unreachable_totals_are_invalid(score: i32) {
        assert!(!ScoringService::is_valid_darts_score(score));
    }

    #[test_case(1)]
    #[test_case(60)]
    #[test_case(162)]
    #[test_case(164)]
    #[test_case(167)]
    #[test_case(170)]
    #[test_case(171)]
    #[test_case(174)]
    #[test_case(177)]
    #[test_case(180)]
    fn test_reachable_totals_are_valid(score: i32) {
        assert!(ScoringService::is_valid_darts_score(score));
    }

    #[test_case(0)]
    #[test_case(-1)]
    #[test_case(-180)]
    #[test_case(181)]
    #[test_case(501)]
    fn test_out_of_range_totals_are_invalid(score: i32) {
        assert!(!ScoringService::is_valid_darts_score(score));
    }

    #[test]
    fn test_calculate_ordinary_deduction() {
        assert_eq!(ScoringService::calculate(501, 35), ScoreResult::Valid(466));
    }

    #[test]
    fn test_calculate_overshoot_is_bust() {
        // 15 - 30 = -15, below the checkout floor
        assert_eq!(ScoringService::calculate(15, 30), ScoreResult::Bust);
    }

    #[test]
    fn test_calculate_exact_zero_is_checkout() {
        assert_eq!(ScoringService::calculate(36, 36), ScoreResult::Checkout(0));
    }

    #[test]
    fn test_calculate_just_past_floor_is_bust() {
        // 30 - 41 = -11, one past the floor
        assert_eq!(ScoringService::calculate(30, 41), ScoreResult::Bust);
    }

    #[test]
    fn test_calculate_within_checkout_window() {
        assert_eq!(ScoringService::calculate(30, 40), ScoreResult::Checkout(-10));
        assert_eq!(ScoringService::calculate(50, 55), ScoreResult::Checkout(-5));
    }

    #[test]
    fn test_calculate_after_checkout_is_bust() {
        // Guards replayed submissions after the player already checked out
        assert_eq!(ScoringService::calculate(-5, 10), ScoreResult::Bust);
        assert_eq!(ScoringService::calculate(0, 1), ScoreResult::Bust);
        assert_eq!(ScoringService::calculate(-10, 180), ScoreResult::Bust);
    }

    #[test]
    fn test_calculate_unreachable_candidate_is_bust() {
        assert_eq!(ScoringService::calculate(501, 179), ScoreResult::Bust);
    }
}
