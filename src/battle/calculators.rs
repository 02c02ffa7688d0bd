use crate::battle::state::TurnRng;
use crate::roster::Participant;

/// Damage dealt by one attack: `max(1, level * 2 + variance)`.
///
/// The defender plays no part; there is no type chart, critical hit or
/// accuracy check. One variance roll is consumed per call.
pub fn calculate_damage(attacker: &Participant, rng: &mut TurnRng) -> u32 {
    let base = i64::from(attacker.level) * 2;
    let variance = i64::from(rng.next_variance("damage variance"));
    (base + variance).clamp(1, i64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature::Creature;
    use rstest::rstest;

    fn attacker(level: u32) -> Participant {
        Participant::from_creature(&Creature::new(1, 1, "ash", "Attacker").with_level(level))
    }

    #[rstest]
    #[case(10, 0, 20)]
    #[case(10, -5, 15)]
    #[case(10, 5, 25)]
    #[case(1, -5, 1)] // 2 - 5 floors at 1
    #[case(3, -5, 1)] // 6 - 5 = 1 exactly
    #[case(2, 0, 4)]
    fn test_damage_formula(#[case] level: u32, #[case] roll: i32, #[case] expected: u32) {
        let mut rng = TurnRng::new_for_test(vec![roll]);
        assert_eq!(calculate_damage(&attacker(level), &mut rng), expected);
    }

    #[test]
    fn test_random_damage_within_bounds() {
        let participant = attacker(10);
        for _ in 0..50 {
            let mut rng = TurnRng::new_random();
            let damage = calculate_damage(&participant, &mut rng);
            assert!((15..=25).contains(&damage), "damage {} out of range", damage);
        }
    }

    #[test]
    fn test_each_attack_consumes_one_roll() {
        let participant = attacker(10);
        let mut rng = TurnRng::new_for_test(vec![-2, 4]);
        assert_eq!(calculate_damage(&participant, &mut rng), 18);
        assert_eq!(calculate_damage(&participant, &mut rng), 24);
    }
}
