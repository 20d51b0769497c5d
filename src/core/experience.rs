use crate::core::state::BattleCreature;
use crate::data::growth::{xp_for_next_level, MAX_LEVEL};

/// Experience awarded for defeating a creature of the given yield and level.
pub fn experience_yield(base_exp: u32, level: u32) -> u32 {
    (base_exp as u64 * level as u64 / 7) as u32
}

/// Adds `amount` to the creature's progress and levels it up as many times as
/// the growth curve allows. Returns every level reached, in order.
///
/// Reaching the cap discards any leftover experience.
pub fn gain_experience(creature: &mut BattleCreature, amount: u32, max_level: u32) -> Vec<u32> {
    let cap = max_level.min(MAX_LEVEL);
    let mut reached = Vec::new();
    if creature.level >= cap {
        creature.experience = 0;
        return reached;
    }

    creature.experience = creature.experience.saturating_add(amount);
    while creature.level < cap {
        let needed = xp_for_next_level(creature.growth_rate, creature.level);
        if creature.experience < needed {
            break;
        }
        creature.experience -= needed;
        creature.level += 1;
        reached.push(creature.level);
        if creature.level >= cap {
            creature.experience = 0;
        }
    }
    reached
}
