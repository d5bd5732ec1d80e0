//! Item spawning
//!
//! Turns a drop decision into a concrete falling item under Santa.

use glam::Vec2;
use rand::Rng;

use super::state::{FallingItem, ItemKind, RoundState};
use crate::lottery;
use crate::tuning::Tuning;

/// Pick the kind of a dropped item
pub fn choose_kind<R: Rng + ?Sized>(reindeer_odds: u32, rng: &mut R) -> ItemKind {
    if lottery(rng, reindeer_odds) {
        ItemKind::Reindeer
    } else {
        ItemKind::Present
    }
}

/// Build a new item below Santa and register it in the round
pub fn spawn_item<R: Rng + ?Sized>(
    state: &mut RoundState,
    tuning: &Tuning,
    rng: &mut R,
) -> FallingItem {
    let flip_x = rng.random_bool(0.5);
    let kind = choose_kind(state.reindeer_odds, rng);
    let vel = Vec2::new(
        rng.random_range(tuning.spawn_vel_x.min..=tuning.spawn_vel_x.max),
        rng.random_range(tuning.spawn_vel_y.min..=tuning.spawn_vel_y.max),
    );

    let item = FallingItem {
        id: state.next_item_id(),
        kind,
        pos: state.santa.drop_point(),
        vel,
        flip_x,
        size: tuning.item_size,
    };
    log::debug!("Spawned {:?} #{} at {:?}", item.kind, item.id, item.pos);
    state.insert_item(item.clone());
    item
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_under_santa_within_velocity_ranges() {
        let tuning = Tuning::default();
        let mut state = RoundState::new(&tuning);
        let mut rng = Pcg32::seed_from_u64(11);
        state.santa.pos.x = 321.0;

        for _ in 0..50 {
            let item = spawn_item(&mut state, &tuning, &mut rng);
            assert_eq!(item.pos, Vec2::new(321.0, 60.0 + tuning.santa_size));
            assert!((-2.0..=2.0).contains(&item.vel.x));
            assert!((0.0..=1.0).contains(&item.vel.y));
            assert_eq!(item.size, tuning.item_size);
        }
        assert_eq!(state.items.len(), 50);
        assert!(state.items.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn test_reindeer_odds_one_always_reindeer() {
        let mut rng = Pcg32::seed_from_u64(5);
        assert!((0..20).all(|_| choose_kind(1, &mut rng) == ItemKind::Reindeer));
    }

    #[test]
    fn test_default_odds_mostly_presents() {
        let mut rng = Pcg32::seed_from_u64(9);
        let reindeer = (0..5_000)
            .filter(|_| choose_kind(5, &mut rng) == ItemKind::Reindeer)
            .count();
        assert!((800..1_200).contains(&reindeer), "reindeer = {reindeer}");
    }

    #[test]
    fn test_flip_is_a_coin_toss() {
        let tuning = Tuning::default();
        let mut state = RoundState::new(&tuning);
        let mut rng = Pcg32::seed_from_u64(13);
        let flipped = (0..2_000)
            .filter(|_| spawn_item(&mut state, &tuning, &mut rng).flip_x)
            .count();
        assert!((850..1_150).contains(&flipped), "flipped = {flipped}");
    }
}
