//! Routing logic used by [`Router`](crate::Router).
//!
//! A routing logic runs inside the router's own actor, so it is never invoked
//! concurrently and may keep mutable state (a cursor, an RNG) without locking.

use crate::{
    actor_ref::Routee,
    error::{ActorError, ActorResult},
};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Strategy deciding which routees receive a message.
pub trait RoutingLogic<M>: Send + 'static {
    /// Delivers `message` to zero or more of `routees`.
    ///
    /// `routees` is the router's full, ordered routee list.
    fn select(&mut self, message: M, routees: &[Routee<M>]) -> ActorResult;
}

fn ensure_routees<M>(routees: &[Routee<M>]) -> ActorResult {
    if routees.is_empty() {
        Err(ActorError::NoRoutees)
    } else {
        Ok(())
    }
}

/// Forwards every message to all routees, in list order.
#[derive(Debug, Default, Clone, Copy)]
pub struct BroadcastRoutingLogic;

impl<M: Clone + Send + 'static> RoutingLogic<M> for BroadcastRoutingLogic {
    fn select(&mut self, message: M, routees: &[Routee<M>]) -> ActorResult {
        ensure_routees(routees)?;
        for routee in routees {
            routee.actor_ref().tell(message.clone());
        }
        Ok(())
    }
}

/// Routes to routees in turn.
///
/// [`RoundRobinRoutingLogic::new`] keeps the historical cursor behaviour: the
/// cursor grows without bound and any position past the end of the list maps
/// to the first routee. The first pass over the routees is a true round robin;
/// every later message goes to routee 0. [`RoundRobinRoutingLogic::cycling`]
/// wraps the cursor instead.
#[derive(Debug, Default, Clone)]
pub struct RoundRobinRoutingLogic {
    next: usize,
    cycling: bool,
}

impl RoundRobinRoutingLogic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Round robin that wraps back to the first routee after the last one.
    pub fn cycling() -> Self {
        Self {
            next: 0,
            cycling: true,
        }
    }

    fn target(&self, len: usize) -> usize {
        if self.cycling {
            self.next % len
        } else if self.next < len {
            self.next
        } else {
            0
        }
    }
}

impl<M: Send + 'static> RoutingLogic<M> for RoundRobinRoutingLogic {
    fn select(&mut self, message: M, routees: &[Routee<M>]) -> ActorResult {
        ensure_routees(routees)?;
        let target = self.target(routees.len());
        self.next = self.next.wrapping_add(1);
        routees[target].actor_ref().tell(message);
        Ok(())
    }
}

/// Picks a routee from a hash of the message, so equal hashes reach the same routee.
pub struct ConsistentHashingRoutingLogic<F> {
    hash: F,
}

impl<F> ConsistentHashingRoutingLogic<F> {
    pub fn new(hash: F) -> Self {
        Self { hash }
    }
}

/// Routee index for a message hash.
///
/// Uses the Euclidean remainder, so negative hashes also land in `0..len`.
pub fn routee_index(hash: i64, len: usize) -> usize {
    debug_assert!(len > 0);
    hash.rem_euclid(len as i64) as usize
}

impl<M, F> RoutingLogic<M> for ConsistentHashingRoutingLogic<F>
where
    M: Send + 'static,
    F: Fn(&M) -> i64 + Send + 'static,
{
    fn select(&mut self, message: M, routees: &[Routee<M>]) -> ActorResult {
        ensure_routees(routees)?;
        let target = routee_index((self.hash)(&message), routees.len());
        routees[target].actor_ref().tell(message);
        Ok(())
    }
}

/// Routes to the routee with the fewest queued messages; ties go to the earliest routee.
#[derive(Debug, Default, Clone, Copy)]
pub struct SmallestMailboxRoutingLogic;

impl<M: Send + 'static> RoutingLogic<M> for SmallestMailboxRoutingLogic {
    fn select(&mut self, message: M, routees: &[Routee<M>]) -> ActorResult {
        let routee = routees
            .iter()
            .min_by_key(|routee| routee.mailbox_size())
            .ok_or(ActorError::NoRoutees)?;
        routee.actor_ref().tell(message);
        Ok(())
    }
}

/// Routes to a uniformly random routee.
#[derive(Debug)]
pub struct RandomRoutingLogic {
    rng: StdRng,
}

impl RandomRoutingLogic {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic sequence of choices, for reproducible tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomRoutingLogic {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Send + 'static> RoutingLogic<M> for RandomRoutingLogic {
    fn select(&mut self, message: M, routees: &[Routee<M>]) -> ActorResult {
        ensure_routees(routees)?;
        let target = self.rng.gen_range(0..routees.len());
        routees[target].actor_ref().tell(message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{actor::Actor, cell::ActorCell, context::ActorContext};
    use proptest::prelude::*;

    struct Sink;

    impl Actor for Sink {
        type Message = i64;

        fn on_message(&mut self, _message: i64, _ctx: &ActorContext<'_, i64>) -> ActorResult {
            Ok(())
        }
    }

    // Unregistered cells never drain, so mailbox sizes record every delivery.
    fn routees(count: usize) -> (Vec<ActorCell<Sink>>, Vec<Routee<i64>>) {
        let cells: Vec<_> = (0..count)
            .map(|index| ActorCell::named(format!("sink-{index}"), Sink))
            .collect();
        let routees = cells
            .iter()
            .map(|cell| Routee::new(cell.actor_ref()))
            .collect();
        (cells, routees)
    }

    fn sizes(routees: &[Routee<i64>]) -> Vec<usize> {
        routees.iter().map(Routee::mailbox_size).collect()
    }

    #[test]
    fn broadcast_reaches_every_routee_once() {
        let (_cells, routees) = routees(4);
        BroadcastRoutingLogic.select(7, &routees).unwrap();
        assert_eq!(sizes(&routees), vec![1, 1, 1, 1]);
    }

    #[test]
    fn round_robin_degrades_to_first_routee_after_one_pass() {
        let (_cells, routees) = routees(3);
        let mut logic = RoundRobinRoutingLogic::new();
        let mut targets = Vec::new();
        for message in 0..7 {
            let before = sizes(&routees);
            logic.select(message, &routees).unwrap();
            let after = sizes(&routees);
            targets.push((0..3).find(|&i| after[i] != before[i]).unwrap());
        }
        assert_eq!(targets, vec![0, 1, 2, 0, 0, 0, 0]);
    }

    #[test]
    fn cycling_round_robin_wraps() {
        let (_cells, routees) = routees(3);
        let mut logic = RoundRobinRoutingLogic::cycling();
        for message in 0..9 {
            logic.select(message, &routees).unwrap();
        }
        assert_eq!(sizes(&routees), vec![3, 3, 3]);
    }

    #[test]
    fn consistent_hash_handles_negative_hashes() {
        let (_cells, routees) = routees(3);
        let mut logic = ConsistentHashingRoutingLogic::new(|message: &i64| *message);
        logic.select(-1, &routees).unwrap();
        logic.select(-3, &routees).unwrap();
        logic.select(4, &routees).unwrap();
        assert_eq!(sizes(&routees), vec![1, 1, 1]);
        assert_eq!(routee_index(-1, 3), 2);
        assert_eq!(routee_index(i64::MIN, 3), 1);
    }

    #[test]
    fn smallest_mailbox_prefers_earliest_on_ties() {
        let (_cells, routees) = routees(3);
        let mut logic = SmallestMailboxRoutingLogic;
        for message in 0..4 {
            logic.select(message, &routees).unwrap();
        }
        assert_eq!(sizes(&routees), vec![2, 1, 1]);
    }

    #[test]
    fn seeded_random_is_reproducible() {
        let (_cells, first) = routees(5);
        let (_other, second) = routees(5);
        let mut a = RandomRoutingLogic::seeded(42);
        let mut b = RandomRoutingLogic::seeded(42);
        for message in 0..50 {
            a.select(message, &first).unwrap();
            b.select(message, &second).unwrap();
        }
        assert_eq!(sizes(&first), sizes(&second));
        assert_eq!(sizes(&first).iter().sum::<usize>(), 50);
    }

    #[test]
    fn empty_routee_list_is_rejected() {
        let routees: Vec<Routee<i64>> = Vec::new();
        assert!(matches!(
            RoundRobinRoutingLogic::new().select(1, &routees),
            Err(ActorError::NoRoutees)
        ));
        assert!(matches!(
            BroadcastRoutingLogic.select(1, &routees),
            Err(ActorError::NoRoutees)
        ));
        assert!(matches!(
            SmallestMailboxRoutingLogic.select(1, &routees),
            Err(ActorError::NoRoutees)
        ));
        assert!(matches!(
            ConsistentHashingRoutingLogic::new(|m: &i64| *m).select(1, &routees),
            Err(ActorError::NoRoutees)
        ));
    }

    proptest! {
        #[test]
        fn prop_routee_index_in_range(hash in any::<i64>(), len in 1usize..1024) {
            let index = routee_index(hash, len);
            prop_assert!(index < len);
            prop_assert_eq!(index as i64, hash.rem_euclid(len as i64));
        }

        #[test]
        fn prop_equal_hashes_pick_equal_routees(hash in any::<i64>(), len in 1usize..64) {
            prop_assert_eq!(routee_index(hash, len), routee_index(hash, len));
        }
    }
}
