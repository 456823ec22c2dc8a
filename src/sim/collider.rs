//! Circular colliders with enter/exit contact events
//!
//! Every entity owns exactly one collider, registered here. Once per tick
//! [`ColliderRegistry::update`] scans every ordered pair of registered
//! colliders (O(n²), no spatial partitioning; fine for the tens of entities an
//! arena holds) and fires contact events:
//!
//! - pair `(a, b)` starts overlapping → `b` joins `a.touching`, every `Enter`
//!   listener on `a` fires with `b`
//! - pair `(a, b)` stops overlapping → `b` leaves `a.touching`, every `Exit`
//!   listener on `a` fires with `b`
//!
//! Events are directional: `(a, b)` and `(b, a)` are evaluated independently,
//! in registration order, and a listener runs to completion before the next
//! pair is looked at. A listener receives the registry itself, so it may move,
//! resize, mark or unregister colliders mid-scan. The scan walks a snapshot of
//! the ids taken at the start of `update`; colliders removed mid-scan are
//! skipped, colliders added mid-scan are first evaluated next tick.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;

use super::entity::{EntityTag, Owner};

/// Handle to a registered collider
///
/// Ids are allocated monotonically, so ordering by id is registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColliderId(u32);

/// Contact event type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactKind {
    Enter,
    Exit,
}

/// A contact event delivered to a listener on `collider`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub kind: ContactKind,
    /// Collider whose listener is firing
    pub collider: ColliderId,
    /// The other collider of the pair
    pub other: ColliderId,
}

/// Receives contact events synchronously during [`ColliderRegistry::update`]
pub trait ContactListener {
    fn on_contact(&mut self, colliders: &mut ColliderRegistry, contact: Contact);
}

impl<F> ContactListener for F
where
    F: FnMut(&mut ColliderRegistry, Contact),
{
    fn on_contact(&mut self, colliders: &mut ColliderRegistry, contact: Contact) {
        self(colliders, contact)
    }
}

/// A circular overlap volume
#[derive(Debug, Clone)]
pub struct Collider {
    /// Owning entity; `None` for transient query probes
    pub owner: Option<Owner>,
    pub radius: f32,
    /// Mirror of the owner's position, written by the owner
    pub pos: Vec2,
    touching: BTreeSet<ColliderId>,
    listeners: Vec<ContactKind>,
}

impl Collider {
    /// Transient, owner-less collider for one-shot spatial queries
    pub fn probe(pos: Vec2, radius: f32) -> Self {
        Self {
            owner: None,
            radius,
            pos,
            touching: BTreeSet::new(),
            listeners: Vec::new(),
        }
    }

    /// Geometric overlap test: center distance strictly below the radius sum
    #[inline]
    pub fn overlaps(&self, other: &Collider) -> bool {
        circles_overlap(self.pos, self.radius, other.pos, other.radius)
    }

    /// Colliders currently overlapping this one, as last observed by `update`
    pub fn touching(&self) -> impl Iterator<Item = ColliderId> + '_ {
        self.touching.iter().copied()
    }

    pub fn is_touching(&self, other: ColliderId) -> bool {
        self.touching.contains(&other)
    }

    pub fn tag(&self) -> Option<EntityTag> {
        self.owner.map(Owner::tag)
    }
}

/// Circle-circle overlap: `distance < r1 + r2`
///
/// Coincident centers overlap; touching edges (`distance == r1 + r2`) do not.
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

/// All live, entity-bound colliders
#[derive(Debug, Clone, Default)]
pub struct ColliderRegistry {
    colliders: BTreeMap<ColliderId, Collider>,
    next_id: u32,
}

impl ColliderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collider for `owner`
    ///
    /// An owner has at most one registered collider; registering again
    /// destroys the previous one first.
    pub fn register(&mut self, owner: Owner, radius: f32, pos: Vec2) -> ColliderId {
        if let Some(existing) = self.find_by_owner(owner) {
            log::warn!("{:?} already owns collider {:?}, replacing it", owner, existing);
            self.unregister(existing);
        }

        let id = ColliderId(self.next_id);
        self.next_id += 1;
        self.colliders.insert(
            id,
            Collider {
                owner: Some(owner),
                radius,
                pos,
                touching: BTreeSet::new(),
                listeners: Vec::new(),
            },
        );
        id
    }

    /// Destroy a collider
    ///
    /// Removes it from every other collider's touching set without firing
    /// exit events. Returns false (and does nothing) if it is already gone.
    pub fn unregister(&mut self, id: ColliderId) -> bool {
        if self.colliders.remove(&id).is_none() {
            return false;
        }
        for collider in self.colliders.values_mut() {
            collider.touching.remove(&id);
        }
        true
    }

    /// Subscribe `id` to a contact event type
    ///
    /// Subscribing twice delivers the event twice.
    pub fn on(&mut self, id: ColliderId, kind: ContactKind) {
        if let Some(collider) = self.colliders.get_mut(&id) {
            collider.listeners.push(kind);
        }
    }

    pub fn get(&self, id: ColliderId) -> Option<&Collider> {
        self.colliders.get(&id)
    }

    pub fn contains(&self, id: ColliderId) -> bool {
        self.colliders.contains_key(&id)
    }

    pub fn owner(&self, id: ColliderId) -> Option<Owner> {
        self.colliders.get(&id).and_then(|c| c.owner)
    }

    pub fn find_by_owner(&self, owner: Owner) -> Option<ColliderId> {
        self.colliders
            .iter()
            .find(|(_, c)| c.owner == Some(owner))
            .map(|(id, _)| *id)
    }

    pub fn set_position(&mut self, id: ColliderId, pos: Vec2) {
        if let Some(collider) = self.colliders.get_mut(&id) {
            collider.pos = pos;
        }
    }

    pub fn set_radius(&mut self, id: ColliderId, radius: f32) {
        if let Some(collider) = self.colliders.get_mut(&id) {
            collider.radius = radius;
        }
    }

    /// Record `other` as already touching `id` without firing anything
    ///
    /// Used by collision resolution so the mirrored pair does not resolve the
    /// same impact a second time.
    pub fn mark_touching(&mut self, id: ColliderId, other: ColliderId) {
        if id == other || !self.colliders.contains_key(&other) {
            return;
        }
        if let Some(collider) = self.colliders.get_mut(&id) {
            collider.touching.insert(other);
        }
    }

    /// Bookkeeping view: has `update` observed `a` touching `b`?
    pub fn is_touching(&self, a: ColliderId, b: ColliderId) -> bool {
        self.colliders
            .get(&a)
            .is_some_and(|c| c.touching.contains(&b))
    }

    /// Geometric view: do `a` and `b` overlap right now?
    pub fn overlapping(&self, a: ColliderId, b: ColliderId) -> bool {
        match (self.colliders.get(&a), self.colliders.get(&b)) {
            (Some(ca), Some(cb)) => ca.overlaps(cb),
            _ => false,
        }
    }

    /// One-shot spatial query
    ///
    /// Tests an unregistered probe circle against every registered collider,
    /// optionally keeping only owners whose tag is in `filter`.
    pub fn circle_check(&self, pos: Vec2, radius: f32, filter: Option<&[EntityTag]>) -> Vec<ColliderId> {
        let probe = Collider::probe(pos, radius);
        self.colliders
            .iter()
            .filter(|(_, c)| probe.overlaps(c))
            .filter(|(_, c)| match (filter, c.tag()) {
                (None, _) => true,
                (Some(tags), Some(tag)) => tags.contains(&tag),
                (Some(_), None) => false,
            })
            .map(|(id, _)| *id)
            .collect()
    }

    /// Re-evaluate every ordered pair and fire contact events
    pub fn update<L: ContactListener + ?Sized>(&mut self, listener: &mut L) {
        let snapshot: Vec<ColliderId> = self.colliders.keys().copied().collect();

        for &a in &snapshot {
            for &b in &snapshot {
                if a == b {
                    continue;
                }
                // Either side may have been destroyed by an earlier listener
                let (Some(ca), Some(cb)) = (self.colliders.get(&a), self.colliders.get(&b)) else {
                    continue;
                };

                let overlapping = ca.overlaps(cb);
                let was_touching = ca.touching.contains(&b);

                let kind = match (overlapping, was_touching) {
                    (true, false) => ContactKind::Enter,
                    (false, true) => ContactKind::Exit,
                    _ => continue,
                };

                let Some(ca) = self.colliders.get_mut(&a) else {
                    continue;
                };
                match kind {
                    ContactKind::Enter => {
                        ca.touching.insert(b);
                    }
                    ContactKind::Exit => {
                        ca.touching.remove(&b);
                    }
                }

                self.dispatch(listener, Contact { kind, collider: a, other: b });
            }
        }
    }

    fn dispatch<L: ContactListener + ?Sized>(&mut self, listener: &mut L, contact: Contact) {
        let subscribed = match self.colliders.get(&contact.collider) {
            Some(c) => c.listeners.iter().filter(|k| **k == contact.kind).count(),
            None => 0,
        };
        for _ in 0..subscribed {
            // A previous listener may have destroyed the collider
            if !self.colliders.contains_key(&contact.collider) {
                break;
            }
            listener.on_contact(self, contact);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColliderId, &Collider)> + '_ {
        self.colliders.iter().map(|(id, c)| (*id, c))
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Tear down every collider (session reset)
    pub fn clear(&mut self) {
        self.colliders.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EnemyId;
    use proptest::prelude::*;

    fn enemy(n: u32) -> Owner {
        Owner::Enemy(EnemyId(n))
    }

    /// Registry with two listening colliders of radius 10
    fn pair_at(distance: f32) -> (ColliderRegistry, ColliderId, ColliderId) {
        let mut reg = ColliderRegistry::new();
        let a = reg.register(enemy(1), 10.0, Vec2::ZERO);
        let b = reg.register(enemy(2), 10.0, Vec2::new(distance, 0.0));
        for id in [a, b] {
            reg.on(id, ContactKind::Enter);
            reg.on(id, ContactKind::Exit);
        }
        (reg, a, b)
    }

    #[test]
    fn test_enter_exit_scenario() {
        let (mut reg, a, b) = pair_at(25.0);
        let mut log: Vec<Contact> = Vec::new();

        reg.update(&mut |_: &mut ColliderRegistry, c: Contact| log.push(c));
        assert!(log.is_empty(), "25 >= 20, not touching");

        reg.set_position(b, Vec2::new(15.0, 0.0));
        reg.update(&mut |_: &mut ColliderRegistry, c: Contact| log.push(c));
        let enters_on_a = log
            .iter()
            .filter(|c| c.kind == ContactKind::Enter && c.collider == a)
            .count();
        assert_eq!(enters_on_a, 1);

        // Staying in contact fires nothing new
        reg.update(&mut |_: &mut ColliderRegistry, c: Contact| log.push(c));
        assert_eq!(log.len(), 2);

        reg.set_position(b, Vec2::new(25.0, 0.0));
        log.clear();
        reg.update(&mut |_: &mut ColliderRegistry, c: Contact| log.push(c));
        let exits_on_a = log
            .iter()
            .filter(|c| c.kind == ContactKind::Exit && c.collider == a)
            .count();
        assert_eq!(exits_on_a, 1);
        assert_eq!(reg.get(a).unwrap().touching().count(), 0);
        assert_eq!(reg.get(b).unwrap().touching().count(), 0);
    }

    #[test]
    fn test_boundary_distance_is_not_touching() {
        let (mut reg, a, b) = pair_at(20.0);
        let mut fired = 0;
        reg.update(&mut |_: &mut ColliderRegistry, _c: Contact| fired += 1);
        assert_eq!(fired, 0);
        assert!(!reg.overlapping(a, b));
    }

    #[test]
    fn test_coincident_centers_touch() {
        let (reg, a, b) = pair_at(0.0);
        assert!(reg.overlapping(a, b));
    }

    #[test]
    fn test_events_are_directional_and_ordered() {
        let (mut reg, a, b) = pair_at(5.0);
        let mut log = Vec::new();
        reg.update(&mut |_: &mut ColliderRegistry, c: Contact| log.push((c.collider, c.other)));
        // Registration order: a's listeners see the pair first
        assert_eq!(log, vec![(a, b), (b, a)]);
    }

    #[test]
    fn test_only_subscribed_colliders_fire() {
        let mut reg = ColliderRegistry::new();
        let platform = reg.register(Owner::Platform, 100.0, Vec2::ZERO);
        let player = reg.register(Owner::Player, 10.0, Vec2::ZERO);
        reg.on(player, ContactKind::Exit);

        let mut log = Vec::new();
        reg.update(&mut |_: &mut ColliderRegistry, c: Contact| log.push(c));
        assert!(log.is_empty(), "no enter listeners registered");
        assert!(reg.is_touching(player, platform));
        assert!(reg.is_touching(platform, player));

        reg.set_position(player, Vec2::new(400.0, 0.0));
        reg.update(&mut |_: &mut ColliderRegistry, c: Contact| log.push(c));
        assert_eq!(
            log,
            vec![Contact {
                kind: ContactKind::Exit,
                collider: player,
                other: platform
            }]
        );
    }

    #[test]
    fn test_duplicate_listeners_fire_twice() {
        let (mut reg, a, _b) = pair_at(5.0);
        reg.on(a, ContactKind::Enter);
        let mut enters_on_a = 0;
        reg.update(&mut |_: &mut ColliderRegistry, c: Contact| {
            if c.collider == a && c.kind == ContactKind::Enter {
                enters_on_a += 1;
            }
        });
        assert_eq!(enters_on_a, 2);
    }

    #[test]
    fn test_mark_touching_suppresses_mirrored_enter() {
        let (mut reg, a, b) = pair_at(5.0);
        let mut log = Vec::new();
        reg.update(&mut |reg: &mut ColliderRegistry, c: Contact| {
            if c.kind == ContactKind::Enter {
                reg.mark_touching(c.other, c.collider);
            }
            log.push((c.collider, c.other));
        });
        assert_eq!(log, vec![(a, b)]);
        assert!(reg.is_touching(b, a));
    }

    #[test]
    fn test_listener_may_destroy_colliders_mid_scan() {
        let mut reg = ColliderRegistry::new();
        let a = reg.register(enemy(1), 10.0, Vec2::ZERO);
        let b = reg.register(enemy(2), 10.0, Vec2::new(5.0, 0.0));
        let c = reg.register(enemy(3), 10.0, Vec2::new(-5.0, 0.0));
        for id in [a, b, c] {
            reg.on(id, ContactKind::Enter);
        }

        let mut log = Vec::new();
        reg.update(&mut |reg: &mut ColliderRegistry, contact: Contact| {
            log.push((contact.collider, contact.other));
            // a's first contact destroys b
            if contact.collider == a {
                reg.unregister(b);
            }
        });

        assert!(!reg.contains(b));
        // b never fires and nobody sees b after its removal
        assert!(log.iter().all(|(x, _)| *x != b));
        assert_eq!(log.iter().filter(|(_, y)| *y == b).count(), 1);
        // a still meets c, c still meets a
        assert!(log.contains(&(a, c)));
        assert!(log.contains(&(c, a)));
        assert!(!reg.get(a).unwrap().is_touching(b));
    }

    #[test]
    fn test_listener_destroying_itself_stops_its_dispatch() {
        let (mut reg, a, _b) = pair_at(5.0);
        // Second enter listener on a must not run once a is gone
        reg.on(a, ContactKind::Enter);
        let mut fired_on_a = 0;
        reg.update(&mut |reg: &mut ColliderRegistry, c: Contact| {
            if c.collider == a {
                fired_on_a += 1;
                reg.unregister(a);
            }
        });
        assert_eq!(fired_on_a, 1);
    }

    #[test]
    fn test_collider_added_mid_scan_waits_for_next_tick() {
        let (mut reg, a, _b) = pair_at(5.0);
        let mut added = None;
        let mut log = Vec::new();
        reg.update(&mut |reg: &mut ColliderRegistry, c: Contact| {
            if added.is_none() {
                let id = reg.register(enemy(9), 10.0, Vec2::ZERO);
                reg.on(id, ContactKind::Enter);
                added = Some(id);
            }
            log.push(c.collider);
        });
        let added = added.unwrap();
        assert!(!log.contains(&added));

        log.clear();
        reg.update(&mut |_: &mut ColliderRegistry, c: Contact| log.push(c.collider));
        assert!(log.contains(&added));
        assert!(log.contains(&a));
    }

    #[test]
    fn test_unregister_is_idempotent() {
        let (mut reg, a, b) = pair_at(5.0);
        reg.update(&mut |_: &mut ColliderRegistry, _c: Contact| {});
        assert!(reg.is_touching(b, a));

        assert!(reg.unregister(a));
        assert!(!reg.unregister(a));
        assert!(!reg.is_touching(b, a));

        // No exit fires for the destroyed collider
        let mut log = Vec::new();
        reg.update(&mut |_: &mut ColliderRegistry, c: Contact| log.push(c));
        assert!(log.is_empty());
    }

    #[test]
    fn test_register_replaces_previous_collider_for_owner() {
        let mut reg = ColliderRegistry::new();
        let first = reg.register(Owner::Player, 10.0, Vec2::ZERO);
        let second = reg.register(Owner::Player, 12.0, Vec2::ZERO);
        assert_ne!(first, second);
        assert!(!reg.contains(first));
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.find_by_owner(Owner::Player), Some(second));
    }

    #[test]
    fn test_circle_check_filters_by_tag() {
        let mut reg = ColliderRegistry::new();
        let platform = reg.register(Owner::Platform, 300.0, Vec2::ZERO);
        let player = reg.register(Owner::Player, 20.0, Vec2::new(10.0, 0.0));
        let near = reg.register(enemy(1), 20.0, Vec2::new(-30.0, 0.0));
        let far = reg.register(enemy(2), 20.0, Vec2::new(200.0, 0.0));

        let all = reg.circle_check(Vec2::ZERO, 15.0, None);
        assert_eq!(all, vec![platform, player, near]);

        let enemies = reg.circle_check(Vec2::ZERO, 15.0, Some(&[EntityTag::Enemy]));
        assert_eq!(enemies, vec![near]);
        assert!(!enemies.contains(&far));

        // The probe never joins the registry
        assert_eq!(reg.len(), 4);
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0, ar in 0.1f32..100.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0, br in 0.1f32..100.0,
        ) {
            let a = Collider::probe(Vec2::new(ax, ay), ar);
            let b = Collider::probe(Vec2::new(bx, by), br);
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn prop_overlap_matches_distance_threshold(
            d in 0.0f32..100.0, ra in 0.1f32..50.0, rb in 0.1f32..50.0,
        ) {
            let a = Collider::probe(Vec2::ZERO, ra);
            let b = Collider::probe(Vec2::new(d, 0.0), rb);
            prop_assert_eq!(a.overlaps(&b), d < ra + rb);
        }

        #[test]
        fn prop_enter_exit_pairing_stays_balanced(
            steps in proptest::collection::vec(-40.0f32..40.0, 1..60),
        ) {
            let (mut reg, a, b) = pair_at(30.0);
            let mut balance: i32 = 0;
            for x in steps {
                reg.set_position(b, Vec2::new(x, 0.0));
                let mut delta = 0;
                reg.update(&mut |_: &mut ColliderRegistry, c: Contact| {
                    if c.collider == a && c.other == b {
                        delta += match c.kind {
                            ContactKind::Enter => 1,
                            ContactKind::Exit => -1,
                        };
                    }
                });
                balance += delta;
                prop_assert!(balance == 0 || balance == 1);
                prop_assert_eq!(balance == 1, reg.is_touching(a, b));
            }
        }
    }
}
