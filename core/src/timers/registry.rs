//! Timer registry
//!
//! Owns every live timer and refreshes them all with one call per scan.
//!
//! Storage is a slot arena. Each slot carries a generation counter that is
//! bumped when its timer leaves, so a stale `TimerId` can never reach a timer
//! that later reused the slot. Join order is a doubly linked list threaded
//! through the slots, which makes join and leave O(1) and keeps traversal in
//! join order.
//!
//! # Traversal
//!
//! `refresh_all` and friends borrow the registry mutably for the whole walk
//! and only ever hand `&Timer` to callbacks. Joining or leaving from inside a
//! traversal is therefore not expressible.

use std::fmt;

use tracing::debug;

use super::{TeardownObserver, Timer};
use crate::clock::{Tick, TimeSource};

/// Handle to a timer inside a `TimerRegistry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId {
    index: u32,
    generation: u32,
}

impl TimerId {
    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

#[derive(Debug)]
struct Member {
    timer: Timer,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    member: Option<Member>,
}

/// Ordered collection of live timers.
#[derive(Default)]
pub struct TimerRegistry {
    slots: Vec<Slot>,

    /// Vacant slot indices, reused before the arena grows
    free: Vec<usize>,

    head: Option<usize>,
    tail: Option<usize>,
    len: usize,

    observer: Option<Box<dyn TeardownObserver>>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that reports every leaving timer to `observer`
    pub fn with_teardown_observer(observer: impl TeardownObserver + 'static) -> Self {
        let mut registry = Self::new();
        registry.set_teardown_observer(observer);
        registry
    }

    pub fn set_teardown_observer(&mut self, observer: impl TeardownObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn take_teardown_observer(&mut self) -> Option<Box<dyn TeardownObserver>> {
        self.observer.take()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Membership
    // ═══════════════════════════════════════════════════════════════════════

    /// Append a timer to the tail of the join order.
    pub fn join(&mut self, timer: Timer) -> TimerId {
        let kind = timer.kind();
        let preset = timer.preset();

        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                self.slots.len() - 1
            }
        };

        let prev = self.tail;
        let slot = &mut self.slots[index];
        slot.member = Some(Member {
            timer,
            prev,
            next: None,
        });
        let id = TimerId {
            index: index as u32,
            generation: slot.generation,
        };

        match prev {
            Some(prev) => self.link_mut(prev).next = Some(index),
            None => self.head = Some(index),
        }
        self.tail = Some(index);
        self.len += 1;

        debug!(timer = %id, kind = kind.as_str(), preset, members = self.len, "timer joined");
        id
    }

    /// Remove a timer, returning it. `None` if `id` is stale or unknown.
    ///
    /// The teardown observer, if any, sees the timer before it is returned.
    pub fn leave(&mut self, id: TimerId) -> Option<Timer> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        let member = slot.member.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index());

        match member.prev {
            Some(prev) => self.link_mut(prev).next = member.next,
            None => self.head = member.next,
        }
        match member.next {
            Some(next) => self.link_mut(next).prev = member.prev,
            None => self.tail = member.prev,
        }
        self.len -= 1;

        if let Some(observer) = self.observer.as_mut() {
            observer.on_teardown(id, &member.timer);
        }
        debug!(timer = %id, kind = member.timer.kind().as_str(), members = self.len, "timer left");

        Some(member.timer)
    }

    /// Remove every timer in join order, notifying the observer for each.
    pub fn clear(&mut self) {
        let ids: Vec<TimerId> = self.ids().collect();
        for id in ids {
            self.leave(id);
        }
    }

    pub fn contains(&self, id: TimerId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: TimerId) -> Option<&Timer> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.member.as_ref())
            .map(|member| &member.timer)
    }

    pub fn get_mut(&mut self, id: TimerId) -> Option<&mut Timer> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.member.as_mut())
            .map(|member| &mut member.timer)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Members in join order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            registry: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    /// Member ids in join order
    pub fn ids(&self) -> impl Iterator<Item = TimerId> + '_ {
        self.iter().map(|(id, _)| id)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Refresh
    // ═══════════════════════════════════════════════════════════════════════

    /// Update every member once, in join order, at clock value `now`.
    pub fn refresh_all(&mut self, now: Tick) {
        self.refresh_all_with(now, |_, _| {});
    }

    /// Sample `clock` once and refresh every member at that tick.
    /// Returns the sampled tick.
    pub fn refresh_all_from<S: TimeSource + ?Sized>(&mut self, clock: &S) -> Tick {
        let now = clock.now();
        self.refresh_all(now);
        now
    }

    /// Refresh every member, then show it to `inspect` right after its update.
    pub fn refresh_all_with<F>(&mut self, now: Tick, mut inspect: F)
    where
        F: FnMut(TimerId, &Timer),
    {
        let mut cursor = self.head;
        while let Some(index) = cursor {
            let slot = &mut self.slots[index];
            let Some(member) = slot.member.as_mut() else {
                break;
            };
            member.timer.update(now);
            inspect(
                TimerId {
                    index: index as u32,
                    generation: slot.generation,
                },
                &member.timer,
            );
            cursor = member.next;
        }
    }

    /// Linked member at `index`. Only called for indices reachable from the
    /// list, which always hold a member.
    fn link_mut(&mut self, index: usize) -> &mut Member {
        match self.slots[index].member.as_mut() {
            Some(member) => member,
            None => unreachable!("registry link points at vacant slot {index}"),
        }
    }
}

impl fmt::Debug for TimerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerRegistry")
            .field("len", &self.len)
            .field("slots", &self.slots.len())
            .field("head", &self.head)
            .field("tail", &self.tail)
            .field("has_observer", &self.observer.is_some())
            .finish()
    }
}

impl Drop for TimerRegistry {
    fn drop(&mut self) {
        // Timers dropped with the registry still count as torn down.
        if self.observer.is_some() {
            self.clear();
        }
    }
}

impl<'a> IntoIterator for &'a TimerRegistry {
    type Item = (TimerId, &'a Timer);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Join-order iterator over a registry.
#[derive(Debug)]
pub struct Iter<'a> {
    registry: &'a TimerRegistry,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (TimerId, &'a Timer);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor?;
        let slot = &self.registry.slots[index];
        let member = slot.member.as_ref()?;
        self.cursor = member.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some((
            TimerId {
                index: index as u32,
                generation: slot.generation,
            },
            &member.timer,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}
