//! Command/observer registry.
//!
//! Objects that emit events own an [`Observers`] list keyed by [`EventId`].
//! Callbacks run synchronously, in registration order, on the thread that
//! fires the event.

use std::fmt;

/// Events an object can fire.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum EventId {
    StartInteraction,
    Interaction,
    EndInteraction,
    Modified,
}

/// Handle returned by [`Observers::add`]; pass it to [`Observers::remove`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ObserverTag(u64);

type Callback<S> = Box<dyn FnMut(&S, EventId)>;

struct Entry<S> {
    tag: ObserverTag,
    event: EventId,
    callback: Callback<S>,
}

/// Observers of a subject `S`.
pub struct Observers<S> {
    entries: Vec<Entry<S>>,
    next_tag: u64,
}

impl<S> Observers<S> {
    pub fn new() -> Self {
        Self { entries: Vec::new(), next_tag: 1 }
    }

    pub fn add(&mut self, event: EventId, callback: impl FnMut(&S, EventId) + 'static) -> ObserverTag {
        let tag = ObserverTag(self.next_tag);
        self.next_tag += 1;
        self.entries.push(Entry { tag, event, callback: Box::new(callback) });
        tag
    }

    /// Removes the observer registered under `tag`. Returns false when it is unknown.
    pub fn remove(&mut self, tag: ObserverTag) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.tag != tag);
        self.entries.len() != before
    }

    pub fn has(&self, event: EventId) -> bool {
        self.entries.iter().any(|e| e.event == event)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Calls every observer of `event` with `subject`. Returns how many ran.
    pub fn invoke(&mut self, subject: &S, event: EventId) -> usize {
        let mut ran = 0;
        for entry in self.entries.iter_mut().filter(|e| e.event == event) {
            (entry.callback)(subject, event);
            ran += 1;
        }
        ran
    }
}

impl<S> Default for Observers<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for Observers<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| (e.tag, e.event)))
            .finish()
    }
}

/// Fires `event` on a subject that owns its observer list.
///
/// The list is moved out of the subject for the duration of the call so
/// callbacks can borrow the subject.
pub(crate) fn fire<S>(
    subject: &mut S,
    observers: impl Fn(&mut S) -> &mut Observers<S>,
    event: EventId,
) -> usize {
    let mut list = std::mem::take(observers(subject));
    let ran = list.invoke(subject, event);
    let slot = observers(subject);
    // Keep anything registered on the subject while the list was out.
    list.entries.append(&mut slot.entries);
    list.next_tag = list.next_tag.max(slot.next_tag);
    *slot = list;
    ran
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[derive(Default)]
    struct Subject {
        value: i32,
        observers: Observers<Subject>,
    }

    #[test]
    fn callbacks_run_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut obs: Observers<i32> = Observers::new();
        for name in ["a", "b", "c"] {
            let log = log.clone();
            obs.add(EventId::Interaction, move |_, _| log.borrow_mut().push(name));
        }
        assert_eq!(obs.invoke(&0, EventId::Interaction), 3);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn only_matching_event_runs() {
        let hits = Rc::new(RefCell::new(0));
        let mut obs: Observers<i32> = Observers::new();
        let h = hits.clone();
        obs.add(EventId::EndInteraction, move |_, _| *h.borrow_mut() += 1);

        assert_eq!(obs.invoke(&0, EventId::Interaction), 0);
        assert_eq!(obs.invoke(&0, EventId::EndInteraction), 1);
        assert_eq!(*hits.borrow(), 1);
        assert!(obs.has(EventId::EndInteraction));
        assert!(!obs.has(EventId::StartInteraction));
    }

    #[test]
    fn removed_observer_no_longer_runs() {
        let mut obs: Observers<i32> = Observers::new();
        let tag = obs.add(EventId::Interaction, |_, _| panic!("removed"));
        assert!(obs.remove(tag));
        assert!(!obs.remove(tag));
        assert_eq!(obs.invoke(&0, EventId::Interaction), 0);
    }

    #[test]
    fn fire_lends_the_subject_to_callbacks() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut s = Subject { value: 7, ..Default::default() };
        let seen2 = seen.clone();
        s.observers.add(EventId::Modified, move |subj: &Subject, _| seen2.borrow_mut().push(subj.value));

        assert_eq!(fire(&mut s, |s| &mut s.observers, EventId::Modified), 1);
        s.value = 8;
        fire(&mut s, |s| &mut s.observers, EventId::Modified);

        assert_eq!(*seen.borrow(), vec![7, 8]);
        assert_eq!(s.observers.len(), 1);
    }
}
