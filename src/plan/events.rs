use std::fmt::{self, Debug};

use uuid::Uuid;

use super::waypoint::{PointOfInterest, Waypoint};

/// The stream a [`ChangeEvent`] is published on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeStream {
    /// A change that is not tied to a single field (bulk edits, parsing, clearing).
    Changed,
    Name,
    Mavlink,
    TakeOff,
    TouchDown,
    Waypoints,
    PointsOfInterest,
}

/// A notification carrying a view of the new value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChangeEvent<'a> {
    Changed,
    Name(&'a str),
    Mavlink(&'a str),
    TakeOff(&'a Waypoint),
    TouchDown(&'a Waypoint),
    Waypoints(&'a [Waypoint]),
    PointsOfInterest(&'a [PointOfInterest]),
}

impl ChangeEvent<'_> {
    pub fn stream(&self) -> ChangeStream {
        match self {
            ChangeEvent::Changed => ChangeStream::Changed,
            ChangeEvent::Name(_) => ChangeStream::Name,
            ChangeEvent::Mavlink(_) => ChangeStream::Mavlink,
            ChangeEvent::TakeOff(_) => ChangeStream::TakeOff,
            ChangeEvent::TouchDown(_) => ChangeStream::TouchDown,
            ChangeEvent::Waypoints(_) => ChangeStream::Waypoints,
            ChangeEvent::PointsOfInterest(_) => ChangeStream::PointsOfInterest,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

pub type Listener = Box<dyn FnMut(&ChangeEvent<'_>)>;

struct Subscription {
    id: ListenerId,
    stream: Option<ChangeStream>,
    listener: Listener,
}

/// Listener registry with synchronous, in-order dispatch.
#[derive(Default)]
pub struct EventChannel {
    subscriptions: Vec<Subscription>,
}

impl EventChannel {
    /// `stream == None` receives every event.
    pub fn subscribe(&mut self, stream: Option<ChangeStream>, listener: Listener) -> ListenerId {
        let id = ListenerId(Uuid::new_v4());
        self.subscriptions.push(Subscription { id, stream, listener });
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|sub| sub.id != id);
        self.subscriptions.len() != before
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    pub fn emit(&mut self, event: ChangeEvent<'_>) {
        let stream = event.stream();
        tracing::trace!(?stream, listeners = self.subscriptions.len(), "Dispatching flight plan change");
        for sub in self.subscriptions.iter_mut() {
            if sub.stream.map_or(true, |s| s == stream) {
                (sub.listener)(&event);
            }
        }
    }
}

impl Debug for EventChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("listeners", &self.subscriptions.len())
            .finish()
    }
}
