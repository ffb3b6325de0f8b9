use crate::foundation::core::ObjectId;
use std::collections::{HashMap, HashSet};

/// Read-only view the evaluator needs: is a decoded image ready for this object?
pub trait ImageAvailability {
    fn has_image(&self, id: ObjectId) -> bool;
}

impl ImageAvailability for HashSet<ObjectId> {
    fn has_image(&self, id: ObjectId) -> bool {
        self.contains(&id)
    }
}

/// Handle for one in-flight load. Only the most recent ticket for an object can complete it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    pub id: ObjectId,
    seq: u64,
}

/// Outcome of [`ImageCache::request`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageRequest {
    /// Image is already decoded.
    Ready,
    /// A load for the same source is already running.
    InFlight(LoadTicket),
    /// Caller should start loading and report back with this ticket.
    Started(LoadTicket),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

type LoadCallback = Box<dyn FnMut(ObjectId)>;

struct Pending {
    seq: u64,
    src: String,
}

struct Entry<I> {
    src: String,
    image: I,
}

/// Decoded images keyed by object id.
///
/// Loads are driven by the caller: `request` hands out a ticket, the host decodes the source
/// however it likes, and `complete` stores the result and notifies every registered callback.
/// `I` is whatever decoded image type the host renders with.
pub struct ImageCache<I> {
    ready: HashMap<ObjectId, Entry<I>>,
    pending: HashMap<ObjectId, Pending>,
    callbacks: Vec<(CallbackId, LoadCallback)>,
    next_seq: u64,
}

impl<I> Default for ImageCache<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> std::fmt::Debug for ImageCache<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCache")
            .field("ready", &self.ready.len())
            .field("pending", &self.pending.len())
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

impl<I> ImageCache<I> {
    pub fn new() -> Self {
        Self {
            ready: HashMap::new(),
            pending: HashMap::new(),
            callbacks: Vec::new(),
            next_seq: 1,
        }
    }

    /// Ask for the image of `id` decoded from `src`.
    ///
    /// A different `src` than the cached or pending one supersedes it; the old ticket then
    /// becomes stale and its completion is ignored.
    pub fn request(&mut self, id: ObjectId, src: &str) -> ImageRequest {
        if self.ready.get(&id).is_some_and(|e| e.src == src) {
            return ImageRequest::Ready;
        }
        if let Some(p) = self.pending.get(&id)
            && p.src == src
        {
            return ImageRequest::InFlight(LoadTicket { id, seq: p.seq });
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.insert(
            id,
            Pending {
                seq,
                src: src.to_owned(),
            },
        );
        tracing::debug!(%id, src, "image load started");
        ImageRequest::Started(LoadTicket { id, seq })
    }

    /// Store a decoded image. Returns `false` for stale or unknown tickets.
    pub fn complete(&mut self, ticket: LoadTicket, image: I) -> bool {
        let Some(p) = self.pending.get(&ticket.id) else {
            return false;
        };
        if p.seq != ticket.seq {
            tracing::debug!(id = %ticket.id, "stale image load ignored");
            return false;
        }
        let Some(p) = self.pending.remove(&ticket.id) else {
            return false;
        };
        self.ready.insert(ticket.id, Entry { src: p.src, image });
        for (_, cb) in &mut self.callbacks {
            cb(ticket.id);
        }
        true
    }

    /// Abandon a load; the object keeps rendering as a placeholder.
    pub fn fail(&mut self, ticket: LoadTicket) {
        if self.pending.get(&ticket.id).is_some_and(|p| p.seq == ticket.seq) {
            self.pending.remove(&ticket.id);
            tracing::warn!(id = %ticket.id, "image load failed");
        }
    }

    pub fn get(&self, id: ObjectId) -> Option<&I> {
        self.ready.get(&id).map(|e| &e.image)
    }

    pub fn is_pending(&self, id: ObjectId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn evict(&mut self, id: ObjectId) -> Option<I> {
        self.pending.remove(&id);
        self.ready.remove(&id).map(|e| e.image)
    }

    /// Register a callback invoked with the object id after every successful load.
    pub fn on_load(&mut self, cb: impl FnMut(ObjectId) + 'static) -> CallbackId {
        let id = CallbackId(self.next_seq);
        self.next_seq += 1;
        self.callbacks.push((id, Box::new(cb)));
        id
    }

    pub fn remove_callback(&mut self, id: CallbackId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(c, _)| *c != id);
        self.callbacks.len() != before
    }
}

impl<I> ImageAvailability for ImageCache<I> {
    fn has_image(&self, id: ObjectId) -> bool {
        self.ready.contains_key(&id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/images.rs"]
mod tests;
