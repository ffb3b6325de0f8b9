use crate::animation::keyframe::{Keyframe, KeyframeAnimation};
use crate::animation::pose::Pose;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{KeystageError, KeystageResult};
use crate::foundation::math::Fnv1a64;
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

/// Ordered keyframes of one animatable object, unique by frame and never empty.
///
/// Tracks are values: edits produce a new track and leave the old one untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct Track<P> {
    keys: BTreeMap<FrameIndex, Keyframe<P>>,
}

impl<P: Pose> Track<P> {
    pub fn new(first: Keyframe<P>) -> Self {
        let mut keys = BTreeMap::new();
        keys.insert(first.frame, first);
        Self { keys }
    }

    /// Single default-pose keyframe at frame 0; used when a track would otherwise be empty.
    pub fn fallback() -> Self {
        Self::new(Keyframe::new(FrameIndex(0), P::default()))
    }

    /// Build a track from loose keyframes. Empty input and duplicate frames are errors.
    pub fn try_from_keyframes(keyframes: Vec<Keyframe<P>>) -> KeystageResult<Self> {
        if keyframes.is_empty() {
            return Err(KeystageError::animation("track has no keyframes"));
        }
        let mut keys = BTreeMap::new();
        for k in keyframes {
            let frame = k.frame;
            if keys.insert(frame, k).is_some() {
                return Err(KeystageError::animation(format!(
                    "duplicate keyframe at frame {}",
                    frame.0
                )));
            }
        }
        Ok(Self { keys })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keyframes(&self) -> impl DoubleEndedIterator<Item = &Keyframe<P>> + '_ {
        self.keys.values()
    }

    pub fn get(&self, frame: FrameIndex) -> Option<&Keyframe<P>> {
        self.keys.get(&frame)
    }

    pub fn first(&self) -> Option<&Keyframe<P>> {
        self.keys.values().next()
    }

    pub fn last(&self) -> Option<&Keyframe<P>> {
        self.keys.values().next_back()
    }

    /// Keyframes with `start <= frame <= end`.
    pub fn keyframes_in_range(
        &self,
        start: FrameIndex,
        end: FrameIndex,
    ) -> impl Iterator<Item = &Keyframe<P>> + '_ {
        let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
        self.keys.range(lo..=hi).map(|(_, k)| k)
    }

    /// Greatest keyframe strictly before `frame`.
    pub fn before(&self, frame: FrameIndex) -> Option<&Keyframe<P>> {
        self.keys.range(..frame).next_back().map(|(_, k)| k)
    }

    /// Least keyframe strictly after `frame`.
    pub fn after(&self, frame: FrameIndex) -> Option<&Keyframe<P>> {
        self.keys
            .range((Bound::Excluded(frame), Bound::Unbounded))
            .next()
            .map(|(_, k)| k)
    }

    /// Pose of the track at `frame`.
    ///
    /// Exact hits return the stored keyframe untouched. Frames before the first or after the
    /// last keyframe clamp to that boundary keyframe. A segment that starts on a hold keyframe
    /// is frozen at that keyframe's pose. Otherwise the pose is interpolated with the easing of
    /// the segment's closing keyframe; the returned keyframe carries the requested frame and no
    /// animation metadata.
    pub fn sample(&self, frame: FrameIndex) -> Keyframe<P> {
        if let Some(k) = self.keys.get(&frame) {
            return k.clone();
        }
        let (prev, next) = match (self.before(frame), self.after(frame)) {
            (None, Some(next)) => return next.clone(),
            (Some(prev), None) => return prev.clone(),
            (Some(prev), Some(next)) => (prev, next),
            // Only reachable for an empty track; sample the default pose.
            (None, None) => return Keyframe::new(FrameIndex(0), P::default()),
        };
        if prev.hold {
            let mut held = prev.clone();
            held.frame = frame;
            return held;
        }
        let t = segment_progress(prev, next, frame);
        Keyframe::new(frame, P::lerp(&prev.pose, &next.pose, t))
    }

    /// Stable content hash; changes whenever any keyframe changes.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_u64(self.keys.len() as u64);
        for k in self.keys.values() {
            h.write_u64(k.frame.0);
            k.pose.for_each_component(&mut |v| h.write_f64(v));
            match k.animation {
                None => h.write_u8(0),
                Some(a) => {
                    h.write_u8(1);
                    write_animation(&mut h, a);
                }
            }
            h.write_u8(u8::from(k.hold));
        }
        h.finish()
    }

    /// Drop keyframes after `max_frame`. Returns the surviving track (if any keyframe is left)
    /// and the number of keyframes dropped.
    pub fn retain_within(&self, max_frame: FrameIndex) -> (Option<Self>, usize) {
        let keys: BTreeMap<_, _> = self
            .keys
            .range(..=max_frame)
            .map(|(f, k)| (*f, k.clone()))
            .collect();
        let dropped = self.keys.len() - keys.len();
        if keys.is_empty() {
            (None, dropped)
        } else {
            (Some(Self { keys }), dropped)
        }
    }

    /// Copy of the track with `keyframe` stored at its frame, replacing any keyframe there.
    pub(crate) fn with_keyframe(&self, keyframe: Keyframe<P>) -> Self {
        let mut keys = self.keys.clone();
        keys.insert(keyframe.frame, keyframe);
        Self { keys }
    }

    /// Copy of the track without the keyframe at `frame`. The last keyframe is never removed.
    pub(crate) fn without_keyframe(&self, frame: FrameIndex) -> Option<Self> {
        if self.keys.len() <= 1 || !self.keys.contains_key(&frame) {
            return None;
        }
        let mut keys = self.keys.clone();
        keys.remove(&frame);
        Some(Self { keys })
    }
}

impl<P: serde::Serialize> serde::Serialize for Track<P> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.keys.values())
    }
}

/// Eased interpolation fraction of `frame` on the segment `prev -> next`.
///
/// A duration on `next` replaces the keyframe gap as the denominator, so the segment can
/// finish early and rest on `next`'s pose.
pub(crate) fn segment_progress<P>(prev: &Keyframe<P>, next: &Keyframe<P>, frame: FrameIndex) -> f64 {
    let elapsed = frame.since(prev.frame) as f64;
    let raw = match next.animation.and_then(|a| a.effective_duration()) {
        Some(d) => (elapsed / d as f64).min(1.0),
        None => {
            let gap = next.frame.since(prev.frame);
            if gap == 0 {
                return 1.0;
            }
            elapsed / gap as f64
        }
    };
    next.curve().apply(raw)
}

fn write_animation(h: &mut Fnv1a64, a: KeyframeAnimation) {
    h.write_bytes(a.kind.as_str().as_bytes());
    h.write_u64(a.duration.unwrap_or(0));
    match a.easing {
        None => h.write_u8(0),
        Some(e) => h.write_bytes(e.as_str().as_bytes()),
    }
}

/// Per-frame sample cache keyed by `(track fingerprint, frame)`.
///
/// Tracks are immutable values, so a fingerprint identifies content; stale entries are simply
/// never hit again. The cache is cleared wholesale once it reaches its capacity.
#[derive(Debug)]
pub struct SampleMemo<P> {
    entries: HashMap<(u64, FrameIndex), Keyframe<P>>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl<P: Pose> SampleMemo<P> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    pub fn sample(&mut self, track: &Track<P>, frame: FrameIndex) -> Keyframe<P> {
        self.sample_keyed(track.fingerprint(), track, frame)
    }

    /// Like [`SampleMemo::sample`] with a precomputed fingerprint.
    pub fn sample_keyed(&mut self, fingerprint: u64, track: &Track<P>, frame: FrameIndex) -> Keyframe<P> {
        if let Some(k) = self.entries.get(&(fingerprint, frame)) {
            self.hits += 1;
            return k.clone();
        }
        self.misses += 1;
        if self.entries.len() >= self.capacity {
            self.entries.clear();
        }
        let k = track.sample(frame);
        self.entries.insert((fingerprint, frame), k.clone());
        k
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<P: Pose> Default for SampleMemo<P> {
    fn default() -> Self {
        Self::with_capacity(4096)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/track.rs"]
mod tests;
