//! Frame sequence storage with background loading.
//!
//! Loads run on a dedicated rayon pool and report back over a channel. The owning (UI) thread
//! observes completions by calling [`FrameStore::pump`], which never blocks. Slot state is only
//! ever mutated on the owning thread.

use std::{
    collections::VecDeque,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc,
    },
    time::{Duration, Instant},
};

use crate::{
    assets::{
        decode::{DecodedFrame, decode_frame},
        source::FrameSource,
        template::FrameTemplate,
    },
    foundation::error::{ReelError, ReelResult},
};

/// Load state of one frame slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameState {
    /// Not requested yet (or evicted).
    Pending,
    /// Queued or in flight.
    Loading,
    /// Decoded and resident.
    Ready,
    /// Fetch or decode failed; the slot stays unavailable.
    Failed,
}

/// Completion notification produced by [`FrameStore::pump`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadEvent {
    /// Frame decoded and resident.
    Ready {
        /// Sequence position.
        index: usize,
    },
    /// Frame could not be fetched or decoded.
    Failed {
        /// Sequence position.
        index: usize,
        /// Rendered error.
        reason: String,
    },
}

impl LoadEvent {
    /// Sequence position the event is about.
    pub fn index(&self) -> usize {
        match self {
            Self::Ready { index } | Self::Failed { index, .. } => *index,
        }
    }
}

/// Loader tuning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StoreOpts {
    /// Worker threads decoding frames.
    pub threads: usize,
    /// Keep at most this many decoded frames resident; least recently used are evicted.
    pub max_resident: Option<usize>,
}

impl Default for StoreOpts {
    fn default() -> Self {
        Self {
            threads: 4,
            max_resident: None,
        }
    }
}

struct Slot {
    state: FrameState,
    frame: Option<Arc<DecodedFrame>>,
}

struct LoadMsg {
    index: usize,
    result: ReelResult<DecodedFrame>,
}

type LoadCallback = Box<dyn FnMut(&LoadEvent)>;

/// Ordered flipbook of frames addressed by 0-based index.
pub struct FrameStore {
    paths: Vec<String>,
    slots: Vec<Slot>,
    source: Arc<dyn FrameSource>,
    pool: rayon::ThreadPool,
    tx: mpsc::Sender<LoadMsg>,
    rx: mpsc::Receiver<LoadMsg>,
    cancel: Arc<AtomicBool>,
    on_load: Option<LoadCallback>,
    max_resident: Option<usize>,
    lru: VecDeque<usize>,
    first_settled: bool,
}

impl std::fmt::Debug for FrameStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameStore")
            .field("len", &self.paths.len())
            .field("ready", &self.ready_count())
            .field("failed", &self.failed_count())
            .field("shut_down", &self.is_shut_down())
            .finish()
    }
}

impl FrameStore {
    /// Build the store for every frame the template names. Nothing is requested yet.
    pub fn initialize(
        template: &FrameTemplate,
        source: Arc<dyn FrameSource>,
        opts: StoreOpts,
    ) -> ReelResult<Self> {
        template.validate()?;
        Self::from_paths(template.paths(), source, opts)
    }

    /// Build the store from an explicit path list (may be empty).
    pub fn from_paths(
        paths: Vec<String>,
        source: Arc<dyn FrameSource>,
        opts: StoreOpts,
    ) -> ReelResult<Self> {
        if opts.threads == 0 {
            return Err(ReelError::validation("loader threads must be > 0"));
        }
        if opts.max_resident == Some(0) {
            return Err(ReelError::validation("max_resident must be > 0 when set"));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(opts.threads)
            .thread_name(|i| format!("scrollreel-loader-{i}"))
            .build()
            .map_err(|e| ReelError::Other(anyhow::Error::new(e)))?;
        let (tx, rx) = mpsc::channel();
        let slots = paths
            .iter()
            .map(|_| Slot {
                state: FrameState::Pending,
                frame: None,
            })
            .collect();

        tracing::debug!(frames = paths.len(), threads = opts.threads, "frame store initialized");
        Ok(Self {
            paths,
            slots,
            source,
            pool,
            tx,
            rx,
            cancel: Arc::new(AtomicBool::new(false)),
            on_load: None,
            max_resident: opts.max_resident,
            lru: VecDeque::new(),
            first_settled: false,
        })
    }

    /// Register a callback invoked from [`Self::pump`] for every completed load.
    pub fn set_on_load(&mut self, cb: impl FnMut(&LoadEvent) + 'static) {
        self.on_load = Some(Box::new(cb));
    }

    /// Frames in the sequence.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the sequence has no frames.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Asset path of frame `index`.
    pub fn path(&self, index: usize) -> Option<&str> {
        self.paths.get(index).map(String::as_str)
    }

    /// Load state of frame `index`, `None` out of range.
    pub fn state(&self, index: usize) -> Option<FrameState> {
        self.slots.get(index).map(|s| s.state)
    }

    /// True until frame 0 has either loaded or failed. Later eviction of frame 0 does not
    /// re-enter the loading state.
    pub fn is_loading(&self) -> bool {
        !self.paths.is_empty() && !self.first_settled
    }

    /// Frames currently resident.
    pub fn ready_count(&self) -> usize {
        self.count(FrameState::Ready)
    }

    /// Frames that failed to load.
    pub fn failed_count(&self) -> usize {
        self.count(FrameState::Failed)
    }

    fn count(&self, state: FrameState) -> usize {
        self.slots.iter().filter(|s| s.state == state).count()
    }

    /// Whether [`Self::shutdown`] has run.
    pub fn is_shut_down(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }

    /// Eagerly request the first `count` frames, frame 0 first.
    #[tracing::instrument(skip(self))]
    pub fn preload(&mut self, count: usize) -> usize {
        let n = count.min(self.len());
        (0..n).filter(|&i| self.request(i)).count()
    }

    /// Request one frame. Returns `true` if a load was queued by this call.
    pub fn request(&mut self, index: usize) -> bool {
        if self.is_shut_down() {
            return false;
        }
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        if slot.state != FrameState::Pending {
            return false;
        }
        slot.state = FrameState::Loading;

        let tx = self.tx.clone();
        let cancel = Arc::clone(&self.cancel);
        let source = Arc::clone(&self.source);
        let path = self.paths[index].clone();
        self.pool.spawn(move || {
            if cancel.load(Ordering::Acquire) {
                return;
            }
            let result = source.fetch(&path).and_then(|bytes| decode_frame(&bytes));
            if cancel.load(Ordering::Acquire) {
                return;
            }
            // Receiver gone means the store was dropped; nothing to report to.
            let _ = tx.send(LoadMsg { index, result });
        });
        true
    }

    /// Apply every completed load without blocking.
    pub fn pump(&mut self) -> Vec<LoadEvent> {
        let mut events = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            if let Some(ev) = self.settle(msg) {
                events.push(ev);
            }
        }
        self.notify(&events);
        events
    }

    /// Block until `done` holds or `timeout` elapses, applying completions as they arrive.
    ///
    /// For headless hosts (CLI rendering, tests). Interactive hosts call [`Self::pump`] per tick.
    pub fn pump_until(
        &mut self,
        timeout: Duration,
        mut done: impl FnMut(&Self) -> bool,
    ) -> Vec<LoadEvent> {
        let deadline = Instant::now() + timeout;
        let mut events = self.pump();
        while !done(self) && !self.is_shut_down() {
            let now = Instant::now();
            if now >= deadline || !self.has_in_flight() {
                break;
            }
            match self.rx.recv_timeout(deadline - now) {
                Ok(msg) => {
                    if let Some(ev) = self.settle(msg) {
                        self.notify(std::slice::from_ref(&ev));
                        events.push(ev);
                    }
                }
                Err(_) => break,
            }
        }
        events
    }

    /// Any load queued and not yet settled.
    pub fn has_in_flight(&self) -> bool {
        self.slots.iter().any(|s| s.state == FrameState::Loading)
    }

    fn notify(&mut self, events: &[LoadEvent]) {
        if let Some(cb) = self.on_load.as_mut() {
            for ev in events {
                cb(ev);
            }
        }
    }

    fn settle(&mut self, msg: LoadMsg) -> Option<LoadEvent> {
        let slot = self.slots.get_mut(msg.index)?;
        if slot.state != FrameState::Loading {
            return None;
        }
        if msg.index == 0 {
            self.first_settled = true;
        }
        match msg.result {
            Ok(frame) => {
                slot.state = FrameState::Ready;
                slot.frame = Some(Arc::new(frame));
                tracing::debug!(index = msg.index, "frame ready");
                self.touch(msg.index);
                self.evict_over_budget(msg.index);
                Some(LoadEvent::Ready { index: msg.index })
            }
            Err(err) => {
                slot.state = FrameState::Failed;
                tracing::warn!(
                    index = msg.index,
                    path = %self.paths[msg.index],
                    error = %err,
                    "frame failed to load"
                );
                Some(LoadEvent::Failed {
                    index: msg.index,
                    reason: err.to_string(),
                })
            }
        }
    }

    /// Decoded frame at `index` if resident, marking it recently used.
    pub fn get(&mut self, index: usize) -> Option<Arc<DecodedFrame>> {
        let frame = self.slots.get(index)?.frame.clone()?;
        self.touch(index);
        Some(frame)
    }

    /// Decoded frame at `index` if resident, without touching recency.
    pub fn peek(&self, index: usize) -> Option<&Arc<DecodedFrame>> {
        self.slots.get(index)?.frame.as_ref()
    }

    fn touch(&mut self, index: usize) {
        if self.max_resident.is_none() {
            return;
        }
        if let Some(pos) = self.lru.iter().position(|&i| i == index) {
            self.lru.remove(pos);
        }
        self.lru.push_back(index);
    }

    fn evict_over_budget(&mut self, keep: usize) {
        let Some(max) = self.max_resident else {
            return;
        };
        while self.lru.len() > max {
            let Some(old) = self.lru.pop_front() else {
                break;
            };
            if old == keep {
                self.lru.push_back(old);
                continue;
            }
            if let Some(slot) = self.slots.get_mut(old) {
                slot.frame = None;
                slot.state = FrameState::Pending;
                tracing::trace!(index = old, "frame evicted");
            }
        }
    }

    /// Cancel in-flight loads and refuse new ones. Completions still queued are discarded.
    pub fn shutdown(&mut self) {
        if self.cancel.swap(true, Ordering::AcqRel) {
            return;
        }
        while self.rx.try_recv().is_ok() {}
        for slot in &mut self.slots {
            if slot.state == FrameState::Loading {
                slot.state = FrameState::Pending;
            }
        }
        self.on_load = None;
        tracing::debug!(frames = self.paths.len(), "frame store shut down");
    }
}

impl Drop for FrameStore {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
