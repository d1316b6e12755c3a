//! Shared state between the stream reader and the plot.
//!
//! The reader pushes decoded readings into a [`ScopeSink`]; the UI takes a
//! [`ScopeSnapshot`] each frame. Both sides hold the lock only for the append
//! (plus bounds recompute) or for the copy.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Local};

use crate::data::buffer::{Bounds, RollingBuffer, INITIAL_BOUNDS};
use crate::data::line::Reading;

/// Everything the plot needs, guarded by the sink's mutex.
#[derive(Debug, Clone)]
pub struct ScopeData {
    pub buffer: RollingBuffer,
    pub bounds: Bounds,
    pub samples_received: u64,
    pub last_label: Option<String>,
    pub last_sample_at: Option<DateTime<Local>>,
}

impl ScopeData {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: RollingBuffer::new(capacity),
            bounds: INITIAL_BOUNDS,
            samples_received: 0,
            last_label: None,
            last_sample_at: None,
        }
    }
}

/// Owned copy of [`ScopeData`] used for one redraw.
#[derive(Debug, Clone)]
pub struct ScopeSnapshot {
    pub values: Vec<i64>,
    pub points: Vec<[f64; 2]>,
    pub bounds: Bounds,
    pub capacity: usize,
    pub samples_received: u64,
    pub last_label: Option<String>,
    pub last_sample_at: Option<DateTime<Local>>,
}

impl ScopeSnapshot {
    pub fn last_value(&self) -> Option<i64> {
        self.values.last().copied()
    }
}

/// Cloneable handle feeding readings into the shared buffer.
#[derive(Clone)]
pub struct ScopeSink {
    inner: Arc<Mutex<ScopeData>>,
}

impl ScopeSink {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ScopeData::new(capacity))),
        }
    }

    // A panic on the other side must not take the display down with it.
    fn lock(&self) -> MutexGuard<'_, ScopeData> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append a reading and recompute the display bounds in one step.
    pub fn push(&self, reading: Reading) {
        let mut data = self.lock();
        data.buffer.append(reading.value);
        data.bounds = data.buffer.current_bounds();
        data.samples_received += 1;
        data.last_label = Some(reading.label);
        data.last_sample_at = Some(Local::now());
    }

    pub fn snapshot(&self) -> ScopeSnapshot {
        let data = self.lock();
        ScopeSnapshot {
            values: data.buffer.to_vec(),
            points: data.buffer.points(),
            bounds: data.bounds,
            capacity: data.buffer.capacity(),
            samples_received: data.samples_received,
            last_label: data.last_label.clone(),
            last_sample_at: data.last_sample_at,
        }
    }

    pub fn values(&self) -> Vec<i64> {
        self.lock().buffer.to_vec()
    }

    pub fn bounds(&self) -> Bounds {
        self.lock().bounds
    }

    pub fn samples_received(&self) -> u64 {
        self.lock().samples_received
    }
}
