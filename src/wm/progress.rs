// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sgpcore

//! Global progress tracking and cooperative cancellation.
//!
//! Uses atomics so it is safe to poll from worker threads. The pipelines
//! check the cancellation flag at transform boundaries (color split, DWT,
//! selection, modulation, recombination); a cancelled call returns
//! [`WmError::Cancelled`] and produces no output.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use super::error::WmError;

static STEP: AtomicU32 = AtomicU32::new(0);
static TOTAL: AtomicU32 = AtomicU32::new(0);
static CANCELLED: AtomicBool = AtomicBool::new(false);

/// Reset progress to 0 and set the total step count.
/// Also resets the cancellation flag so a fresh call starts clean.
pub fn init(total: u32) {
    CANCELLED.store(false, Ordering::Relaxed);
    STEP.store(0, Ordering::Relaxed);
    TOTAL.store(total, Ordering::Relaxed);
}

/// Request cancellation of the current operation.
pub fn cancel() {
    CANCELLED.store(true, Ordering::Relaxed);
}

/// Returns `true` if cancellation has been requested.
pub fn is_cancelled() -> bool {
    CANCELLED.load(Ordering::Relaxed)
}

/// Check for cancellation and return an error if requested.
///
/// Called at natural boundaries in the pipelines so long operations can be
/// abandoned without waiting for completion.
pub fn check_cancelled() -> Result<(), WmError> {
    if is_cancelled() {
        Err(WmError::Cancelled)
    } else {
        Ok(())
    }
}

/// Advance progress by one step. Capped at the total.
pub fn advance() {
    let total = TOTAL.load(Ordering::Relaxed);
    if total == 0 {
        STEP.fetch_add(1, Ordering::Relaxed);
    } else {
        let _ = STEP.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |s| {
            if s + 1 < total {
                Some(s + 1)
            } else {
                Some(s)
            }
        });
    }
}

/// Read the current (step, total) progress.
pub fn get() -> (u32, u32) {
    (
        STEP.load(Ordering::Relaxed),
        TOTAL.load(Ordering::Relaxed),
    )
}

/// Mark progress as complete (step = total).
pub fn finish() {
    let t = TOTAL.load(Ordering::Relaxed);
    STEP.store(t, Ordering::Relaxed);
}

// The progress state is process-global, so exercising it from unit tests
// would race with concurrently running pipeline tests. Cancellation is
// covered by the dedicated `tests/cancellation.rs` binary instead.
