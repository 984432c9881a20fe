/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

const TICK_INTERVAL: Duration = Duration::from_secs(5);

/// Exponentially weighted moving average of a per-second rate.
#[derive(Debug)]
struct Ewma {
    alpha: f64,
    rate: f64,
    uncounted: i64,
    init: bool,
}

impl Ewma {
    fn with_minutes(minutes: f64) -> Self {
        Ewma {
            alpha: 1.0 - (-TICK_INTERVAL.as_secs_f64() / 60.0 / minutes).exp(),
            rate: 0.0,
            uncounted: 0,
            init: false,
        }
    }

    fn update(&mut self, n: i64) {
        self.uncounted += n;
    }

    fn tick(&mut self) {
        let instant_rate = self.uncounted as f64 / TICK_INTERVAL.as_secs_f64();
        self.uncounted = 0;
        if self.init {
            self.rate += self.alpha * (instant_rate - self.rate);
        } else {
            self.rate = instant_rate;
            self.init = true;
        }
    }

    /// Applies `n` ticks. All but the first see no new events.
    fn tick_n(&mut self, n: u32) {
        if n == 0 {
            return;
        }
        self.tick();
        if n > 1 {
            self.rate *= (1.0 - self.alpha).powi((n - 1) as i32);
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeterSnapshot {
    count: i64,
    rate1: f64,
    rate5: f64,
    rate15: f64,
    rate_mean: f64,
}

impl MeterSnapshot {
    pub fn count(&self) -> i64 {
        self.count
    }

    pub fn rate1(&self) -> f64 {
        self.rate1
    }

    pub fn rate5(&self) -> f64 {
        self.rate5
    }

    pub fn rate15(&self) -> f64 {
        self.rate15
    }

    pub fn rate_mean(&self) -> f64 {
        self.rate_mean
    }
}

#[derive(Debug)]
struct MeterState {
    count: i64,
    a1: Ewma,
    a5: Ewma,
    a15: Ewma,
    start: Instant,
    last_tick: Instant,
    stopped_at: Option<Instant>,
}

impl MeterState {
    fn new(now: Instant) -> Self {
        MeterState {
            count: 0,
            a1: Ewma::with_minutes(1.0),
            a5: Ewma::with_minutes(5.0),
            a15: Ewma::with_minutes(15.0),
            start: now,
            last_tick: now,
            stopped_at: None,
        }
    }

    fn tick_if_necessary(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_tick);
        if elapsed < TICK_INTERVAL {
            return;
        }
        let ticks = (elapsed.as_nanos() / TICK_INTERVAL.as_nanos()).min(u32::MAX as u128) as u32;
        self.last_tick += TICK_INTERVAL * ticks;
        self.a1.tick_n(ticks);
        self.a5.tick_n(ticks);
        self.a15.tick_n(ticks);
    }

    fn mark(&mut self, now: Instant, n: i64) {
        if self.stopped_at.is_some() {
            return;
        }
        self.tick_if_necessary(now);
        self.count += n;
        self.a1.update(n);
        self.a5.update(n);
        self.a15.update(n);
    }

    fn snapshot(&mut self, now: Instant) -> MeterSnapshot {
        let now = match self.stopped_at {
            Some(t) => t,
            None => {
                self.tick_if_necessary(now);
                now
            }
        };
        let elapsed = now.saturating_duration_since(self.start).as_secs_f64();
        let rate_mean = if elapsed > 0.0 {
            self.count as f64 / elapsed
        } else {
            0.0
        };
        MeterSnapshot {
            count: self.count,
            rate1: self.a1.rate,
            rate5: self.a5.rate,
            rate15: self.a15.rate,
            rate_mean,
        }
    }

    fn stop(&mut self, now: Instant) {
        if self.stopped_at.is_none() {
            self.tick_if_necessary(now);
            self.stopped_at = Some(now);
        }
    }
}

/// Counts events and tracks their 1, 5 and 15 minute rates.
///
/// The moving averages advance every 5 seconds. Ticks are applied lazily when
/// the meter is marked or read.
#[derive(Clone, Debug)]
pub struct Meter {
    state: Arc<Mutex<MeterState>>,
}

impl Default for Meter {
    fn default() -> Self {
        Meter::new()
    }
}

impl Meter {
    pub fn new() -> Self {
        Meter {
            state: Arc::new(Mutex::new(MeterState::new(Instant::now()))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MeterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn mark(&self, n: i64) {
        self.lock().mark(Instant::now(), n);
    }

    pub fn count(&self) -> i64 {
        self.lock().count
    }

    pub fn snapshot(&self) -> MeterSnapshot {
        self.lock().snapshot(Instant::now())
    }

    /// Freezes the meter. Later marks are ignored and snapshots keep the
    /// values seen at stop time.
    pub fn stop(&self) {
        self.lock().stop(Instant::now());
    }

    pub fn is_stopped(&self) -> bool {
        self.lock().stopped_at.is_some()
    }

    pub(crate) fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}
