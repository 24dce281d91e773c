//! Process-wide registry of named gauge and counter instruments.
//!
//! [`MetricsRegistry`] is a cheap-to-clone handle around shared storage.
//! Instruments are registered once at startup and never removed. Writers
//! update values through [`GaugeHandle`] and [`CounterHandle`]; readers
//! render the full text exposition or take an allow-listed snapshot.
//!
//! # Consistency
//!
//! Every single instrument update is atomic. On top of that, a writer can
//! hold a [`PublishGuard`] while it pushes a batch of related updates;
//! [`MetricsRegistry::render_exposition`] and [`MetricsRegistry::snapshot`]
//! wait for the guard, so a reader never sees half of a batch.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use garden_types::{MetricKind, MetricSample, MetricsSnapshot};
use prometheus::{Counter, Encoder, Gauge, Opts, Registry, TextEncoder};
use tracing::debug;

use crate::error::RegistryError;

/// Content type of the pull-format text exposition.
pub const EXPOSITION_CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

/// Handle to a registered gauge.
#[derive(Clone)]
pub struct GaugeHandle {
    name: Arc<str>,
    gauge: Gauge,
    touched: Arc<AtomicBool>,
}

impl GaugeHandle {
    /// Overwrite the gauge's current value.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NonFinite`] if `value` is NaN or infinite.
    /// The gauge keeps its previous value in that case.
    pub fn set(&self, value: f64) -> Result<(), RegistryError> {
        if !value.is_finite() {
            return Err(RegistryError::NonFinite {
                name: self.name.to_string(),
                value,
            });
        }
        self.gauge.set(value);
        self.touched.store(true, Ordering::Release);
        Ok(())
    }

    /// The current value, or `None` if the gauge has never been set.
    pub fn value(&self) -> Option<f64> {
        self.touched
            .load(Ordering::Acquire)
            .then(|| self.gauge.get())
    }

    /// The registered metric name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for GaugeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GaugeHandle")
            .field("name", &self.name)
            .field("value", &self.value())
            .finish()
    }
}

/// Handle to a registered counter.
#[derive(Clone)]
pub struct CounterHandle {
    name: Arc<str>,
    counter: Counter,
}

impl CounterHandle {
    /// Increment the counter by one.
    pub fn inc(&self) {
        self.counter.inc();
    }

    /// Increment the counter by `delta`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidIncrement`] if `delta` is negative
    /// or not finite. The counter is left unchanged.
    pub fn inc_by(&self, delta: f64) -> Result<(), RegistryError> {
        if !delta.is_finite() || delta < 0.0 {
            return Err(RegistryError::InvalidIncrement {
                name: self.name.to_string(),
                delta,
            });
        }
        self.counter.inc_by(delta);
        Ok(())
    }

    /// The accumulated value.
    pub fn value(&self) -> f64 {
        self.counter.get()
    }

    /// The registered metric name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for CounterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CounterHandle")
            .field("name", &self.name)
            .field("value", &self.value())
            .finish()
    }
}

/// A registered instrument together with its identity.
#[derive(Debug, Clone)]
struct Instrument {
    name: String,
    help: String,
    handle: InstrumentHandle,
}

#[derive(Debug, Clone)]
enum InstrumentHandle {
    Gauge(GaugeHandle),
    Counter(CounterHandle),
}

impl Instrument {
    const fn kind(&self) -> MetricKind {
        match self.handle {
            InstrumentHandle::Gauge(_) => MetricKind::Gauge,
            InstrumentHandle::Counter(_) => MetricKind::Counter,
        }
    }

    fn value(&self) -> Option<f64> {
        match &self.handle {
            InstrumentHandle::Gauge(gauge) => gauge.value(),
            InstrumentHandle::Counter(counter) => Some(counter.value()),
        }
    }
}

#[derive(Default)]
struct RegistryInner {
    /// Backing exposition registry; also holds collectors we do not list.
    registry: Registry,
    /// Named instruments in registration order.
    instruments: RwLock<Vec<Instrument>>,
    /// Held for writing while a batch of updates is published.
    view: RwLock<()>,
}

impl fmt::Debug for RegistryInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let instruments = self
            .instruments
            .read()
            .map_or(0, |instruments| instruments.len());
        f.debug_struct("RegistryInner")
            .field("instruments", &instruments)
            .finish_non_exhaustive()
    }
}

/// Guard held by a writer while it publishes a batch of updates.
///
/// Readers block until the guard is dropped.
#[derive(Debug)]
pub struct PublishGuard<'a> {
    _guard: RwLockWriteGuard<'a, ()>,
}

/// Shared registry of metric instruments.
#[derive(Debug, Clone, Default)]
pub struct MetricsRegistry {
    inner: Arc<RegistryInner>,
}

impl MetricsRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a gauge.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] if `name` is already taken, or
    /// [`RegistryError::Prometheus`] if the name or help is invalid.
    pub fn register_gauge(&self, name: &str, help: &str) -> Result<GaugeHandle, RegistryError> {
        let mut instruments = self.write_instruments();
        ensure_unique(&instruments, name)?;

        let gauge = Gauge::with_opts(Opts::new(name, help))?;
        self.inner.registry.register(Box::new(gauge.clone()))?;

        let handle = GaugeHandle {
            name: Arc::from(name),
            gauge,
            touched: Arc::new(AtomicBool::new(false)),
        };
        instruments.push(Instrument {
            name: name.to_owned(),
            help: help.to_owned(),
            handle: InstrumentHandle::Gauge(handle.clone()),
        });
        debug!(metric = name, "Gauge registered");
        Ok(handle)
    }

    /// Register a counter starting at zero.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] if `name` is already taken, or
    /// [`RegistryError::Prometheus`] if the name or help is invalid.
    pub fn register_counter(
        &self,
        name: &str,
        help: &str,
    ) -> Result<CounterHandle, RegistryError> {
        let mut instruments = self.write_instruments();
        ensure_unique(&instruments, name)?;

        let counter = Counter::with_opts(Opts::new(name, help))?;
        self.inner.registry.register(Box::new(counter.clone()))?;

        let handle = CounterHandle {
            name: Arc::from(name),
            counter,
        };
        instruments.push(Instrument {
            name: name.to_owned(),
            help: help.to_owned(),
            handle: InstrumentHandle::Counter(handle.clone()),
        });
        debug!(metric = name, "Counter registered");
        Ok(handle)
    }

    /// Register the process-level default instruments (CPU time, resident
    /// memory, open file descriptors, start time) under `namespace`.
    ///
    /// These appear in the exposition but never in a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Process`] if the process id does not fit a
    /// `pid_t`, or [`RegistryError::Prometheus`] if already registered.
    #[cfg(target_os = "linux")]
    pub fn register_process_collector(&self, namespace: &str) -> Result<(), RegistryError> {
        let pid = i32::try_from(std::process::id()).map_err(|e| RegistryError::Process {
            reason: format!("process id out of range: {e}"),
        })?;
        let collector = prometheus::process_collector::ProcessCollector::new(pid, namespace);
        self.inner.registry.register(Box::new(collector))?;
        debug!(namespace, "Process collector registered");
        Ok(())
    }

    /// Process-level instruments are only collected on Linux.
    ///
    /// # Errors
    ///
    /// Never fails on this platform.
    #[cfg(not(target_os = "linux"))]
    pub fn register_process_collector(&self, namespace: &str) -> Result<(), RegistryError> {
        debug!(namespace, "Process collector unavailable on this platform");
        Ok(())
    }

    /// Begin publishing a batch of updates.
    ///
    /// Readers wait until the returned guard is dropped.
    pub fn publish(&self) -> PublishGuard<'_> {
        PublishGuard {
            _guard: self
                .inner
                .view
                .write()
                .unwrap_or_else(PoisonError::into_inner),
        }
    }

    /// Render every registered instrument in the pull-format text
    /// exposition, including process-level collectors.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Prometheus`] if encoding fails, or
    /// [`RegistryError::Encoding`] if the output is not UTF-8.
    pub fn render_exposition(&self) -> Result<String, RegistryError> {
        let families = {
            let _view = self.inner.view.read().unwrap_or_else(PoisonError::into_inner);
            self.inner.registry.gather()
        };

        let mut buffer = Vec::new();
        TextEncoder::new().encode(&families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| RegistryError::Encoding {
            reason: e.to_string(),
        })
    }

    /// Snapshot the instruments named in `allow_list`.
    ///
    /// Entries follow registration order, not allow-list order. Names in
    /// the allow-list that were never registered are skipped.
    pub fn snapshot(&self, allow_list: &[&str]) -> MetricsSnapshot {
        let _view = self.inner.view.read().unwrap_or_else(PoisonError::into_inner);
        let instruments = self.read_instruments();

        let metrics = instruments
            .iter()
            .filter(|instrument| allow_list.contains(&instrument.name.as_str()))
            .map(|instrument| MetricSample {
                name: instrument.name.clone(),
                kind: instrument.kind(),
                help: instrument.help.clone(),
                value: instrument.value(),
            })
            .collect();

        MetricsSnapshot {
            updated_at: Utc::now(),
            metrics,
        }
    }

    /// Names of all registered instruments, in registration order.
    pub fn instrument_names(&self) -> Vec<String> {
        self.read_instruments()
            .iter()
            .map(|instrument| instrument.name.clone())
            .collect()
    }

    fn read_instruments(&self) -> RwLockReadGuard<'_, Vec<Instrument>> {
        self.inner
            .instruments
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_instruments(&self) -> RwLockWriteGuard<'_, Vec<Instrument>> {
        self.inner
            .instruments
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn ensure_unique(instruments: &[Instrument], name: &str) -> Result<(), RegistryError> {
    if instruments.iter().any(|instrument| instrument.name == name) {
        return Err(RegistryError::Duplicate {
            name: name.to_owned(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_names_are_rejected() {
        let registry = MetricsRegistry::new();
        registry.register_gauge("garden_test", "first").unwrap();

        let err = registry.register_counter("garden_test", "second").unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate { ref name } if name == "garden_test"));
        assert_eq!(registry.instrument_names(), vec![String::from("garden_test")]);
    }

    #[test]
    fn invalid_names_are_rejected() {
        let registry = MetricsRegistry::new();
        let result = registry.register_gauge("not a metric name", "bad");
        assert!(matches!(result, Err(RegistryError::Prometheus { .. })));
    }

    #[test]
    fn gauge_overwrites_and_reports_unset() {
        let registry = MetricsRegistry::new();
        let gauge = registry.register_gauge("garden_level", "level").unwrap();
        assert_eq!(gauge.value(), None);

        gauge.set(3.5).unwrap();
        gauge.set(7.25).unwrap();
        assert_eq!(gauge.value(), Some(7.25));
    }

    #[test]
    fn gauge_rejects_non_finite() {
        let registry = MetricsRegistry::new();
        let gauge = registry.register_gauge("garden_level", "level").unwrap();
        gauge.set(1.0).unwrap();

        assert!(gauge.set(f64::NAN).is_err());
        assert!(gauge.set(f64::INFINITY).is_err());
        assert_eq!(gauge.value(), Some(1.0));
    }

    #[test]
    fn counter_accumulates_and_rejects_negative() {
        let registry = MetricsRegistry::new();
        let counter = registry.register_counter("garden_events_total", "events").unwrap();
        counter.inc();
        counter.inc_by(2.0).unwrap();
        counter.inc_by(0.0).unwrap();

        assert!(counter.inc_by(-1.0).is_err());
        assert!(counter.inc_by(f64::NAN).is_err());
        assert!((counter.value() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn snapshot_filters_and_keeps_registration_order() {
        let registry = MetricsRegistry::new();
        registry.register_gauge("garden_b", "b").unwrap().set(2.0).unwrap();
        registry.register_gauge("garden_extra", "extra").unwrap();
        registry.register_counter("garden_a_total", "a").unwrap().inc();

        let snapshot = registry.snapshot(&["garden_a_total", "garden_b", "garden_missing"]);
        let names: Vec<&str> = snapshot.metrics.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["garden_b", "garden_a_total"]);
        assert_eq!(snapshot.metrics[1].kind, MetricKind::Counter);
        assert_eq!(snapshot.value_of("garden_a_total"), Some(1.0));
    }

    #[test]
    fn exposition_lists_every_instrument() {
        let registry = MetricsRegistry::new();
        registry.register_gauge("garden_level", "Level help").unwrap().set(4.0).unwrap();
        registry.register_counter("garden_events_total", "Events help").unwrap();

        let text = registry.render_exposition().unwrap();
        assert!(text.contains("# HELP garden_level Level help"));
        assert!(text.contains("# TYPE garden_level gauge"));
        assert!(text.contains("garden_level 4"));
        assert!(text.contains("# TYPE garden_events_total counter"));
        assert!(text.contains("garden_events_total 0"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn process_collector_appears_only_in_exposition() {
        let registry = MetricsRegistry::new();
        registry.register_process_collector("garden").unwrap();
        registry.register_gauge("garden_level", "level").unwrap();

        let text = registry.render_exposition().unwrap();
        assert!(text.contains("garden_process_"));
        assert_eq!(registry.snapshot(&["garden_level"]).metrics.len(), 1);
    }

    #[test]
    fn readers_wait_for_publish_guard() {
        let registry = MetricsRegistry::new();
        let first = registry.register_gauge("garden_first", "first").unwrap();
        let second = registry.register_gauge("garden_second", "second").unwrap();
        first.set(0.0).unwrap();
        second.set(0.0).unwrap();

        let guard = registry.publish();
        let reader = {
            let registry = registry.clone();
            std::thread::spawn(move || registry.snapshot(&["garden_first", "garden_second"]))
        };
        first.set(1.0).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));
        second.set(1.0).unwrap();
        drop(guard);

        let snapshot = reader.join().unwrap();
        assert_eq!(snapshot.value_of("garden_first"), snapshot.value_of("garden_second"));
    }

    #[test]
    fn repeated_reads_are_identical() {
        let registry = MetricsRegistry::new();
        registry.register_gauge("garden_level", "level").unwrap().set(12.5).unwrap();

        let first = registry.snapshot(&["garden_level"]);
        let second = registry.snapshot(&["garden_level"]);
        assert_eq!(first.metrics, second.metrics);
        assert_eq!(
            registry.render_exposition().unwrap(),
            registry.render_exposition().unwrap()
        );
    }
}
