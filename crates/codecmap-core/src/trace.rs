//! Diagnostic trace channel shared by decoder modules.
//!
//! A [`Tracer`] is created once at startup and owns the channels. Modules get
//! an `Arc<Trace>` at construction instead of reaching for a global; the
//! first `decode()` call creates the channel and every later call returns the
//! same one.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};

use tracing::{Span, debug, debug_span};

use crate::config::EngineConfig;
use crate::module::{Module, ModuleError, ParamType, Parameter, Value};

/// Channel name used by decoder modules.
pub const DECODE_TRACE: &str = "decode";

/// Named debug channel with its own verbosity.
#[derive(Debug)]
pub struct Trace {
    name: &'static str,
    level: AtomicU8,
    span: Span,
}

impl Trace {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            level: AtomicU8::new(0),
            span: debug_span!("trace", channel = name),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn level(&self) -> u8 {
        self.level.load(Ordering::Relaxed)
    }

    pub fn set_level(&self, level: u8) {
        self.level.store(level, Ordering::Relaxed);
    }

    /// Level 0 is always off.
    pub fn enabled(&self, level: u8) -> bool {
        level != 0 && self.level() >= level
    }

    pub fn log(&self, level: u8, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }
        self.span.in_scope(|| debug!(verbosity = level, "{}", args));
    }
}

/// Owner of the process trace channels.
#[derive(Debug, Default)]
pub struct Tracer {
    decode: OnceLock<Arc<Trace>>,
}

impl Tracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The decode channel, created on first use.
    pub fn decode(&self) -> Arc<Trace> {
        Arc::clone(self.decode.get_or_init(|| {
            debug!(channel = DECODE_TRACE, "trace channel acquired");
            Arc::new(Trace::new(DECODE_TRACE))
        }))
    }
}

static TRACE_PARAMS: &[Parameter] = &[Parameter::new(
    DECODE_TRACE,
    ParamType::Int { min: 0, max: 255 },
    Some("0"),
    "verbosity of decoder debug output",
)];

/// `trace` module: sets channel verbosity from configuration.
#[derive(Debug)]
pub struct TraceModule {
    decode: Arc<Trace>,
}

impl TraceModule {
    pub fn new(tracer: &Tracer) -> Self {
        Self {
            decode: tracer.decode(),
        }
    }
}

impl Module for TraceModule {
    fn name(&self) -> &str {
        "trace"
    }

    fn help(&self) -> &str {
        "configure debug trace verbosity"
    }

    fn params(&self) -> &[Parameter] {
        TRACE_PARAMS
    }

    fn set(
        &mut self,
        key: &str,
        value: &Value,
        _config: &mut EngineConfig,
    ) -> Result<(), ModuleError> {
        if key != DECODE_TRACE {
            return Err(ModuleError::unknown(key));
        }
        TRACE_PARAMS[0].validate(value)?;
        let level = value
            .as_int()
            .and_then(|v| u8::try_from(v).ok())
            .ok_or_else(|| ModuleError::mismatch(key, "an integer"))?;
        self.decode.set_level(level);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn decode_channel_is_acquired_once() {
        let tracer = Tracer::new();
        let first = tracer.decode();
        let second = tracer.decode();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.name(), DECODE_TRACE);
    }

    #[test]
    fn concurrent_acquisition_yields_one_channel() {
        let tracer = Tracer::new();
        let handles: Vec<Arc<Trace>> = thread::scope(|scope| {
            let workers: Vec<_> = (0..4).map(|_| scope.spawn(|| tracer.decode())).collect();
            workers.into_iter().map(|w| w.join().unwrap()).collect()
        });
        assert!(handles.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
    }

    #[test]
    fn level_gates_output() {
        let trace = Trace::new("test");
        assert!(!trace.enabled(1));
        trace.set_level(2);
        assert!(trace.enabled(1));
        assert!(trace.enabled(2));
        assert!(!trace.enabled(3));
        assert!(!trace.enabled(0));
        trace.log(1, format_args!("visible at level {}", 1));
    }

    #[test]
    fn trace_module_sets_shared_level() {
        let tracer = Tracer::new();
        let mut module = TraceModule::new(&tracer);
        let mut config = EngineConfig::default();
        module.set(DECODE_TRACE, &Value::Int(3), &mut config).unwrap();
        assert_eq!(tracer.decode().level(), 3);

        let err = module.set("other", &Value::Int(1), &mut config).unwrap_err();
        assert!(matches!(err, ModuleError::UnknownKey { .. }));
        let err = module.set(DECODE_TRACE, &Value::Int(300), &mut config).unwrap_err();
        assert!(matches!(err, ModuleError::OutOfRange { .. }));
        assert_eq!(tracer.decode().level(), 3);
    }
}
