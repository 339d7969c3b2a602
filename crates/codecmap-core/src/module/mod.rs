//! Configurable module contract.
//!
//! A module exposes its identity, the rules it owns, where its options are
//! legal and a `set` entry point that applies one key/value pair at a time.
//! The engine routes every recognized configuration pair to the owning
//! module during the single-threaded configuration phase; once the engine is
//! active no further `set` calls are possible.

mod basic;
pub mod error;
pub mod param;

use std::fmt;

use serde::Serialize;

use crate::config::EngineConfig;
use crate::rules::RuleDescriptor;

pub use basic::BasicModule;
pub use error::ModuleError;
pub use param::{ParamType, Parameter, Value};

/// Where a module's options are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Usage {
    Global,
    Context,
    Inspect,
    Detect,
}

/// Configuration section an option appears in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Global,
    Context,
}

impl Usage {
    pub fn allows(self, scope: Scope) -> bool {
        match self {
            Usage::Global => scope == Scope::Global,
            Usage::Context => true,
            Usage::Inspect | Usage::Detect => scope == Scope::Context,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Usage::Global => "global",
            Usage::Context => "context",
            Usage::Inspect => "inspect",
            Usage::Detect => "detect",
        }
    }
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => f.write_str("global"),
            Scope::Context => f.write_str("context"),
        }
    }
}

/// Capability set shared by every configurable component.
pub trait Module: Send + Sync {
    fn name(&self) -> &str;

    fn help(&self) -> &str;

    /// Group owning this module's rules; 0 when it owns none.
    fn gid(&self) -> u32 {
        0
    }

    /// Rules owned by this module, all under `gid()`.
    fn rules(&self) -> Vec<RuleDescriptor> {
        Vec::new()
    }

    fn usage(&self) -> Usage {
        Usage::Global
    }

    fn params(&self) -> &[Parameter] {
        &[]
    }

    /// Whether the option block may repeat (one block per named instance).
    fn is_list(&self) -> bool {
        false
    }

    fn param(&self, key: &str) -> Option<&Parameter> {
        self.params().iter().find(|param| param.name == key)
    }

    /// Called before the options of block `index` are applied.
    fn begin(&mut self, _index: usize, _config: &mut EngineConfig) -> Result<(), ModuleError> {
        Ok(())
    }

    /// Apply one option. Unknown keys fail without touching any state.
    fn set(
        &mut self,
        key: &str,
        _value: &Value,
        _config: &mut EngineConfig,
    ) -> Result<(), ModuleError> {
        Err(ModuleError::unknown(key))
    }

    /// Called after the options of block `index` are applied.
    fn end(&mut self, _index: usize, _config: &mut EngineConfig) -> Result<(), ModuleError> {
        Ok(())
    }
}
