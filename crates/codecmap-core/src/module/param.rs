use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::error::ModuleError;

/// Expected type of a configuration option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Bool,
    Int { min: i64, max: i64 },
    Str,
    /// One of a fixed set of words.
    Enum(&'static [&'static str]),
    /// Space-separated integers in `0..=max` (e.g. a port set).
    BitList { max: u32 },
    /// `lo:hi` with `lo <= hi`.
    Interval,
}

impl ParamType {
    pub fn describe(&self) -> &'static str {
        match self {
            ParamType::Bool => "a boolean",
            ParamType::Int { .. } => "an integer",
            ParamType::Str => "a string",
            ParamType::Enum(_) => "one of the listed words",
            ParamType::BitList { .. } => "a space-separated list of integers",
            ParamType::Interval => "an interval lo:hi",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Bool => f.write_str("bool"),
            ParamType::Int { min, max } => write!(f, "int {min}:{max}"),
            ParamType::Str => f.write_str("string"),
            ParamType::Enum(words) => write!(f, "enum {}", words.join(" | ")),
            ParamType::BitList { max } => write!(f, "bit_list {max}"),
            ParamType::Interval => f.write_str("interval"),
        }
    }
}

/// Typed configuration value handed to `Module::set`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(String),
    Interval { lo: i64, hi: i64 },
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_interval(&self) -> Option<(i64, i64)> {
        match self {
            Value::Interval { lo, hi } => Some((*lo, *hi)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Str(v) => f.write_str(v),
            Value::Interval { lo, hi } => write!(f, "{lo}:{hi}"),
        }
    }
}

/// One entry of a module's option schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter {
    pub name: &'static str,
    pub kind: ParamType,
    /// Default in configuration syntax, when the option has one.
    pub default: Option<&'static str>,
    pub help: &'static str,
}

impl Parameter {
    pub const fn new(
        name: &'static str,
        kind: ParamType,
        default: Option<&'static str>,
        help: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            default,
            help,
        }
    }

    /// Check a value against the declared type and bounds.
    pub fn validate(&self, value: &Value) -> Result<(), ModuleError> {
        let key = self.name;
        match (self.kind, value) {
            (ParamType::Bool, Value::Bool(_)) => Ok(()),
            (ParamType::Int { min, max }, Value::Int(v)) => {
                if *v < min || *v > max {
                    return Err(ModuleError::OutOfRange {
                        key: key.to_string(),
                        value: *v,
                        min,
                        max,
                    });
                }
                Ok(())
            }
            (ParamType::Str, Value::Str(_)) => Ok(()),
            (ParamType::Enum(words), Value::Str(v)) => {
                if words.contains(&v.as_str()) {
                    Ok(())
                } else {
                    Err(ModuleError::invalid(
                        key,
                        format!("'{v}' is not one of {}", words.join(" | ")),
                    ))
                }
            }
            (ParamType::BitList { max }, Value::Str(v)) => {
                parse_bit_list(v, max)
                    .map(|_| ())
                    .map_err(|reason| ModuleError::invalid(key, reason))
            }
            (ParamType::Interval, Value::Interval { lo, hi }) => {
                if lo > hi {
                    return Err(ModuleError::invalid(key, format!("{lo} > {hi}")));
                }
                Ok(())
            }
            (kind, _) => Err(ModuleError::mismatch(key, kind.describe())),
        }
    }

    /// Map a loader JSON value onto this option's type, then validate it.
    pub fn coerce(&self, raw: &serde_json::Value) -> Result<Value, ModuleError> {
        let key = self.name;
        let mismatch = || ModuleError::mismatch(key, self.kind.describe());
        let value = match self.kind {
            ParamType::Bool => Value::Bool(raw.as_bool().ok_or_else(mismatch)?),
            ParamType::Int { .. } => Value::Int(raw.as_i64().ok_or_else(mismatch)?),
            ParamType::Str | ParamType::Enum(_) => {
                Value::Str(raw.as_str().ok_or_else(mismatch)?.to_string())
            }
            ParamType::BitList { .. } => match raw {
                serde_json::Value::String(text) => Value::Str(text.clone()),
                serde_json::Value::Array(items) => {
                    let words = items
                        .iter()
                        .map(|item| item.as_u64().map(|v| v.to_string()).ok_or_else(mismatch))
                        .collect::<Result<Vec<_>, _>>()?;
                    Value::Str(words.join(" "))
                }
                _ => return Err(mismatch()),
            },
            ParamType::Interval => match raw {
                serde_json::Value::String(text) => {
                    parse_interval(text).map_err(|reason| ModuleError::invalid(key, reason))?
                }
                serde_json::Value::Number(_) => {
                    let v = raw.as_i64().ok_or_else(mismatch)?;
                    Value::Interval { lo: v, hi: v }
                }
                _ => return Err(mismatch()),
            },
        };
        self.validate(&value)?;
        Ok(value)
    }

    /// Default parsed with this option's type.
    pub fn default_value(&self) -> Option<Value> {
        let text = self.default?;
        let value = match self.kind {
            ParamType::Bool => Value::Bool(text.parse().ok()?),
            ParamType::Int { .. } => Value::Int(text.parse().ok()?),
            ParamType::Str | ParamType::Enum(_) | ParamType::BitList { .. } => {
                Value::Str(text.to_string())
            }
            ParamType::Interval => parse_interval(text).ok()?,
        };
        self.validate(&value).ok()?;
        Some(value)
    }
}

/// Parse `"2152 3386"` into a set of values bounded by `max`.
pub fn parse_bit_list(text: &str, max: u32) -> Result<BTreeSet<u32>, String> {
    text.split_whitespace()
        .map(|word| {
            let value: u32 = word
                .parse()
                .map_err(|_| format!("'{word}' is not an unsigned integer"))?;
            if value > max {
                return Err(format!("{value} exceeds {max}"));
            }
            Ok(value)
        })
        .collect()
}

fn parse_interval(text: &str) -> Result<Value, String> {
    let parse = |word: &str| {
        word.trim()
            .parse::<i64>()
            .map_err(|_| format!("'{word}' is not an integer"))
    };
    match text.split_once(':') {
        Some((lo, hi)) => Ok(Value::Interval {
            lo: parse(lo)?,
            hi: parse(hi)?,
        }),
        None => {
            let v = parse(text)?;
            Ok(Value::Interval { lo: v, hi: v })
        }
    }
}
