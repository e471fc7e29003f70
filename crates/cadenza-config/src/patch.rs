//! Render patch file format and operations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use cadenza_core::ParamKind;
use cadenza_synth::{ParamId, SynthParams};

use crate::error::ConfigError;
use crate::validation::{lookup_param, validate_value};

/// A parameter value as written in a patch.
///
/// Toggles may be written as TOML booleans; everything else is a number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// `true` / `false`.
    Flag(bool),
    /// Plain value; choices are option indices.
    Number(f32),
}

impl ParamValue {
    /// Plain value as stored by [`SynthParams`].
    pub fn as_f32(self) -> f32 {
        match self {
            ParamValue::Flag(on) => {
                if on {
                    1.0
                } else {
                    0.0
                }
            }
            ParamValue::Number(value) => value,
        }
    }
}

impl From<f32> for ParamValue {
    fn from(value: f32) -> Self {
        ParamValue::Number(value)
    }
}

impl From<bool> for ParamValue {
    fn from(on: bool) -> Self {
        ParamValue::Flag(on)
    }
}

/// Named set of parameter overrides.
///
/// Parameters not listed keep whatever value the target store holds.
///
/// # TOML Format
///
/// ```toml
/// name = "Pluck"
/// description = "Short filtered saw"
///
/// [params]
/// osc1_type = 5
/// filter_freq = 2400.0
/// delay_on = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patch {
    /// Name of the patch.
    pub name: String,

    /// Optional description of the patch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Parameter overrides keyed by string id.
    #[serde(default)]
    pub params: BTreeMap<String, ParamValue>,
}

impl Patch {
    /// Create an empty patch.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            params: BTreeMap::new(),
        }
    }

    /// Create a patch with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a parameter override.
    pub fn with_param(mut self, id: ParamId, value: impl Into<ParamValue>) -> Self {
        self.set(id, value);
        self
    }

    /// Set or replace a parameter override.
    pub fn set(&mut self, id: ParamId, value: impl Into<ParamValue>) {
        self.params.insert(id.string_id().to_string(), value.into());
    }

    /// Look up an override by parameter.
    pub fn get(&self, id: ParamId) -> Option<f32> {
        self.params.get(id.string_id()).map(|v| v.as_f32())
    }

    /// Load a patch from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let patch: Patch = toml::from_str(&content)?;
        Ok(patch)
    }

    /// Load a patch from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the patch to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the patch to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every override: known id, finite, in range, whole for
    /// discrete parameters, and booleans only on toggles.
    ///
    /// Returns the resolved overrides in id order.
    pub fn validate(&self) -> Result<Vec<(ParamId, f32)>, ConfigError> {
        self.params
            .iter()
            .map(|(key, value)| {
                let id = lookup_param(key)?;
                if let ParamValue::Flag(_) = value
                    && !matches!(id.descriptor().kind, ParamKind::Bool)
                {
                    return Err(ConfigError::invalid_value(
                        key.as_str(),
                        value.as_f32(),
                        "boolean given for a non-toggle parameter",
                    ));
                }
                let plain = value.as_f32();
                validate_value(id, plain)?;
                Ok((id, plain))
            })
            .collect()
    }

    /// Validate, then write every override into `params`.
    ///
    /// Nothing is written if any override is invalid. Returns the number of
    /// parameters set.
    pub fn apply(&self, params: &SynthParams) -> Result<usize, ConfigError> {
        let resolved = self.validate()?;
        for &(id, value) in &resolved {
            params.set(id, value);
        }
        Ok(resolved.len())
    }

    /// Record every parameter of `params` that differs from its default.
    pub fn capture(name: impl Into<String>, params: &SynthParams) -> Self {
        let mut patch = Self::new(name);
        for id in ParamId::ALL {
            let desc = id.descriptor();
            let value = params.get(id);
            if value == desc.default {
                continue;
            }
            match desc.kind {
                ParamKind::Bool => patch.set(id, params.flag(id)),
                _ => patch.set(id, value),
            }
        }
        patch
    }

    /// Number of overrides.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// `true` if the patch overrides nothing.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl Default for Patch {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
