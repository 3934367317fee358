//! Golden profile store, keyed by system model.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{CheckError, ConfigError};
use crate::types::{GoldenProfile, GpuVendor};

/// One model entry as written in `golden_config.yml`.
#[derive(Debug, Deserialize)]
struct ProfileEntry {
    expected_gpu_vendor: GpuVendor,
    gpu_spec: GpuSpec,
}

#[derive(Debug, Deserialize)]
struct GpuSpec {
    expected_model: String,
    expected_count: usize,
    #[serde(default)]
    expected_vbios_list: BTreeSet<String>,
}

impl From<ProfileEntry> for GoldenProfile {
    fn from(entry: ProfileEntry) -> Self {
        Self {
            expected_gpu_vendor: entry.expected_gpu_vendor,
            expected_gpu_model: entry.gpu_spec.expected_model,
            expected_gpu_count: entry.gpu_spec.expected_count,
            approved_firmware_versions: entry.gpu_spec.expected_vbios_list,
        }
    }
}

/// Every golden profile from one configuration document.
#[derive(Debug, Clone)]
pub struct GoldenProfileSet {
    source: PathBuf,
    profiles: BTreeMap<String, GoldenProfile>,
}

impl GoldenProfileSet {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::Missing { path: path.to_path_buf() }
            } else {
                ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let set = Self::from_yaml(&raw, path)?;
        info!(path = %path.display(), models = set.len(), "loaded golden profiles");
        Ok(set)
    }

    /// Parses a document already in memory; `source` is used in messages only.
    ///
    /// Per-model problems (an unsupported vendor, an empty approved list) do
    /// not reject the document; they surface when that model is validated.
    pub fn from_yaml(raw: &str, source: &Path) -> Result<Self, ConfigError> {
        let UniqueModels(profiles) = serde_yaml::from_str(raw).map_err(|e| ConfigError::Parse {
            path: source.to_path_buf(),
            source: e,
        })?;

        Ok(Self {
            source: source.to_path_buf(),
            profiles,
        })
    }

    /// Exact, case-sensitive match on the system model.
    pub fn lookup(&self, model: &str) -> Result<&GoldenProfile, CheckError> {
        debug!(model, "looking up golden profile");
        self.profiles.get(model).ok_or_else(|| CheckError::ModelNotFound {
            model: model.to_string(),
            path: self.source.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Model-keyed map that rejects repeated keys instead of keeping the last.
struct UniqueModels(BTreeMap<String, GoldenProfile>);

impl<'de> Deserialize<'de> for UniqueModels {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ModelsVisitor;

        impl<'de> Visitor<'de> for ModelsVisitor {
            type Value = UniqueModels;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping from system model to golden profile")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut profiles = BTreeMap::new();
                while let Some((model, entry)) = map.next_entry::<String, ProfileEntry>()? {
                    if profiles.contains_key(&model) {
                        return Err(de::Error::custom(format!("duplicate system model '{model}'")));
                    }
                    profiles.insert(model, GoldenProfile::from(entry));
                }
                Ok(UniqueModels(profiles))
            }
        }

        deserializer.deserialize_map(ModelsVisitor)
    }
}
