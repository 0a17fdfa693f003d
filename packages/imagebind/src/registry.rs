//! Availability of every ImageBind component under a fixed capability set.
//!
//! The registry is resolved once from [`Capabilities`] and never changes
//! afterwards; callers ask it for a component and either get it or an
//! [`ImageBindError::Unavailable`] naming the missing capability.

use indexmap::IndexMap;
use serde::Serialize;

use crate::capability::{Capabilities, Capability};
use crate::component::Component;
use crate::error::{ImageBindError, Result};

/// Whether a component can be used.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Availability {
    Available,
    Unavailable { missing: Capability },
}

impl Availability {
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }
}

/// Serializable summary of a resolved registry.
#[derive(Clone, Debug, Serialize)]
pub struct RegistryReport {
    pub capabilities: Capabilities,
    /// Exported names of available components, grouped by submodule.
    pub modules: IndexMap<&'static str, Vec<&'static str>>,
    /// Exported name → capability it is missing.
    pub unavailable: IndexMap<&'static str, Capability>,
}

#[derive(Clone, Debug)]
pub struct ComponentRegistry {
    capabilities: Capabilities,
    entries: IndexMap<Component, Availability>,
}

impl ComponentRegistry {
    /// Resolve every component against `capabilities`.
    pub fn resolve(capabilities: &Capabilities) -> Self {
        let entries: IndexMap<_, _> = Component::ALL
            .iter()
            .map(|&c| {
                let availability = match c.requires() {
                    Some(cap) if !capabilities.contains(cap) => {
                        Availability::Unavailable { missing: cap }
                    }
                    _ => Availability::Available,
                };
                (c, availability)
            })
            .collect();

        let missing = entries.values().filter(|a| !a.is_available()).count();
        tracing::debug!(
            capabilities = %capabilities,
            available = entries.len() - missing,
            unavailable = missing,
            "resolved imagebind components"
        );

        Self {
            capabilities: capabilities.clone(),
            entries,
        }
    }

    /// Registry for the capabilities compiled into this build.
    pub fn detect() -> Self {
        Self::resolve(&Capabilities::detect())
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn availability(&self, component: Component) -> Availability {
        self.entries
            .get(&component)
            .copied()
            .unwrap_or(Availability::Available)
    }

    pub fn is_available(&self, component: Component) -> bool {
        self.availability(component).is_available()
    }

    /// Hand back `component` if usable, else say which capability is missing.
    pub fn require(&self, component: Component) -> Result<Component> {
        match self.availability(component) {
            Availability::Available => Ok(component),
            Availability::Unavailable { missing } => {
                tracing::warn!(%component, %missing, "requested unavailable imagebind component");
                Err(ImageBindError::Unavailable { component, missing })
            }
        }
    }

    /// Look a component up by its exported name, then [`require`](Self::require) it.
    pub fn lookup(&self, name: &str) -> Result<Component> {
        self.require(name.parse()?)
    }

    pub fn available(&self) -> impl Iterator<Item = Component> + '_ {
        self.entries
            .iter()
            .filter(|(_, a)| a.is_available())
            .map(|(&c, _)| c)
    }

    /// Unavailable components with the capability each one lacks.
    pub fn unavailable(&self) -> impl Iterator<Item = (Component, Capability)> + '_ {
        self.entries.iter().filter_map(|(&c, a)| match *a {
            Availability::Unavailable { missing } => Some((c, missing)),
            Availability::Available => None,
        })
    }

    /// Available exported names grouped by the submodule defining them.
    pub fn modules(&self) -> IndexMap<&'static str, Vec<&'static str>> {
        let mut modules: IndexMap<&'static str, Vec<&'static str>> = IndexMap::new();
        for c in self.available() {
            modules.entry(c.module()).or_default().push(c.name());
        }
        modules
    }

    pub fn report(&self) -> RegistryReport {
        RegistryReport {
            capabilities: self.capabilities.clone(),
            modules: self.modules(),
            unavailable: self.unavailable().map(|(c, cap)| (c.name(), cap)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_capabilities_leave_only_core_components() {
        let reg = ComponentRegistry::resolve(&Capabilities::none());
        let available: Vec<_> = reg.available().collect();
        assert_eq!(available.len(), 12);
        assert!(available.iter().all(|c| c.requires().is_none()));
        assert_eq!(
            reg.availability(Component::TokenizerFast),
            Availability::Unavailable {
                missing: Capability::Tokenizers
            }
        );
    }

    #[test]
    fn all_capabilities_unlock_everything() {
        let reg = ComponentRegistry::resolve(&Capabilities::all());
        assert_eq!(reg.available().count(), Component::ALL.len());
        assert_eq!(reg.unavailable().count(), 0);
    }

    #[test]
    fn require_reports_missing_capability() {
        let reg = ComponentRegistry::resolve(&Capabilities::none().with(Capability::Vision));
        assert_eq!(reg.require(Component::ImageProcessor), Ok(Component::ImageProcessor));
        assert_eq!(
            reg.require(Component::AudioFeatureExtractor),
            Err(ImageBindError::Unavailable {
                component: Component::AudioFeatureExtractor,
                missing: Capability::Speech,
            })
        );
    }

    #[test]
    fn speech_extends_the_feature_extraction_module() {
        let reg = ComponentRegistry::resolve(&Capabilities::none().with(Capability::Speech));
        let modules = reg.modules();
        assert_eq!(
            modules["feature_extraction_imagebind"],
            vec!["ImageBindImuFeatureExtractor", "ImageBindAudioFeatureExtractor"]
        );
        assert!(!modules.contains_key("modeling_imagebind"));
    }
}
