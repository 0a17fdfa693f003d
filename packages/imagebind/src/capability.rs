//! Optional capabilities and the set of them enabled in a build.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::error::ImageBindError;

/// An optional dependency some ImageBind components need.
#[derive(
    Clone,
    Copy,
    Eq,
    PartialEq,
    Hash,
    Ord,
    PartialOrd,
    Debug,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Capability {
    /// Fast (Rust-backed) tokenization.
    Tokenizers,
    /// Image decoding and vision pre-processing.
    Vision,
    /// Audio pre-processing.
    Speech,
    /// Tensor runtime for the model heads.
    Torch,
}

impl Capability {
    /// Whether the matching cargo feature was compiled in.
    pub const fn compiled_in(self) -> bool {
        match self {
            Self::Tokenizers => cfg!(feature = "tokenizers"),
            Self::Vision => cfg!(feature = "vision"),
            Self::Speech => cfg!(feature = "speech"),
            Self::Torch => cfg!(feature = "torch"),
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", <&'static str>::from(self))
    }
}

/// Set of enabled capabilities, resolved once at start-up.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capabilities(BTreeSet<Capability>);

impl Capabilities {
    /// Capabilities compiled into this build.
    pub fn detect() -> Self {
        let caps: Self = Capability::iter().filter(|c| c.compiled_in()).collect();
        tracing::debug!(capabilities = %caps, "detected imagebind capabilities");
        caps
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Capability::iter().collect()
    }

    /// Enable `cap`, e.g. after probing a runtime at start-up.
    #[must_use]
    pub fn with(mut self, cap: Capability) -> Self {
        self.0.insert(cap);
        self
    }

    /// Disable `cap` even if it was compiled in.
    #[must_use]
    pub fn without(mut self, cap: Capability) -> Self {
        self.0.remove(&cap);
        self
    }

    pub fn contains(&self, cap: Capability) -> bool {
        self.0.contains(&cap)
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Capability> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl std::fmt::Display for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&'static str> = self.iter().map(<&'static str>::from).collect();
        write!(f, "{}", names.join(","))
    }
}

/// Comma-separated capability names, e.g. `"vision,torch"`; empty means none.
impl FromStr for Capabilities {
    type Err = ImageBindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| {
                Capability::from_str(name)
                    .map_err(|_| ImageBindError::UnknownCapability(name.to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_mirrors_cargo_features() {
        let caps = Capabilities::detect();
        assert_eq!(caps.contains(Capability::Vision), cfg!(feature = "vision"));
        assert_eq!(caps.contains(Capability::Torch), cfg!(feature = "torch"));
    }

    #[test]
    fn overrides_apply_on_top_of_detection() {
        let caps = Capabilities::none()
            .with(Capability::Speech)
            .with(Capability::Vision)
            .without(Capability::Vision);
        assert!(caps.contains(Capability::Speech));
        assert!(!caps.contains(Capability::Vision));
        assert_eq!(Capabilities::all().iter().count(), 4);
    }

    #[test]
    fn parses_comma_separated_names() {
        let caps: Capabilities = " vision, torch ,".parse().unwrap();
        assert_eq!(caps.to_string(), "vision,torch");
        assert!("".parse::<Capabilities>().unwrap().is_empty());
        assert!(matches!(
            "vision,gpu".parse::<Capabilities>(),
            Err(ImageBindError::UnknownCapability(ref n)) if n == "gpu"
        ));
    }

    #[test]
    fn serializes_as_name_list() {
        let caps = Capabilities::none().with(Capability::Torch).with(Capability::Tokenizers);
        assert_eq!(serde_json::to_string(&caps).unwrap(), r#"["tokenizers","torch"]"#);
    }
}
