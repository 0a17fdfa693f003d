//! ImageBind component registry
//! ============================
//! The ImageBind model ships configs, a tokenizer, pre-processors and model
//! heads. Some of them need optional capabilities (fast tokenization, vision
//! or speech pre-processing, a tensor runtime). Capabilities are resolved
//! once at start-up, from cargo features plus explicit overrides, and the
//! [`ComponentRegistry`] then answers whether each component is present or
//! which capability it is missing.
//!
//! ```
//! use fluent_voice_imagebind::{Capabilities, Capability, Component, ComponentRegistry};
//!
//! let reg = ComponentRegistry::resolve(&Capabilities::none().with(Capability::Vision));
//! assert!(reg.is_available(Component::ImageProcessor));
//! assert!(reg.require(Component::Model).is_err());
//! ```
#![deny(unsafe_code)]

pub mod capability;
pub mod component;
pub mod error;
pub mod registry;

pub use capability::{Capabilities, Capability};
pub use component::{Component, ComponentKind};
pub use error::{ImageBindError, Result};
pub use registry::{Availability, ComponentRegistry, RegistryReport};
