//! Every public ImageBind component, the module it lives in and the
//! capability (if any) it depends on.

use serde::{Serialize, Serializer};
use std::str::FromStr;

use crate::capability::Capability;
use crate::error::ImageBindError;

/// Broad role of a component.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Constant,
    Config,
    Tokenizer,
    FeatureExtractor,
    ImageProcessor,
    Processor,
    Model,
}

macro_rules! components {
    (@cap) => { None };
    (@cap $cap:ident) => { Some(Capability::$cap) };
    (
        $(
            $(#[$meta:meta])*
            $variant:ident => $name:literal, $kind:ident in $module:literal $(requires $cap:ident)?;
        )+
    ) => {
        /// A public ImageBind component.
        #[derive(Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Debug)]
        pub enum Component {
            $( $(#[$meta])* $variant, )+
        }

        impl Component {
            /// All components in export order.
            pub const ALL: &'static [Component] = &[$( Component::$variant, )+];

            /// Exported name.
            pub const fn name(self) -> &'static str {
                match self { $( Component::$variant => $name, )+ }
            }

            /// Submodule the component is defined in.
            pub const fn module(self) -> &'static str {
                match self { $( Component::$variant => $module, )+ }
            }

            pub const fn kind(self) -> ComponentKind {
                match self { $( Component::$variant => ComponentKind::$kind, )+ }
            }

            /// Capability the component needs; `None` means always present.
            pub const fn requires(self) -> Option<Capability> {
                match self { $( Component::$variant => components!(@cap $($cap)?), )+ }
            }
        }
    };
}

components! {
    // configuration
    PretrainedConfigArchiveMap => "IMAGEBIND_PRETRAINED_CONFIG_ARCHIVE_MAP", Constant in "configuration_imagebind";
    AudioConfig => "ImageBindAudioConfig", Config in "configuration_imagebind";
    Config => "ImageBindConfig", Config in "configuration_imagebind";
    DepthConfig => "ImageBindDepthConfig", Config in "configuration_imagebind";
    ImuConfig => "ImageBindImuConfig", Config in "configuration_imagebind";
    OnnxConfig => "ImageBindOnnxConfig", Config in "configuration_imagebind";
    TextConfig => "ImageBindTextConfig", Config in "configuration_imagebind";
    ThermalConfig => "ImageBindThermalConfig", Config in "configuration_imagebind";
    VisionConfig => "ImageBindVisionConfig", Config in "configuration_imagebind";

    // pre-processing
    ImuFeatureExtractor => "ImageBindImuFeatureExtractor", FeatureExtractor in "feature_extraction_imagebind";
    Processor => "ImageBindProcessor", Processor in "processing_imagebind";
    Tokenizer => "ImageBindTokenizer", Tokenizer in "tokenization_imagebind";
    TokenizerFast => "ImageBindTokenizerFast", Tokenizer in "tokenization_imagebind_fast" requires Tokenizers;
    FeatureExtractor => "ImageBindFeatureExtractor", FeatureExtractor in "feature_extraction_imagebind" requires Vision;
    ImageProcessor => "ImageBindImageProcessor", ImageProcessor in "image_processing_imagebind" requires Vision;
    DepthImageProcessor => "ImageBindDepthImageProcessor", ImageProcessor in "image_processing_imagebind" requires Vision;
    ThermalImageProcessor => "ImageBindThermalImageProcessor", ImageProcessor in "image_processing_imagebind" requires Vision;
    AudioFeatureExtractor => "ImageBindAudioFeatureExtractor", FeatureExtractor in "feature_extraction_imagebind" requires Speech;

    // model heads
    PretrainedModelArchiveList => "IMAGEBIND_PRETRAINED_MODEL_ARCHIVE_LIST", Constant in "modeling_imagebind" requires Torch;
    AudioModel => "ImageBindAudioModel", Model in "modeling_imagebind" requires Torch;
    AudioModelWithProjection => "ImageBindAudioModelWithProjection", Model in "modeling_imagebind" requires Torch;
    DepthModel => "ImageBindDepthModel", Model in "modeling_imagebind" requires Torch;
    DepthModelWithProjection => "ImageBindDepthModelWithProjection", Model in "modeling_imagebind" requires Torch;
    ImuModel => "ImageBindImuModel", Model in "modeling_imagebind" requires Torch;
    ImuModelWithProjection => "ImageBindImuModelWithProjection", Model in "modeling_imagebind" requires Torch;
    /// Joint model over all modalities.
    Model => "ImageBindModel", Model in "modeling_imagebind" requires Torch;
    PreTrainedModel => "ImageBindPreTrainedModel", Model in "modeling_imagebind" requires Torch;
    TextModel => "ImageBindTextModel", Model in "modeling_imagebind" requires Torch;
    TextModelWithProjection => "ImageBindTextModelWithProjection", Model in "modeling_imagebind" requires Torch;
    ThermalModel => "ImageBindThermalModel", Model in "modeling_imagebind" requires Torch;
    ThermalModelWithProjection => "ImageBindThermalModelWithProjection", Model in "modeling_imagebind" requires Torch;
    VisionModel => "ImageBindVisionModel", Model in "modeling_imagebind" requires Torch;
    VisionModelWithProjection => "ImageBindVisionModelWithProjection", Model in "modeling_imagebind" requires Torch;
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Component {
    type Err = ImageBindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name() == s)
            .ok_or_else(|| ImageBindError::UnknownComponent(s.to_string()))
    }
}

impl Serialize for Component {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
