//! Integration tests for capability-gated component resolution.

use fluent_voice_imagebind::{
    Capabilities, Capability, Component, ComponentKind, ComponentRegistry, ImageBindError,
};
use serde_json::{Value, json};

#[test]
fn report_serializes_grouped_modules_and_gaps() {
    let caps: Capabilities = "tokenizers".parse().unwrap();
    let report = ComponentRegistry::resolve(&caps).report();
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["capabilities"], json!(["tokenizers"]));
    assert_eq!(
        value["modules"]["tokenization_imagebind_fast"],
        json!(["ImageBindTokenizerFast"])
    );
    assert_eq!(value["unavailable"]["ImageBindModel"], json!("torch"));
    assert_eq!(value["unavailable"]["ImageBindDepthImageProcessor"], json!("vision"));
    assert_eq!(value["modules"].get("image_processing_imagebind"), None::<&Value>);
}

#[test]
fn lookup_by_exported_name() {
    let reg = ComponentRegistry::resolve(&Capabilities::none().with(Capability::Torch));
    assert_eq!(
        reg.lookup("ImageBindVisionModelWithProjection"),
        Ok(Component::VisionModelWithProjection)
    );
    assert_eq!(
        reg.lookup("ImageBindTokenizerFast"),
        Err(ImageBindError::Unavailable {
            component: Component::TokenizerFast,
            missing: Capability::Tokenizers,
        })
    );
    assert!(matches!(
        reg.lookup("ImageBindVideoProcessor"),
        Err(ImageBindError::UnknownComponent(_))
    ));
}

#[test]
fn disabling_a_compiled_capability_hides_its_components() {
    let reg = ComponentRegistry::resolve(&Capabilities::all().without(Capability::Torch));
    assert!(reg.unavailable().all(|(c, missing)| {
        missing == Capability::Torch
            && matches!(c.kind(), ComponentKind::Model | ComponentKind::Constant)
    }));
    assert_eq!(reg.unavailable().count(), 15);
    assert!(reg.is_available(Component::AudioFeatureExtractor));
}

#[test]
fn unavailable_error_names_component_and_capability() {
    let reg = ComponentRegistry::resolve(&Capabilities::none());
    let err = reg.require(Component::FeatureExtractor).unwrap_err();
    assert_eq!(
        err.to_string(),
        "ImageBindFeatureExtractor requires the `vision` capability, which is not enabled"
    );
}

#[test]
fn detected_registry_matches_build_features() {
    let reg = ComponentRegistry::detect();
    assert_eq!(reg.is_available(Component::TokenizerFast), cfg!(feature = "tokenizers"));
    assert_eq!(reg.is_available(Component::Model), cfg!(feature = "torch"));
    assert!(reg.is_available(Component::Processor));
}
