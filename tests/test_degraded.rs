extern crate bvr_classify;

use image::RgbImage;
use bvr_classify::data::{DirAssets, LabelSet, MemoryAssets};
use bvr_classify::{init_classifier, run_classification};
use bvr_classify::{Classifier, ClassifierError, ClassifierState, ModelConfig, PixelImage, Sentinel};

use scripted_engine::{Script, ScriptedEngine};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn image() -> PixelImage {
    PixelImage::from(RgbImage::new(64, 48))
}

fn assert_single_sentinel(classifier: &mut Classifier, sentinel: Sentinel) {
    let results = classifier.classify(&image());
    assert_eq!(results.len(), 1, "{results:?}");
    assert_eq!(results[0].sentinel, Some(sentinel));
    assert_eq!(results[0].label, sentinel.label());
    assert_eq!(results[0].confidence, 1.0);
    assert_eq!(results[0].class_id, None);
}

#[test]
fn missing_model_asset_degrades() {
    init_logger();
    let assets = MemoryAssets::new().with_static("class_names.txt", b"Glass\nPaper\n");
    let mut classifier = Classifier::new(&assets, &ModelConfig::default());

    assert_eq!(classifier.state(), ClassifierState::Degraded);
    assert_eq!(&classifier.labels()[..], &LabelSet::default()[..]);
    assert_single_sentinel(&mut classifier, Sentinel::ModelNotLoaded);
    assert!(matches!(classifier.try_classify(&image()), Err(ClassifierError::ModelNotLoaded)));
}

#[test]
fn missing_asset_dir_degrades() {
    init_logger();
    let config = ModelConfig::new(Some("/nonexistent/bvr_classify".into()), String::new());
    let mut classifier = Classifier::from_config(&config);

    assert_eq!(classifier.state(), ClassifierState::Degraded);
    assert_single_sentinel(&mut classifier, Sentinel::ModelNotLoaded);

    let mut classifier = Classifier::new(&DirAssets::new("/nonexistent/bvr_classify"), &config);
    assert_eq!(classifier.state(), ClassifierState::Degraded);
    classifier.close();
    assert_eq!(classifier.state(), ClassifierState::Closed);
}

#[test]
fn closed_classifier_stops_inference() {
    init_logger();
    let (engine, probe) = ScriptedEngine::new(Script::Scores(vec![0.1, 0.7, 0.1, 0.1]));
    let mut classifier = Classifier::with_engine(engine, LabelSet::default(), &ModelConfig::default());

    assert_eq!(classifier.classify(&image())[0].label, "Kitchen");
    classifier.close();
    assert!(probe.released());
    assert_eq!(classifier.state(), ClassifierState::Closed);
    assert_eq!(classifier.input_shape(), None);

    assert_single_sentinel(&mut classifier, Sentinel::ModelNotLoaded);
    assert_eq!(probe.calls(), 1);

    classifier.close();
    assert_eq!(classifier.state(), ClassifierState::Closed);
    assert_single_sentinel(&mut classifier, Sentinel::ModelNotLoaded);
}

#[test]
fn absent_model_handle_is_a_runtime_sentinel() {
    init_logger();
    let (engine, _) = ScriptedEngine::new(Script::Unavailable);
    let mut classifier = Classifier::with_engine(engine, LabelSet::default(), &ModelConfig::default());

    assert_single_sentinel(&mut classifier, Sentinel::RuntimeUnavailable);
    assert!(matches!(classifier.try_classify(&image()), Err(ClassifierError::InferenceUnavailable)));
    assert_eq!(classifier.state(), ClassifierState::Ready);
}

#[test]
fn inference_failure_is_recognition_failed() {
    init_logger();
    let (engine, probe) = ScriptedEngine::new(Script::Fail("shape mismatch".into()));
    let mut classifier = Classifier::with_engine(engine, LabelSet::default(), &ModelConfig::default());

    assert_single_sentinel(&mut classifier, Sentinel::RecognitionFailed);
    match classifier.try_classify(&image()) {
        Err(ClassifierError::InferenceFailure(msg)) => assert!(msg.contains("shape mismatch")),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(probe.calls(), 2);
}

#[test]
fn empty_output_is_no_result() {
    init_logger();
    let (engine, _) = ScriptedEngine::new(Script::Scores(vec![]));
    let mut classifier = Classifier::with_engine(engine, LabelSet::default(), &ModelConfig::default());

    assert_single_sentinel(&mut classifier, Sentinel::NoResult);
    assert!(matches!(classifier.try_classify(&image()), Err(ClassifierError::EmptyOutput)));
}

#[test]
fn entry_points_without_assets() {
    init_logger();
    let config = ModelConfig::new(Some("/nonexistent/bvr_classify/assets".into()), String::new());
    let mut classifier = init_classifier(&config);
    assert_eq!(classifier.state(), ClassifierState::Degraded);

    let results = run_classification(&mut classifier, &image());
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].sentinel, Some(Sentinel::ModelNotLoaded));
    assert_eq!(results[0].confidence, 1.0);
}
