extern crate bvr_classify;

use std::sync::Arc;
use image::RgbImage;
use bvr_classify::data::LabelSet;
use bvr_classify::{Classifier, ClassifierWorker, ModelConfig, PixelImage, Sentinel};

use scripted_engine::{Script, ScriptedEngine};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[tokio::test]
async fn classify_async_from_many_tasks() {
    init_logger();
    let (engine, probe) = ScriptedEngine::new(Script::Scores(vec![0.05, 0.02, 0.9, 0.03]));
    let classifier = Classifier::with_engine(engine, LabelSet::default(), &ModelConfig::default());
    let worker = Arc::new(ClassifierWorker::spawn(classifier).unwrap());

    let mut tasks = Vec::new();
    for i in 0..8u32 {
        let worker = worker.clone();
        tasks.push(tokio::spawn(async move {
            worker.classify_async(PixelImage::from(RgbImage::new(10 + i, 10))).await
        }));
    }
    for task in tasks {
        let results = task.await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].label, "Other");
    }
    assert_eq!(probe.calls(), 8);

    Arc::try_unwrap(worker).unwrap().shutdown();
    assert!(probe.released());
}

#[test]
fn blocking_classify_and_shutdown() {
    init_logger();
    let (engine, probe) = ScriptedEngine::new(Script::Scores(vec![0.5, 0.3, 0.0, 0.2]));
    let classifier = Classifier::with_engine(engine, LabelSet::default(), &ModelConfig::default());
    let worker = ClassifierWorker::spawn(classifier).unwrap();

    let labels: Vec<String> = worker
        .classify(PixelImage::from(RgbImage::new(4, 4)))
        .into_iter()
        .map(|r| r.label)
        .collect();
    assert_eq!(labels, vec!["Harmful", "Kitchen", "Recyclable"]);

    drop(worker);
    assert!(probe.released());
}

#[test]
fn degraded_worker_reports_sentinel() {
    init_logger();
    let worker = ClassifierWorker::spawn(Classifier::degraded("no assets".into())).unwrap();
    let results = worker.classify(PixelImage::default());
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].sentinel, Some(Sentinel::ModelNotLoaded));
    assert_eq!(results[0].confidence, 1.0);
    worker.shutdown();
}
