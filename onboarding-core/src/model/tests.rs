//! Pipeline Tests
//!
//! Exercises the predictor end to end with on-disk artifacts and stub
//! classifiers.

#[cfg(test)]
mod pipeline_tests {
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::config::ArtifactConfig;
    use crate::error::{PredictError, PredictResult};
    use crate::features::record::sample_record;
    use crate::features::{
        CategoricalField, CategoryEncoderSet, EncodingPolicy, FallbackReason, FeatureVector, FEATURE_COUNT,
    };
    use crate::model::{
        ArtifactSet, CalibrationPolicy, Category, ClassProbabilities, Classifier, ScalerParams, StandardScaler,
        Predictor,
    };

    const ENCODERS_JSON: &str = r#"{
        "gender": ["F", "M"],
        "department_area": ["Finanzas", "IT", "Marketing", "RRHH", "Ventas"],
        "contract_type": ["Indefinido", "Practicas", "Temporal"],
        "seniority_level": ["Junior", "Semi-Senior", "Senior"]
    }"#;

    /// Classifier returning fixed probabilities and recording what it saw
    struct StubClassifier {
        output: ClassProbabilities,
        calls: Arc<AtomicUsize>,
        seen: parking_lot::Mutex<Vec<f64>>,
    }

    impl StubClassifier {
        fn new(success: f64) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let stub = Self {
                output: ClassProbabilities::from_success(success),
                calls: calls.clone(),
                seen: parking_lot::Mutex::new(Vec::new()),
            };
            (stub, calls)
        }
    }

    impl Classifier for StubClassifier {
        fn kind(&self) -> &'static str {
            "stub"
        }

        fn n_features(&self) -> Option<usize> {
            Some(FEATURE_COUNT)
        }

        fn predict_proba(&self, features: &[f64]) -> PredictResult<ClassProbabilities> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen.lock() = features.to_vec();
            Ok(self.output)
        }
    }

    fn identity_scaler(width: usize) -> StandardScaler {
        StandardScaler::new(ScalerParams {
            mean: vec![0.0; width],
            scale: vec![1.0; width],
            feature_names: None,
        })
        .unwrap()
    }

    fn encoders() -> CategoryEncoderSet {
        CategoryEncoderSet::from_json(ENCODERS_JSON).unwrap()
    }

    fn predictor_with(success: f64) -> (Predictor, Arc<AtomicUsize>) {
        let (stub, calls) = StubClassifier::new(success);
        let set = ArtifactSet::new(
            identity_scaler(FEATURE_COUNT),
            Box::new(stub),
            Some(encoders()),
            EncodingPolicy::Strict,
            CalibrationPolicy::default(),
        );
        (Predictor::ready(set), calls)
    }

    fn write_artifacts(dir: &Path, with_classifier: bool) -> ArtifactConfig {
        let scaler = serde_json::json!({
            "mean": vec![0.0; FEATURE_COUNT],
            "scale": vec![1.0; FEATURE_COUNT],
        });
        std::fs::write(dir.join("scaler.json"), scaler.to_string()).unwrap();
        std::fs::write(dir.join("encoders.json"), ENCODERS_JSON).unwrap();

        if with_classifier {
            let model = serde_json::json!({
                "coefficients": vec![0.0; FEATURE_COUNT],
                "intercept": -8.0,
            });
            std::fs::write(dir.join("classifier.json"), model.to_string()).unwrap();
        }

        let mut config = ArtifactConfig::from_dir(dir);
        config.classifier_path = dir.join("classifier.json");
        config
    }

    #[test]
    fn test_degenerate_output_uses_composite() {
        let (predictor, calls) = predictor_with(0.001);
        let prediction = predictor.predict(&sample_record()).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(prediction.result.probability, 0.855);
        assert_eq!(prediction.result.category, Category::High);
        assert_eq!(prediction.result.confidence, 99.9);
        assert!(prediction.metadata.calibration_applied);
        assert!(!prediction.metadata.degraded_encoding);
    }

    #[test]
    fn test_confident_output_accepted() {
        let (predictor, _) = predictor_with(0.42);
        let prediction = predictor.predict(&sample_record()).unwrap();

        assert_eq!(prediction.result.probability, 0.42);
        assert_eq!(prediction.result.category, Category::Medium);
        assert_eq!(prediction.result.confidence, 75.0);
        assert!(!prediction.metadata.calibration_applied);
    }

    #[test]
    fn test_classifier_sees_layout_ordered_vector() {
        let (stub, _) = StubClassifier::new(0.5);
        let seen = Arc::new(stub);

        struct Shared(Arc<StubClassifier>);
        impl Classifier for Shared {
            fn kind(&self) -> &'static str {
                "stub"
            }
            fn n_features(&self) -> Option<usize> {
                self.0.n_features()
            }
            fn predict_proba(&self, features: &[f64]) -> PredictResult<ClassProbabilities> {
                self.0.predict_proba(features)
            }
        }

        let set = ArtifactSet::new(
            identity_scaler(FEATURE_COUNT),
            Box::new(Shared(seen.clone())),
            Some(encoders()),
            EncodingPolicy::Strict,
            CalibrationPolicy::default(),
        );
        let record = sample_record();
        Predictor::ready(set).predict(&record).unwrap();

        let input = seen.seen.lock().clone();
        assert_eq!(input.len(), FEATURE_COUNT);
        assert_eq!(&input[..30], &record.numeric_features()[..]);
        assert_eq!(&input[30..], &[1.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_unseen_label_skips_classifier() {
        let (predictor, calls) = predictor_with(0.5);
        let mut record = sample_record();
        record.gender = "X".to_string();

        let err = predictor.predict(&record).unwrap_err();
        assert_eq!(
            err,
            PredictError::UnrecognizedCategory { field: CategoricalField::Gender, label: "X".to_string() }
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_scaler_width_mismatch_is_reported() {
        let (stub, calls) = StubClassifier::new(0.5);
        let set = ArtifactSet::new(
            identity_scaler(30),
            Box::new(stub),
            Some(encoders()),
            EncodingPolicy::Strict,
            CalibrationPolicy::default(),
        );

        let err = Predictor::ready(set).predict(&sample_record()).unwrap_err();
        assert_eq!(
            err,
            PredictError::WidthMismatch { stage: "scaler", expected: 30, actual: FEATURE_COUNT }
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unavailable_predictor_fails_fast() {
        let predictor = Predictor::unavailable("classifier missing");
        let err = predictor.predict(&sample_record()).unwrap_err();

        assert!(matches!(err, PredictError::Unavailable { .. }));
        assert!(!predictor.is_available());
        assert_eq!(predictor.status().reason.as_deref(), Some("classifier missing"));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_artifacts(dir.path(), true);

        let predictor = Predictor::load(&config);
        assert!(predictor.is_available());

        let status = predictor.status();
        let model = status.model.unwrap();
        assert_eq!(model.classifier_kind, "linear");
        assert_eq!(model.scaler_features, FEATURE_COUNT);
        assert!(model.encoders_loaded);

        // sigmoid(-8) < 0.01, so the composite score is used
        let prediction = predictor.predict(&sample_record()).unwrap();
        assert!(prediction.metadata.calibration_applied);
        assert_eq!(prediction.result.probability, 0.855);
    }

    #[test]
    fn test_missing_classifier_makes_predictor_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_artifacts(dir.path(), false);

        let predictor = Predictor::load(&config);
        assert!(!predictor.is_available());

        let err = predictor.predict(&sample_record()).unwrap_err();
        match err {
            PredictError::Unavailable { reason } => assert!(reason.contains("classifier.json")),
            other => panic!("expected unavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_encoders_fatal_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_artifacts(dir.path(), true);
        std::fs::remove_file(&config.encoders_path).unwrap();

        assert!(!Predictor::load(&config).is_available());
    }

    #[test]
    fn test_incomplete_encoders_fatal_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_artifacts(dir.path(), true);
        std::fs::write(&config.encoders_path, r#"{"gender": ["F", "M"]}"#).unwrap();

        let predictor = Predictor::load(&config);
        assert!(!predictor.is_available());
        assert!(predictor.status().reason.unwrap().contains("department_area"));
    }

    #[test]
    fn test_wrongly_keyed_encoders_fatal_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_artifacts(dir.path(), true);
        std::fs::write(
            &config.encoders_path,
            r#"{"Genero": ["F", "M"], "Area_Departamento": ["IT"]}"#,
        )
        .unwrap();

        assert!(!Predictor::load(&config).is_available());
    }

    #[test]
    fn test_incomplete_encoders_use_whole_set_fallback_when_optional() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = write_artifacts(dir.path(), true);
        std::fs::write(&config.encoders_path, r#"{"gender": ["F", "M"]}"#).unwrap();
        config.require_encoders = false;

        let predictor = Predictor::load(&config);
        assert!(predictor.is_available());
        assert!(!predictor.status().model.unwrap().encoders_loaded);

        let prediction = predictor.predict(&sample_record()).unwrap();
        assert_eq!(prediction.metadata.fallbacks.len(), 4);
        assert!(prediction
            .metadata
            .fallbacks
            .iter()
            .all(|note| note.reason == FallbackReason::EncodersUnavailable));
    }

    #[test]
    fn test_missing_encoders_tolerated_when_optional() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = write_artifacts(dir.path(), true);
        std::fs::remove_file(&config.encoders_path).unwrap();
        config.require_encoders = false;

        let predictor = Predictor::load(&config);
        assert!(predictor.is_available());

        let prediction = predictor.predict(&sample_record()).unwrap();
        assert!(prediction.metadata.degraded_encoding);
        assert_eq!(prediction.metadata.fallbacks.len(), 4);
    }

    #[test]
    fn test_prediction_serializes_flat_result() {
        let (predictor, _) = predictor_with(0.8);
        let prediction = predictor.predict(&sample_record()).unwrap();
        let json = serde_json::to_value(&prediction).unwrap();

        assert_eq!(json["probability"], 0.8);
        assert_eq!(json["category"], "High");
        assert_eq!(json["confidence"], 75.0);
        assert_eq!(json["metadata"]["calibration_applied"], false);
    }

    #[test]
    fn test_predictor_shared_across_threads() {
        let (predictor, calls) = predictor_with(0.7);
        let record = sample_record();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let predictor = predictor.clone();
                let record = record.clone();
                std::thread::spawn(move || predictor.predict(&record).unwrap().result)
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(results.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(calls.load(Ordering::SeqCst), 8);
    }

    #[test]
    fn test_vector_metadata_propagates() {
        let (predictor, _) = predictor_with(0.5);
        let prediction = predictor.predict(&sample_record()).unwrap();
        let expected = FeatureVector::from_values([0.0; FEATURE_COUNT]);

        assert_eq!(prediction.metadata.feature_version, expected.version);
        assert_eq!(prediction.metadata.layout_hash, expected.layout_hash);
    }
}
