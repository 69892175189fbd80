//! Save/load round-trips through both on-disk formats.

use gaussian_nb::prelude::*;

fn fitted_model() -> GaussianNaiveBayes {
    let x = Matrix::from_vec(
        3,
        8,
        vec![
            0.1, 0.4, -0.3, 5.2, 4.9, 5.5, 9.7, 10.1, //
            1.0, 1.3, 0.7, -2.0, -2.4, -1.9, 3.3, 3.1, //
            0.01, 0.02, 0.03, 0.5, 0.7, 0.9, 7.0, 7.5,
        ],
    )
    .expect("Test data should be valid");
    GaussianNaiveBayes::from_data(&x, &[0, 0, 0, 1, 1, 1, 2, 2], 3, NaiveBayesConfig::default())
        .expect("Valid training data")
}

fn held_out() -> Matrix<f64> {
    Matrix::from_vec(
        3,
        4,
        vec![0.0, 5.0, 9.0, 2.5, 1.1, -2.1, 3.2, 0.0, 0.0, 0.6, 7.2, 3.0],
    )
    .expect("3x4")
}

fn assert_identical(original: &GaussianNaiveBayes, restored: &GaussianNaiveBayes) {
    assert_eq!(original.means(), restored.means());
    assert_eq!(original.variances(), restored.variances());
    assert_eq!(original.priors(), restored.priors());
    assert_eq!(original.training_points(), restored.training_points());

    let queries = held_out();
    let (labels_a, probs_a) = original.classify_batch_with_proba(&queries).expect("ok");
    let (labels_b, probs_b) = restored.classify_batch_with_proba(&queries).expect("ok");
    assert_eq!(labels_a, labels_b);
    assert_eq!(probs_a, probs_b);
}

#[test]
fn test_bincode_round_trip() {
    let model = fitted_model();
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("model.bin");

    model.save(&path).expect("save");
    let restored = GaussianNaiveBayes::load(&path).expect("load");
    assert_identical(&model, &restored);
    assert_eq!(restored.config(), model.config());
}

#[test]
fn test_safetensors_round_trip() {
    let model = fitted_model();
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("model.safetensors");

    model.save_safetensors(&path).expect("save");
    let restored = GaussianNaiveBayes::load_safetensors(&path).expect("load");
    assert_identical(&model, &restored);
}

#[test]
fn test_safetensors_file_contents() {
    let model = fitted_model();
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("model.safetensors");
    model.save_safetensors(&path).expect("save");

    let reader = SafeTensorsReader::open(&path).expect("open");
    assert_eq!(reader.tensor_names(), vec!["means", "priors", "variances"]);
    let meta = reader.user_metadata();
    assert_eq!(meta.get("n_features").map(String::as_str), Some("3"));
    assert_eq!(meta.get("n_classes").map(String::as_str), Some("3"));
    assert_eq!(meta.get("training_points").map(String::as_str), Some("8"));

    let (means, shape) = reader.get_tensor("means").expect("means");
    assert_eq!(shape, vec![3, 3]);
    assert_eq!(means, model.means().to_column_major());
}

#[test]
fn test_round_trip_untrained_model() {
    let model = GaussianNaiveBayes::new(4, 2);
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("empty.safetensors");

    model.save_safetensors(&path).expect("save");
    let restored = GaussianNaiveBayes::load_safetensors(&path).expect("load");
    assert_eq!(restored.state(), model.state());
}

#[test]
fn test_in_memory_archive_round_trip() {
    let mut model = fitted_model();
    let mut writer = SafeTensorsWriter::new();
    model.serialize_with(&mut writer).expect("write");

    let mut reader =
        SafeTensorsReader::from_bytes(writer.to_bytes().expect("encode")).expect("parse");
    let mut restored = GaussianNaiveBayes::new(1, 1);
    restored.serialize_with(&mut reader).expect("read");
    assert_identical(&model, &restored);
}

#[test]
fn test_load_rejects_corrupt_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("corrupt.safetensors");
    std::fs::write(&path, b"not a model").expect("write");

    assert!(GaussianNaiveBayes::load_safetensors(&path).is_err());
    assert!(GaussianNaiveBayes::load(&path).is_err());
}

#[test]
fn test_load_rejects_oversized_dimension_scalars() {
    let mut writer = SafeTensorsWriter::new();
    fitted_model().serialize_with(&mut writer).expect("write");
    writer.set_metadata("n_features", "4294967296");
    writer.set_metadata("n_classes", "4294967297");

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("oversized.safetensors");
    writer.save(&path).expect("save");

    assert!(matches!(
        GaussianNaiveBayes::load_safetensors(&path),
        Err(NaiveBayesError::FormatError { .. })
    ));
}

#[test]
fn test_load_rejects_scalars_disagreeing_with_tensors() {
    let mut writer = SafeTensorsWriter::new();
    fitted_model().serialize_with(&mut writer).expect("write");
    writer.set_metadata("n_features", "2");

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("mismatched.safetensors");
    writer.save(&path).expect("save");

    assert!(matches!(
        GaussianNaiveBayes::load_safetensors(&path),
        Err(NaiveBayesError::FormatError { .. })
    ));
}
