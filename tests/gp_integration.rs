//! End-to-end tests of the GP estimator

use approx::assert_relative_eq;
use koza::prelude::*;

fn doubling_data() -> (Vec<Vec<f64>>, Vec<f64>) {
    (vec![vec![1.0], vec![2.0], vec![3.0]], vec![2.0, 4.0, 6.0])
}

#[test]
fn test_learns_doubling_with_product_only() {
    let (x, y) = doubling_data();
    let mut gp = GpConfig::new()
        .with_loss_metric("mse")
        .with_functions("mul")
        .with_const_range(2.0, 2.0)
        .with_heights(1, 1)
        .with_population_size(50)
        .with_generations(10)
        .with_seed(42)
        .build()
        .unwrap();
    gp.fit(&x, &y, None, None, false).unwrap();

    assert!(gp.best_fitness().unwrap() < 1e-9);
    let predictions = gp.predict(&x, false).unwrap();
    for (p, t) in predictions.iter().zip(&y) {
        assert_relative_eq!(*p, *t, epsilon = 1e-9);
    }
    assert_relative_eq!(gp.predict_partial(&[5.0], false).unwrap(), 10.0, epsilon = 1e-9);
}

#[test]
fn test_learns_doubling_from_default_constant_range() {
    let x: Vec<Vec<f64>> = (1..=10).map(|i| vec![i as f64]).collect();
    let y: Vec<f64> = x.iter().map(|r| 2.0 * r[0]).collect();
    let mut gp = GpConfig::new()
        .with_loss_metric("mse")
        .with_functions("sum,mul")
        .with_heights(1, 3)
        .with_population_size(300)
        .with_generations(30)
        .with_seed(7)
        .build()
        .unwrap();
    gp.fit(&x, &y, None, None, false).unwrap();

    assert!(gp.best_fitness().unwrap() < 1e-2, "fitness {:?}", gp.best_fitness());
    let at_five = gp.predict_partial(&[5.0], false).unwrap();
    assert!((at_five - 10.0).abs() < 0.5, "f(5) = {}", at_five);
}

#[test]
fn test_predict_rejects_rows_of_wrong_width() {
    let x: Vec<Vec<f64>> = (0..6).map(|i| vec![i as f64, 1.0]).collect();
    let y: Vec<f64> = x.iter().map(|r| r[0] + r[0]).collect();
    let mut gp = GpConfig::new()
        .with_generations(3)
        .with_seed(2)
        .build()
        .unwrap();
    gp.fit(&x, &y, None, None, false).unwrap();

    assert!(matches!(
        gp.predict(&[vec![], vec![]], false),
        Err(GpError::Dataset(DatasetError::FeatureMismatch {
            expected: 2,
            actual: 0
        }))
    ));
    assert!(matches!(
        gp.predict_partial(&[], false),
        Err(GpError::Dataset(DatasetError::FeatureMismatch { .. }))
    ));
    assert!(matches!(
        gp.predict_partial(&[1.0, 2.0, 3.0], false),
        Err(GpError::Dataset(DatasetError::FeatureMismatch { actual: 3, .. }))
    ));
    assert_eq!(gp.predict(&x, false).unwrap().len(), 6);

    let narrow = ValidationSet::new(vec![vec![1.0]], vec![2.0]);
    assert!(matches!(
        gp.fit(&x, &y, None, Some(&narrow), false),
        Err(GpError::Dataset(DatasetError::FeatureMismatch { .. }))
    ));
}

#[test]
fn test_two_class_target_must_be_zero_one_coded() {
    let x: Vec<Vec<f64>> = (0..6).map(|i| vec![i as f64]).collect();
    let y = vec![1.0, 1.0, 1.0, 2.0, 2.0, 2.0];
    let mut gp = GpConfig::new()
        .with_loss_metric("accuracy")
        .with_generations(2)
        .with_seed(8)
        .build()
        .unwrap();

    let err = gp.fit(&x, &y, None, None, false).unwrap_err();
    assert!(matches!(
        &err,
        GpError::Dataset(DatasetError::NonBinaryTarget(values)) if values == &vec![2.0]
    ));
    assert!(err.to_string().contains("[2.0]"));
    assert!(!gp.is_fitted());

    let recoded: Vec<f64> = y.iter().map(|v| v - 1.0).collect();
    gp.fit(&x, &recoded, None, None, false).unwrap();
    assert!(gp.is_fitted());
}

#[test]
fn test_best_program_round_trips_through_text() {
    let (x, y) = doubling_data();
    let mut gp = GpConfig::new()
        .with_loss_metric("mae")
        .with_seed(3)
        .with_generations(5)
        .build()
        .unwrap();
    gp.fit(&x, &y, None, None, false).unwrap();

    let best = gp.best_program().unwrap();
    let text = best.root.to_string();
    let parsed: Operator = text.parse().unwrap();
    assert_eq!(parsed, best.root);
}

#[test]
fn test_multi_class_target_is_rejected() {
    let x = vec![vec![0.0], vec![1.0], vec![2.0]];
    let y = vec![0.0, 1.0, 2.0];
    let mut gp = GpConfig::new()
        .with_loss_metric("logloss")
        .with_seed(1)
        .build()
        .unwrap();

    let err = gp.fit(&x, &y, None, None, false).unwrap_err();
    assert!(matches!(err, GpError::MultiClass(3)));
    assert!(err
        .to_string()
        .starts_with("Multi-class classification is not supported"));
    assert!(matches!(gp.best_program(), Err(GpError::NotFitted)));
}

#[test]
fn test_failed_fit_discards_previous_program() {
    let (x, y) = doubling_data();
    let mut gp = GpConfig::new()
        .with_loss_metric("accuracy")
        .with_generations(2)
        .with_seed(5)
        .build()
        .unwrap();
    gp.fit(&x, &[0.0, 1.0, 1.0], None, None, false).unwrap();
    assert!(gp.is_fitted());

    assert!(gp.fit(&x, &y, None, None, false).is_err());
    assert!(!gp.is_fitted());
}

#[test]
fn test_predict_before_fit() {
    let gp = GpConfig::new().build().unwrap();
    let err = gp.predict(&[vec![1.0]], false).unwrap_err();
    assert_eq!(err.to_string(), "The GP has not been trained yet");
}

#[test]
fn test_binary_classification() {
    let x: Vec<Vec<f64>> = (-5..=5).filter(|&i| i != 0).map(|i| vec![i as f64]).collect();
    let y: Vec<f64> = x.iter().map(|r| if r[0] > 0.0 { 1.0 } else { 0.0 }).collect();
    let mut gp = GpConfig::new()
        .with_loss_metric("logloss")
        .with_eval_metric("accuracy")
        .with_population_size(100)
        .with_generations(20)
        .with_seed(17)
        .build()
        .unwrap();
    gp.fit(&x, &y, None, None, false).unwrap();

    let classes = gp.predict(&x, false).unwrap();
    assert!(classes.iter().all(|&c| c == 0.0 || c == 1.0));
    let probabilities = gp.predict(&x, true).unwrap();
    assert!(probabilities.iter().all(|&p| (0.0..=1.0).contains(&p)));

    let accuracy = Accuracy.apply(&y, &classes, None).unwrap();
    assert!(accuracy > 0.8, "accuracy {}", accuracy);
}

#[test]
fn test_fit_dataset_with_validation() {
    let rows: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64 / 4.0, 1.0]).collect();
    let targets: Vec<f64> = rows.iter().map(|r| 3.0 * r[0] - r[1]).collect();
    let train = Dataset::new(rows[..15].to_vec(), targets[..15].to_vec()).unwrap();
    let validation = Dataset::new(rows[15..].to_vec(), targets[15..].to_vec()).unwrap();

    let mut gp = GpConfig::new()
        .with_loss_metric("mse")
        .with_eval_metric("r2")
        .with_generations(10)
        .with_seed(9)
        .build()
        .unwrap();
    gp.fit_dataset(&train, Some(&validation), true).unwrap();

    let predictions = gp.predict(validation.x(), false).unwrap();
    assert_eq!(predictions.len(), validation.n_rows());
    assert!(gp.best_fitness().unwrap().is_finite());
}

#[test]
fn test_weighted_fit() {
    let (x, y) = doubling_data();
    let mut gp = GpConfig::new()
        .with_generations(3)
        .with_seed(4)
        .build()
        .unwrap();
    gp.fit(&x, &y, Some(&[1.0, 0.0, 2.0][..]), None, false).unwrap();
    assert!(gp.is_fitted());
}

#[test]
fn test_config_json_builds_estimator() {
    let config = GpConfig::new()
        .with_loss_metric("rmse")
        .with_functions("sum,mul,max")
        .with_seed(11);
    let json = config.to_json().unwrap();
    let loaded = GpConfig::from_json(&json).unwrap();
    assert_eq!(loaded, config);
    let gp = loaded.build().unwrap();
    assert_eq!(gp.config().functions, "sum,mul,max");
}

#[test]
fn test_invalid_config_does_not_build() {
    assert!(matches!(
        GpConfig::new().with_functions("sum,foo").build(),
        Err(GpError::Parse(_))
    ));
    assert!(matches!(
        GpConfig::new().with_heights(5, 1).build(),
        Err(GpError::Configuration(_))
    ));
}
