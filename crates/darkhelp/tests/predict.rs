mod common;

use approx::assert_relative_eq;
use common::{black_image, detection, init_logger, names, ScriptedNetwork};
use darkhelp::image::{Image, ImageSize};
use darkhelp::{DarkHelp, DarkHelpConfig, DarkHelpError, Network};

#[test]
fn load_rejects_empty_filenames() {
    init_logger();
    let res = DarkHelp::<ScriptedNetwork>::load("", "yolo.weights", None);
    assert!(matches!(res, Err(DarkHelpError::EmptyConfigFilename)));

    let res = DarkHelp::<ScriptedNetwork>::load("yolo.cfg", "", None);
    assert!(matches!(res, Err(DarkHelpError::EmptyWeightsFilename)));
}

#[test]
fn load_network_and_names() -> Result<(), DarkHelpError> {
    init_logger();
    let tmp_dir = tempfile::tempdir()?;
    let cfg = tmp_dir.path().join("yolo.cfg");
    let weights = tmp_dir.path().join("yolo.weights");
    let names_path = tmp_dir.path().join("yolo.names");
    std::fs::write(&cfg, "[net]\n")?;
    std::fs::write(&weights, [0u8; 16])?;
    std::fs::write(&names_path, "cat\r\ndog\r\n\r\ncar\r\n")?;

    let darkhelp = DarkHelp::<ScriptedNetwork>::load(&cfg, &weights, Some(names_path.as_path()))?;
    assert_eq!(darkhelp.names(), &["cat", "dog"]);
    assert_eq!(darkhelp.network().num_classes(), 3);

    let darkhelp = DarkHelp::<ScriptedNetwork>::load(&cfg, &weights, None)?;
    assert!(darkhelp.names().is_empty());

    let res = DarkHelp::<ScriptedNetwork>::load(tmp_dir.path().join("missing.cfg"), &weights, None);
    assert!(matches!(res, Err(DarkHelpError::NetworkLoadError(_))));
    Ok(())
}

#[test]
fn predict_single_object() -> Result<(), DarkHelpError> {
    init_logger();
    let network = ScriptedNetwork::new(3, vec![detection(0.5, 0.5, 0.2, 0.4, &[0.1, 0.9, 0.0])]);
    let mut darkhelp = DarkHelp::new(network, names());

    let results = darkhelp.predict(black_image(100, 50)?, None)?.clone();

    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert_eq!(result.best_class, 1);
    assert_relative_eq!(result.best_probability, 0.9);
    assert_eq!(result.name, "dog 90%");
    assert_eq!(result.all_probabilities.len(), 1);
    assert_eq!(
        (result.rect.x, result.rect.y, result.rect.width, result.rect.height),
        (40, 15, 20, 20)
    );
    assert_relative_eq!(result.mid_x, 0.5);
    assert_relative_eq!(result.mid_y, 0.5);
    assert_relative_eq!(result.width, 0.2);
    assert_relative_eq!(result.height, 0.4);

    // the engine sees the resized input and the original size
    let (input_size, image_size, params) = darkhelp.network().calls[0];
    assert_eq!(input_size, ImageSize { width: 32, height: 32 });
    assert_eq!(image_size, ImageSize { width: 100, height: 50 });
    assert_relative_eq!(params.threshold, 0.5);
    assert_relative_eq!(params.nms_threshold, 0.45);

    assert!(darkhelp.original_image().is_some());
    assert!(darkhelp.annotated_image().is_none());
    Ok(())
}

#[test]
fn predict_resizes_input_for_network() -> Result<(), DarkHelpError> {
    let network = ScriptedNetwork::new(1, vec![]);
    let mut darkhelp = DarkHelp::new(network, vec![]);

    let image = Image::<u8, 3>::new(ImageSize { width: 100, height: 50 }, [10u8, 20, 30].repeat(5000))?;
    darkhelp.predict(image, None)?;

    let input = darkhelp
        .network()
        .last_input
        .as_ref()
        .ok_or(DarkHelpError::NotPredicted)?;
    assert_eq!(input.size(), ImageSize { width: 32, height: 32 });
    assert!(input
        .as_slice()
        .chunks_exact(3)
        .all(|px| px[0].abs_diff(10) <= 1 && px[1].abs_diff(20) <= 1 && px[2].abs_diff(30) <= 1));
    Ok(())
}

#[test]
fn predict_names_every_class_above_threshold() -> Result<(), DarkHelpError> {
    let network = ScriptedNetwork::new(3, vec![detection(0.5, 0.5, 0.5, 0.5, &[0.6, 0.2, 0.75])]);
    let mut darkhelp = DarkHelp::new(network, names());

    let results = darkhelp.predict(black_image(40, 40)?, None)?;
    assert_eq!(results[0].best_class, 2);
    assert_eq!(results[0].name, "car 75%, cat 60%");
    assert_eq!(results[0].all_probabilities.keys().copied().collect::<Vec<_>>(), vec![0, 2]);

    darkhelp.config_mut().names_include_percentage = false;
    let results = darkhelp.predict(black_image(40, 40)?, None)?;
    assert_eq!(results[0].name, "car, cat");

    darkhelp.config_mut().include_all_names = false;
    let results = darkhelp.predict(black_image(40, 40)?, None)?;
    assert_eq!(results[0].name, "car");
    Ok(())
}

#[test]
fn predict_threshold_as_percentage() -> Result<(), DarkHelpError> {
    let network = ScriptedNetwork::new(
        3,
        vec![
            detection(0.2, 0.2, 0.1, 0.1, &[0.0, 0.9, 0.0]),
            detection(0.7, 0.7, 0.1, 0.1, &[0.7, 0.0, 0.0]),
        ],
    );
    let mut darkhelp = DarkHelp::new(network, names());

    assert_eq!(darkhelp.predict(black_image(50, 50)?, None)?.len(), 2);

    let results = darkhelp.predict(black_image(50, 50)?, Some(80.0))?;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "dog 90%");
    assert_relative_eq!(darkhelp.config().threshold, 0.8, epsilon = 1e-6);

    let (_, _, params) = darkhelp.network().calls[1];
    assert_relative_eq!(params.threshold, 0.8, epsilon = 1e-6);

    // a negative threshold keeps the stored one
    assert_eq!(darkhelp.predict(black_image(50, 50)?, Some(-1.0))?.len(), 1);
    Ok(())
}

#[test]
fn predict_first_class_wins_ties() -> Result<(), DarkHelpError> {
    let network = ScriptedNetwork::new(3, vec![detection(0.5, 0.5, 0.5, 0.5, &[0.0, 0.7, 0.7])]);
    let mut darkhelp = DarkHelp::new(network, names());

    let results = darkhelp.predict(black_image(10, 10)?, None)?;
    assert_eq!(results[0].best_class, 1);
    assert_eq!(results[0].name, "dog 70%, car 70%");
    Ok(())
}

#[test]
fn predict_without_names() -> Result<(), DarkHelpError> {
    init_logger();
    let network = ScriptedNetwork::new(3, vec![detection(0.5, 0.5, 0.5, 0.5, &[0.0, 0.0, 0.8])]);
    let mut darkhelp = DarkHelp::new(network, vec![]);

    let results = darkhelp.predict(black_image(10, 10)?, None)?;
    assert_eq!(results[0].name, "#2 80%");
    assert_eq!(darkhelp.names(), &["#0", "#1", "#2"]);

    // names shorter than the number of classes
    darkhelp.set_names(vec!["cat".to_string()]);
    let results = darkhelp.predict(black_image(10, 10)?, None)?;
    assert_eq!(results[0].name, "#2 80%");
    Ok(())
}

#[test]
fn predict_empty_image() -> Result<(), DarkHelpError> {
    let network = ScriptedNetwork::new(3, vec![detection(0.5, 0.5, 0.5, 0.5, &[0.9, 0.0, 0.0])]);
    let mut darkhelp = DarkHelp::new(network, names());

    assert_eq!(darkhelp.predict(black_image(10, 10)?, None)?.len(), 1);

    let empty = Image::<u8, 3>::new(ImageSize { width: 0, height: 0 }, vec![])?;
    assert!(matches!(darkhelp.predict(empty, None), Err(DarkHelpError::EmptyImage)));

    // previous results are gone
    assert!(darkhelp.prediction_results().is_empty());
    assert!(darkhelp.original_image().is_none());
    assert!(matches!(darkhelp.annotate(None), Err(DarkHelpError::NotPredicted)));
    Ok(())
}

#[test]
fn predict_engine_failure() -> Result<(), DarkHelpError> {
    let mut network = ScriptedNetwork::new(3, vec![]);
    network.fail = true;
    let mut darkhelp = DarkHelp::new(network, names());

    let res = darkhelp.predict(black_image(10, 10)?, None);
    assert!(matches!(res, Err(DarkHelpError::InferenceError(_))));
    Ok(())
}

#[test]
fn predict_file() -> Result<(), DarkHelpError> {
    let tmp_dir = tempfile::tempdir()?;
    let path = tmp_dir.path().join("frame.png");
    darkhelp::io::functional::write_image_png_rgb8(&path, &black_image(20, 10)?)?;

    let network = ScriptedNetwork::new(3, vec![detection(0.5, 0.5, 0.5, 0.5, &[0.0, 0.9, 0.0])]);
    let mut darkhelp = DarkHelp::new(network, names());

    assert_eq!(darkhelp.predict_file(&path, None)?.len(), 1);
    assert_eq!(
        darkhelp.original_image().map(|image| image.size()),
        Some(ImageSize { width: 20, height: 10 })
    );

    let res = darkhelp.predict_file(tmp_dir.path().join("missing.png"), None);
    assert!(matches!(res, Err(DarkHelpError::IoError(_))));
    Ok(())
}

#[test]
fn prediction_results_display() -> Result<(), DarkHelpError> {
    let network = ScriptedNetwork::new(3, vec![detection(0.5, 0.5, 0.2, 0.4, &[0.0, 0.9, 0.0])]);
    let mut darkhelp = DarkHelp::new(network, names());

    let results = darkhelp.predict(black_image(100, 50)?, None)?;
    assert_eq!(
        results.to_string(),
        "prediction results: 1\n-> 1/1: \"dog 90%\" #1 prob=0.9 x=40 y=15 w=20 h=20 entries=1"
    );
    Ok(())
}

#[test]
fn config_from_builder() -> Result<(), DarkHelpError> {
    let network = ScriptedNetwork::new(3, vec![detection(0.5, 0.5, 0.5, 0.5, &[0.3, 0.0, 0.0])]);
    let config = DarkHelpConfig::default()
        .with_threshold(0.25)
        .with_hierarchy_threshold(0.3)
        .with_nms_threshold(0.0);
    let mut darkhelp = DarkHelp::new(network, names()).with_config(config);

    assert_eq!(darkhelp.predict(black_image(10, 10)?, None)?.len(), 1);
    let (_, _, params) = darkhelp.network().calls[0];
    assert_relative_eq!(params.threshold, 0.25);
    assert_relative_eq!(params.hierarchy_threshold, 0.3);
    assert_relative_eq!(params.nms_threshold, 0.0);
    Ok(())
}

#[test]
fn predict_box_past_the_border() -> Result<(), DarkHelpError> {
    let network = ScriptedNetwork::new(3, vec![detection(0.05, 0.1, 0.2, 0.4, &[0.0, 0.9, 0.0])]);
    let mut darkhelp = DarkHelp::new(network, names());

    let results = darkhelp.predict(black_image(100, 50)?, None)?;
    assert_eq!(
        (results[0].rect.x, results[0].rect.y, results[0].rect.width, results[0].rect.height),
        (-5, -5, 20, 20)
    );
    Ok(())
}

#[test]
fn predict_skips_non_finite_boxes() -> Result<(), DarkHelpError> {
    init_logger();
    let network = ScriptedNetwork::new(
        3,
        vec![
            detection(0.5, 0.5, f32::INFINITY, 0.5, &[0.0, 0.9, 0.0]),
            detection(f32::NAN, 0.5, 0.5, 0.5, &[0.0, 0.9, 0.0]),
            detection(0.5, 0.5, 0.5, f32::NEG_INFINITY, &[0.0, 0.9, 0.0]),
            detection(0.5, 0.5, 0.5, 0.5, &[0.9, 0.0, 0.0]),
        ],
    );
    let mut darkhelp = DarkHelp::new(network, names());

    let results = darkhelp.predict(black_image(64, 64)?, None)?;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "cat 90%");
    Ok(())
}

#[test]
fn predict_huge_box_stays_in_i32_range() -> Result<(), DarkHelpError> {
    let network = ScriptedNetwork::new(3, vec![detection(0.5, 0.5, 1e12, 0.5, &[0.0, 0.9, 0.0])]);
    let mut darkhelp = DarkHelp::new(network, names());

    let results = darkhelp.predict(black_image(64, 64)?, None)?;
    let rect = results[0].rect;
    assert_eq!(rect.width, i32::MAX as i64);
    assert_eq!(rect.height, 32);
    assert!(rect.x >= i32::MIN as i64 && rect.x < 0);
    assert_eq!(rect.y, 16);
    Ok(())
}
