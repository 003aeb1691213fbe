use std::time::{SystemTime, UNIX_EPOCH};

use image::{Rgb, Rgba, RgbaImage};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::effects::print::{PrintPasses, PrintSettings};
use crate::foundation::core::Vec2;

fn tmp_dir(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "spreadpress_{tag}_{}_{}",
        std::process::id(),
        nanos
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn settings() -> PrintSettings {
    PrintSettings {
        magenta_shift: Vec2::ZERO,
        yellow_shift: Vec2::ZERO,
        dot_gain: 0.5,
        vignette: 0.0,
        vignette_steps: 100,
    }
}

fn dot_gain_only() -> PostProcessor {
    PostProcessor::new(PrintArtifactFilter::new(settings()).with_passes(PrintPasses {
        misregistration: false,
        dot_gain: true,
        vignette: false,
    }))
}

fn texture_only(texture: PaperTexture) -> PostProcessor {
    PostProcessor::new(PrintArtifactFilter::new(settings()).with_passes(PrintPasses {
        misregistration: false,
        dot_gain: false,
        vignette: false,
    }))
    .with_paper_texture(Some(texture))
}

#[test]
fn single_file_is_filtered_and_flattened() {
    let dir = tmp_dir("pp_single");
    let input = dir.join("in.png");
    RgbaImage::from_pixel(5, 5, Rgba([200, 100, 50, 255]))
        .save(&input)
        .unwrap();
    let output = dir.join("out.png");

    postprocess_file(&dot_gain_only(), &input, &output).unwrap();

    let img = image::open(&output).unwrap();
    assert_eq!(img.color(), image::ColorType::Rgb8);
    assert_eq!(img.to_rgb8().get_pixel(2, 2).0, [100, 50, 25]);
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn missing_input_is_rejected() {
    let dir = tmp_dir("pp_missing");
    let err = postprocess_file(&dot_gain_only(), &dir.join("none.png"), &dir.join("o.png"))
        .unwrap_err();
    assert!(matches!(err, PressError::Validation(_)));
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn batch_processes_only_images_and_reports_failures() {
    let dir = tmp_dir("pp_batch");
    let input_dir = dir.join("in");
    let output_dir = dir.join("out");
    std::fs::create_dir_all(&input_dir).unwrap();
    RgbImage::from_pixel(4, 4, Rgb([10, 10, 10]))
        .save(input_dir.join("a.png"))
        .unwrap();
    RgbImage::from_pixel(4, 4, Rgb([10, 10, 10]))
        .save(input_dir.join("b.jpg"))
        .unwrap();
    std::fs::write(input_dir.join("notes.txt"), "skip me").unwrap();
    std::fs::write(input_dir.join("broken.png"), "not a png").unwrap();

    let report = postprocess_batch(&dot_gain_only(), &input_dir, &output_dir, Some(2)).unwrap();

    assert_eq!(report.items.len(), 3);
    assert_eq!(report.succeeded(), 2);
    let failed: Vec<_> = report.failures().map(|i| i.input.clone()).collect();
    assert_eq!(failed, vec![input_dir.join("broken.png")]);
    assert!(output_dir.join("a.png").is_file());
    assert!(output_dir.join("b.jpg").is_file());
    assert!(!output_dir.join("notes.txt").exists());
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn zero_threads_is_rejected() {
    let dir = tmp_dir("pp_threads");
    assert!(postprocess_batch(&dot_gain_only(), &dir, &dir.join("o"), Some(0)).is_err());
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn texture_file_is_resized_and_blended_first() {
    let dir = tmp_dir("pp_texture_file");
    let texture_path = dir.join("paper.png");
    RgbImage::from_pixel(3, 3, Rgb([100, 100, 100]))
        .save(&texture_path)
        .unwrap();
    let texture = PaperTexture {
        opacity: 0.5,
        texture: Some(texture_path),
    };

    let out = texture_only(texture)
        .process(RgbImage::from_pixel(5, 5, Rgb([200, 200, 200])))
        .unwrap();
    let _ = std::fs::remove_dir_all(dir);

    assert_eq!(out.dimensions(), (5, 5));
    for px in out.pixels() {
        assert!(px.0.iter().all(|c| c.abs_diff(150) <= 1), "{:?}", px.0);
    }
}

#[test]
fn generated_grain_is_seeded_and_subtle() {
    let texture = PaperTexture {
        opacity: 0.08,
        texture: None,
    };
    let p = texture_only(texture);
    let base = RgbImage::from_pixel(32, 32, Rgb([240, 240, 240]));

    let a = p
        .process_with_rng(base.clone(), &mut StdRng::seed_from_u64(12))
        .unwrap();
    let b = p
        .process_with_rng(base.clone(), &mut StdRng::seed_from_u64(12))
        .unwrap();

    assert_eq!(a, b);
    assert_ne!(a, base);
    // 240 * 0.92 + grain * 0.08 stays close to the paper.
    assert!(a.iter().all(|c| c.abs_diff(240) <= 20));
}

#[test]
fn texture_pass_runs_before_dot_gain() {
    let dir = tmp_dir("pp_texture_order");
    let texture_path = dir.join("paper.png");
    RgbImage::from_pixel(4, 4, Rgb([0, 0, 0]))
        .save(&texture_path)
        .unwrap();
    let texture = PaperTexture {
        opacity: 0.5,
        texture: Some(texture_path),
    };

    let out = dot_gain_only()
        .with_paper_texture(Some(texture))
        .process(RgbImage::from_pixel(4, 4, Rgb([200, 200, 200])))
        .unwrap();
    let _ = std::fs::remove_dir_all(dir);

    // Texture halves 200 to 100, then dot gain 0.5 gives 50.
    assert!(out.iter().all(|c| c.abs_diff(50) <= 1));
}

#[test]
fn missing_texture_file_is_rejected() {
    let dir = tmp_dir("pp_texture_missing");
    let texture = PaperTexture {
        opacity: 0.5,
        texture: Some(dir.join("absent.png")),
    };
    let err = texture_only(texture)
        .process(RgbImage::new(2, 2))
        .unwrap_err();
    assert!(matches!(err, PressError::Validation(_)));
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn zero_opacity_texture_is_identity() {
    let texture = PaperTexture {
        opacity: 0.0,
        texture: None,
    };
    let img = RgbImage::from_pixel(3, 3, Rgb([9, 8, 7]));
    let out = texture_only(texture).process(img.clone()).unwrap();
    assert_eq!(out, img);
}
