use cascade_detector::cascade::load_cascade;
use cascade_detector::config::detect::load_config;
use cascade_detector::image::io::{load_grayscale_image, save_grayscale_u8, write_json_file};
use cascade_detector::image::{GrayImageU8, ImageView};
use cascade_detector::{CascadeDetector, DetectionReport, DetectionWindow};
use std::env;
use std::path::Path;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let gray = load_grayscale_image(&config.input)?;
    let cascade = load_cascade(&config.cascade).map_err(|e| e.to_string())?;
    let detector = CascadeDetector::new(cascade, config.params).map_err(|e| e.to_string())?;
    let report = detector
        .detect_with_diagnostics(gray.as_view())
        .map_err(|e| e.to_string())?;

    print_summary(&report);
    write_json_file(&config.output.json_out, &report)?;
    println!("JSON report written to {}", config.output.json_out.display());

    if let Some(path) = &config.output.annotated_image {
        let mut annotated = gray.clone();
        for det in &report.detections {
            draw_outline(&mut annotated, det, 255);
        }
        save_grayscale_u8(&annotated, path)?;
        println!("Annotated image written to {}", path.display());
    }
    Ok(())
}

fn print_summary(report: &DetectionReport) {
    println!("{}", report.summary());
    for level in &report.levels {
        println!(
            "  level {:>2}: window {:>4}x{:<4} windows {:>8} accepted {:>5} ({:.2} ms)",
            level.level.index,
            level.level.window_width,
            level.level.window_height,
            level.windows_evaluated,
            level.accepted,
            level.elapsed_ms
        );
    }
    for det in &report.detections {
        let (x, y, w, h, score) = det.to_tuple();
        println!("  ({x}, {y}) {w}x{h} score={score:.3}");
    }
}

/// One-pixel rectangle outline, clipped to the image.
fn draw_outline(img: &mut GrayImageU8, det: &DetectionWindow, value: u8) {
    let (w, h) = (img.width(), img.height());
    let x0 = det.x as usize;
    let y0 = det.y as usize;
    let x1 = (x0 + det.width as usize).min(w).saturating_sub(1);
    let y1 = (y0 + det.height as usize).min(h).saturating_sub(1);
    if x0 >= w || y0 >= h {
        return;
    }
    for x in x0..=x1 {
        img.set(x, y0, value);
        img.set(x, y1, value);
    }
    for y in y0..=y1 {
        img.set(x0, y, value);
        img.set(x1, y, value);
    }
}

fn usage() -> String {
    "Usage: cascade_detect <config.json>".to_string()
}
