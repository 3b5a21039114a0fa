use std::fs;
use std::io::Cursor;
use std::path::Path;

use visreg::{
    ActualSource, CompareFlags, CompareInput, CompareOptions, CompareResult, DeviceClass,
    DeviceRectangles, DiffOutcome, DiffPixel, DiffRequest, FolderConfig, MemoryLogger,
    PixelDiffEngine, TestContext, VisregError, VisregResult, execute_compare,
};

fn png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let pixels = image::RgbaImage::from_pixel(width, height, image::Rgba(color));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(pixels)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

struct StubEngine {
    raw: f64,
    diff_pixels: Vec<DiffPixel>,
}

impl StubEngine {
    fn with_mismatch(raw: f64) -> Self {
        Self {
            raw,
            diff_pixels: Vec::new(),
        }
    }
}

impl PixelDiffEngine for StubEngine {
    fn diff(
        &self,
        _baseline: &[u8],
        _actual: &[u8],
        _request: &DiffRequest,
    ) -> VisregResult<DiffOutcome> {
        Ok(DiffOutcome {
            raw_mis_match_percentage: self.raw,
            diff_pixels: self.diff_pixels.clone(),
            diff_bounds: Default::default(),
            analysis_time_ms: 7,
            diff_image: png(10, 10, [255, 0, 255, 255]),
        })
    }
}

fn context() -> TestContext {
    TestContext {
        tag: "homepage".to_string(),
        browser_name: "chrome".to_string(),
        browser_version: "120".to_string(),
        platform_name: "linux".to_string(),
        platform_version: "6.1".to_string(),
        device_name: String::new(),
        log_name: "chrome-latest".to_string(),
        name: "Chrome".to_string(),
        width: 1366,
        height: 768,
        dpr: 1.0,
        is_mobile: false,
    }
}

fn input(actual: ActualSource) -> CompareInput {
    CompareInput {
        file_name_template: "{tag}-{browserName}".to_string(),
        context: context(),
        actual,
        device_class: DeviceClass::Desktop,
        device_rectangles: DeviceRectangles::default(),
        is_viewport_screenshot: false,
        is_native_context: false,
    }
}

fn artifact(root: &Path, kind: &str) -> std::path::PathBuf {
    root.join(kind)
        .join("desktop_chrome")
        .join("homepage-chrome.png")
}

fn seed_baseline(root: &Path) {
    let path = artifact(root, "baseline");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, png(10, 10, [0, 0, 0, 255])).unwrap();
}

#[test]
fn missing_baseline_without_auto_save_rejects_with_banner() {
    let dir = tempfile::tempdir().unwrap();
    let log = MemoryLogger::new();
    let err = execute_compare(
        &StubEngine::with_mismatch(0.0),
        &log,
        &FolderConfig::new(dir.path()),
        CompareFlags::default(),
        &CompareOptions::default(),
        &input(ActualSource::InMemory(png(10, 10, [0, 0, 0, 255]))),
    )
    .unwrap_err();

    assert!(matches!(err, VisregError::BaselineMissing(_)));
    let msg = err.to_string();
    assert!(msg.contains("Baseline image not found"));
    assert!(msg.contains("please set alwaysSaveActualImage to true"));
}

#[test]
fn missing_baseline_banner_points_at_actual_when_it_is_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let actual_path = artifact(dir.path(), "actual");
    fs::create_dir_all(actual_path.parent().unwrap()).unwrap();
    fs::write(&actual_path, png(10, 10, [0, 0, 0, 255])).unwrap();

    let log = MemoryLogger::new();
    let err = execute_compare(
        &StubEngine::with_mismatch(0.0),
        &log,
        &FolderConfig::new(dir.path()),
        CompareFlags::default(),
        &CompareOptions::default(),
        &input(ActualSource::OnDisk),
    )
    .unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("The actual image can be found at"));
    assert!(!msg.contains("please set alwaysSaveActualImage to true"));
}

#[test]
fn missing_baseline_with_auto_save_writes_it_once_and_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let log = MemoryLogger::new();
    let actual = png(10, 10, [1, 2, 3, 255]);
    let flags = CompareFlags {
        auto_save_baseline: true,
        ..Default::default()
    };
    let result = execute_compare(
        &StubEngine::with_mismatch(0.0),
        &log,
        &FolderConfig::new(dir.path()),
        flags,
        &CompareOptions::default(),
        &input(ActualSource::InMemory(actual.clone())),
    )
    .unwrap();

    assert_eq!(result.mis_match_percentage(), 0.0);
    assert_eq!(fs::read(artifact(dir.path(), "baseline")).unwrap(), actual);
    assert_eq!(log.infos().len(), 1);
}

#[test]
fn mismatch_above_tolerance_persists_the_diff() {
    let dir = tempfile::tempdir().unwrap();
    seed_baseline(dir.path());
    let log = MemoryLogger::new();
    let mut options = CompareOptions::default();
    options.save_above_tolerance = Some(0.1);
    let result = execute_compare(
        &StubEngine::with_mismatch(0.5),
        &log,
        &FolderConfig::new(dir.path()),
        CompareFlags::default(),
        &options,
        &input(ActualSource::InMemory(png(10, 10, [9, 9, 9, 255]))),
    )
    .unwrap();

    assert_eq!(result.mis_match_percentage(), 0.5);
    assert!(artifact(dir.path(), "diff").exists());
}

#[test]
fn mismatch_below_tolerance_does_not_persist_the_diff() {
    let dir = tempfile::tempdir().unwrap();
    seed_baseline(dir.path());
    let log = MemoryLogger::new();
    let mut options = CompareOptions::default();
    options.save_above_tolerance = Some(0.1);
    execute_compare(
        &StubEngine::with_mismatch(0.05),
        &log,
        &FolderConfig::new(dir.path()),
        CompareFlags::default(),
        &options,
        &input(ActualSource::InMemory(png(10, 10, [9, 9, 9, 255]))),
    )
    .unwrap();

    assert!(!artifact(dir.path(), "diff").exists());
    assert!(!artifact(dir.path(), "actual").exists());
}

#[test]
fn explicit_zero_tolerance_persists_any_nonzero_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    seed_baseline(dir.path());
    let log = MemoryLogger::new();
    let mut options = CompareOptions::default();
    options.save_above_tolerance = Some(0.0);
    execute_compare(
        &StubEngine::with_mismatch(0.001),
        &log,
        &FolderConfig::new(dir.path()),
        CompareFlags::default(),
        &options,
        &input(ActualSource::InMemory(png(10, 10, [9, 9, 9, 255]))),
    )
    .unwrap();

    assert!(artifact(dir.path(), "diff").exists());
}

#[test]
fn unset_tolerance_never_persists_unless_forced() {
    let dir = tempfile::tempdir().unwrap();
    seed_baseline(dir.path());
    let log = MemoryLogger::new();
    let mut options = CompareOptions::default();
    options.save_above_tolerance = None;
    execute_compare(
        &StubEngine::with_mismatch(42.0),
        &log,
        &FolderConfig::new(dir.path()),
        CompareFlags::default(),
        &options,
        &input(ActualSource::InMemory(png(10, 10, [9, 9, 9, 255]))),
    )
    .unwrap();
    assert!(!artifact(dir.path(), "diff").exists());

    let flags = CompareFlags {
        store_diffs: true,
        ..Default::default()
    };
    execute_compare(
        &StubEngine::with_mismatch(42.0),
        &log,
        &FolderConfig::new(dir.path()),
        flags,
        &options,
        &input(ActualSource::InMemory(png(10, 10, [9, 9, 9, 255]))),
    )
    .unwrap();
    assert!(artifact(dir.path(), "diff").exists());
}

#[test]
fn stale_diff_is_removed_before_comparing() {
    let dir = tempfile::tempdir().unwrap();
    seed_baseline(dir.path());
    let stale = artifact(dir.path(), "diff");
    fs::create_dir_all(stale.parent().unwrap()).unwrap();
    fs::write(&stale, b"stale").unwrap();

    let log = MemoryLogger::new();
    let mut options = CompareOptions::default();
    options.save_above_tolerance = Some(10.0);
    execute_compare(
        &StubEngine::with_mismatch(0.0),
        &log,
        &FolderConfig::new(dir.path()),
        CompareFlags::default(),
        &options,
        &input(ActualSource::InMemory(png(10, 10, [9, 9, 9, 255]))),
    )
    .unwrap();

    assert!(!stale.exists());
}

#[test]
fn mismatch_is_rounded_to_three_decimals_unless_raw_requested() {
    let dir = tempfile::tempdir().unwrap();
    seed_baseline(dir.path());
    let log = MemoryLogger::new();
    let mut options = CompareOptions::default();
    options.save_above_tolerance = None;

    let rounded = execute_compare(
        &StubEngine::with_mismatch(0.123456),
        &log,
        &FolderConfig::new(dir.path()),
        CompareFlags::default(),
        &options,
        &input(ActualSource::InMemory(png(10, 10, [9, 9, 9, 255]))),
    )
    .unwrap();
    assert_eq!(rounded.mis_match_percentage(), 0.123);

    options.raw_mis_match_percentage = true;
    let raw = execute_compare(
        &StubEngine::with_mismatch(0.123456),
        &log,
        &FolderConfig::new(dir.path()),
        CompareFlags::default(),
        &options,
        &input(ActualSource::InMemory(png(10, 10, [9, 9, 9, 255]))),
    )
    .unwrap();
    assert_eq!(raw.mis_match_percentage(), 0.123456);
}

#[test]
fn update_baseline_overwrites_and_reports_zero() {
    let dir = tempfile::tempdir().unwrap();
    seed_baseline(dir.path());
    let log = MemoryLogger::new();
    let actual = png(10, 10, [200, 100, 50, 255]);
    let flags = CompareFlags {
        update_baseline: true,
        ..Default::default()
    };
    let result = execute_compare(
        &StubEngine::with_mismatch(12.5),
        &log,
        &FolderConfig::new(dir.path()),
        flags,
        &CompareOptions::default(),
        &input(ActualSource::InMemory(actual.clone())),
    )
    .unwrap();

    assert_eq!(result.mis_match_percentage(), 0.0);
    assert_eq!(fs::read(artifact(dir.path(), "baseline")).unwrap(), actual);
}

#[test]
fn full_compare_data_carries_folders_and_diff_only_when_stored() {
    let dir = tempfile::tempdir().unwrap();
    seed_baseline(dir.path());
    let log = MemoryLogger::new();
    let mut options = CompareOptions::default();
    options.return_all_compare_data = true;
    options.save_above_tolerance = Some(0.1);

    let result = execute_compare(
        &StubEngine::with_mismatch(5.0),
        &log,
        &FolderConfig::new(dir.path()),
        CompareFlags::default(),
        &options,
        &input(ActualSource::InMemory(png(10, 10, [9, 9, 9, 255]))),
    )
    .unwrap();

    match result {
        CompareResult::Full(data) => {
            assert_eq!(data.file_name, "homepage-chrome.png");
            assert_eq!(data.folders.baseline, dir.path().join("baseline/desktop_chrome"));
            assert!(data.folders.diff.is_some());
            assert_eq!(data.mis_match_percentage, 5.0);
        }
        CompareResult::Percentage(_) => panic!("expected full compare data"),
    }

    let clean = execute_compare(
        &StubEngine::with_mismatch(0.0),
        &log,
        &FolderConfig::new(dir.path()),
        CompareFlags::default(),
        &options,
        &input(ActualSource::InMemory(png(10, 10, [0, 0, 0, 255]))),
    )
    .unwrap();
    match clean {
        CompareResult::Full(data) => assert!(data.folders.diff.is_none()),
        CompareResult::Percentage(_) => panic!("expected full compare data"),
    }
}

#[test]
fn in_memory_actual_is_persisted_when_mismatch_exceeds_tolerance() {
    let dir = tempfile::tempdir().unwrap();
    seed_baseline(dir.path());
    let log = MemoryLogger::new();
    let actual = png(10, 10, [7, 7, 7, 255]);
    execute_compare(
        &StubEngine::with_mismatch(3.0),
        &log,
        &FolderConfig::new(dir.path()),
        CompareFlags::default(),
        &CompareOptions::default(),
        &input(ActualSource::InMemory(actual.clone())),
    )
    .unwrap();

    assert_eq!(fs::read(artifact(dir.path(), "actual")).unwrap(), actual);
}

#[test]
fn json_report_needs_actual_on_disk_or_is_disabled_with_warning() {
    let dir = tempfile::tempdir().unwrap();
    seed_baseline(dir.path());
    let log = MemoryLogger::new();
    let mut options = CompareOptions::default();
    options.create_json_report_files = true;

    execute_compare(
        &StubEngine::with_mismatch(0.0),
        &log,
        &FolderConfig::new(dir.path()),
        CompareFlags::default(),
        &options,
        &input(ActualSource::InMemory(png(10, 10, [0, 0, 0, 255]))),
    )
    .unwrap();

    let report_path = artifact(dir.path(), "actual").with_extension("json");
    assert!(!report_path.exists());
    let warnings = log.warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("alwaysSaveActualImage"));
}

#[test]
fn json_report_is_written_with_clustered_bounding_boxes() {
    let dir = tempfile::tempdir().unwrap();
    seed_baseline(dir.path());
    let actual_path = artifact(dir.path(), "actual");
    fs::create_dir_all(actual_path.parent().unwrap()).unwrap();
    fs::write(&actual_path, png(10, 10, [0, 0, 0, 255])).unwrap();

    let log = MemoryLogger::new();
    let mut options = CompareOptions::default();
    options.create_json_report_files = true;
    options.save_above_tolerance = None;
    let engine = StubEngine {
        raw: 1.0,
        diff_pixels: vec![
            DiffPixel { x: 3, y: 3 },
            DiffPixel { x: 4, y: 3 },
            DiffPixel { x: 50, y: 50 },
        ],
    };
    let flags = CompareFlags {
        always_save_actual_image: true,
        ..Default::default()
    };
    execute_compare(
        &engine,
        &log,
        &FolderConfig::new(dir.path()),
        flags,
        &options,
        &input(ActualSource::OnDisk),
    )
    .unwrap();

    let report_path = actual_path.with_extension("json");
    let report: serde_json::Value =
        serde_json::from_slice(&fs::read(report_path).unwrap()).unwrap();
    let boxes = report["boundingBoxes"]["diffBoundingBoxes"]
        .as_array()
        .unwrap();
    assert_eq!(boxes.len(), 2);
    assert_eq!(report["data"]["diffPixelCount"], 3);
    assert_eq!(report["devicePixelRatio"], 1.0);
}
