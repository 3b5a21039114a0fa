use std::fs;
use std::path::PathBuf;

use anyhow::Context;

use crate::{
    compare::{
        engine::{DiffRequest, IgnoreChannels, PixelDiffEngine, reported_mismatch},
        options::CompareOptions,
        paths::{FilePaths, FolderConfig, TestContext, file_name_of, resolve_file_paths},
        report::{BoundingBoxes, JsonReport, ReportData, cluster_diff_pixels},
    },
    error::{VisregError, VisregResult},
    geometry::{
        DeviceClass, DeviceRectangles, merge_ignore_regions, resolve_chrome_bar_rectangles,
    },
    logging::CompareLogger,
    raster::{IGNORE_OVERLAY_COLOR, PngImage, overlay_ignore_boxes},
};

/// Baseline/actual persistence switches, separate from the per-comparison
/// [`CompareOptions`].
#[derive(Clone, Copy, Debug, Default)]
pub struct CompareFlags {
    /// Write a missing baseline from the actual image instead of failing.
    pub auto_save_baseline: bool,
    /// Overwrite the baseline with the actual image and report 0 mismatch.
    pub update_baseline: bool,
    /// The capture layer persists every actual image to disk.
    pub always_save_actual_image: bool,
    /// Persist the diff artifact regardless of tolerance.
    pub store_diffs: bool,
}

/// Where the actual image lives when the comparison starts.
#[derive(Clone, Debug)]
pub enum ActualSource {
    /// Already written to the derived actual path by the capture layer.
    OnDisk,
    /// Still in memory; persisted only by the documented rules.
    InMemory(Vec<u8>),
}

/// Per-comparison inputs next to the options: identity, device geometry and
/// the actual screenshot.
#[derive(Clone, Debug)]
pub struct CompareInput {
    pub file_name_template: String,
    pub context: TestContext,
    pub actual: ActualSource,
    pub device_class: DeviceClass,
    pub device_rectangles: DeviceRectangles,
    pub is_viewport_screenshot: bool,
    pub is_native_context: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultFolders {
    pub actual: PathBuf,
    pub baseline: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareData {
    pub file_name: String,
    pub folders: ResultFolders,
    pub mis_match_percentage: f64,
}

/// Bare percentage, or the full record when `returnAllCompareData` is set.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum CompareResult {
    Percentage(f64),
    Full(CompareData),
}

impl CompareResult {
    pub fn mis_match_percentage(&self) -> f64 {
        match self {
            CompareResult::Percentage(pct) => *pct,
            CompareResult::Full(data) => data.mis_match_percentage,
        }
    }
}

/// Runs one comparison as a linear state machine:
///
/// `ResolvePaths -> EnsureBaseline -> RemoveStaleDiff -> BuildIgnoreSet ->
/// Diff -> MaybePersistDiff -> MaybePersistActual -> MaybeReport ->
/// MaybeUpdateBaseline -> Done`
///
/// Only a failing baseline write and a failing stale-diff removal abort the
/// run. Bezel, overlay and report problems are logged and never change the
/// returned result.
pub fn execute_compare<E: PixelDiffEngine>(
    engine: &E,
    log: &dyn CompareLogger,
    folders: &FolderConfig,
    flags: CompareFlags,
    options: &CompareOptions,
    input: &CompareInput,
) -> VisregResult<CompareResult> {
    // ResolvePaths
    let paths = resolve_file_paths(folders, &input.context, &input.file_name_template);

    // EnsureBaseline
    let baseline_existed = paths.baseline_file_path.exists();
    if !baseline_existed {
        if flags.auto_save_baseline || flags.update_baseline {
            write_baseline(&paths, &input.actual)?;
            log.info(&format!(
                "no baseline image was found; the actual image has been saved as the new \
                 baseline at {}",
                paths.baseline_file_path.display()
            ));
        } else {
            return Err(baseline_missing_error(&paths, flags));
        }
    }

    // RemoveStaleDiff
    if paths.diff_file_path.exists() {
        fs::remove_file(&paths.diff_file_path).map_err(|err| {
            VisregError::diff_removal(format!(
                "could not remove the stale diff at {}: {err}",
                paths.diff_file_path.display()
            ))
        })?;
    }

    // BuildIgnoreSet
    let chrome_bars = resolve_chrome_bar_rectangles(
        &input.device_rectangles,
        options.chrome_bar_flags(),
        input.device_class,
        input.is_viewport_screenshot,
        input.is_native_context,
    );
    let merged = merge_ignore_regions(
        &options.block_out,
        &options.ignore_regions,
        &chrome_bars,
        input.context.dpr,
        input.device_class.is_android(),
    );
    let create_json_report_files = if options.create_json_report_files
        && !flags.always_save_actual_image
    {
        log.warn(
            "createJsonReportFiles has been disabled because it needs the actual image on \
             disk; please set alwaysSaveActualImage to true",
        );
        false
    } else {
        options.create_json_report_files
    };

    // Diff
    let baseline_bytes = fs::read(&paths.baseline_file_path)
        .with_context(|| format!("read baseline {}", paths.baseline_file_path.display()))?;
    let actual_bytes = actual_bytes(&paths, &input.actual)?;
    let request = DiffRequest {
        ignore: IgnoreChannels::from_options(options),
        ignored_boxes: merged.ignored_boxes.clone(),
        scale_to_same_size: options.scale_images_to_same_size,
    };
    let outcome = engine.diff(&baseline_bytes, &actual_bytes, &request)?;
    let mut mis_match_percentage =
        reported_mismatch(outcome.raw_mis_match_percentage, options.raw_mis_match_percentage);

    // MaybePersistDiff
    let above_tolerance = options
        .save_above_tolerance
        .is_some_and(|tolerance| outcome.raw_mis_match_percentage > tolerance);
    let store_diff = above_tolerance || flags.store_diffs;
    let mut diff_stored = false;
    if store_diff {
        match persist_diff(&paths, &outcome.diff_image, &merged.ignored_boxes) {
            Ok(()) => diff_stored = true,
            Err(err) => log.warn(&format!("the diff artifact could not be stored: {err}")),
        }
    }
    let diff_bounding_boxes = if create_json_report_files {
        cluster_diff_pixels(
            &outcome.diff_pixels,
            options.diff_pixel_bounding_box_proximity,
        )
    } else {
        Vec::new()
    };

    // MaybePersistActual
    if let ActualSource::InMemory(bytes) = &input.actual {
        let persist = (flags.auto_save_baseline && !baseline_existed) || above_tolerance;
        if persist {
            if let Err(err) = write_artifact(&paths.actual_folder_path, &paths.actual_file_path, bytes)
            {
                log.warn(&format!("the actual image could not be stored: {err}"));
            }
        }
    }

    // MaybeReport
    if create_json_report_files {
        let report = JsonReport {
            bounding_boxes: BoundingBoxes {
                diff_bounding_boxes,
                ignored_boxes: merged.ignored_boxes.clone(),
            },
            data: ReportData {
                mis_match_percentage,
                raw_mis_match_percentage: outcome.raw_mis_match_percentage,
                diff_pixel_count: outcome.diff_pixels.len(),
                analysis_time_ms: outcome.analysis_time_ms,
            },
            file_name: file_name_of(&paths.actual_file_path),
            file_paths: &paths,
            device_pixel_ratio: input.context.dpr,
            image_compare_options: options,
            test_context: &input.context,
            store_diffs: flags.store_diffs,
        };
        if let Err(err) = write_json_report(&paths, &report) {
            log.warn(&format!("the JSON report could not be written: {err}"));
        }
    }

    // MaybeUpdateBaseline
    if flags.update_baseline {
        write_baseline(&paths, &input.actual)?;
        log.info(&format!(
            "the baseline at {} has been updated with the actual image",
            paths.baseline_file_path.display()
        ));
        mis_match_percentage = 0.0;
    }

    // Done
    if options.return_all_compare_data {
        Ok(CompareResult::Full(CompareData {
            file_name: file_name_of(&paths.actual_file_path),
            folders: ResultFolders {
                actual: paths.actual_folder_path.clone(),
                baseline: paths.baseline_folder_path.clone(),
                diff: diff_stored.then(|| paths.diff_folder_path.clone()),
            },
            mis_match_percentage,
        }))
    } else {
        Ok(CompareResult::Percentage(mis_match_percentage))
    }
}

fn actual_bytes(paths: &FilePaths, actual: &ActualSource) -> VisregResult<Vec<u8>> {
    match actual {
        ActualSource::InMemory(bytes) => Ok(bytes.clone()),
        ActualSource::OnDisk => fs::read(&paths.actual_file_path)
            .with_context(|| format!("read actual {}", paths.actual_file_path.display()))
            .map_err(VisregError::from),
    }
}

fn write_baseline(paths: &FilePaths, actual: &ActualSource) -> VisregResult<()> {
    let bytes = match actual {
        ActualSource::InMemory(bytes) => bytes.clone(),
        ActualSource::OnDisk => fs::read(&paths.actual_file_path).map_err(|err| {
            VisregError::baseline_write(format!(
                "could not read the actual image at {}: {err}",
                paths.actual_file_path.display()
            ))
        })?,
    };
    fs::create_dir_all(&paths.baseline_folder_path).map_err(|err| {
        VisregError::baseline_write(format!(
            "could not create the baseline folder {}: {err}",
            paths.baseline_folder_path.display()
        ))
    })?;
    fs::write(&paths.baseline_file_path, bytes).map_err(|err| {
        VisregError::baseline_write(format!(
            "could not write the baseline at {}: {err}",
            paths.baseline_file_path.display()
        ))
    })
}

fn baseline_missing_error(paths: &FilePaths, flags: CompareFlags) -> VisregError {
    let actual_hint = if flags.always_save_actual_image || paths.actual_file_path.exists() {
        format!(
            "The actual image can be found at:\n  {}",
            paths.actual_file_path.display()
        )
    } else {
        "No actual image was persisted because alwaysSaveActualImage is false; \
         please set alwaysSaveActualImage to true to inspect it."
            .to_string()
    };
    VisregError::baseline_missing(format!(
        "\n#####################################################################\n\
         Baseline image not found at:\n  {}\n\
         {actual_hint}\n\
         Save a baseline image manually, or enable autoSaveBaseline to save it \
         on first run.\n\
         #####################################################################",
        paths.baseline_file_path.display()
    ))
}

fn persist_diff(paths: &FilePaths, diff_image: &[u8], boxes: &[crate::geometry::IgnoreBox]) -> VisregResult<()> {
    let annotated = overlay_ignore_boxes::<PngImage>(diff_image, boxes, IGNORE_OVERLAY_COLOR)?;
    write_artifact(&paths.diff_folder_path, &paths.diff_file_path, &annotated)
}

fn write_artifact(folder: &std::path::Path, file: &std::path::Path, bytes: &[u8]) -> VisregResult<()> {
    fs::create_dir_all(folder).with_context(|| format!("create folder {}", folder.display()))?;
    fs::write(file, bytes).with_context(|| format!("write artifact {}", file.display()))?;
    Ok(())
}

fn write_json_report(paths: &FilePaths, report: &JsonReport<'_>) -> VisregResult<()> {
    let json_path = paths.actual_file_path.with_extension("json");
    let payload = serde_json::to_vec_pretty(report).context("serialize JSON report")?;
    write_artifact(&paths.actual_folder_path, &json_path, &payload)
}
