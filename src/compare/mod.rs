//! Compare orchestrator: baseline lifecycle, external diff invocation and the
//! persistence/tolerance policy.

pub mod engine;
pub mod options;
pub mod orchestrator;
pub mod paths;
pub mod report;

pub use engine::{
    DiffOutcome, DiffPixel, DiffRequest, IgnoreChannels, PixelDiffEngine, reported_mismatch,
};
pub use options::{CompareOptions, LegacyBlockOutFlags, apply_legacy_block_out};
pub use orchestrator::{
    ActualSource, CompareData, CompareFlags, CompareInput, CompareResult, ResultFolders,
    execute_compare,
};
pub use paths::{FilePaths, FolderConfig, TestContext, format_file_name, resolve_file_paths};
pub use report::{BoundingBoxes, JsonReport, ReportData, cluster_diff_pixels};
