use std::path::{Path, PathBuf};

/// Everything a filename template or folder segment can be built from.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestContext {
    pub tag: String,
    pub browser_name: String,
    pub browser_version: String,
    pub platform_name: String,
    pub platform_version: String,
    pub device_name: String,
    pub log_name: String,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub dpr: f64,
    pub is_mobile: bool,
}

impl TestContext {
    /// Folder discriminator: `desktop_<browser>` on desktop, the device name
    /// on mobile.
    pub fn device_segment(&self) -> String {
        if self.is_mobile {
            self.device_name.clone()
        } else {
            format!("desktop_{}", self.browser_name)
        }
    }
}

/// Where baseline/actual/diff artifacts live for one comparison. Derived,
/// never stored.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePaths {
    pub actual_folder_path: PathBuf,
    pub baseline_folder_path: PathBuf,
    pub diff_folder_path: PathBuf,
    pub actual_file_path: PathBuf,
    pub baseline_file_path: PathBuf,
    pub diff_file_path: PathBuf,
}

/// Folder layout configuration for one test run.
#[derive(Clone, Debug)]
pub struct FolderConfig {
    pub root: PathBuf,
    pub save_per_instance: bool,
    pub instance_name: Option<String>,
}

impl FolderConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            save_per_instance: false,
            instance_name: None,
        }
    }
}

/// Substitutes `{token}` placeholders; unresolved tokens stay intact.
pub fn format_file_name(template: &str, ctx: &TestContext) -> String {
    let dpr = if ctx.dpr.fract() == 0.0 {
        format!("{}", ctx.dpr as u64)
    } else {
        format!("{}", ctx.dpr)
    };
    let substitutions = [
        ("{tag}", ctx.tag.clone()),
        ("{browserName}", ctx.browser_name.clone()),
        ("{browserVersion}", ctx.browser_version.clone()),
        ("{platformName}", ctx.platform_name.clone()),
        ("{platformVersion}", ctx.platform_version.clone()),
        ("{width}", ctx.width.to_string()),
        ("{height}", ctx.height.to_string()),
        ("{dpr}", dpr),
        ("{logName}", ctx.log_name.clone()),
        ("{name}", ctx.name.clone()),
        ("{mobile}", ctx.device_segment()),
    ];

    let mut name = template.to_string();
    for (token, value) in substitutions {
        name = name.replace(token, &value);
    }
    if !name.ends_with(".png") {
        name.push_str(".png");
    }
    name
}

/// Derives the full artifact layout:
/// `<root>/<actual|baseline|diff>/[<instanceName>/]<segment>/<file>.png`.
pub fn resolve_file_paths(
    folders: &FolderConfig,
    ctx: &TestContext,
    file_name_template: &str,
) -> FilePaths {
    let file_name = format_file_name(file_name_template, ctx);
    let segment = ctx.device_segment();

    let subfolder = |kind: &str| -> PathBuf {
        let mut path = folders.root.join(kind);
        if folders.save_per_instance {
            if let Some(instance) = &folders.instance_name {
                path = path.join(instance);
            }
        }
        path.join(&segment)
    };

    let actual_folder_path = subfolder("actual");
    let baseline_folder_path = subfolder("baseline");
    let diff_folder_path = subfolder("diff");

    FilePaths {
        actual_file_path: actual_folder_path.join(&file_name),
        baseline_file_path: baseline_folder_path.join(&file_name),
        diff_file_path: diff_folder_path.join(&file_name),
        actual_folder_path,
        baseline_folder_path,
        diff_folder_path,
    }
}

/// File name portion of a path, for result records.
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
