use color_eyre::eyre::{bail, WrapErr};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tempfile::TempDir;
use walkdir::WalkDir;

mod exclusion;

pub use exclusion::{ExclusionPolicy, DEFAULT_EXCLUSIONS};

const STAGING_PREFIX: &str = "composer-upload-";

/// A filtered snapshot of a source directory, living in its own temporary directory.
///
/// The staging root is removed by [`StagedFiles::close`], or when this is dropped.
#[derive(Debug)]
pub struct StagedFiles {
    root: TempDir,
    files: Vec<PathBuf>,
}

impl StagedFiles {
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    ///absolute paths under [`Self::root`], in traversal order
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Removes the staging root. Failures are logged and otherwise ignored.
    pub fn close(self) {
        let root = self.root.path().to_path_buf();
        match self.root.close() {
            Ok(()) => debug!(?root, "Removed staging area"),
            Err(e) => warn!(?e, ?root, "Unable to remove staging area"),
        }
    }
}

/// Copies everything under `source` that the policy lets through into a fresh staging root.
///
/// A missing `source` is not an error: it is logged and `None` comes back.
pub fn stage(
    source: impl AsRef<Path>,
    policy: &ExclusionPolicy,
) -> color_eyre::Result<Option<StagedFiles>> {
    let source = source.as_ref();

    if !source.exists() {
        warn!(?source, "Directory not found");
        return Ok(None);
    }
    if !source.is_dir() {
        bail!("{} is not a directory", source.display());
    }

    let root = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir()
        .wrap_err("unable to create staging area")?;
    debug!(?source, root=?root.path(), "Staging");

    copy_filtered(source, root.path(), policy)?;
    let files = collect_files(root.path())?;

    info!(?source, staged = files.len(), "Staged files");

    Ok(Some(StagedFiles { root, files }))
}

fn copy_filtered(source: &Path, dest: &Path, policy: &ExclusionPolicy) -> color_eyre::Result<()> {
    let walker = WalkDir::new(source)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !policy.excludes(entry.file_name()));

    for entry in walker {
        let entry = entry.wrap_err_with(|| format!("unable to read {}", source.display()))?;
        let relative = entry.path().strip_prefix(source)?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .wrap_err_with(|| format!("unable to create {}", target.display()))?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target)
                .wrap_err_with(|| format!("unable to copy {}", entry.path().display()))?;
            trace!(?relative, "Copied file");
        } else {
            debug!(path=?entry.path(), "Skipping special file");
        }
    }

    Ok(())
}

fn collect_files(root: &Path) -> color_eyre::Result<Vec<PathBuf>> {
    let mut files = vec![];
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
