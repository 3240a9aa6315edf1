use crate::storage::BucketHandle;
use color_eyre::eyre::{bail, WrapErr};
use std::path::{Component, Path, PathBuf};

/// Builds `prefix/relative`, always separated by `/` whatever the host uses.
pub fn object_key(prefix: &str, relative: &Path) -> color_eyre::Result<String> {
    let mut key = prefix.trim_end_matches('/').to_owned();

    for component in relative.components() {
        let part = match component {
            Component::Normal(part) => part,
            Component::CurDir => continue,
            _ => bail!("{} is not a plain relative path", relative.display()),
        };
        let Some(part) = part.to_str() else {
            bail!("unable to get UTF-8 path for {}", relative.display())
        };

        if !key.is_empty() {
            key.push('/');
        }
        key.push_str(part);
    }

    Ok(key)
}

/// Uploads each of `files` (which must live under `root`) to `prefix/<path relative to root>`.
///
/// Stops at the first failure, leaving anything already uploaded in place. Returns the keys written.
pub async fn upload_files<B: BucketHandle>(
    bucket: &B,
    root: &Path,
    files: &[PathBuf],
    prefix: &str,
) -> color_eyre::Result<Vec<String>> {
    let mut keys = Vec::with_capacity(files.len());

    for file in files {
        let relative = file
            .strip_prefix(root)
            .wrap_err_with(|| format!("{} is outside {}", file.display(), root.display()))?;
        let key = object_key(prefix, relative)?;

        bucket.upload_from_file(&key, file).await?;
        info!(uri = %format!("gs://{}/{key}", bucket.name()), "Uploaded");

        keys.push(key);
    }

    Ok(keys)
}
