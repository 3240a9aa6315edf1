use crate::{
    stage::{stage, ExclusionPolicy},
    storage::StorageClient,
    upload::upload_files,
};
use std::{
    fmt::{Display, Formatter},
    path::Path,
};

/// The two kinds of content a composer environment reads from its bucket.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Group {
    Dags,
    Data,
}

impl Group {
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Dags => "dags",
            Self::Data => "data",
        }
    }
}

impl Display for Group {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Group::Dags => write!(f, "DAGs"),
            Group::Data => write!(f, "data files"),
        }
    }
}

/// Stages `source` and uploads what survives under the group's prefix.
///
/// A missing or (after filtering) empty directory is skipped with a warning. The staging root
/// is gone by the time this returns, whether the upload worked or not.
#[instrument(skip(client, policy), fields(prefix = group.prefix()))]
pub async fn upload_group<C: StorageClient>(
    client: &C,
    source: &Path,
    bucket_name: &str,
    group: Group,
    policy: &ExclusionPolicy,
) -> color_eyre::Result<Vec<String>> {
    info!("Uploading {group}");

    let Some(staged) = stage(source, policy)? else {
        warn!(?source, "No files found");
        return Ok(vec![]);
    };
    if staged.is_empty() {
        warn!(?source, "No files found");
        staged.close();
        return Ok(vec![]);
    }

    let result = async {
        let bucket = client.bucket(bucket_name)?;
        upload_files(&bucket, staged.root(), staged.files(), group.prefix()).await
    }
    .await;

    staged.close();

    result
}
