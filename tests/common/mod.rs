#![allow(dead_code)]

use color_eyre::eyre::bail;
use composer_upload::{BucketHandle, StorageClient};
use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

#[derive(Default, Debug)]
pub struct Recorded {
    ///(bucket, key) -> contents
    pub objects: BTreeMap<(String, String), Vec<u8>>,
    ///every local path an upload was attempted from
    pub attempted: Vec<PathBuf>,
    pub buckets_opened: usize,
}

/// In-memory stand-in for cloud storage.
#[derive(Clone, Default)]
pub struct MemoryClient {
    pub recorded: Arc<Mutex<Recorded>>,
    ///fail every upload once this many have succeeded
    pub fail_after: Option<usize>,
}

impl MemoryClient {
    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::default()
        }
    }

    pub fn keys(&self) -> BTreeSet<String> {
        let recorded = self.recorded.lock().unwrap();
        recorded.objects.keys().map(|(_, key)| key.clone()).collect()
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        let recorded = self.recorded.lock().unwrap();
        recorded
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn attempted(&self) -> Vec<PathBuf> {
        self.recorded.lock().unwrap().attempted.clone()
    }

    pub fn buckets_opened(&self) -> usize {
        self.recorded.lock().unwrap().buckets_opened
    }
}

impl StorageClient for MemoryClient {
    type Bucket = MemoryBucket;

    fn bucket(&self, name: &str) -> color_eyre::Result<MemoryBucket> {
        self.recorded.lock().unwrap().buckets_opened += 1;
        Ok(MemoryBucket {
            name: name.to_string(),
            client: self.clone(),
        })
    }
}

pub struct MemoryBucket {
    name: String,
    client: MemoryClient,
}

impl BucketHandle for MemoryBucket {
    fn name(&self) -> &str {
        &self.name
    }

    async fn upload_from_file(&self, key: &str, path: &Path) -> color_eyre::Result<()> {
        let mut recorded = self.client.recorded.lock().unwrap();
        recorded.attempted.push(path.to_path_buf());

        if self
            .client
            .fail_after
            .is_some_and(|n| recorded.objects.len() >= n)
        {
            bail!("simulated outage uploading {key}");
        }

        let contents = fs::read(path)?;
        recorded
            .objects
            .insert((self.name.clone(), key.to_string()), contents);

        Ok(())
    }
}

pub fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

pub fn set<const N: usize>(items: [&str; N]) -> BTreeSet<String> {
    items.into_iter().map(String::from).collect()
}
