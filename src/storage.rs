use color_eyre::eyre::{bail, WrapErr};
use s3::{creds::Credentials, Bucket, Region};
use std::{env, path::Path};

///cloud storage's s3-compatible xml api
pub const DEFAULT_ENDPOINT: &str = "https://storage.googleapis.com";

/// Something that can hand out buckets to upload into.
pub trait StorageClient {
    type Bucket: BucketHandle;

    fn bucket(&self, name: &str) -> color_eyre::Result<Self::Bucket>;
}

#[allow(async_fn_in_trait)]
pub trait BucketHandle {
    fn name(&self) -> &str;

    /// Writes the file's current contents to `key`, replacing whatever was there.
    async fn upload_from_file(&self, key: &str, path: &Path) -> color_eyre::Result<()>;
}

#[derive(Clone, Debug)]
pub struct S3Client {
    region: Region,
    credentials: Credentials,
}

impl S3Client {
    pub fn new(endpoint: String, credentials: Credentials) -> Self {
        Self {
            region: Region::Custom {
                region: "auto".to_owned(),
                endpoint,
            },
            credentials,
        }
    }

    /// Reads `STORAGE_ENDPOINT` and the credentials from the environment.
    ///
    /// An explicit `GCS_HMAC_ACCESS_ID`/`GCS_HMAC_SECRET` pair wins, otherwise the usual AWS-style chain is tried.
    pub fn from_env() -> color_eyre::Result<Self> {
        let endpoint = env::var("STORAGE_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_owned());
        let credentials = get_credentials()?;

        debug!(%endpoint, "Created storage client");

        Ok(Self::new(endpoint, credentials))
    }
}

fn get_credentials() -> color_eyre::Result<Credentials> {
    match (env::var("GCS_HMAC_ACCESS_ID"), env::var("GCS_HMAC_SECRET")) {
        (Ok(access_key), Ok(secret_key)) => Ok(Credentials::new(
            Some(&access_key),
            Some(&secret_key),
            None,
            None,
            None,
        )?),
        _ => Credentials::default().wrap_err(
            "unable to find storage credentials, set GCS_HMAC_ACCESS_ID and GCS_HMAC_SECRET",
        ),
    }
}

impl StorageClient for S3Client {
    type Bucket = S3Bucket;

    fn bucket(&self, name: &str) -> color_eyre::Result<S3Bucket> {
        let bucket = Bucket::new(name, self.region.clone(), self.credentials.clone())
            .wrap_err_with(|| format!("unable to open bucket {name}"))?
            .with_path_style();

        Ok(S3Bucket {
            name: name.to_owned(),
            bucket,
        })
    }
}

/// Builds a fresh [`S3Client`] from the environment each time a bucket is asked for, so nothing
/// touches credentials until there is something to upload.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvS3Client;

impl StorageClient for EnvS3Client {
    type Bucket = S3Bucket;

    fn bucket(&self, name: &str) -> color_eyre::Result<S3Bucket> {
        S3Client::from_env()?.bucket(name)
    }
}

#[derive(Debug)]
pub struct S3Bucket {
    name: String,
    bucket: Box<Bucket>,
}

impl BucketHandle for S3Bucket {
    fn name(&self) -> &str {
        &self.name
    }

    async fn upload_from_file(&self, key: &str, path: &Path) -> color_eyre::Result<()> {
        let contents = tokio::fs::read(path)
            .await
            .wrap_err_with(|| format!("unable to read {}", path.display()))?;
        let content_type = content_type(path);

        let rsp = self
            .bucket
            .put_object_with_content_type(key, &contents, &content_type)
            .await
            .wrap_err_with(|| format!("unable to upload {key}"))?;

        let code = rsp.status_code();
        if !(200..300).contains(&code) {
            bail!("uploading {key} failed with status {code}");
        }

        trace!(%key, %content_type, %code, len = contents.len(), "Put object");

        Ok(())
    }
}

fn content_type(path: &Path) -> String {
    new_mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_owned()
}
