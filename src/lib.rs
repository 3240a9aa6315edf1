use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod group;
pub mod stage;
pub mod storage;
pub mod upload;

pub use group::{upload_group, Group};
pub use stage::{stage, ExclusionPolicy, StagedFiles};
pub use storage::{BucketHandle, EnvS3Client, S3Client, StorageClient};
pub use upload::{object_key, upload_files};

#[macro_use]
extern crate tracing;

pub fn setup() -> color_eyre::Result<()> {
    if cfg!(debug_assertions) {
        for (key, value) in &[
            ("RUST_SPANTRACE", "full"),
            ("RUST_LIB_BACKTRACE", "full"),
            ("RUST_BACKTRACE", "full"),
        ] {
            if std::env::var_os(key).is_none() {
                //safety: only ever called from main before the runtime exists, so no other threads read the env
                unsafe { std::env::set_var(key, value) };
            }
        }
    }

    let dotenv_error = match dotenvy::dotenv() {
        Err(e) if !e.not_found() => Some(e),
        _ => None,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Some(e) = dotenv_error {
        warn!(?e, "Error reading .env file");
    }

    color_eyre::install()
}
