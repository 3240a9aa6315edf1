use clap::{ArgGroup, Parser};
use color_eyre::{eyre::bail, owo_colors::OwoColorize};
use composer_upload::{setup, upload_group, EnvS3Client, ExclusionPolicy, Group};
use std::path::PathBuf;

#[macro_use]
extern crate tracing;

/// Upload DAGs and data to a Cloud Composer bucket
#[derive(Parser, Debug)]
#[command(name = "composer-upload", version, about)]
#[command(group(
    ArgGroup::new("bucket_source")
        .required(true)
        .args(["bucket_name", "bucket"])
))]
#[command(group(
    ArgGroup::new("directories")
        .required(true)
        .multiple(true)
        .args(["dags_directory", "data_directory"])
))]
#[command(after_help = "Example:\n  composer-upload us-central1-xxxx-bucket --dags_directory dags --data_directory data")]
struct Args {
    /// Cloud Composer bucket name (example: us-central1-xxxx-bucket)
    bucket_name: Option<String>,

    /// Cloud Composer bucket name, as a flag instead of a positional
    #[arg(long)]
    bucket: Option<String>,

    /// Local directory containing DAG files, uploaded under dags/
    #[arg(long = "dags_directory", alias = "dags-directory")]
    dags_directory: Option<PathBuf>,

    /// Local directory containing data/scripts, uploaded under data/
    #[arg(long = "data_directory", alias = "data-directory")]
    data_directory: Option<PathBuf>,
}

impl Args {
    fn groups(&self) -> Vec<(Group, PathBuf)> {
        [
            (Group::Dags, &self.dags_directory),
            (Group::Data, &self.data_directory),
        ]
        .into_iter()
        .filter_map(|(group, dir)| dir.clone().map(|dir| (group, dir)))
        .collect()
    }
}

fn main() -> color_eyre::Result<()> {
    let args = Args::parse();
    setup()?;

    let groups = args.groups();
    let Some(bucket_name) = args.bucket_name.or(args.bucket) else {
        bail!("missing bucket name")
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let client = EnvS3Client;
    let policy = ExclusionPolicy::default();

    let uploaded = runtime.block_on(async {
        let mut uploaded = 0;
        for (group, dir) in &groups {
            uploaded += upload_group(&client, dir, &bucket_name, *group, &policy)
                .await?
                .len();
        }
        Ok::<_, color_eyre::Report>(uploaded)
    })?;

    info!(%bucket_name, %uploaded, "Finished");
    println!(
        "{} {} object(s) in {}",
        "Upload completed successfully!".green().bold(),
        uploaded,
        format!("gs://{bucket_name}").cyan()
    );

    Ok(())
}
