use clap::{Parser, Subcommand};
use hadrian_etl::runner::{self, EtlArgs, IngestArgs, UploadOutcome};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "hadrian-etl",
    about = "Batch CSV ingestion to S3 and ETL load into Postgres"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a local CSV file to the project data bucket
    Ingest {
        /// Path to the CSV file to upload
        #[arg(short, long, default_value = "data.csv")]
        file: PathBuf,

        /// Object key to upload under (default: data_{timestamp}.csv)
        #[arg(short, long)]
        key: Option<String>,

        /// Skip the upload when the object already exists
        #[arg(long)]
        skip_existing: bool,

        /// Quiet mode - warnings only
        #[arg(short, long)]
        quiet: bool,
    },

    /// Download the latest object, transform it, and load it into Postgres
    Etl {
        /// Explicit object key (default: most recently modified object)
        #[arg(short, long)]
        key: Option<String>,

        /// Destination table
        #[arg(short, long, default_value = "processed_data")]
        table: String,

        /// Column whose values are uppercased
        #[arg(short, long, default_value = "name")]
        column: String,

        /// Primary-key column used for upserts
        #[arg(long, default_value = "id")]
        id_column: String,

        /// Quiet mode - warnings only
        #[arg(short, long)]
        quiet: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Ingest {
            file,
            key,
            skip_existing,
            quiet,
        } => {
            init_tracing(quiet);
            let report = runner::run_ingest(IngestArgs {
                file: file.clone(),
                key,
                skip_existing,
            })
            .await?;

            match report.outcome {
                UploadOutcome::Uploaded => println!(
                    "Successfully uploaded {} to {} as {}",
                    file.display(),
                    report.bucket,
                    report.key
                ),
                UploadOutcome::SkippedExisting => println!(
                    "Object {} already exists in {}, skipping upload",
                    report.key, report.bucket
                ),
            }
        }
        Command::Etl {
            key,
            table,
            column,
            id_column,
            quiet,
        } => {
            init_tracing(quiet);
            let report = runner::run_etl(EtlArgs {
                key,
                table,
                column,
                key_column: id_column,
            })
            .await?;

            println!(
                "ETL process completed successfully for object: {}",
                report.key
            );
            println!(
                "Loaded {} rows into {} in {:.2}s",
                report.rows_loaded,
                report.table,
                report.duration.as_secs_f64()
            );
        }
    }

    Ok(())
}

fn init_tracing(quiet: bool) {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    let filter = if quiet {
        EnvFilter::new("hadrian_etl=warn,sqlx=off")
    } else {
        EnvFilter::new("hadrian_etl=info,sqlx=off")
    };
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
