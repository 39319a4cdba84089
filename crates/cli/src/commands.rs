use clap::Subcommand;
use model::{execution::strategy::SubmitStrategy, schema::resource::Resource};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// List the resources that can be imported and what each one expects
    Schemas {
        #[arg(long, help = "Print the schemas as JSON")]
        json: bool,
    },
    /// Parse and validate a file without contacting the backend
    Preview {
        #[arg(long, help = "Resource to import: users, advisors, enrollments, grades")]
        resource: Resource,

        #[arg(long, help = "CSV or JSON file to read")]
        file: PathBuf,

        #[arg(long, help = "MIME type of the file; overrides the extension")]
        mime: Option<String>,

        #[arg(long, help = "Number of records to show")]
        limit: Option<usize>,

        #[arg(long, help = "Print the preview as JSON instead of one record per line")]
        json: bool,
    },
    /// Parse, validate and send a file to the backend, then print the report
    Submit {
        #[arg(long, help = "Resource to import: users, advisors, enrollments, grades")]
        resource: Resource,

        #[arg(long, help = "CSV or JSON file to read")]
        file: PathBuf,

        #[arg(long, help = "MIME type of the file; overrides the extension")]
        mime: Option<String>,

        #[arg(long, help = "batch or sequential; defaults per resource")]
        strategy: Option<SubmitStrategy>,

        #[arg(long, help = "Backend base URL (overrides AIMS_API_URL)")]
        api_url: Option<String>,

        #[arg(long, help = "Bearer token (overrides AIMS_AUTH_TOKEN)")]
        token: Option<String>,

        #[arg(long, help = "Load settings from this .env file")]
        env_file: Option<PathBuf>,

        #[arg(
            long,
            help = "If specified, writes the JSON report to this file instead of stdout"
        )]
        output: Option<PathBuf>,
    },
}
