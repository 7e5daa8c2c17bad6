use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use commands::{config, entry, filter, list, upload, AppContext};
use std::path::PathBuf;
use watchlist_core::FormFields;

mod commands;
mod logging;
mod output;
mod upload_ui;

#[derive(Parser)]
#[command(name = "watchlist")]
#[command(about = "Watchlist - keep track of the movies and series you watch")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Use this file for the stored watchlist instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    data_file: Option<PathBuf>,

    /// Also write logs to this file (rotated daily)
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Entry fields shared by add and edit
#[derive(Args, Debug, Default)]
pub struct EntryArgs {
    /// Movie/series name
    #[arg(long)]
    name: Option<String>,

    /// Release year, ranges allowed (e.g. 2022-2024)
    #[arg(long)]
    year: Option<String>,

    /// Category (free text; e.g. Anime, Marvel, Hollywood Movies)
    #[arg(long)]
    category: Option<String>,

    /// Watched, Currently Watching or To Watch
    #[arg(long)]
    status: Option<String>,

    /// Rating from 1 to 10
    #[arg(long)]
    rating: Option<String>,

    /// Free-form remarks
    #[arg(long)]
    remarks: Option<String>,

    /// Streaming platform
    #[arg(long)]
    platform: Option<String>,

    /// Poster image to upload and attach
    #[arg(long, value_name = "PATH")]
    image: Option<PathBuf>,
}

impl EntryArgs {
    fn into_parts(self) -> (FormFields, Option<PathBuf>) {
        let fields = FormFields {
            name: self.name,
            year: self.year,
            category: self.category,
            status: self.status,
            rating: self.rating,
            remarks: self.remarks,
            platform: self.platform,
        };
        (fields, self.image)
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AcceptArg {
    /// JPG, PNG, GIF and WebP only
    Image,
    /// Any file type
    Any,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new entry
    #[command(long_about = "Add a movie or series. Required fields not given as flags are prompted for when running in a terminal. Use --image to upload a poster.")]
    Add {
        #[command(flatten)]
        fields: EntryArgs,
    },
    /// Edit an existing entry
    #[command(long_about = "Edit an entry by id (a unique prefix is enough). Fields not given keep their current values; --interactive prompts for every field with the current value as default.")]
    Edit {
        /// Entry id or unique id prefix
        id: String,

        #[command(flatten)]
        fields: EntryArgs,

        /// Prompt for every field
        #[arg(short, long, action = ArgAction::SetTrue)]
        interactive: bool,
    },
    /// Delete an entry (no confirmation)
    Delete {
        /// Entry id or unique id prefix
        id: String,
    },
    /// List entries matching the active filters
    List,
    /// Show or change the active filters
    #[command(long_about = "Each given flag replaces that filter and leaves the others alone. Pass an empty value (e.g. --status \"\") to match everything again. Without flags, shows the current filters.")]
    Filter {
        /// Case-insensitive text to look for in names
        #[arg(long)]
        search: Option<String>,

        /// Exact category
        #[arg(long)]
        category: Option<String>,

        /// Exact status
        #[arg(long)]
        status: Option<String>,

        /// Exact rating
        #[arg(long)]
        rating: Option<String>,
    },
    /// Upload a file to the configured bucket and print its public URL
    Upload {
        /// File to upload
        path: PathBuf,

        /// Destination folder (defaults to upload.folder from the config)
        #[arg(long)]
        folder: Option<String>,

        /// Accepted file types (defaults to upload.accept from the config)
        #[arg(long, value_enum)]
        accept: Option<AcceptArg>,
    },
    /// View or change configuration
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Set remote storage connection parameters
    Storage {
        /// Bucket name (e.g. my-project.appspot.com)
        #[arg(long)]
        bucket: Option<String>,

        /// Storage REST endpoint
        #[arg(long)]
        endpoint: Option<String>,

        /// API key sent with storage requests ("" removes it)
        #[arg(long)]
        api_key: Option<String>,
    },
    /// Set defaults for standalone uploads
    Upload {
        /// Default destination folder
        #[arg(long)]
        folder: Option<String>,

        /// Default accepted file types
        #[arg(long, value_enum)]
        accept: Option<AcceptArg>,
    },
}

impl From<AcceptArg> for watchlist_config::AcceptedTypes {
    fn from(arg: AcceptArg) -> Self {
        match arg {
            AcceptArg::Image => watchlist_config::AcceptedTypes::Image,
            AcceptArg::Any => watchlist_config::AcceptedTypes::Any,
        }
    }
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);
    let ctx = AppContext::new(cli.data_file);

    match cli.command {
        Commands::Add { fields } => {
            let (fields, image) = fields.into_parts();
            entry::run_add(&ctx, fields, image, &output).await
        }
        Commands::Edit { id, fields, interactive } => {
            let (fields, image) = fields.into_parts();
            entry::run_edit(&ctx, &id, fields, image, interactive, &output).await
        }
        Commands::Delete { id } => entry::run_delete(&ctx, &id, &output),
        Commands::List => list::run_list(&ctx, &output),
        Commands::Filter { search, category, status, rating } => {
            filter::run_filter(&ctx, search, category, status, rating, &output)
        }
        Commands::Upload { path, folder, accept } => {
            upload::run_upload(&ctx, &path, folder, accept.map(Into::into), &output).await
        }
        Commands::Config { cmd } => match cmd.unwrap_or(ConfigCommands::Show { full: false }) {
            ConfigCommands::Show { full } => config::show_config(&ctx, full, &output),
            ConfigCommands::Storage { bucket, endpoint, api_key } => {
                config::configure_storage(&ctx, bucket, endpoint, api_key, &output)
            }
            ConfigCommands::Upload { folder, accept } => {
                config::configure_upload(&ctx, folder, accept.map(Into::into), &output)
            }
        },
    }
}
