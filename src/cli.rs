//! Command-line definitions for the `vcardqr` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use vcardqr::{ContactRecord, GeneratorConfig, ImageFormat, PixelDimension};

/// vcardqr - turn a contact into a scannable vCard QR code
#[derive(Debug, Parser)]
#[command(name = "vcardqr")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// JSON file with generator settings
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the vCard text that would be encoded
    Preview(ContactArgs),

    /// Print the QR service request URL without fetching it
    Url {
        #[command(flatten)]
        contact: ContactArgs,
        #[command(flatten)]
        render: RenderArgs,
    },

    /// Fetch the QR image and save it as a PNG
    Generate {
        #[command(flatten)]
        contact: ContactArgs,
        #[command(flatten)]
        render: RenderArgs,
        /// Directory to save the image into
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,
    },
}

/// Contact fields. Flags override values read from `--from-json`.
#[derive(Debug, Args, Default)]
pub struct ContactArgs {
    /// JSON file with the contact (camelCase keys, e.g. "firstName")
    #[arg(long, value_name = "FILE")]
    pub from_json: Option<PathBuf>,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    /// Mobile number
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    /// Job title
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub website: Option<String>,
    /// Postal address; line breaks are joined with ", "
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl ContactArgs {
    /// Assemble the record: JSON file first, then individual flags on top.
    pub fn into_record(self) -> anyhow::Result<ContactRecord> {
        let mut record = match &self.from_json {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
                ContactRecord::from_json(&text)?
            }
            None => ContactRecord::default(),
        };

        let overrides = [
            (vcardqr::Field::FirstName, self.first_name),
            (vcardqr::Field::LastName, self.last_name),
            (vcardqr::Field::Phone, self.phone),
            (vcardqr::Field::Email, self.email),
            (vcardqr::Field::Company, self.company),
            (vcardqr::Field::Title, self.title),
            (vcardqr::Field::Website, self.website),
            (vcardqr::Field::Address, self.address),
            (vcardqr::Field::Notes, self.notes),
        ];
        for (field, value) in overrides {
            if let Some(v) = value {
                record.set(field, v);
            }
        }
        Ok(record)
    }
}

/// Overrides for the image request.
#[derive(Debug, Args, Default)]
pub struct RenderArgs {
    /// Image side length in pixels
    #[arg(long)]
    pub size: Option<u32>,
    /// Quiet zone around the code
    #[arg(long)]
    pub margin: Option<u32>,
    /// Transfer format: png, gif or jpeg
    #[arg(long)]
    pub format: Option<ImageFormat>,
    /// QR rendering endpoint
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,
    /// Request timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}

impl RenderArgs {
    pub fn apply(self, mut config: GeneratorConfig) -> vcardqr::Result<GeneratorConfig> {
        if let Some(size) = self.size {
            config.size = PixelDimension(size);
        }
        if let Some(margin) = self.margin {
            config.margin = margin;
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(endpoint) = self.endpoint {
            config.endpoint = endpoint;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        config.validate()?;
        Ok(config)
    }
}
