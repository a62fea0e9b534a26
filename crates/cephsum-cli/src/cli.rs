use std::path::PathBuf;

use cephsum_engine::ChecksumRequest;
use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "cephsum",
    about = "Checksum operations on Ceph objects, compatible with XRootD XrdCks metadata",
    version
)]
pub struct Cli {
    /// Algorithm and optional reference value: alg[:value|print|source]
    #[arg(short = 'C', long = "type", default_value = "adler32")]
    pub checksum: ChecksumRequest,

    #[arg(short, long, value_enum, default_value_t = Action::Inget)]
    pub action: Action,

    /// Chunk size for content reads, in MiB
    #[arg(short = 'r', long = "readsize")]
    pub read_size_mib: Option<usize>,

    /// Storage-mapping XML used to turn the path into pool and object
    #[arg(short = 'x', long = "lfn2pfnxml")]
    pub mapping: Option<PathBuf>,

    /// Root directory of the object store
    #[arg(long)]
    pub store_root: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(short, long)]
    pub debug: bool,

    /// Append logs to this file instead of stderr
    #[arg(short = 'l', long = "log")]
    pub log_file: Option<PathBuf>,

    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    /// Logical file name
    pub path: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Action {
    /// Stored checksum, or compute and store it
    Inget,
    /// Stored checksum, or compute it without storing
    Get,
    /// Stored checksum only
    Metaonly,
    /// Compute from content only
    Fileonly,
    /// Compare stored checksum against content
    Verify,
    /// Inget, then compare with the reference value
    Check,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Inget => "inget",
            Action::Get => "get",
            Action::Metaonly => "metaonly",
            Action::Fileonly => "fileonly",
            Action::Verify => "verify",
            Action::Check => "check",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
