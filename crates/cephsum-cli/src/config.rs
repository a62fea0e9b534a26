//! Settings file for the `cephsum` binary.
//!
//! ```toml
//! [engine]
//! attr_name = "XrdCks.adler32"
//! read_size_mib = 64
//! rewrite_to_little_endian = true
//!
//! [resolver]
//! default_pool = "dteam"
//! protocol = "direct"
//! mapping = "/etc/xrootd/storage.xml"
//!
//! [[resolver.rules]]
//! protocol = "direct"
//! path-match = "/+store/(.*)"
//! result = "cms:/store/$1"
//!
//! [store]
//! root = "/srv/cephsum"
//! ```
//!
//! Every key is optional. Command-line flags win over the file.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use cephsum_engine::EngineConfig;
use cephsum_lfn::{PathResolver, PathRule, RuleSpec, DIRECT};
use serde::Deserialize;

use crate::cli::Cli;

/// Pool used when no rule names one.
pub const DEFAULT_POOL: &str = "dteam";

const MIB: usize = 1024 * 1024;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub engine: EngineSection,
    pub resolver: ResolverSection,
    pub store: StoreSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSection {
    pub attr_name: Option<String>,
    pub read_size_mib: Option<usize>,
    pub rewrite_to_little_endian: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverSection {
    pub default_pool: Option<String>,
    pub protocol: Option<String>,
    pub mapping: Option<PathBuf>,
    pub rules: Vec<RuleSpec>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSection {
    pub root: Option<PathBuf>,
}

impl FileConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

/// Effective settings after merging the file with the command line.
#[derive(Debug)]
pub struct Settings {
    pub engine: EngineConfig,
    pub resolver: PathResolver,
    pub store_root: PathBuf,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::merge(cli, file)
    }

    pub fn merge(cli: &Cli, file: FileConfig) -> anyhow::Result<Self> {
        let mut engine = EngineConfig::for_algorithm(cli.checksum.kind);
        if let Some(attr_name) = file.engine.attr_name {
            engine.attr_name = attr_name;
        }
        if let Some(rewrite) = file.engine.rewrite_to_little_endian {
            engine.rewrite_to_little_endian = rewrite;
        }
        if let Some(mib) = cli.read_size_mib.or(file.engine.read_size_mib) {
            if mib == 0 {
                bail!("read size must be at least 1 MiB");
            }
            engine.read_size = mib
                .checked_mul(MIB)
                .context("read size overflows")?;
        }

        let default_pool = file
            .resolver
            .default_pool
            .unwrap_or_else(|| DEFAULT_POOL.to_string());
        let mut resolver = match cli.mapping.as_ref().or(file.resolver.mapping.as_ref()) {
            Some(path) => PathResolver::from_file(default_pool, path)
                .with_context(|| format!("loading storage mapping {}", path.display()))?,
            None => PathResolver::new(default_pool),
        };
        for spec in &file.resolver.rules {
            resolver.push_rule(PathRule::from_spec(spec)?);
        }
        let protocol = file.resolver.protocol.unwrap_or_else(|| DIRECT.to_string());
        resolver = resolver.with_protocol(protocol);

        let store_root = cli
            .store_root
            .clone()
            .or(file.store.root)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            engine,
            resolver,
            store_root,
        })
    }
}
