use std::time::Instant;

use anyhow::{bail, Context};
use cephsum_engine::{ChecksumSource, Reconciled, ReconciliationEngine, ReferenceCheck};
use cephsum_store::{DirObjectStore, ObjectStore};
use cephsum_types::ObjectRef;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::cli::{Action, Cli, OutputFormat};
use crate::config::Settings;

pub const EXIT_OK: u8 = 0;
pub const EXIT_SOURCE_MISMATCH: u8 = 101;
pub const EXIT_NO_CHECKSUM: u8 = 102;
pub const EXIT_VERIFY_FAILED: u8 = 103;

/// What one invocation produced.
#[derive(Debug)]
pub struct Outcome {
    pub result: Option<Reconciled>,
    pub check: Option<ReferenceCheck>,
    pub exit_code: u8,
}

/// One-line result summary, logged and optionally printed as JSON.
#[derive(Debug, Serialize)]
struct Summary<'a> {
    result: &'static str,
    action: &'static str,
    lfn: &'a str,
    pool: &'a str,
    oid: &'a str,
    checksum: Option<String>,
    source: Option<ChecksumSource>,
    bytes: Option<u64>,
    reference: Option<&'a str>,
    check: Option<&'a ReferenceCheck>,
    exit_code: u8,
    elapsed_s: f64,
}

pub fn run(cli: Cli) -> anyhow::Result<u8> {
    let reference = cli.checksum.reference.as_deref();
    if cli.action == Action::Check && reference.is_none() {
        bail!("action 'check' needs a reference value: -C {}:<checksum>", cli.checksum.kind);
    }

    let settings = Settings::from_cli(&cli)?;
    debug!(read_size = settings.engine.read_size, attr = %settings.engine.attr_name, "settings");

    let object = settings
        .resolver
        .resolve(&cli.path)
        .with_context(|| format!("resolving {}", cli.path))?;
    debug!(lfn = %cli.path, %object, "resolved path");

    let store = DirObjectStore::open(&settings.store_root)
        .with_context(|| format!("opening store at {}", settings.store_root.display()))?;
    let engine = ReconciliationEngine::new(&store, settings.engine);

    let started = Instant::now();
    let outcome = execute(&engine, cli.action, &object, reference)?;
    let elapsed_s = started.elapsed().as_secs_f64();

    let summary = Summary {
        result: if outcome.exit_code == EXIT_OK { "Done" } else { "Failed" },
        action: cli.action.as_str(),
        lfn: &cli.path,
        pool: object.pool(),
        oid: object.oid(),
        checksum: outcome.result.as_ref().map(Reconciled::hex),
        source: outcome.result.as_ref().map(|r| r.source),
        bytes: outcome.result.as_ref().and_then(|r| r.object_size),
        reference,
        check: outcome.check.as_ref(),
        exit_code: outcome.exit_code,
        elapsed_s,
    };

    match &outcome.result {
        Some(_) => info!(
            result = summary.result,
            pool = summary.pool,
            path = summary.lfn,
            checksum = ?summary.checksum,
            source = ?summary.source,
            bytes = ?summary.bytes,
            time_s = elapsed_s,
            exit_code = outcome.exit_code,
            "finished"
        ),
        None => warn!(
            result = "Failed",
            pool = summary.pool,
            path = summary.lfn,
            exit_code = outcome.exit_code,
            "finished"
        ),
    }

    match cli.format {
        OutputFormat::Text => {
            if let Some(hex) = &summary.checksum {
                println!("{hex}");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(&summary)?),
    }
    Ok(outcome.exit_code)
}

/// Run `action` on one object and decide the exit code.
pub fn execute<S: ObjectStore + ?Sized>(
    engine: &ReconciliationEngine<'_, S>,
    action: Action,
    object: &ObjectRef,
    reference: Option<&str>,
) -> anyhow::Result<Outcome> {
    let result = match action {
        Action::Inget | Action::Check => engine.inget(object)?,
        Action::Get => engine.get_checksum(object)?,
        Action::Metaonly => engine.get_from_metadata(object)?,
        Action::Fileonly => engine.get_from_file(object)?,
        Action::Verify => engine.verify(object, false)?.into_record(),
    };

    let check = reference.map(|r| ReferenceCheck::evaluate(result.as_ref(), r));
    if let Some(ReferenceCheck::Mismatch { expected, actual }) = &check {
        error!(%object, %expected, %actual, "source checksum does not match");
    }
    let exit_code = exit_code(action, result.as_ref(), check.as_ref());
    Ok(Outcome {
        result,
        check,
        exit_code,
    })
}

fn exit_code(action: Action, result: Option<&Reconciled>, check: Option<&ReferenceCheck>) -> u8 {
    match (result, check) {
        (None, _) if action == Action::Verify => EXIT_VERIFY_FAILED,
        (None, _) => EXIT_NO_CHECKSUM,
        (Some(_), Some(c)) if !c.is_match() => EXIT_SOURCE_MISMATCH,
        _ => EXIT_OK,
    }
}
