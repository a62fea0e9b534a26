//! Resolve a logical name, then reconcile the object it maps to.

use cephsum_engine::{ChecksumSource, EngineConfig, ReconciliationEngine, ReferenceCheck};
use cephsum_lfn::PathResolver;
use cephsum_record::RecordCodec;
use cephsum_store::{InMemoryObjectStore, MetadataStore};
use cephsum_types::ByteOrder;

const MAPPING: &str = r#"<storage-mapping>
  <lfn-to-pfn protocol="direct" path-match="/+store/(.*)" result="cms:/store/$1"/>
</storage-mapping>"#;

#[test]
fn resolve_then_inget_caches_little_endian_record() {
    let resolver = PathResolver::from_xml("dteam", MAPPING).unwrap();
    let object = resolver.resolve("//store/run1/f.root").unwrap();
    assert_eq!(object.pool(), "cms");

    let store = InMemoryObjectStore::new();
    store.put_object(object.clone(), &b"Wikipedia"[..], 1_700_000_000);
    let engine = ReconciliationEngine::new(&store, EngineConfig::default().with_read_size(4));

    let first = engine.inget(&object).unwrap().unwrap();
    assert_eq!(first.source, ChecksumSource::File);
    assert_eq!(first.hex(), "11e60398");

    let raw = store.get_attr(&object, "XrdCks.adler32").unwrap().unwrap();
    assert_eq!(raw.len(), 96);
    assert_eq!(RecordCodec::matching_orders(&raw), vec![ByteOrder::Little]);

    let again = engine.get_checksum(&object).unwrap().unwrap();
    assert_eq!(again.source, ChecksumSource::Metadata);
    assert_eq!(ReferenceCheck::evaluate(Some(&again), "11E60398"), ReferenceCheck::Match);

    assert!(engine.verify(&object, false).unwrap().matched);
}

#[test]
fn unmapped_name_uses_default_pool() {
    let resolver = PathResolver::from_xml("dteam", MAPPING).unwrap();
    let object = resolver.resolve("/other/x").unwrap();
    assert_eq!(object.pool(), "dteam");
    assert_eq!(object.oid(), "other/x");

    let store = InMemoryObjectStore::new();
    let engine = ReconciliationEngine::new(&store, EngineConfig::default());
    assert!(engine.get_checksum(&object).is_err());
}
