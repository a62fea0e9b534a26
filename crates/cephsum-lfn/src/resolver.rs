use std::path::Path;

use cephsum_types::ObjectRef;
use tracing::debug;

use crate::error::{ResolveError, ResolveResult};
use crate::mapping::parse_storage_mapping;
use crate::rule::{PathRule, DIRECT};

/// Deepest `chain` nesting followed before giving up.
pub const MAX_CHAIN_DEPTH: usize = 8;

/// Ordered rule chain mapping logical names to `(pool, oid)`.
///
/// Rules are tried in declaration order and the first match wins. When no
/// rule matches, or the winning rule's output carries no `pool:` prefix, the
/// default pool is used with leading slashes stripped from the path.
#[derive(Clone, Debug)]
pub struct PathResolver {
    rules: Vec<PathRule>,
    default_pool: String,
    protocol: String,
}

impl PathResolver {
    /// A resolver with no rules: everything maps into `default_pool`.
    pub fn new(default_pool: impl Into<String>) -> Self {
        Self {
            rules: Vec::new(),
            default_pool: default_pool.into(),
            protocol: DIRECT.to_string(),
        }
    }

    pub fn with_rules(default_pool: impl Into<String>, rules: Vec<PathRule>) -> Self {
        Self {
            rules,
            ..Self::new(default_pool)
        }
    }

    /// Load rules from a storage-mapping document.
    pub fn from_xml(default_pool: impl Into<String>, xml: &str) -> ResolveResult<Self> {
        Ok(Self::with_rules(default_pool, parse_storage_mapping(xml)?))
    }

    /// Load rules from a storage-mapping file.
    pub fn from_file(
        default_pool: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> ResolveResult<Self> {
        let xml = std::fs::read_to_string(path)?;
        Self::from_xml(default_pool, &xml)
    }

    /// Protocol used by [`PathResolver::resolve`].
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    pub fn push_rule(&mut self, rule: PathRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[PathRule] {
        &self.rules
    }

    pub fn default_pool(&self) -> &str {
        &self.default_pool
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// Resolve for the resolver's own protocol.
    pub fn resolve(&self, lfn: &str) -> ResolveResult<ObjectRef> {
        self.resolve_for(lfn, &self.protocol)
    }

    /// Resolve for an explicit protocol.
    pub fn resolve_for(&self, lfn: &str, protocol: &str) -> ResolveResult<ObjectRef> {
        let path = normalize(lfn);
        if path.trim_start_matches('/').is_empty() {
            return Err(ResolveError::EmptyPath);
        }
        let resolved = match self.translate(&path, protocol, 0)? {
            Some(out) => self.split(&out)?,
            None => {
                debug!(lfn, protocol, "no rule matched; using default pool");
                self.fallback(&path)?
            }
        };
        debug!(lfn, protocol, pool = resolved.pool(), oid = resolved.oid(), "resolved");
        Ok(resolved)
    }

    /// First matching rule's output for `path`, following chains.
    fn translate(&self, path: &str, protocol: &str, depth: usize) -> ResolveResult<Option<String>> {
        if depth > MAX_CHAIN_DEPTH {
            return Err(ResolveError::ChainTooDeep {
                protocol: protocol.to_string(),
                max: MAX_CHAIN_DEPTH,
            });
        }
        for rule in self.rules.iter().filter(|r| r.applies_to(protocol)) {
            let input = match rule.chain() {
                Some(chain) => match self.translate(path, chain, depth + 1)? {
                    Some(chained) => chained,
                    None => continue,
                },
                None => path.to_string(),
            };
            if let Some(out) = rule.apply(&input) {
                return Ok(Some(out));
            }
        }
        Ok(None)
    }

    fn split(&self, out: &str) -> ResolveResult<ObjectRef> {
        match out.split_once(':') {
            Some((pool, oid)) if !pool.is_empty() && !oid.is_empty() => {
                Ok(ObjectRef::new(pool, oid))
            }
            _ => self.fallback(out),
        }
    }

    fn fallback(&self, path: &str) -> ResolveResult<ObjectRef> {
        let oid = path.trim_start_matches('/');
        if oid.is_empty() {
            return Err(ResolveError::EmptyPath);
        }
        Ok(ObjectRef::new(self.default_pool.clone(), oid))
    }
}

/// Collapse a run of leading slashes into one.
fn normalize(lfn: &str) -> String {
    let trimmed = lfn.trim_start_matches('/');
    if trimmed.len() == lfn.len() {
        lfn.to_string()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cms_resolver() -> PathResolver {
        PathResolver::with_rules(
            "dteam",
            vec![
                PathRule::new(DIRECT, "/+store/(.*)", "cms:/store/$1", None).unwrap(),
                PathRule::new(DIRECT, "/*(.*)", "$1", None).unwrap(),
            ],
        )
    }

    #[test]
    fn first_match_wins() {
        let r = cms_resolver().resolve("/store/a/b.root").unwrap();
        assert_eq!(r.pool(), "cms");
        assert_eq!(r.oid(), "/store/a/b.root");
    }

    #[test]
    fn unprefixed_output_uses_default_pool() {
        let r = cms_resolver().resolve("x/y").unwrap();
        assert_eq!(r, ObjectRef::new("dteam", "x/y"));
    }

    #[test]
    fn leading_slashes_are_normalized() {
        let r = cms_resolver().resolve("///store/a/b.root").unwrap();
        assert_eq!(r.oid(), "/store/a/b.root");
        assert_eq!(normalize("//a"), "/a");
        assert_eq!(normalize("a"), "a");
    }

    #[test]
    fn no_rules_uses_default_heuristic() {
        let r = PathResolver::new("dteam").resolve("//some/file").unwrap();
        assert_eq!(r, ObjectRef::new("dteam", "some/file"));
    }

    #[test]
    fn empty_path_is_an_error() {
        assert!(matches!(
            PathResolver::new("dteam").resolve("///"),
            Err(ResolveError::EmptyPath)
        ));
        assert!(matches!(
            PathResolver::new("dteam").resolve(""),
            Err(ResolveError::EmptyPath)
        ));
    }

    #[test]
    fn protocol_specific_rules_are_skipped_for_other_protocols() {
        let resolver = PathResolver::with_rules(
            "dteam",
            vec![PathRule::new("srm", "/(.*)", "srmpool:$1", None).unwrap()],
        );
        assert_eq!(resolver.resolve("/f").unwrap().pool(), "dteam");
        assert_eq!(resolver.resolve_for("/f", "srm").unwrap().pool(), "srmpool");
    }

    #[test]
    fn chained_rule_consumes_chain_output() {
        let resolver = PathResolver::with_rules(
            "dteam",
            vec![
                PathRule::new("root", "cms:(.*)", "cmsdisk:$1", Some(DIRECT.into())).unwrap(),
                PathRule::new(DIRECT, "/+store/(.*)", "cms:/store/$1", None).unwrap(),
            ],
        )
        .with_protocol("root");
        let r = resolver.resolve("/store/f.root").unwrap();
        assert_eq!(r, ObjectRef::new("cmsdisk", "/store/f.root"));
    }

    #[test]
    fn chain_without_match_skips_rule() {
        let resolver = PathResolver::with_rules(
            "dteam",
            vec![
                PathRule::new("root", "(.*)", "never:$1", Some("srm".into())).unwrap(),
                PathRule::new("root", "/(.*)", "dteam:$1", None).unwrap(),
            ],
        );
        let r = resolver.resolve_for("/f", "root").unwrap();
        assert_eq!(r, ObjectRef::new("dteam", "f"));
    }

    #[test]
    fn self_chain_is_bounded() {
        let resolver = PathResolver::with_rules(
            "dteam",
            vec![PathRule::new("loop", "(.*)", "$1", Some("loop".into())).unwrap()],
        );
        assert!(matches!(
            resolver.resolve_for("/f", "loop"),
            Err(ResolveError::ChainTooDeep { .. })
        ));
    }

    #[test]
    fn from_file_loads_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.xml");
        std::fs::write(
            &path,
            r#"<storage-mapping>
                 <lfn-to-pfn protocol="direct" path-match="/+store/(.*)" result="cms:/store/$1"/>
               </storage-mapping>"#,
        )
        .unwrap();
        let resolver = PathResolver::from_file("dteam", &path).unwrap();
        assert_eq!(resolver.rules().len(), 1);
        assert_eq!(resolver.resolve("/store/x").unwrap().pool(), "cms");
    }
}
