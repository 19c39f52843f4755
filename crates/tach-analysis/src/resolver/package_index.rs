//! PackageIndex: declared packages keyed by module path for prefix lookup.

use std::collections::BTreeSet;
use std::fmt;

use tach_core::config::ProjectConfig;
use tach_core::errors::ConfigError;
use tach_core::types::collections::FxHashMap;

use super::module_path::ModulePath;

/// Dense package identifier, assigned in sorted root-path order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageId(pub u32);

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A declared package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub id: PackageId,
    /// Root path as written in the policy file.
    pub path: String,
    pub module_path: ModulePath,
    pub tags: BTreeSet<String>,
    /// Public members, each a dotted path relative to the package.
    pub interface: Option<Vec<ModulePath>>,
}

impl Package {
    /// The first non-public member `import_path` reaches into, if any.
    ///
    /// Importing the package itself, or anything at or below an interface
    /// entry, is allowed. Packages without an interface expose everything.
    pub fn interface_violation(&self, import_path: &ModulePath) -> Option<ModulePath> {
        let interface = self.interface.as_ref()?;
        let member = import_path.strip_prefix(&self.module_path)?;
        if member.is_empty() || interface.iter().any(|entry| member.starts_with(entry)) {
            return None;
        }
        Some(member)
    }
}

/// All declared packages with longest-prefix lookup by module path.
#[derive(Debug, Clone, Default)]
pub struct PackageIndex {
    packages: Vec<Package>,
    by_module: FxHashMap<Vec<String>, PackageId>,
}

impl PackageIndex {
    /// Build the index from a policy. Fails on invalid package entries and
    /// on two roots mapping to the same module path.
    pub fn from_config(config: &ProjectConfig) -> Result<Self, ConfigError> {
        config.validate_packages()?;

        let mut packages = Vec::with_capacity(config.packages.len());
        let mut by_module: FxHashMap<Vec<String>, PackageId> = FxHashMap::default();

        for (path, package) in &config.packages {
            let module_path = ModulePath::from_package_root(path).ok_or_else(|| {
                ConfigError::InvalidPackagePath {
                    path: path.clone(),
                    reason: "does not name a module".to_string(),
                }
            })?;
            let id = PackageId(packages.len() as u32);

            if let Some(existing) = by_module.insert(module_path.segments().to_vec(), id) {
                let first: &Package = &packages[existing.0 as usize];
                return Err(ConfigError::DuplicatePackage {
                    first: first.path.clone(),
                    second: path.clone(),
                    module: module_path.to_string(),
                });
            }

            packages.push(Package {
                id,
                path: path.clone(),
                module_path,
                tags: package.tags.clone(),
                interface: package.interface.as_ref().map(|members| {
                    members
                        .iter()
                        .map(|m| ModulePath::from_dotted(m))
                        .filter(|m| !m.is_empty())
                        .collect()
                }),
            });
        }

        Ok(Self {
            packages,
            by_module,
        })
    }

    /// The deepest package whose module path is a prefix of `module`.
    pub fn find(&self, module: &ModulePath) -> Option<PackageId> {
        let segments = module.segments();
        (1..=segments.len())
            .rev()
            .find_map(|n| self.by_module.get(&segments[..n]).copied())
    }

    pub fn get(&self, id: PackageId) -> &Package {
        &self.packages[id.0 as usize]
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Every tag carried by some package.
    pub fn all_tags(&self) -> BTreeSet<String> {
        self.packages
            .iter()
            .flat_map(|p| p.tags.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tach_core::config::PackageConfig;

    fn config(entries: &[(&str, &str)]) -> ProjectConfig {
        let mut config = ProjectConfig::default();
        for (path, tag) in entries {
            config
                .packages
                .insert(path.to_string(), PackageConfig::with_tags([*tag]));
        }
        config
    }

    #[test]
    fn ids_follow_sorted_root_paths() {
        let index = PackageIndex::from_config(&config(&[("b", "x"), ("a", "y")])).unwrap();
        assert_eq!(index.get(PackageId(0)).path, "a");
        assert_eq!(index.get(PackageId(1)).path, "b");
    }

    #[test]
    fn deepest_package_wins() {
        let index =
            PackageIndex::from_config(&config(&[("core", "low"), ("core/db", "data")])).unwrap();
        let db = index.find(&ModulePath::from_dotted("core.db.models")).unwrap();
        assert_eq!(index.get(db).path, "core/db");
        let core = index.find(&ModulePath::from_dotted("core.api")).unwrap();
        assert_eq!(index.get(core).path, "core");
        assert!(index.find(&ModulePath::from_dotted("core_utils")).is_none());
        assert!(index.find(&ModulePath::from_dotted("os.path")).is_none());
    }

    #[test]
    fn module_file_packages_are_indexed_without_extension() {
        let index = PackageIndex::from_config(&config(&[("utils.py", "util")])).unwrap();
        assert!(index.find(&ModulePath::from_dotted("utils.helpers")).is_some());
    }

    #[test]
    fn same_module_path_is_rejected() {
        let err = PackageIndex::from_config(&config(&[("core", "a"), ("core.py", "b")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicatePackage { module, .. } if module == "core"));
    }

    #[test]
    fn interface_allows_entries_and_their_children() {
        let mut cfg = config(&[("core", "low")]);
        cfg.packages.get_mut("core").unwrap().interface =
            Some(["service".to_string(), "models.public".to_string()].into());
        let index = PackageIndex::from_config(&cfg).unwrap();
        let core = index.get(PackageId(0));

        let check = |p: &str| core.interface_violation(&ModulePath::from_dotted(p));
        assert!(check("core").is_none());
        assert!(check("core.service").is_none());
        assert!(check("core.service.run").is_none());
        assert!(check("core.models.public.User").is_none());
        assert_eq!(check("core.models.private").unwrap().to_string(), "models.private");
        assert_eq!(check("core.helpers").unwrap().to_string(), "helpers");
    }
}
