//! Boundary check scenarios over real project trees.

use std::path::{Path, PathBuf};

use tach_analysis::boundaries::ErrorInfo;
use tach_analysis::{check, BoundaryEngine, BoundaryError};
use tach_core::config::{PackageConfig, ProjectConfig, ScanConfig, TagDependencyRule};
use tach_core::errors::{ConfigError, ProjectError, ScanError};
use tempfile::TempDir;

// ---- Helpers ----

fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (path, content) in files {
        let path = dir.path().join(path);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }
    dir
}

fn layered(rules: Vec<TagDependencyRule>) -> ProjectConfig {
    let mut config = ProjectConfig::default();
    config
        .packages
        .insert("core".into(), PackageConfig::with_tags(["low"]));
    config
        .packages
        .insert("api".into(), PackageConfig::with_tags(["high"]));
    config.constraints = rules;
    config
}

fn low_is_leaf() -> Vec<TagDependencyRule> {
    vec![TagDependencyRule::new("low", Vec::<String>::new())]
}

fn run(root: &Path, config: &ProjectConfig) -> Vec<BoundaryError> {
    check(root, config, &[], true).unwrap()
}

// ---- Tag policy ----

#[test]
fn unruled_tag_may_import_restricted_package() {
    let dir = project(&[
        ("core/__init__.py", ""),
        ("core/models.py", "class User: ...\n"),
        ("api/__init__.py", ""),
        ("api/views.py", "from core.models import User\nimport core\n"),
    ]);
    let errors = run(dir.path(), &layered(low_is_leaf()));
    assert!(errors.is_empty(), "api (high) has no rule: {errors:?}");
}

#[test]
fn restricted_tag_importing_upward_is_reported_once_per_site() {
    let dir = project(&[
        ("core/__init__.py", ""),
        ("core/models.py", "import json\n\nfrom api import views\n"),
        ("api/__init__.py", ""),
        ("api/views.py", "from core.models import User\n"),
    ]);
    let errors = run(dir.path(), &layered(low_is_leaf()));

    assert_eq!(errors.len(), 1, "{errors:?}");
    let error = &errors[0];
    assert_eq!(error.file_path, PathBuf::from("core/models.py"));
    assert_eq!(error.line_number, Some(3));
    assert_eq!(error.import_mod_path, "api.views");
    assert_eq!(
        error.error_info,
        ErrorInfo::Tag {
            source_tags: vec!["low".into()],
            invalid_tags: vec!["high".into()],
        }
    );
}

#[test]
fn every_violating_site_is_reported_in_order() {
    let dir = project(&[
        ("core/b.py", "import api.views\nimport api.models\n"),
        ("core/a.py", "from api import x\n"),
        ("api/__init__.py", ""),
    ]);
    let errors = run(dir.path(), &layered(low_is_leaf()));
    let locations: Vec<(String, Option<u32>)> = errors
        .iter()
        .map(|e| (e.file_path.to_string_lossy().replace('\\', "/"), e.line_number))
        .collect();
    assert_eq!(
        locations,
        vec![
            ("core/a.py".to_string(), Some(1)),
            ("core/b.py".to_string(), Some(1)),
            ("core/b.py".to_string(), Some(2)),
        ]
    );
}

#[test]
fn declared_dependency_allows_edge() {
    let dir = project(&[("core/a.py", "from api import views\n"), ("api/views.py", "")]);
    let config = layered(vec![TagDependencyRule::new("low", ["high"])]);
    assert!(run(dir.path(), &config).is_empty());
}

#[test]
fn self_imports_never_produce_errors() {
    let dir = project(&[
        ("core/__init__.py", "from . import models\n"),
        ("core/models.py", "from core import helpers\nfrom .helpers import x\n"),
        ("core/helpers.py", ""),
    ]);
    assert!(run(dir.path(), &layered(low_is_leaf())).is_empty());
}

#[test]
fn external_and_unowned_imports_are_ignored() {
    let dir = project(&[
        ("core/a.py", "import os\nimport requests\nfrom scripts import tool\n"),
        ("scripts/tool.py", "import api\nimport core\n"),
    ]);
    assert!(run(dir.path(), &layered(low_is_leaf())).is_empty());
}

#[test]
fn nested_package_wins_over_parent() {
    let dir = project(&[
        ("core/a.py", "from core.db import models\n"),
        ("core/db/models.py", ""),
    ]);
    let mut config = layered(low_is_leaf());
    config
        .packages
        .insert("core/db".into(), PackageConfig::with_tags(["data"]));
    let errors = run(dir.path(), &config);
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].error_info,
        ErrorInfo::Tag {
            source_tags: vec!["low".into()],
            invalid_tags: vec!["data".into()],
        }
    );
}

#[test]
fn relative_import_resolves_across_packages() {
    let dir = project(&[
        ("core/m.py", "from ..api import views\n"),
        ("api/views.py", ""),
    ]);
    let errors = run(dir.path(), &layered(low_is_leaf()));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].import_mod_path, "api.views");
}

// ---- Interfaces ----

#[test]
fn non_interface_member_is_reported() {
    let dir = project(&[
        ("api/views.py", "from core.service import run\nfrom core.internal import secret\n"),
        ("core/service.py", ""),
        ("core/internal.py", ""),
    ]);
    let mut config = layered(vec![TagDependencyRule::new("high", ["low"])]);
    config.packages.get_mut("core").unwrap().interface = Some(["service".to_string()].into());

    let errors = run(dir.path(), &config);
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert_eq!(errors[0].line_number, Some(2));
    assert_eq!(
        errors[0].error_info,
        ErrorInfo::Interface {
            package: "core".into(),
            member: "internal.secret".into(),
        }
    );
}

// ---- Structural errors ----

#[test]
fn syntax_error_yields_one_structural_error_and_other_files_still_checked() {
    let dir = project(&[
        ("core/bad.py", "import api\n\ndef broken(:\n    pass\n"),
        ("core/good.py", "import api.views\n"),
        ("api/views.py", ""),
    ]);
    let errors = run(dir.path(), &layered(low_is_leaf()));
    assert_eq!(errors.len(), 2, "{errors:?}");

    let structural: Vec<&BoundaryError> = errors
        .iter()
        .filter(|e| e.error_info.is_structural())
        .collect();
    assert_eq!(structural.len(), 1);
    assert_eq!(structural[0].file_path, PathBuf::from("core/bad.py"));
    assert_eq!(structural[0].line_number, Some(3));

    assert!(errors
        .iter()
        .any(|e| e.error_info.is_tag_error() && e.file_path == PathBuf::from("core/good.py")));
}

#[cfg(unix)]
#[test]
fn unreadable_files_and_directories_do_not_stop_the_check() {
    use std::os::unix::fs::PermissionsExt;

    let dir = project(&[
        ("core/secret.py", "import api\n"),
        ("core/hidden/inner.py", "import api\n"),
        ("core/good.py", "import api.views\n"),
        ("api/views.py", ""),
    ]);
    let secret = dir.path().join("core/secret.py");
    let hidden = dir.path().join("core/hidden");
    let set_mode = |mode: u32| {
        for path in [&secret, &hidden] {
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).unwrap();
        }
    };
    set_mode(0o000);
    if std::fs::read(&secret).is_ok() {
        // Permission bits do not apply to this user
        set_mode(0o755);
        return;
    }

    let errors = run(dir.path(), &layered(low_is_leaf()));
    set_mode(0o755);

    assert_eq!(errors.len(), 2, "{errors:?}");
    let structural: Vec<&BoundaryError> = errors
        .iter()
        .filter(|e| e.error_info.is_structural())
        .collect();
    assert_eq!(structural.len(), 1);
    assert_eq!(structural[0].file_path, PathBuf::from("core/secret.py"));
    assert!(errors
        .iter()
        .any(|e| e.error_info.is_tag_error() && e.file_path == PathBuf::from("core/good.py")));
}

#[test]
fn relative_import_above_root_is_structural() {
    let dir = project(&[("utils.py", "from ..x import nothing\n")]);
    let mut config = layered(low_is_leaf());
    config
        .packages
        .insert("utils.py".into(), PackageConfig::with_tags(["low"]));
    let errors = run(dir.path(), &config);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].error_info.is_structural());
    assert_eq!(errors[0].line_number, Some(1));
}

// ---- Excludes ----

#[test]
fn excluded_paths_are_not_checked() {
    let dir = project(&[
        ("core/a.py", "import api\n"),
        ("core/legacy/b.py", "import api\n"),
        ("api/__init__.py", ""),
    ]);
    let config = layered(low_is_leaf());
    let errors = check(dir.path(), &config, &["core/legacy".to_string()], true).unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].file_path, PathBuf::from("core/a.py"));
}

#[test]
fn default_excludes_skip_tests_directory() {
    let dir = project(&[("tests/core/t.py", "import api\n"), ("api/__init__.py", "")]);
    let mut config = layered(low_is_leaf());
    config
        .packages
        .insert("tests".into(), PackageConfig::with_tags(["low"]));
    assert!(run(dir.path(), &config).is_empty());
}

#[test]
fn hidden_paths_are_checked_when_not_excluded() {
    let dir = project(&[("core/.gen/a.py", "import api\n"), ("api/__init__.py", "")]);
    let config = layered(low_is_leaf());
    assert!(check(dir.path(), &config, &[], true).unwrap().is_empty());
    assert_eq!(check(dir.path(), &config, &[], false).unwrap().len(), 1);
}

// ---- Configuration errors ----

#[test]
fn unknown_rule_tag_is_fatal() {
    let dir = project(&[("core/a.py", "")]);
    let config = layered(vec![TagDependencyRule::new("low", ["ghost"])]);
    let err = check(dir.path(), &config, &[], true).unwrap_err();
    assert!(matches!(
        err,
        ProjectError::Config(ConfigError::UnknownTag { ref tag }) if tag == "ghost"
    ));
}

#[test]
fn duplicate_module_path_is_fatal() {
    let dir = project(&[("core.py", ""), ("core/a.py", "")]);
    let mut config = layered(Vec::new());
    config
        .packages
        .insert("core.py".into(), PackageConfig::with_tags(["other"]));
    let err = check(dir.path(), &config, &[], true).unwrap_err();
    assert!(matches!(
        err,
        ProjectError::Config(ConfigError::DuplicatePackage { .. })
    ));
}

#[test]
fn missing_root_is_fatal() {
    let dir = TempDir::new().unwrap();
    let err = check(&dir.path().join("gone"), &layered(Vec::new()), &[], true).unwrap_err();
    assert!(matches!(err, ProjectError::Scan(ScanError::RootNotFound { .. })));
}

// ---- Engine modes ----

#[test]
fn sequential_and_parallel_scans_agree() {
    let mut files: Vec<(String, String)> = Vec::new();
    for i in 0..30 {
        files.push((format!("core/m{i}.py"), format!("import api.v{i}\n")));
        files.push((format!("api/v{i}.py"), "import core\n".to_string()));
    }
    let refs: Vec<(&str, &str)> = files.iter().map(|(p, c)| (p.as_str(), c.as_str())).collect();
    let dir = project(&refs);
    let config = layered(low_is_leaf());

    let scan = |threads| ScanConfig {
        threads: Some(threads),
        ..ScanConfig::for_project(&config, &[])
    };
    let sequential = BoundaryEngine::with_scan_config(dir.path(), config.clone(), scan(1))
        .unwrap()
        .check()
        .unwrap();
    let parallel = BoundaryEngine::with_scan_config(dir.path(), config.clone(), scan(4))
        .unwrap()
        .check()
        .unwrap();

    assert_eq!(sequential.len(), 30);
    assert_eq!(sequential, parallel);
}

#[test]
fn cancelled_scan_discards_results() {
    let dir = project(&[("core/a.py", "import api\n"), ("api/__init__.py", "")]);
    let config = layered(low_is_leaf());

    for threads in [1, 0] {
        let scan = ScanConfig {
            threads: Some(threads),
            ..ScanConfig::for_project(&config, &[])
        };
        let engine = BoundaryEngine::with_scan_config(dir.path(), config.clone(), scan).unwrap();
        engine.cancellation().cancel();
        assert!(matches!(engine.build_graph(), Err(ScanError::Cancelled)));
        assert!(matches!(
            engine.check(),
            Err(ProjectError::Scan(ScanError::Cancelled))
        ));

        engine.cancellation().reset();
        assert_eq!(engine.check().unwrap().len(), 1);
    }
}
