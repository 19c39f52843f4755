//! Configuration: the project policy file and the scanner settings.

pub mod loader;
pub mod project_config;
pub mod scan_config;

pub use loader::{
    config_path, delete_project_config, find_project_config_root, parse_project_config,
    read_project_config, write_project_config,
};
pub use project_config::{PackageConfig, ProjectConfig, TagDependencyRule};
pub use scan_config::{parse_exclude_list, ScanConfig};
