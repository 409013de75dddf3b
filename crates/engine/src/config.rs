// crates/engine/src/config.rs
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Which tallies the aggregator reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoverageMode {
    /// Every compiler-instrumented, untouched-eligible line.
    #[default]
    Standard,
    /// Only statements that do something (no declarations, headers, pragmas).
    Logical,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

#[derive(Debug, Clone, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanOptions {
    /// Keep view/pure functions in the report.
    #[builder(default)]
    pub all_functions: bool,
    #[builder(default)]
    pub mode: CoverageMode,
    /// Also drop files living under fuzzing/test directories.
    #[builder(default)]
    pub source_only: bool,
    /// File names to drop; `Token` and `Token.sol` are equivalent.
    #[builder(default)]
    pub exclude: Vec<String>,

    /// Dependency folders whose direct children are library checkouts.
    #[builder(default = r#"strings(&["lib", "dependencies", "node_modules"])"#)]
    pub vendor_roots: Vec<String>,
    /// Library names; `forge` matches `forge-std`, `openzeppelin` matches
    /// `openzeppelin-contracts` and `@openzeppelin`.
    #[builder(default = r#"strings(&["openzeppelin", "forge", "solady"])"#)]
    pub vendored_packages: Vec<String>,
    #[builder(default = r#"strings(&[".t.sol", ".s.sol"])"#)]
    pub test_suffixes: Vec<String>,
    #[builder(default = r#"strings(&["interfaces", "interface"])"#)]
    pub interface_dirs: Vec<String>,
    /// Treat `IFoo.sol`-style names (two leading capitals) as interfaces.
    #[builder(default = "true")]
    pub detect_interface_names: bool,
    #[builder(default = r#"strings(&["test", "tests", "fuzzing", "fuzz", "echidna", "medusa"])"#)]
    pub fuzzing_dirs: Vec<String>,
    #[builder(default = r#""logical".to_string()"#)]
    pub logical_dir: String,
    #[builder(default = r#""Logical".to_string()"#)]
    pub logical_prefix: String,
    #[builder(default = r#""sol".to_string()"#)]
    pub source_extension: String,
}

impl ScanOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ext) = &self.source_extension
            && (ext.is_empty() || ext.starts_with('.'))
        {
            return Err(format!("source extension must be bare (e.g. `sol`), got `{ext}`"));
        }
        if matches!(self.mode, Some(CoverageMode::Logical))
            && self.logical_dir.as_ref().is_some_and(String::is_empty)
        {
            return Err("logical mode needs a non-empty logical directory".to_string());
        }
        Ok(())
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            all_functions: false,
            mode: CoverageMode::Standard,
            source_only: false,
            exclude: vec![],
            vendor_roots: strings(&["lib", "dependencies", "node_modules"]),
            vendored_packages: strings(&["openzeppelin", "forge", "solady"]),
            test_suffixes: strings(&[".t.sol", ".s.sol"]),
            interface_dirs: strings(&["interfaces", "interface"]),
            detect_interface_names: true,
            fuzzing_dirs: strings(&["test", "tests", "fuzzing", "fuzz", "echidna", "medusa"]),
            logical_dir: "logical".to_string(),
            logical_prefix: "Logical".to_string(),
            source_extension: "sol".to_string(),
        }
    }
}

impl ScanOptions {
    #[must_use]
    pub fn is_logical(&self) -> bool {
        self.mode == CoverageMode::Logical
    }
}
