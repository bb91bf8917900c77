//! JavaScript package manager detection and command forms

use std::fmt;
use std::path::Path;
use std::process::Command;

/// The package managers the installer knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodePackageManager {
    Npm,
    Yarn,
    Pnpm,
    Bun,
}

impl NodePackageManager {
    /// Detection priority: first available wins.
    const DETECTION_ORDER: [NodePackageManager; 4] = [
        NodePackageManager::Bun,
        NodePackageManager::Pnpm,
        NodePackageManager::Yarn,
        NodePackageManager::Npm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodePackageManager::Npm => "npm",
            NodePackageManager::Yarn => "yarn",
            NodePackageManager::Pnpm => "pnpm",
            NodePackageManager::Bun => "bun",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::DETECTION_ORDER
            .iter()
            .copied()
            .find(|pm| pm.as_str() == value)
    }

    pub fn install_command(&self) -> String {
        format!("{} install", self.as_str())
    }

    pub fn run_command(&self) -> &'static str {
        match self {
            NodePackageManager::Npm => "npm run",
            NodePackageManager::Yarn => "yarn",
            NodePackageManager::Pnpm => "pnpm",
            NodePackageManager::Bun => "bun run",
        }
    }

    pub fn build_command(&self) -> String {
        format!("{} build", self.run_command())
    }

    /// Command form for running a local-or-remote package binary.
    pub fn dlx_command(&self) -> &'static str {
        match self {
            NodePackageManager::Npm | NodePackageManager::Yarn => "npx",
            NodePackageManager::Pnpm => "pnpm dlx",
            NodePackageManager::Bun => "bunx",
        }
    }

    pub fn lock_files(&self) -> &'static [&'static str] {
        match self {
            NodePackageManager::Npm => &["package-lock.json"],
            NodePackageManager::Yarn => &["yarn.lock"],
            NodePackageManager::Pnpm => &["pnpm-lock.yaml"],
            NodePackageManager::Bun => &["bun.lock", "bun.lockb"],
        }
    }

    pub fn all_lock_files() -> &'static [&'static str] {
        &[
            "package-lock.json",
            "yarn.lock",
            "pnpm-lock.yaml",
            "bun.lock",
            "bun.lockb",
        ]
    }

    /// Lockfiles that belong to other managers and would fight this one
    /// over dependency resolution.
    pub fn stale_lock_files(&self) -> Vec<&'static str> {
        Self::all_lock_files()
            .iter()
            .copied()
            .filter(|lock| !self.lock_files().contains(lock))
            .collect()
    }

    /// The manager whose lockfile is already present in `directory`,
    /// checked in priority order. Starter kits ship a lockfile; honoring it
    /// beats probing the search path.
    pub fn from_lock_file(directory: &Path) -> Option<Self> {
        Self::DETECTION_ORDER.iter().copied().find(|pm| {
            pm.lock_files()
                .iter()
                .any(|lock| directory.join(lock).exists())
        })
    }

    /// Whether the tool's executable resolves on the search path.
    pub fn is_available(&self) -> bool {
        Command::new("which")
            .arg(self.as_str())
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Probe for an installed package manager in priority order
    /// (bun > pnpm > yarn > npm); npm is the universal fallback.
    pub fn detect() -> Self {
        Self::detect_with(|pm| pm.is_available())
    }

    /// Detection with an injectable availability probe.
    pub fn detect_with(available: impl Fn(NodePackageManager) -> bool) -> Self {
        Self::DETECTION_ORDER
            .iter()
            .copied()
            .find(|pm| available(*pm))
            .unwrap_or(NodePackageManager::Npm)
    }
}

impl fmt::Display for NodePackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
