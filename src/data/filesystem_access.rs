//! Per-user cache directory and current directory lookup.
#[derive(Debug)]
pub enum FsAccess {
    Cache,
    Current,
}

impl FsAccess {
    /// Default location of the bundled model and label files: `~/.cache/bvr/assets`.
    pub fn default_asset_dir() -> anyhow::Result<std::path::PathBuf> {
        Self::Cache.path_with_subs(&["assets"])
    }

    /// Retrieves the base path for the specified directory type, optionally appending the `bvr` subdirectory.
    ///
    /// # Arguments
    /// * `raw` - If `true`, returns the base path without adding the `bvr` subdirectory.
    fn get_path(&self, raw: bool) -> anyhow::Result<std::path::PathBuf> {
        let base_path = match self {
            FsAccess::Cache => dirs::cache_dir(),
            FsAccess::Current => std::env::current_dir().ok(),
        };

        let mut path = base_path.ok_or_else(|| {
            anyhow::anyhow!("Unsupported operating system. Supported OS: Linux, MacOS, Windows.")
        })?;

        if !raw {
            path.push("bvr");
        }
        Ok(path)
    }

    /// Returns the raw path for the directory without adding the `bvr` subdirectory.
    ///
    /// Examples:
    /// `~/.cache`, the current directory.
    pub fn raw_path(&self) -> anyhow::Result<std::path::PathBuf> {
        self.get_path(true)
    }

    /// Constructs a path to the `bvr` directory with the provided subdirectories.
    /// Nothing is created on disk; a missing directory surfaces later as an asset read error.
    ///
    /// Examples:
    /// `~/.cache/bvr/sub1/sub2/sub3`, `./bvr/sub1`.
    pub fn path_with_subs(&self, subs: &[&str]) -> anyhow::Result<std::path::PathBuf> {
        let mut d = self.get_path(false)?;
        for sub in subs {
            d.push(sub);
        }
        Ok(d)
    }
}
