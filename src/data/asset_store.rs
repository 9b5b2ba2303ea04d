use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A read-only store of bundled assets addressed by name.
pub trait AssetSource {
    /// Full contents of the named asset.
    fn read(&self, name: &str) -> std::io::Result<Cow<'_, [u8]>>;
}

impl<T: AssetSource + ?Sized> AssetSource for &T {
    fn read(&self, name: &str) -> std::io::Result<Cow<'_, [u8]>> {
        (**self).read(name)
    }
}

/// Assets stored as files under one directory.
#[derive(Debug, Clone)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// `~/.cache/bvr/assets`.
    pub fn default_location() -> anyhow::Result<Self> {
        Ok(Self::new(crate::data::FsAccess::default_asset_dir()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirAssets {
    fn read(&self, name: &str) -> std::io::Result<Cow<'_, [u8]>> {
        Ok(Cow::Owned(std::fs::read(self.root.join(name))?))
    }
}

/// Assets held in memory, e.g. compiled in with `include_bytes!`.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    files: HashMap<String, Cow<'static, [u8]>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_static(mut self, name: &str, bytes: &'static [u8]) -> Self {
        self.files.insert(name.to_string(), Cow::Borrowed(bytes));
        self
    }

    pub fn with_owned(mut self, name: &str, bytes: Vec<u8>) -> Self {
        self.files.insert(name.to_string(), Cow::Owned(bytes));
        self
    }

    pub fn insert(&mut self, name: &str, bytes: Vec<u8>) {
        self.files.insert(name.to_string(), Cow::Owned(bytes));
    }
}

impl AssetSource for MemoryAssets {
    fn read(&self, name: &str) -> std::io::Result<Cow<'_, [u8]>> {
        self.files
            .get(name)
            .map(|bytes| Cow::Borrowed(&bytes[..]))
            .ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::NotFound, format!("no bundled asset named `{name}`"))
            })
    }
}
