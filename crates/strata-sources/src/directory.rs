//! Directory-of-files providers
//!
//! A configuration directory holds one file per top-level key: `db.yaml`
//! becomes the `db` key. [`FilesSource`] reads the `default`, per-environment
//! and `local` subdirectories of a configuration root.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use strata_core::{DEFAULT_LAYER, LOCAL_LAYER, Layer, Mapping, Source, Value, fold};

use crate::format::FileFormat;
use crate::script::ScriptOptions;
use crate::{Error, Result};

#[derive(Debug)]
struct ConfigFile {
    key: String,
    format: FileFormat,
    path: PathBuf,
}

/// Loads every recognized file in one directory.
///
/// - A directory that does not exist yields an empty mapping.
/// - A path that exists but is not a directory is an error.
/// - Files are visited in sorted name order; unrecognized extensions and
///   subdirectories are skipped.
/// - When several files share a basename, the one with the highest
///   [`FileFormat`] priority wins and a warning lists the duplicates.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
    scripts: Option<ScriptOptions>,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            scripts: None,
        }
    }

    /// Also evaluate script files. This runs arbitrary code.
    pub fn with_scripts(mut self, scripts: ScriptOptions) -> Self {
        tracing::warn!(
            dir = %self.dir.display(),
            extension = %scripts.extension,
            "Enabling potentially unsafe parsing of script config files"
        );
        self.scripts = Some(scripts);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read and decode the directory into a mapping keyed by basename
    pub fn read(&self) -> Result<Value> {
        if !self.dir.exists() {
            tracing::debug!(dir = %self.dir.display(), "No config directory found, skipping");
            return Ok(Value::mapping());
        }
        if !self.dir.is_dir() {
            return Err(Error::NotADirectory {
                path: self.dir.clone(),
            });
        }

        let mut files = self.list_files()?;
        files.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));

        let mut by_key: BTreeMap<String, Vec<ConfigFile>> = BTreeMap::new();
        for file in files {
            by_key.entry(file.key.clone()).or_default().push(file);
        }

        let mut settings = Mapping::with_capacity(by_key.len());
        for (key, candidates) in by_key {
            if candidates.len() > 1 {
                let duplicates: Vec<String> = candidates
                    .iter()
                    .filter_map(|f| f.path.file_name())
                    .map(|name| name.to_string_lossy().into_owned())
                    .collect();
                tracing::warn!(
                    dir = %self.dir.display(),
                    ?duplicates,
                    "Multiple configuration files share the basename '{key}'; \
                     only the highest-priority format is used"
                );
            }
            if let Some(winner) = candidates.into_iter().max_by_key(|f| f.format) {
                let value = self.decode(&winner)?;
                settings.insert(key, value);
            }
        }

        Ok(Value::Mapping(settings))
    }

    fn list_files(&self) -> Result<Vec<ConfigFile>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(|e| Error::io(&self.dir, e))? {
            let entry = entry.map_err(|e| Error::io(&self.dir, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(format) = self.format_of(&path) else {
                tracing::debug!(path = %path.display(), "Ignoring unrecognized file");
                continue;
            };
            let Some(key) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            files.push(ConfigFile {
                key: key.to_string(),
                format,
                path,
            });
        }
        Ok(files)
    }

    fn format_of(&self, path: &Path) -> Option<FileFormat> {
        let extension = path.extension()?.to_str()?;
        match &self.scripts {
            Some(scripts) if scripts.matches_extension(extension) => Some(FileFormat::Script),
            _ => FileFormat::from_extension(extension),
        }
    }

    fn decode(&self, file: &ConfigFile) -> Result<Value> {
        tracing::debug!(path = %file.path.display(), format = file.format.name(), "Decoding config file");
        match (&file.format, &self.scripts) {
            (FileFormat::Script, Some(scripts)) => scripts.evaluate(&file.path),
            (format, _) => {
                let content =
                    fs::read_to_string(&file.path).map_err(|e| Error::io(&file.path, e))?;
                format.decode(&file.path, &content)
            }
        }
    }
}

impl Source for DirectorySource {
    fn load(&self, _env: &str) -> strata_core::Result<Value> {
        Ok(self.read()?)
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

/// Loads `<root>/default`, `<root>/<env>` and `<root>/local`.
///
/// # Example
///
/// ```no_run
/// use strata_core::Source;
/// use strata_sources::FilesSource;
///
/// let settings = FilesSource::new("config").load("production")?;
/// # Ok::<(), strata_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct FilesSource {
    root: PathBuf,
    load_local: bool,
    scripts: Option<ScriptOptions>,
}

impl FilesSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            load_local: true,
            scripts: None,
        }
    }

    /// Whether `<root>/local` is loaded (default: yes)
    pub fn with_local(mut self, load_local: bool) -> Self {
        self.load_local = load_local;
        self
    }

    /// Also evaluate script files in every layer directory
    pub fn with_scripts(mut self, scripts: ScriptOptions) -> Self {
        self.scripts = Some(scripts);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// One tree per directory layer, in precedence order
    pub fn layers(&self, env: &str) -> Result<Vec<(Layer, Value)>> {
        let mut dirs = vec![(Layer::Default, DEFAULT_LAYER), (Layer::Environment, env)];
        if self.load_local {
            dirs.push((Layer::Local, LOCAL_LAYER));
        }

        dirs.into_iter()
            .map(|(layer, name)| {
                tracing::debug!(%layer, dir = %self.root.join(name).display(), "Loading directory layer");
                self.directory(name).read().map(|tree| (layer, tree))
            })
            .collect()
    }

    fn directory(&self, name: &str) -> DirectorySource {
        let source = DirectorySource::new(self.root.join(name));
        match &self.scripts {
            Some(scripts) => source.with_scripts(scripts.clone()),
            None => source,
        }
    }
}

impl Source for FilesSource {
    fn load(&self, env: &str) -> strata_core::Result<Value> {
        let layers = self.layers(env)?;
        Ok(fold(layers.iter().map(|(_, tree)| tree)))
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}
