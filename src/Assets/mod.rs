// Files the tuner reads from the streaming-assets directory.
//
// tuningfork_settings.bin                 serialized Settings
// dev_tuningfork_fidelityparams_<N>.bin   serialized fidelity messages, N >= 1
// dev_tuningfork.descriptor               compiled descriptor set

mod settings;

pub use settings::{AggregationStrategy, Histogram, Settings, SettingsProblem, Submission};

use crate::Core::ErrorCode;
use prost::Message;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SETTINGS_FILE: &str = "tuningfork_settings.bin";
pub const DESCRIPTOR_FILE: &str = "dev_tuningfork.descriptor";
const FIDELITY_PARAMS_PREFIX: &str = "dev_tuningfork_fidelityparams_";
const FIDELITY_PARAMS_SUFFIX: &str = ".bin";

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: prost::DecodeError,
    },
    #[error("fidelity parameter files are 1-indexed, got {0}")]
    BadIndex(usize),
}

impl AssetError {
    /// Status code the native library would report for the same failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            AssetError::NotFound(_) => ErrorCode::NoSettings,
            AssetError::Decode { .. } => ErrorCode::BadSettingsFile,
            AssetError::Io { .. } => ErrorCode::BadFileOperation,
            AssetError::BadIndex(_) => ErrorCode::BadParameter,
        }
    }
}

impl From<AssetError> for ErrorCode {
    fn from(err: AssetError) -> Self {
        err.code()
    }
}

/// File name of the `n`-th dev fidelity parameter set.
pub fn fidelity_params_file_name(n: usize) -> String {
    format!("{FIDELITY_PARAMS_PREFIX}{n}{FIDELITY_PARAMS_SUFFIX}")
}

/// Reads and writes the tuner's binary assets in one directory.
#[derive(Debug, Clone)]
pub struct AssetStore {
    dir: PathBuf,
}

impl AssetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn settings_path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE)
    }

    pub fn descriptor_path(&self) -> PathBuf {
        self.dir.join(DESCRIPTOR_FILE)
    }

    pub fn has_descriptor(&self) -> bool {
        self.descriptor_path().is_file()
    }

    pub fn fidelity_params_path(&self, n: usize) -> Result<PathBuf, AssetError> {
        if n == 0 {
            return Err(AssetError::BadIndex(n));
        }
        Ok(self.dir.join(fidelity_params_file_name(n)))
    }

    pub fn load_settings(&self) -> Result<Settings, AssetError> {
        self.read_message(&self.settings_path())
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<(), AssetError> {
        self.write_bytes(&self.settings_path(), &settings.encode_to_vec())
    }

    pub fn load_dev_fidelity_params<F: Message + Default>(&self, n: usize) -> Result<F, AssetError> {
        let path = self.fidelity_params_path(n)?;
        self.read_message(&path)
    }

    pub fn save_dev_fidelity_params<F: Message>(&self, n: usize, params: &F) -> Result<(), AssetError> {
        let path = self.fidelity_params_path(n)?;
        self.write_bytes(&path, &params.encode_to_vec())
    }

    /// Number of consecutive dev fidelity files starting at 1.
    pub fn dev_fidelity_params_count(&self) -> usize {
        (1..)
            .take_while(|n| self.dir.join(fidelity_params_file_name(*n)).is_file())
            .count()
    }

    /// Remove every dev fidelity file, so a new set can be written from 1.
    pub fn clear_dev_fidelity_params(&self) -> Result<usize, AssetError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(source) => {
                return Err(AssetError::Io {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let mut removed = 0;
        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(FIDELITY_PARAMS_PREFIX) && name.ends_with(FIDELITY_PARAMS_SUFFIX) {
                let path = entry.path();
                fs::remove_file(&path).map_err(|source| AssetError::Io { path, source })?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn read_message<M: Message + Default>(&self, path: &Path) -> Result<M, AssetError> {
        let bytes = fs::read(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                AssetError::NotFound(path.to_path_buf())
            } else {
                AssetError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        M::decode(bytes.as_slice()).map_err(|source| AssetError::Decode {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<(), AssetError> {
        fs::create_dir_all(&self.dir).map_err(|source| AssetError::Io {
            path: self.dir.clone(),
            source,
        })?;
        fs::write(path, bytes).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
