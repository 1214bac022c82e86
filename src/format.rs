//! File-format dispatch
//!
//! Maps a file extension to the kind of IQ recording it holds. The readers
//! for the container formats live outside this crate; the registry only
//! decides which one a file belongs to and whether it needs a companion
//! header file.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{IqError, Result};

/// IQ recording formats known to the tool chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IqFormat {
    /// Text samples, `.txt` / `.csv`
    Ascii,
    /// Raw complex64, `.bin`
    RawBinary,
    Wav,
    /// Tektronix IQT, `.iqt` / `.iq`
    Iqt,
    /// Tektronix TIQ, `.tiq`
    Tiq,
    /// NI TDMS, `.tdms`
    Tdms,
    /// TCAP dump, `.dat` + text header
    Tcap,
    /// R&S XDAT, `.xdat` + text header
    Xdat,
}

impl IqFormat {
    /// Whether the data file is only readable together with a header file.
    pub fn requires_header(&self) -> bool {
        matches!(self, IqFormat::Tcap | IqFormat::Xdat)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            IqFormat::Ascii => "ASCII",
            IqFormat::RawBinary => "raw binary",
            IqFormat::Wav => "wav",
            IqFormat::Iqt => "iqt",
            IqFormat::Tiq => "tiq",
            IqFormat::Tdms => "TDMS",
            IqFormat::Tcap => "TCAP",
            IqFormat::Xdat => "XDAT",
        }
    }
}

impl fmt::Display for IqFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A data file resolved to its format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IqSource {
    pub format: IqFormat,
    pub data_path: PathBuf,
    pub header_path: Option<PathBuf>,
}

/// Extension -> format lookup, validated on registration.
#[derive(Debug, Clone, Default)]
pub struct FormatRegistry {
    formats: BTreeMap<String, IqFormat>,
}

impl FormatRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every format of the tool chain.
    pub fn standard() -> Result<Self> {
        let mut registry = Self::new();
        let entries = [
            ("txt", IqFormat::Ascii),
            ("csv", IqFormat::Ascii),
            ("bin", IqFormat::RawBinary),
            ("wav", IqFormat::Wav),
            ("iqt", IqFormat::Iqt),
            ("iq", IqFormat::Iqt),
            ("tiq", IqFormat::Tiq),
            ("tdms", IqFormat::Tdms),
            ("dat", IqFormat::Tcap),
            ("xdat", IqFormat::Xdat),
        ];
        for (ext, format) in entries {
            registry.register(ext, format)?;
        }
        Ok(registry)
    }

    /// Register `extension` (without the dot, case-insensitive).
    ///
    /// Fails on an empty extension, one containing a dot or path separator,
    /// or one that is already taken.
    pub fn register(&mut self, extension: &str, format: IqFormat) -> Result<()> {
        let ext = extension.to_ascii_lowercase();
        if ext.is_empty() || ext.contains(['.', '/', '\\']) {
            return Err(IqError::InvalidInput(format!(
                "'{extension}' is not a valid file extension"
            )));
        }
        if let Some(existing) = self.formats.get(&ext) {
            return Err(IqError::InvalidInput(format!(
                "extension '.{ext}' is already registered for {existing}"
            )));
        }
        self.formats.insert(ext, format);
        Ok(())
    }

    pub fn lookup(&self, extension: &str) -> Option<IqFormat> {
        self.formats.get(&extension.to_ascii_lowercase()).copied()
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.formats.keys().map(String::as_str)
    }

    /// Determine the format of `path`, attaching `header` when the format
    /// needs one.
    pub fn resolve(&self, path: &Path, header: Option<&Path>) -> Result<IqSource> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        let format = self
            .lookup(&ext)
            .ok_or_else(|| IqError::UnsupportedFormat(format!("{}", path.display())))?;
        log::info!("This is a {format} file: {}", path.display());

        let header_path = match (format.requires_header(), header) {
            (true, Some(h)) => Some(h.to_path_buf()),
            (true, None) => {
                return Err(IqError::InvalidInput(format!(
                    "{format} files need a text header file as well: {}",
                    path.display()
                )))
            }
            (false, Some(h)) => {
                log::warn!(
                    "Ignoring header {} for {format} file {}",
                    h.display(),
                    path.display()
                );
                None
            }
            (false, None) => None,
        };

        Ok(IqSource {
            format,
            data_path: path.to_path_buf(),
            header_path,
        })
    }
}

/// Resolve `path` against the [standard](FormatRegistry::standard) registry.
pub fn get_iq_source(path: &Path, header: Option<&Path>) -> Result<IqSource> {
    FormatRegistry::standard()?.resolve(path, header)
}
