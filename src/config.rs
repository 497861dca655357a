use std::{env, ffi::OsString, path::PathBuf};

/// Environment variable read by [`Config::from_env`].
pub const ENV_STATE_FILE: &str = "TUUID_STATE_FILE";

/// File name of the state file in the default location.
const DEFAULT_FILE_NAME: &str = "tuuid.state";

/// Location of the state file of a generator.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum StatePath {
    /// `tuuid.state` in `/var/tmp` if it exists (Unix), or in [`env::temp_dir`] otherwise.
    #[default]
    Default,

    /// A caller-chosen path.
    Path(PathBuf),

    /// No state file; the sequence number lives in memory only and starts at a random value.
    Disabled,
}

impl StatePath {
    /// Returns the path to use, or `None` if persistence is disabled.
    pub fn resolve(&self) -> Option<PathBuf> {
        match self {
            Self::Default => Some(default_dir().join(DEFAULT_FILE_NAME)),
            Self::Path(path) => Some(path.clone()),
            Self::Disabled => None,
        }
    }
}

fn default_dir() -> PathBuf {
    #[cfg(unix)]
    {
        let var_tmp = std::path::Path::new("/var/tmp");
        if var_tmp.is_dir() {
            return var_tmp.to_path_buf();
        }
    }
    env::temp_dir()
}

/// Construction options of a [`Generator`](crate::Generator).
///
/// # Examples
///
/// ```rust
/// use tuuid::{Config, StatePath};
///
/// let config = Config::new().state_file("/run/myapp/uuid.state").file_mode(0o600);
/// assert_eq!(config.state_path, StatePath::Path("/run/myapp/uuid.state".into()));
///
/// let config = Config::new().without_state_file();
/// assert_eq!(config.state_path.resolve(), None);
/// ```
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Config {
    /// Where the generator persists its sequence number.
    pub state_path: StatePath,

    /// Permission bits of a newly created state file on Unix.
    pub file_mode: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_path: StatePath::Default,
            file_mode: 0o644,
        }
    }
}

impl Config {
    /// Returns the default configuration.
    pub fn new() -> Self {
        Default::default()
    }

    /// Reads the state file location from the `TUUID_STATE_FILE` environment variable.
    ///
    /// An unset variable selects the default location; `off`, `none` or an empty value disables
    /// persistence; any other value is used as the path.
    pub fn from_env() -> Self {
        Self::from_env_value(env::var_os(ENV_STATE_FILE))
    }

    fn from_env_value(value: Option<OsString>) -> Self {
        let state_path = match value {
            None => StatePath::Default,
            Some(v) if v.is_empty() || v == "off" || v == "none" => StatePath::Disabled,
            Some(v) => StatePath::Path(v.into()),
        };
        Self {
            state_path,
            ..Default::default()
        }
    }

    /// Sets the state file path.
    pub fn state_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_path = StatePath::Path(path.into());
        self
    }

    /// Disables the state file.
    pub fn without_state_file(mut self) -> Self {
        self.state_path = StatePath::Disabled;
        self
    }

    /// Sets the permission bits of a newly created state file.
    pub fn file_mode(mut self, mode: u32) -> Self {
        self.file_mode = mode;
        self
    }
}
