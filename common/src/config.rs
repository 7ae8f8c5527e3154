use std::ffi::OsString;
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "hosts.json";
const LOCK_EXTENSION: &str = ".lock";

#[derive(Debug, Clone)]
pub struct Config {
    /// Location of the JSON database.
    pub db_path: PathBuf,
    /// Emit every set sorted when saving, so two databases can be diffed.
    pub sort_on_save: bool,
    /// `1` hides headers, `2` also hides per-record details.
    pub quiet: u8,
}

impl Config {
    /// Advisory lock file guarding the database, `<db_path>.lock`.
    pub fn lock_path(&self) -> PathBuf {
        let mut name: OsString = self.db_path.clone().into_os_string();
        name.push(LOCK_EXTENSION);
        PathBuf::from(name)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            sort_on_save: false,
            quiet: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_path_appends_extension() {
        let cfg = Config {
            db_path: PathBuf::from("/var/lib/mdns/database.json"),
            ..Default::default()
        };
        assert_eq!(cfg.lock_path(), PathBuf::from("/var/lib/mdns/database.json.lock"));
    }

    #[test]
    fn default_points_at_working_directory() {
        let cfg = Config::default();
        assert_eq!(cfg.db_path, PathBuf::from(DEFAULT_DB_PATH));
        assert!(!cfg.sort_on_save);
        assert_eq!(cfg.quiet, 0);
    }
}
