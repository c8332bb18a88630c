//! Startup check of the on-disk store version.

use alloy_rlp::{RlpDecodable, RlpEncodable};
use hearth_interfaces::StoreAction;
use hearth_primitives::constants::{DATABASE_VERSION, MINOR_PROTOCOL_VERSION, PROTOCOL_VERSION};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;

/// Name of the status record inside the data directory.
const STATUS_FILE: &str = "status";

/// The status record: an RLP list of the three version constants the store
/// was last written under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, RlpEncodable, RlpDecodable)]
struct StatusRecord {
    protocol: u32,
    minor_protocol: u32,
    database: u32,
}

impl StatusRecord {
    fn current() -> Self {
        Self {
            protocol: PROTOCOL_VERSION,
            minor_protocol: MINOR_PROTOCOL_VERSION,
            database: DATABASE_VERSION,
        }
    }
}

/// Classifies the on-disk store against the compiled-in version constants.
///
/// A store written by the same versions can be trusted; one that differs
/// only in the minor protocol version is reusable after verification;
/// anything else (including a missing or corrupt status record) has to be
/// rebuilt.
#[derive(Debug)]
pub struct VersionChecker {
    path: PathBuf,
    action: StoreAction,
}

impl VersionChecker {
    /// Reads the status record under `db_path` and classifies it.
    pub fn new(db_path: &Path) -> Self {
        let action = match Self::read_status(db_path) {
            Some(record) => {
                if record.protocol != PROTOCOL_VERSION || record.database != DATABASE_VERSION {
                    StoreAction::Kill
                } else if record.minor_protocol != MINOR_PROTOCOL_VERSION {
                    StoreAction::Verify
                } else {
                    StoreAction::Trust
                }
            }
            None => StoreAction::Kill,
        };
        Self { path: db_path.to_path_buf(), action }
    }

    fn read_status(path: &Path) -> Option<StatusRecord> {
        let raw = fs::read(path.join(STATUS_FILE)).ok()?;
        <StatusRecord as alloy_rlp::Decodable>::decode(&mut raw.as_slice()).ok()
    }

    /// The action the store should be opened with.
    pub fn action(&self) -> StoreAction {
        self.action
    }

    /// Marks the store as good: rewrites the status record with the current
    /// constants, creating the data directory if needed.
    ///
    /// A store that was already trusted is left untouched.
    pub fn set_ok(&self) {
        if self.action == StoreAction::Trust {
            return
        }
        if let Err(err) = fs::create_dir_all(&self.path) {
            warn!(target: "client::version", %err, path = ?self.path, "failed to create data directory");
        }
        let encoded = alloy_rlp::encode(StatusRecord::current());
        if let Err(err) = fs::write(self.path.join(STATUS_FILE), encoded) {
            warn!(target: "client::version", %err, path = ?self.path, "failed to write status record");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_status(dir: &Path, record: StatusRecord) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(STATUS_FILE), alloy_rlp::encode(record)).unwrap();
    }

    #[test]
    fn missing_status_kills() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(VersionChecker::new(dir.path()).action(), StoreAction::Kill);
    }

    #[test]
    fn corrupt_status_kills() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(STATUS_FILE), b"not rlp at all").unwrap();
        assert_eq!(VersionChecker::new(dir.path()).action(), StoreAction::Kill);
    }

    #[test]
    fn matching_status_is_trusted() {
        let dir = tempfile::tempdir().unwrap();
        write_status(dir.path(), StatusRecord::current());
        assert_eq!(VersionChecker::new(dir.path()).action(), StoreAction::Trust);
    }

    #[test]
    fn minor_version_mismatch_verifies() {
        let dir = tempfile::tempdir().unwrap();
        let mut record = StatusRecord::current();
        record.minor_protocol += 1;
        write_status(dir.path(), record);
        assert_eq!(VersionChecker::new(dir.path()).action(), StoreAction::Verify);
    }

    #[test]
    fn protocol_mismatch_kills() {
        let dir = tempfile::tempdir().unwrap();
        let mut record = StatusRecord::current();
        record.protocol += 1;
        write_status(dir.path(), record);
        assert_eq!(VersionChecker::new(dir.path()).action(), StoreAction::Kill);
    }

    #[test]
    fn database_mismatch_kills() {
        let dir = tempfile::tempdir().unwrap();
        let mut record = StatusRecord::current();
        record.database += 1;
        write_status(dir.path(), record);
        assert_eq!(VersionChecker::new(dir.path()).action(), StoreAction::Kill);
    }

    #[test]
    fn set_ok_rewrites_the_record() {
        let dir = tempfile::tempdir().unwrap();
        let stale = StatusRecord { protocol: 1, minor_protocol: 1, database: 1 };
        write_status(dir.path(), stale);
        let checker = VersionChecker::new(dir.path());
        assert_eq!(checker.action(), StoreAction::Kill);
        checker.set_ok();
        assert_eq!(VersionChecker::new(dir.path()).action(), StoreAction::Trust);
    }

    #[test]
    fn set_ok_creates_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("chaindata");
        let checker = VersionChecker::new(&nested);
        assert_eq!(checker.action(), StoreAction::Kill);
        checker.set_ok();
        assert_eq!(VersionChecker::new(&nested).action(), StoreAction::Trust);
    }
}
