use log::warn;

use crate::utils::config::ID_MAX_LENGTH;

/// The import target keys records by `path` and rejects keys longer than `ID_MAX_LENGTH` bytes.
pub fn warn_if_id_too_long(path: &str) {
    if path.len() > ID_MAX_LENGTH {
        warn!(
            "path is {} bytes, over the {}-byte identifier limit: {}",
            path.len(),
            ID_MAX_LENGTH,
            path
        );
    }
}
