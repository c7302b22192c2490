//! Connection settings

use crate::{IPC_WINDOW_TITLE, SEGMENT_NAME_PREFIX};

/// Names the client uses to find the IPC window and its shared memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpcConfig {
    /// Exact, case-sensitive title of the IPC window
    pub window_title: String,
    /// Prefix of the file mapping names (segment id appended in decimal)
    pub segment_prefix: String,
}

impl Default for IpcConfig {
    fn default() -> Self {
        Self {
            window_title: IPC_WINDOW_TITLE.to_string(),
            segment_prefix: SEGMENT_NAME_PREFIX.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_plugin_names() {
        let config = IpcConfig::default();
        assert_eq!(config.window_title, "MusicBee IPC Interface");
        assert_eq!(config.segment_prefix, "mbipc_mmf_");
    }
}
