//! Tunables for a profile-processing run.

use serde::{Deserialize, Serialize};

/// Options controlling a [`crate::ProfileAssistant`] run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileOptions {
    /// Merge without running the significance test: any structurally valid
    /// input set yields a compile verdict.
    #[serde(default)]
    pub force_merge: bool,

    /// The merge targets a platform-wide boot image baseline: tolerate
    /// format-version mismatches between inputs and reference instead of
    /// aborting.
    #[serde(default)]
    pub boot_image_merge: bool,

    /// Minimum percent growth in distinct executed methods for the
    /// difference to count as significant.
    #[serde(default = "default_min_percent_change")]
    pub min_new_methods_percent_change: u32,

    /// Minimum percent growth in distinct loaded classes for the difference
    /// to count as significant.
    #[serde(default = "default_min_percent_change")]
    pub min_new_classes_percent_change: u32,
}

const fn default_min_percent_change() -> u32 {
    20
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            force_merge: false,
            boot_image_merge: false,
            min_new_methods_percent_change: default_min_percent_change(),
            min_new_classes_percent_change: default_min_percent_change(),
        }
    }
}
