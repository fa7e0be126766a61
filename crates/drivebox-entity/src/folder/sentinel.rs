//! The two fixed sentinel folders that anchor every tenant namespace.

use uuid::Uuid;

/// The permanent root folder. Never deleted, never moved.
pub const ROOT_FOLDER_ID: Uuid = Uuid::from_u128(0x64e4_a5f7_c25e_4b0a_2c9d_0000_0000_1234);

/// The trash container. Always soft-deleted; everything beneath it is
/// considered trashed.
pub const BIN_FOLDER_ID: Uuid = Uuid::from_u128(0x64e4_a5f7_c25e_4b0a_2c9d_0000_0000_5678);

/// Display name of the root sentinel.
pub const ROOT_FOLDER_NAME: &str = "root";

/// Display name of the bin sentinel.
pub const BIN_FOLDER_NAME: &str = "bin";

/// Whether an ID refers to one of the two sentinel folders.
pub fn is_sentinel(id: Uuid) -> bool {
    id == ROOT_FOLDER_ID || id == BIN_FOLDER_ID
}
