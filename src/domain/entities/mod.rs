//! Domain Entities

mod deployment;
mod metadata;
mod package_index;
mod recipient;
mod shadow;

pub use deployment::{
    AudioItemRef, DeploymentSpec, PackageSpec, PlaylistPrompts, PlaylistSpec, SpecError,
    CATEGORY_TUTORIAL, CATEGORY_USER_FEEDBACK,
};
pub use metadata::{
    CategoryRow, ContentRow, MetadataTables, PackageRow, CATEGORIES_IN_PACKAGES_CSV,
    CONTENT_IN_PACKAGES_CSV, PACKAGES_IN_DEPLOYMENT_CSV,
};
pub use package_index::{
    AudioRef, IndexError, PackageIndex, PackageRecord, PlaylistRecord, INDEX_FORMAT_VERSION,
    MAX_LINE_LENGTH, MAX_PROMPT_PATHS, PACKAGES_DATA_FILE,
};
pub use recipient::Recipient;
pub use shadow::{ContentKey, ShadowEntry, ShadowMap};
