use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Invalid customer ID: {0:?} (expected 9-10 digits)")]
    InvalidCustomerId(String),

    #[error("Bundle not found: {0}")]
    BundleNotFound(i64),

    #[error("Bundle ID must be a number, got {0:?}")]
    MalformedBundleId(String),

    #[error("Invalid choice: {0:?}")]
    UnknownMenuChoice(String),
}

impl StoreError {
    /// Short label used when counting rejections.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidCustomerId(_) => "invalid_customer_id",
            Self::BundleNotFound(_) => "bundle_not_found",
            Self::MalformedBundleId(_) => "malformed_bundle_id",
            Self::UnknownMenuChoice(_) => "unknown_menu_choice",
        }
    }
}
