//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// [site] Section Defaults
// ============================================================================

pub mod site {
    pub fn title() -> String {
        "notepub".into()
    }

    pub fn language() -> String {
        "en".into()
    }
}

// ============================================================================
// [remote] Section Defaults
// ============================================================================

pub mod remote {
    pub fn endpoint() -> String {
        String::new()
    }

    pub fn token() -> String {
        String::new()
    }
}

// ============================================================================
// [store] Section Defaults
// ============================================================================

pub mod store {
    use std::path::PathBuf;

    pub fn data() -> PathBuf {
        PathBuf::from("data")
    }

    pub fn output() -> PathBuf {
        PathBuf::from("public")
    }
}

// ============================================================================
// [sync] Section Defaults
// ============================================================================

pub mod sync {
    /// Notes fetched per remote page.
    pub fn page_size() -> usize {
        49
    }

    /// The remote count endpoint is known to undercount by one on some
    /// accounts; this slack absorbs exactly that.
    pub fn count_slack() -> usize {
        1
    }
}
