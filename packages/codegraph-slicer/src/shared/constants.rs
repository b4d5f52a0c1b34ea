//! Centralized constants
//!
//! Depth limits, platform namespaces and the library idioms the slicer knows about.

/// Hash generation configuration
pub mod hashing {
    /// Length of truncated hash strings (SHA256 produces 64 hex chars, we use 32)
    pub const HASH_LENGTH: usize = 32;
}

/// Well-known type names
pub mod types {
    pub const STRING_CLASS: &str = "java.lang.String";

    pub const THROWABLE_CLASS: &str = "java.lang.Throwable";
}

/// Interprocedural depth limits
pub mod depth {
    /// Hard ceiling for both upward (callers) and downward (callees) depth
    pub const MAX_DEPTH_LIMIT: usize = 5;

    pub const DEFAULT_UPWARD_DEPTH: usize = 5;

    pub const DEFAULT_DOWNWARD_DEPTH: usize = 5;
}

/// Slice merging
pub mod merging {
    /// Upper bound on enumerated root-to-leaf paths per root
    pub const DEFAULT_MAX_MERGE_PATHS: usize = 256;
}

/// Platform/library namespaces excluded from the call graph by default
pub mod namespaces {
    pub const DEFAULT_EXCLUDED: &[&str] = &[
        "java.",
        "javax.",
        "sun.",
        "com.sun.",
        "jdk.",
        "android.",
        "androidx.",
        "kotlin.",
        "dalvik.",
    ];
}

/// Library calls that move data between their arguments
pub mod idioms {
    /// `System.arraycopy(src, srcPos, dest, destPos, length)`
    pub const BULK_COPY_CLASS: &str = "java.lang.System";
    pub const BULK_COPY_METHOD: &str = "arraycopy";
    pub const BULK_COPY_SOURCE_ARG: usize = 0;
    pub const BULK_COPY_DEST_ARG: usize = 2;

    /// Key/value containers whose insertions carry data into the receiver
    pub const MAP_CLASSES: &[&str] = &[
        "java.util.Map",
        "java.util.HashMap",
        "java.util.Hashtable",
        "java.util.LinkedHashMap",
        "java.util.TreeMap",
        "java.util.Properties",
    ];
    pub const MAP_INSERT_METHODS: &[&str] = &["put", "putAll", "setProperty"];

    /// `String.replace(char, char)`, folded by the optimizer
    pub const REPLACE_METHOD: &str = "replace";
}
