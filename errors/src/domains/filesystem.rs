//! Reading inputs and writing the generated document (KFS).

define_domain_errors! {
    pub enum FilesystemError in Filesystem {
        /// KFS2001
        InvalidGlobPattern => invalid_glob(reason) {
            code: (FS, Validation, 1),
            message: "glob pattern error: {reason}",
            help: "fix the pattern in `schemas.include` or `schemas.exclude`",
        },

        /// KFS2002: a generation run with no schemas is always a misconfiguration
        EmptyFileList => empty_file_list() {
            code: (FS, Validation, 2),
            message: "no schema documents matched the configured patterns",
            help: "check `schemas.include` in enumgen.toml",
        },

        /// KFS4001
        FileNotFound => file_not_found(path) {
            code: (FS, Missing, 1),
            message: "file not found: {path}",
        },

        /// KFS9001
        IoError => io_error(reason) {
            code: (FS, Internal, 1),
            message: "io error: {reason}",
        },
    }
}
