//! Schema, program and configuration documents (KDC).

define_domain_errors! {
    pub enum DocumentError in Document {
        /// KDC0001
        ParseError => parse_error(document, reason) {
            code: (DC, Syntax, 1),
            message: "failed to parse {document}: {reason}",
            help: "fix the syntax error in the document",
        },

        /// KDC0002
        ConfigError => config_error(reason) {
            code: (DC, Syntax, 2),
            message: "failed to load configuration: {reason}",
            help: "check enumgen.toml and ENUMGEN_* environment variables",
        },

        /// KDC2001
        UnsupportedFormat => unsupported_format(document, ext) {
            code: (DC, Validation, 1),
            message: "unsupported document format '{ext}' for {document}",
            help: "use a .toml, .yaml, .yml or .json document",
        },

        /// KDC2002: configuration parsed but failed validation
        InvalidConfig => invalid_config(reason) {
            code: (DC, Validation, 2),
            message: "invalid configuration: {reason}",
        },
    }
}
