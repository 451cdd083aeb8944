//! Generator bugs (KIN). User input never produces these.

define_domain_errors! {
    pub enum InternalError in Internal {
        /// KIN9001
        InternalError => internal(reason) {
            code: (IN, Internal, 1),
            message: "internal error: {reason}",
            help: "this is a generator bug, please report it",
        },
    }
}
