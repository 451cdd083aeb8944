//! Enum registration and property resolution (KEN).

define_domain_errors! {
    pub enum EnumError in Enum {
        /// KEN1001: the property names an enum type no schema declared
        UnknownEnumType => unknown_type(name) {
            code: (EN, Resolution, 1),
            message: "unknown enum type: '{name}'",
            help: "check the type token against the loaded schemas",
        },

        /// KEN2001
        InvalidEnumLiteral => invalid_literal(literal, ty) {
            code: (EN, Validation, 1),
            message: "'{literal}' is not a valid value for enum {ty}",
            help: "use one of the enum's declared members, or bind the value through a variable to defer the check to runtime",
        },

        /// KEN2002
        ApplyOnSyncValue => apply_on_sync_value(transform) {
            code: (EN, Validation, 2),
            message: "transform '{transform}' is applied to a value that is not a resource output",
            help: "only resource outputs (or variables bound to them) can be transformed with apply",
        },

        /// KEN2003: raised by the runtime reference evaluator, never during generation
        RuntimeEnumParseFailure => runtime_parse_failure(value, ty, origin) {
            code: (EN, Validation, 3),
            message: "cannot convert '{value}' to {ty} ({origin}): not a declared member",
        },

        /// KEN2004
        MixedEnumKinds => mixed_kinds(ty, member, expected, found) {
            code: (EN, Validation, 4),
            message: "member '{member}' of {ty} is {found}, expected {expected}",
            help: "all members of an enum must share one primitive kind",
        },

        /// KEN3001
        DuplicateEnumType => duplicate_type(name) {
            code: (EN, Conflict, 1),
            message: "enum type '{name}' is already registered",
            help: "remove the duplicate definition from one of the schemas",
        },

        /// KEN3002
        DuplicateEnumMember => duplicate_member(ty, member) {
            code: (EN, Conflict, 2),
            message: "enum {ty} declares member '{member}' more than once",
        },

        /// KEN3003
        DuplicateEnumValue => duplicate_value(ty, first, second, value) {
            code: (EN, Conflict, 3),
            message: "enum {ty}: members '{first}' and '{second}' share the value {value}",
            help: "literal values must be unique within an enum",
        },

        /// KEN4001
        EmptyEnum => empty(ty) {
            code: (EN, Missing, 1),
            message: "enum {ty} declares no members",
        },

        /// KEN4002: int members cannot borrow their value as a name
        UnnamedEnumMember => unnamed_member(ty, value) {
            code: (EN, Missing, 2),
            message: "member with value {value} of {ty} needs a name",
            help: "only string members can derive their name from the value",
        },

        /// KEN8001: only reported when unsafe-conversion warnings are enabled
        UnsafeEnumConversion => unsafe_conversion(property, ty) {
            code: (EN, Warning, 1),
            message: "{property} is converted to {ty} at runtime and may fail when the program runs",
            help: "use a literal member to have the value checked during generation",
            severity: Warning,
        },
    }
}
