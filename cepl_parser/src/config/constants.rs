pub mod compile_time {
    pub mod file_processing {
        /// Maximum size of a query file (1MB)
        /// SECURITY: Bounds memory used by a single parse
        pub const MAX_FILE_SIZE: u64 = 1024 * 1024;

        /// Maximum number of lines in a query file
        /// SECURITY: Prevents algorithmic complexity attacks
        pub const MAX_LINE_COUNT: usize = 50_000;

        /// Extension accepted when the extension requirement is enabled
        pub const CEPL_EXTENSION: &str = "cepl";
    }

    pub mod lexical {
        /// Maximum identifier length for relations, variables and properties
        /// SECURITY: Prevents parser complexity attacks
        pub const MAX_IDENTIFIER_LENGTH: usize = 255;

        /// Maximum length of a single `#` comment
        pub const MAX_COMMENT_LENGTH: usize = 10_000;

        /// Maximum length of a numeric literal
        pub const MAX_NUMBER_LENGTH: usize = 64;

        /// Maximum significant tokens in one query
        /// SECURITY: Bounds memory used by the token stream
        pub const MAX_TOKEN_COUNT: usize = 10_000;

        /// Maximum parenthesis nesting depth
        /// SECURITY: Prevents stack overflow in the recursive-descent parser
        pub const MAX_NESTING_DEPTH: usize = 128;
    }

    pub mod syntax {
        /// Maximum nesting of parser productions: each `not`, `(` and chained
        /// `:`, `|`, connective or arithmetic operator counts one level
        /// SECURITY: Keeps the parser and the recursive tree passes (validate,
        /// rendering, drop) within a 2MB thread stack
        pub const MAX_RECURSION_DEPTH: usize = 128;
    }

    pub mod logging {
        /// Maximum length of a logged message before truncation
        pub const MAX_LOG_MESSAGE_LENGTH: usize = 4_096;

        /// Capacity hint for in-memory loggers
        pub const LOG_BUFFER_SIZE: usize = 1_000;
    }
}
