use thiserror::Error;

/// A failure to recognise input, raised by a lexer or a parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecognitionError {
    #[error("mismatched input '{found}' expecting {expected}")]
    InputMismatch {
        found: String,
        expected: String,
        token_index: usize,
    },

    #[error("no viable alternative at input '{found}'")]
    NoViableAlternative { found: String, token_index: usize },

    #[error("token recognition error at: '{text}'")]
    TokenRecognition { text: String, offset: usize },

    #[error("extraneous input '{found}' expecting <EOF>")]
    ExtraneousInput { found: String, token_index: usize },

    #[error("input nested more than {limit} levels deep at token {token_index}")]
    NestingTooDeep { limit: usize, token_index: usize },
}

/// How a parse attempt failed.
#[derive(Error, Debug)]
pub enum ParseFailure {
    /// The parse was aborted by [`ErrorStrategy::Bail`](super::ErrorStrategy::Bail).
    #[error("parse cancelled: {0}")]
    Cancelled(RecognitionError),

    #[error(transparent)]
    Recognition(RecognitionError),

    /// Anything that is not a recognition problem, e.g. an unknown start rule.
    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}
