use std::fmt::Display;

use thiserror::Error;

use crate::SourceLocation;

/// The compilation pass a diagnostic originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Lex,
    Parse,
    Type,
    Codegen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    location: SourceLocation,
    severity: Severity,
    notes: Vec<String>,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, location: SourceLocation) -> Self {
        Error {
            internal_error: error_impl,
            location,
            severity: Severity::Error,
            notes: vec![],
        }
    }

    pub fn warning(error_impl: ErrorImpl, location: SourceLocation) -> Self {
        Error {
            severity: Severity::Warning,
            ..Error::new(error_impl, location)
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn add_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    pub fn get_location(&self) -> SourceLocation {
        self.location
    }

    pub fn get_notes(&self) -> &[String] {
        &self.notes
    }

    pub fn get_message(&self) -> String {
        self.internal_error.to_string()
    }

    pub fn get_kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn phase(&self) -> Phase {
        self.internal_error.phase()
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnterminatedComment => {
                ErrorTip::Suggestion(String::from("line comments must end with a newline"))
            }
            ErrorImpl::UnterminatedBlockComment => {
                ErrorTip::Suggestion(String::from("block comments must be closed with `*/`"))
            }
            ErrorImpl::UnexpectedTopLevelToken { token } => ErrorTip::Suggestion(format!(
                "found `{}`, only `func` and `extern` may appear here",
                token
            )),
            ErrorImpl::UnexpectedToken { found, .. } | ErrorImpl::ExpectedExpression { found } => {
                ErrorTip::Suggestion(format!("found `{}`", found))
            }
            ErrorImpl::ExpectedStatementEnd { found } => {
                ErrorTip::Suggestion(format!("found `{}`, did you miss a semicolon?", found))
            }
            ErrorImpl::UnknownType { type_ } => ErrorTip::Suggestion(format!(
                "`{}` is not one of int, float, char, str or bool",
                type_
            )),
            ErrorImpl::DuplicateFunction { function } => {
                ErrorTip::Suggestion(format!("function `{}` already declared", function))
            }
            ErrorImpl::DuplicateVariable { variable } => ErrorTip::Suggestion(format!(
                "variable `{}` already declared in this scope",
                variable
            )),
            ErrorImpl::UnknownFunction { function } | ErrorImpl::FunctionNotFound { function } => {
                ErrorTip::Suggestion(format!("function `{}` not declared", function))
            }
            ErrorImpl::UnknownVariable { variable } | ErrorImpl::VariableNotFound { variable } => {
                ErrorTip::Suggestion(format!("variable `{}` not declared", variable))
            }
            ErrorImpl::ArgumentCountMismatch { expected, received }
            | ErrorImpl::FunctionArgumentCountMismatch { expected, received } => {
                ErrorTip::Suggestion(format!(
                    "expected {} arguments, received {}",
                    expected, received
                ))
            }
            ErrorImpl::InvalidNumber { token } => ErrorTip::Suggestion(format!(
                "invalid number: `{}`, is it above the integer limit?",
                token
            )),
            _ => ErrorTip::None,
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Lexing
    #[error("newline in string")]
    NewlineInString,
    #[error("unterminated string")]
    UnterminatedString,
    #[error("empty character literal")]
    EmptyCharacterLiteral,
    #[error("newline in character literal")]
    NewlineInCharacterLiteral,
    #[error("unterminated character literal")]
    UnterminatedCharacterLiteral,
    #[error("unterminated comment")]
    UnterminatedComment,
    #[error("unterminated comment")]
    UnterminatedBlockComment,
    #[error("unexpected character")]
    UnexpectedCharacter,

    // Parsing
    #[error("unexpected token in top scope")]
    UnexpectedTopLevelToken { token: String },
    #[error("unexpected token, expected {expected}")]
    UnexpectedToken { expected: String, found: String },
    #[error("unexpected token, expected expression")]
    ExpectedExpression { found: String },
    #[error("unknown type `{type_}`")]
    UnknownType { type_: String },
    #[error("left hand side of assignment must be a variable")]
    InvalidAssignmentTarget,
    #[error("expected ';' or '}}'")]
    ExpectedStatementEnd { found: String },
    #[error("block must contain at least one expression")]
    EmptyBlock,

    // Type checking
    #[error("duplicate function name")]
    DuplicateFunction { function: String },
    #[error("cannot reassign variable with different type")]
    ReassignTypeMismatch,
    #[error("incorrect comparison type")]
    ComparisonTypeMismatch,
    #[error("incorrect arithmetic type")]
    ArithmeticTypeMismatch,
    #[error("unknown binary operator")]
    UnknownBinaryOperator { operator: String },
    #[error("incorrect operand type, expected int or float")]
    ExpectedNumericOperand,
    #[error("incorrect operand type, expected bool")]
    ExpectedBoolOperand,
    #[error("unknown unary operator")]
    UnknownUnaryOperator { operator: String },
    #[error("if condition must be a boolean")]
    NonBoolCondition,
    #[error("if/else blocks must have the same type")]
    IfBranchMismatch,
    #[error("incorrect type annotation")]
    AnnotationMismatch,
    #[error("duplicate variable name")]
    DuplicateVariable { variable: String },
    #[error("incorrect return type")]
    ReturnTypeMismatch,
    #[error("return statement outside of function")]
    ReturnOutsideFunction,
    #[error("break/continue statement outside of loop")]
    LoopControlOutsideLoop,
    #[error("unknown function name")]
    UnknownFunction { function: String },
    #[error("incorrect number of arguments")]
    ArgumentCountMismatch { expected: usize, received: usize },
    #[error("incorrect argument type")]
    ArgumentTypeMismatch,
    #[error("unknown variable name")]
    UnknownVariable { variable: String },
    #[error("operand is not indexable")]
    NotIndexable,
    #[error("index must be an integer")]
    NonIntegerIndex,
    #[error("unreachable code after return")]
    UnreachableCode,

    // Code generation
    #[error("function name already in use")]
    FunctionNameInUse { function: String },
    #[error("function argument count mismatch")]
    FunctionArgumentCountMismatch { expected: usize, received: usize },
    #[error("function already defined")]
    FunctionAlreadyDefined { function: String },
    #[error("llvm function verification failed")]
    VerificationFailed { function: String },
    #[error("invalid binary op")]
    InvalidBinaryOp,
    #[error("invalid unary op")]
    InvalidUnaryOp,
    #[error("invalid single op")]
    InvalidSingleOp,
    #[error("function not found")]
    FunctionNotFound { function: String },
    #[error("variable not found")]
    VariableNotFound { variable: String },
    #[error("invalid number type")]
    InvalidNumber { token: String },
    #[error("invalid type")]
    InvalidType,
    #[error("cannot reassign variable with different type")]
    StoreTypeMismatch,
    #[error("backend error: {message}")]
    Backend { message: String },
}

impl ErrorImpl {
    pub fn phase(&self) -> Phase {
        use ErrorImpl::*;

        match self {
            NewlineInString
            | UnterminatedString
            | EmptyCharacterLiteral
            | NewlineInCharacterLiteral
            | UnterminatedCharacterLiteral
            | UnterminatedComment
            | UnterminatedBlockComment
            | UnexpectedCharacter => Phase::Lex,

            UnexpectedTopLevelToken { .. }
            | UnexpectedToken { .. }
            | ExpectedExpression { .. }
            | UnknownType { .. }
            | InvalidAssignmentTarget
            | ExpectedStatementEnd { .. }
            | EmptyBlock => Phase::Parse,

            DuplicateFunction { .. }
            | ReassignTypeMismatch
            | ComparisonTypeMismatch
            | ArithmeticTypeMismatch
            | UnknownBinaryOperator { .. }
            | ExpectedNumericOperand
            | ExpectedBoolOperand
            | UnknownUnaryOperator { .. }
            | NonBoolCondition
            | IfBranchMismatch
            | AnnotationMismatch
            | DuplicateVariable { .. }
            | ReturnTypeMismatch
            | ReturnOutsideFunction
            | LoopControlOutsideLoop
            | UnknownFunction { .. }
            | ArgumentCountMismatch { .. }
            | ArgumentTypeMismatch
            | UnknownVariable { .. }
            | NotIndexable
            | NonIntegerIndex
            | UnreachableCode => Phase::Type,

            FunctionNameInUse { .. }
            | FunctionArgumentCountMismatch { .. }
            | FunctionAlreadyDefined { .. }
            | VerificationFailed { .. }
            | InvalidBinaryOp
            | InvalidUnaryOp
            | InvalidSingleOp
            | FunctionNotFound { .. }
            | VariableNotFound { .. }
            | InvalidNumber { .. }
            | InvalidType
            | StoreTypeMismatch
            | Backend { .. } => Phase::Codegen,
        }
    }
}

impl From<inkwell::builder::BuilderError> for ErrorImpl {
    fn from(error: inkwell::builder::BuilderError) -> Self {
        ErrorImpl::Backend {
            message: error.to_string(),
        }
    }
}
