use tracing::error;

/// Tags attached to a reported error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    pub domain: &'static str,
    pub phone_number: Option<String>,
    pub code: Option<String>,
}

impl ErrorContext {
    pub fn new(domain: &'static str) -> Self {
        Self {
            domain,
            ..Default::default()
        }
    }

    pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Error-tracking sink for failures the caller never sees.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, message: String, context: ErrorContext);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn report(&self, message: String, context: ErrorContext) {
        error!(
            domain = context.domain,
            phone_number = context.phone_number.as_deref(),
            code = context.code.as_deref(),
            "{message}"
        );
    }
}
