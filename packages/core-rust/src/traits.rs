/// Whether a request changes state or only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Command,
    Query,
}

impl RequestKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Query => "query",
        }
    }
}

/// A request dispatched through the pipeline to exactly one handler.
///
/// Handlers answer with an `Outcome<Self::Output>`. Capabilities are
/// associated constants, so they are known from the request's static type
/// when its pipeline is assembled.
pub trait Request: Send + 'static {
    /// Value carried by a successful outcome. `()` for plain commands.
    type Output: Send + 'static;

    const KIND: RequestKind = RequestKind::Command;

    /// Requests that must not reach their handler without a resolved tenant.
    const TENANT_SCOPED: bool = false;
}
