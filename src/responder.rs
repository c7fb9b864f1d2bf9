//! The opaque question responder collaborator.

/// Takes a question-shaped message and optionally returns a short answer.
/// Answer generation itself lives outside this crate.
pub trait Responder: Send {
    fn answer(&self, question: &str) -> Option<String>;
}

/// Responder that never answers. Default wiring for the shipped binary.
#[derive(Default)]
pub struct NoopResponder;

impl Responder for NoopResponder {
    fn answer(&self, _question: &str) -> Option<String> {
        None
    }
}
