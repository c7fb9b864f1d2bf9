//! Event application: evaluation plus the side-effect half of the pipeline.

mod handle_event;

pub use handle_event::handle_event;
