//! The captioning pipeline: rolling window, cadence, silence gate, dedup,
//! and the worker thread tying them to a source, an engine, and a sink.

pub mod clock;
pub mod dedup;
pub mod pipeline;
pub mod report;
pub mod silence;
pub mod sink;
pub mod window;
