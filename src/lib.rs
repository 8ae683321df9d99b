#![doc(test(attr(deny(warnings))))]

//! Reception Core offers the grouping, aggregation, and edit-overlay
//! primitives that power workshop reception review workflows.

pub mod core;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Reception Core tracing initialized.");
    });
}
