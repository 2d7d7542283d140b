//! Test support.

mod context;

pub(crate) use context::{TestContext, checkout_details, detached_product};
