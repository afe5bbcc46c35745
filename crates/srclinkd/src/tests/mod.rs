//! Test suites for the srclink daemon.

mod behaviour;
pub(crate) mod support;
