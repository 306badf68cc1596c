//! CLI command implementations

pub(crate) mod common;
pub(crate) mod down;
pub(crate) mod make;
pub(crate) mod status;
pub(crate) mod up;
