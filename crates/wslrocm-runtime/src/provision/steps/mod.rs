//! Step implementations, grouped by the part of the system they touch.

pub(super) mod application;
pub(super) mod driver;
pub(super) mod environment;
pub(super) mod framework;
pub(super) mod library;
pub(super) mod prerequisites;
pub(super) mod report;
