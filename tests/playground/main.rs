//! Playground integration tests: gateway policy, preview rendering, and the
//! full edit → render → persist flow.

mod support;

mod end_to_end;
mod ownership;
mod preview;
