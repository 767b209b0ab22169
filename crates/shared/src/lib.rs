//! Wire and domain types shared between the clock-service client and its front-ends.

pub mod domain;
pub mod protocol;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
