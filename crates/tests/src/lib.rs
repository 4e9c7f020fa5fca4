pub mod fixtures;

#[cfg(test)]
mod invite_tests;
#[cfg(test)]
mod ratelimit_tests;
