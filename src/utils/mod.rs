pub mod auth;
pub mod input;
pub mod logging;
#[cfg(test)]
pub mod test_utils;
pub mod url;
