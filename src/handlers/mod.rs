pub mod answers;
pub mod locator;
pub mod votes;
