pub mod answer;
pub mod vote;
pub mod widget;

pub use answer::*;
pub use vote::*;
pub use widget::*;
