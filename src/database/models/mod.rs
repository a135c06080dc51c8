pub mod booking;
pub mod guest;
pub mod payment;
pub mod room;

pub use booking::*;
pub use guest::*;
pub use payment::*;
pub use room::*;
