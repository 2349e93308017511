pub mod math;
pub mod pda;
pub mod swap_direction;
pub mod tick_window;

pub use math::*;
pub use pda::*;
pub use swap_direction::*;
pub use tick_window::*;
