pub mod device;
pub mod errors;
pub mod key;
pub mod keyboard;

pub use device::*;
pub use errors::*;
pub use key::*;
pub use keyboard::*;
