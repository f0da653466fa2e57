mod constant_frame_rate;
mod nal_unit_type;

pub use constant_frame_rate::*;
pub use nal_unit_type::*;
