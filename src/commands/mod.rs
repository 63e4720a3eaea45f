pub mod extract;
pub mod index;
pub mod lookup;
pub mod status;
pub mod validate;
