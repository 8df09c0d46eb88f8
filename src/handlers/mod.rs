pub mod home_handlers;
pub mod profile_handlers;

pub use home_handlers::index_handler;
pub use profile_handlers::profile_handler;
