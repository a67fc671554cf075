mod banner;
mod link;
mod profile;

pub use banner::Banner;
pub use link::Link;
pub use profile::Profile;
