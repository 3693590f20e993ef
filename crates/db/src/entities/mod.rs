//! Database entities.

pub mod organization;
pub mod profile;
pub mod site_message;

pub use organization::Entity as Organization;
pub use profile::Entity as Profile;
pub use site_message::Entity as SiteMessage;
