//! Database repositories.

mod organization;
mod profile;
mod site_message;

pub use organization::OrganizationRepository;
pub use profile::ProfileRepository;
pub use site_message::{NewSiteMessage, SiteMessageRepository};
