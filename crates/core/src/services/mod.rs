//! Business logic services.

pub mod dispatcher;
pub mod inbox;
pub mod renderer;
pub mod resolver;
pub mod transports;

pub use dispatcher::{DispatchOutcome, MtsDispatcher, validate_request};
pub use inbox::{InboxService, SiteMessageResponse};
pub use renderer::render_message;
pub use resolver::{RecipientResolver, default_roles_for};
pub use transports::{EmailTransport, SiteTransport, WebhookTransport};
